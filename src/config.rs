use crate::error::{Error, ErrorKind, Pos, Production, Result};

/// Default maximum nesting depth for elements and content-model groups
pub const DEFAULT_MAX_DEPTH: usize = 256;
/// Default maximum input size in bytes (16MB)
pub const DEFAULT_MAX_SIZE: usize = 16 * 1024 * 1024;

/// Configuration for parser limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Maximum nesting depth of elements and of choice/seq groups
    pub max_depth: usize,
    /// Maximum input size in bytes
    pub max_size: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_size: DEFAULT_MAX_SIZE,
        }
    }
}

impl ParserConfig {
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub const fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    /// Check an input length in bytes against `max_size`
    pub fn validate_size(&self, len: usize) -> Result<()> {
        if len > self.max_size {
            return Err(Error::new(
                Production::Document,
                ErrorKind::MaxSizeExceeded { max: self.max_size },
                Pos::new(0, 1, 1),
            ));
        }
        Ok(())
    }
}

/// Tracks nesting depth during parsing
#[derive(Debug, Default)]
pub struct ParsingContext {
    current_depth: usize,
}

impl ParsingContext {
    pub const fn new() -> Self {
        Self { current_depth: 0 }
    }

    /// Enter one nesting level, returning the exceeded limit on failure
    pub fn enter_nested(&mut self, config: &ParserConfig) -> std::result::Result<(), ErrorKind> {
        self.current_depth += 1;
        if self.current_depth > config.max_depth {
            self.current_depth -= 1;
            return Err(ErrorKind::MaxDepthExceeded {
                max: config.max_depth,
            });
        }
        Ok(())
    }

    pub fn exit_nested(&mut self) {
        self.current_depth = self.current_depth.saturating_sub(1);
    }

    pub const fn depth(&self) -> usize {
        self.current_depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ParserConfig::default();
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config.max_size, DEFAULT_MAX_SIZE);
    }

    #[test]
    fn test_validate_size() {
        let config = ParserConfig::default().with_max_size(4);
        assert!(config.validate_size("<a/>".len()).is_ok());
        let err = config.validate_size("<ab/>".len()).err();
        assert_eq!(
            err.map(|e| e.kind().clone()),
            Some(ErrorKind::MaxSizeExceeded { max: 4 })
        );
    }

    #[test]
    fn test_depth_tracking() {
        let config = ParserConfig::default().with_max_depth(2);
        let mut ctx = ParsingContext::new();
        assert!(ctx.enter_nested(&config).is_ok());
        assert!(ctx.enter_nested(&config).is_ok());
        assert_eq!(
            ctx.enter_nested(&config),
            Err(ErrorKind::MaxDepthExceeded { max: 2 })
        );
        assert_eq!(ctx.depth(), 2);
        ctx.exit_nested();
        assert_eq!(ctx.depth(), 1);
    }
}
