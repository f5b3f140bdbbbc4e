#![no_main]
use libfuzzer_sys::fuzz_target;
use zxml::{parse, render};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(document) = parse(s) {
            let rendered = render(&document);
            let reparsed = parse(&rendered).unwrap();
            assert_eq!(render(&reparsed), rendered);
        }
    }
});
