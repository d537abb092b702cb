#![no_main]
use libfuzzer_sys::fuzz_target;
use starcharge::setup::ConfigValidator;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = ConfigValidator::parse(text);
    }
});
