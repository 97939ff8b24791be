#![no_main]

use calltrace::TracerConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(config) = TracerConfig::from_toml_str(input) {
            assert!(config.max_depth >= 0);
        }
    }
});
