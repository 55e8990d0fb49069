#![no_main]

use libfuzzer_sys::fuzz_target;
use bnscodec::bns::{decode_address, encode_address};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(decoded) = decode_address(s) {
            let again = encode_address(&decoded.address, &decoded.prefix).expect("address must encode");
            assert_eq!(again, s.to_lowercase());
        }
    }
});
