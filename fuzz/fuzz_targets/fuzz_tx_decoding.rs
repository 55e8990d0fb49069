#![no_main]

use libfuzzer_sys::fuzz_target;
use bnscodec::bns::BnsCodec;

fuzz_target!(|data: &[u8]| {
    let codec = BnsCodec::for_chain("fuzz-chain");
    if let Ok(tx) = codec.parse_bytes(data, "fuzz-chain") {
        let _ = codec.verify_all(&tx);
        // decoding accepts more than encoding, e.g. long memos
        if let Ok(bytes) = codec.bytes_to_post(&tx) {
            let again = codec.parse_bytes(&bytes, "fuzz-chain").expect("encoded transaction must decode");
            assert_eq!(again, tx);
        }
    }
});
