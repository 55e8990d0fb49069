#![no_main]

use libfuzzer_sys::fuzz_target;
use bnscodec::wire::{varint_decode, varint_encode, varint_size};
use bytes::Buf;

fuzz_target!(|data: &[u8]| {
    let mut buf = data;
    if let Ok(value) = varint_decode(&mut buf) {
        let consumed = data.len() - buf.remaining();
        let mut out = Vec::new();
        varint_encode(&mut out, value).expect("varint must encode");
        assert_eq!(out.len() as u64, varint_size(value));
        // non-canonical encodings with trailing zero groups decode but are longer
        assert!(out.len() <= consumed);
    }
});
