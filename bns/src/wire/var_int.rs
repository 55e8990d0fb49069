use crate::{Error, Result};
use bytes::{Buf, BufMut};

/// The longest possible encoding of a u64 varint.
pub const MAX_VARINT_SIZE: usize = 10;

/// The size of the value encoded as a varint.
pub fn varint_size(value: u64) -> u64 {
    match value {
        0 => 1,
        _ => (64 - value.leading_zeros() as u64 + 6) / 7,
    }
}

/// Read a varint from the buffer.
///
/// Fails if the buffer ends before the last byte of the varint or if the encoding runs past
/// ten bytes or overflows 64 bits.
pub fn varint_decode(buffer: &mut dyn Buf) -> Result<u64> {
    let mut value: u64 = 0;
    for i in 0..MAX_VARINT_SIZE {
        if !buffer.has_remaining() {
            return Err(Error::MalformedWireData("truncated varint".to_string()));
        }
        let b = buffer.get_u8();
        if i == MAX_VARINT_SIZE - 1 && b > 0x01 {
            return Err(Error::MalformedWireData("varint overflows 64 bits".to_string()));
        }
        value |= ((b & 0x7f) as u64) << (7 * i);
        if b & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(Error::MalformedWireData("varint longer than 10 bytes".to_string()))
}

/// Write a varint to the buffer.
pub fn varint_encode(buffer: &mut dyn BufMut, value: u64) -> Result<()> {
    let mut v = value;
    while v >= 0x80 {
        buffer.put_u8((v as u8 & 0x7f) | 0x80);
        v >>= 7;
    }
    buffer.put_u8(v as u8);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn size() {
        assert_eq!(varint_size(0), 1);
        assert_eq!(varint_size(127), 1);
        assert_eq!(varint_size(128), 2);
        assert_eq!(varint_size(u16::MAX as u64), 3);
        assert_eq!(varint_size(u32::MAX as u64), 5);
        assert_eq!(varint_size(i64::MAX as u64), 9);
        assert_eq!(varint_size(u64::MAX), 10);
    }

    #[test]
    fn write_read() {
        write_read_value(0);
        write_read_value(127);
        write_read_value(128);
        write_read_value(300);
        write_read_value(u16::MAX as u64);
        write_read_value(u32::MAX as u64);
        write_read_value(u64::MAX);
    }

    fn write_read_value(n: u64) {
        let mut v = BytesMut::new();
        varint_encode(&mut v, n).unwrap();
        assert_eq!(v.len() as u64, varint_size(n));
        let j = varint_decode(&mut v).unwrap();
        assert_eq!(j, n);
    }

    #[test]
    fn test_known_values() {
        let mut v = Vec::new();
        varint_encode(&mut v, 0).unwrap();
        assert_eq!(v, vec![0]);
        v.clear();
        varint_encode(&mut v, 1).unwrap();
        assert_eq!(v, vec![1]);
        v.clear();
        varint_encode(&mut v, 127).unwrap();
        assert_eq!(v, vec![0x7f]);
        v.clear();
        varint_encode(&mut v, 128).unwrap();
        assert_eq!(v, vec![0x80, 0x01]);
        v.clear();
        varint_encode(&mut v, 170).unwrap();
        assert_eq!(v, vec![0xaa, 0x01]);
        v.clear();
        varint_encode(&mut v, 300).unwrap();
        assert_eq!(v, vec![0xac, 0x02]);
        v.clear();
        varint_encode(&mut v, 1567000).unwrap();
        assert_eq!(v, vec![0x98, 0xd2, 0x5f]);
        v.clear();
        // -1 as int64
        varint_encode(&mut v, u64::MAX).unwrap();
        assert_eq!(
            v,
            vec![0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01]
        );
    }

    #[test]
    fn truncated() {
        let mut buf: &[u8] = &[0x80, 0x80];
        assert!(matches!(
            varint_decode(&mut buf),
            Err(Error::MalformedWireData(_))
        ));
        let mut empty: &[u8] = &[];
        assert!(varint_decode(&mut empty).is_err());
    }

    #[test]
    fn too_long() {
        let mut buf: &[u8] = &[0xff; 11];
        assert!(matches!(
            varint_decode(&mut buf),
            Err(Error::MalformedWireData(_))
        ));
        let mut overflow: &[u8] = &[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x02];
        assert!(varint_decode(&mut overflow).is_err());
    }
}
