use crate::wire::var_int::{varint_decode, varint_encode, varint_size};
use crate::{Error, Result};
use bytes::{Buf, BufMut, Bytes};

/// Read & write protobuf messages to and from binary.
///
/// A message is not self-delimiting: [Encodable::from_binary] consumes the whole buffer, the
/// enclosing message is responsible for the length prefix. Nested messages are read from a
/// buffer that holds exactly their bytes.
pub trait Encodable {
    /// Read the message from a buffer, consuming all of it.
    fn from_binary(buffer: &mut dyn Buf) -> Result<Self>
    where
        Self: Sized;

    /// Write the message to a buffer.
    fn to_binary(&self, buffer: &mut dyn BufMut) -> Result<()>;

    /// Return the size of the encoded form.
    // Used to write the length prefix of nested messages, so implementations must compute the
    // size from the fields and not by encoding.
    fn encoded_size(&self) -> u64;

    /// Encode the message into a new vector.
    fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut v = Vec::with_capacity(self.encoded_size() as usize);
        self.to_binary(&mut v)?;
        Ok(v)
    }

    /// Decode a message from a byte slice.
    fn from_bytes(bytes: &[u8]) -> Result<Self>
    where
        Self: Sized,
    {
        let mut buf = bytes;
        Self::from_binary(&mut buf)
    }
}

/// The protobuf wire types understood by the codec.
///
/// Groups (3 and 4) and the unassigned types 6 and 7 are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
    Varint = 0,
    Fixed64 = 1,
    LengthDelimited = 2,
    Fixed32 = 5,
}

impl TryFrom<u64> for WireType {
    type Error = Error;

    fn try_from(value: u64) -> Result<Self> {
        match value {
            0 => Ok(WireType::Varint),
            1 => Ok(WireType::Fixed64),
            2 => Ok(WireType::LengthDelimited),
            5 => Ok(WireType::Fixed32),
            _ => Err(Error::MalformedWireData(format!(
                "unsupported wire type {}",
                value
            ))),
        }
    }
}

/// A single decoded field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub number: u32,
    pub value: FieldValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Varint(u64),
    Fixed64(u64),
    Bytes(Bytes),
    Fixed32(u32),
}

impl Field {
    fn wrong_type(&self, expected: &str) -> Error {
        Error::MalformedWireData(format!(
            "field {} should be {}, got {:?}",
            self.number,
            expected,
            self.wire_type()
        ))
    }

    pub fn wire_type(&self) -> WireType {
        match self.value {
            FieldValue::Varint(_) => WireType::Varint,
            FieldValue::Fixed64(_) => WireType::Fixed64,
            FieldValue::Bytes(_) => WireType::LengthDelimited,
            FieldValue::Fixed32(_) => WireType::Fixed32,
        }
    }

    pub fn as_int64(&self) -> Result<i64> {
        match self.value {
            FieldValue::Varint(v) => Ok(v as i64),
            _ => Err(self.wrong_type("a varint")),
        }
    }

    /// int32 values are sign extended to 64 bits on the wire, the upper bits are dropped here.
    pub fn as_int32(&self) -> Result<i32> {
        match self.value {
            FieldValue::Varint(v) => Ok(v as i32),
            _ => Err(self.wrong_type("a varint")),
        }
    }

    pub fn as_bool(&self) -> Result<bool> {
        match self.value {
            FieldValue::Varint(v) => Ok(v != 0),
            _ => Err(self.wrong_type("a varint")),
        }
    }

    pub fn as_bytes(&self) -> Result<Vec<u8>> {
        match &self.value {
            FieldValue::Bytes(b) => Ok(b.to_vec()),
            _ => Err(self.wrong_type("length delimited")),
        }
    }

    pub fn as_string(&self) -> Result<String> {
        let raw = self.as_bytes()?;
        String::from_utf8(raw).map_err(|_| {
            Error::MalformedWireData(format!("field {} is not valid UTF-8", self.number))
        })
    }

    pub fn as_message<T: Encodable>(&self) -> Result<T> {
        match &self.value {
            FieldValue::Bytes(b) => {
                let mut inner = b.clone();
                T::from_binary(&mut inner)
            }
            _ => Err(self.wrong_type("length delimited")),
        }
    }
}

/// Largest field number protobuf allows.
pub const MAX_FIELD_NUMBER: u32 = (1 << 29) - 1;

/// Read the next field, tag and payload, from the buffer.
///
/// Fields of every supported wire type are read in full so that unknown fields can be
/// skipped by ignoring the result.
pub fn read_field(buffer: &mut dyn Buf) -> Result<Field> {
    let tag = varint_decode(buffer)?;
    let number = tag >> 3;
    if number == 0 || number > MAX_FIELD_NUMBER as u64 {
        return Err(Error::MalformedWireData(format!(
            "invalid field number {}",
            number
        )));
    }
    let number = number as u32;
    let value = match WireType::try_from(tag & 0x07)? {
        WireType::Varint => FieldValue::Varint(varint_decode(buffer)?),
        WireType::Fixed64 => {
            if buffer.remaining() < 8 {
                return Err(Error::MalformedWireData("truncated fixed64".to_string()));
            }
            FieldValue::Fixed64(buffer.get_u64_le())
        }
        WireType::Fixed32 => {
            if buffer.remaining() < 4 {
                return Err(Error::MalformedWireData("truncated fixed32".to_string()));
            }
            FieldValue::Fixed32(buffer.get_u32_le())
        }
        WireType::LengthDelimited => {
            let len = varint_decode(buffer)?;
            if len > buffer.remaining() as u64 {
                return Err(Error::MalformedWireData(format!(
                    "field {} claims {} bytes, {} remaining",
                    number,
                    len,
                    buffer.remaining()
                )));
            }
            FieldValue::Bytes(buffer.copy_to_bytes(len as usize))
        }
    };
    Ok(Field { number, value })
}

pub fn put_tag(buffer: &mut dyn BufMut, field: u32, wire_type: WireType) -> Result<()> {
    varint_encode(buffer, ((field as u64) << 3) | wire_type as u64)
}

pub fn tag_size(field: u32) -> u64 {
    varint_size((field as u64) << 3)
}

/// Write an int64 field. Zero is not written.
pub fn put_int64(buffer: &mut dyn BufMut, field: u32, value: i64) -> Result<()> {
    if value == 0 {
        return Ok(());
    }
    put_tag(buffer, field, WireType::Varint)?;
    varint_encode(buffer, value as u64)
}

pub fn int64_size(field: u32, value: i64) -> u64 {
    match value {
        0 => 0,
        v => tag_size(field) + varint_size(v as u64),
    }
}

/// Write an int32 field, sign extended as protobuf requires. Zero is not written.
pub fn put_int32(buffer: &mut dyn BufMut, field: u32, value: i32) -> Result<()> {
    put_int64(buffer, field, value as i64)
}

pub fn int32_size(field: u32, value: i32) -> u64 {
    int64_size(field, value as i64)
}

/// Write a bool field. False is not written.
pub fn put_bool(buffer: &mut dyn BufMut, field: u32, value: bool) -> Result<()> {
    put_int64(buffer, field, value as i64)
}

pub fn bool_size(field: u32, value: bool) -> u64 {
    int64_size(field, value as i64)
}

/// Write a bytes field. Empty values are not written.
pub fn put_bytes(buffer: &mut dyn BufMut, field: u32, value: &[u8]) -> Result<()> {
    if value.is_empty() {
        return Ok(());
    }
    put_raw_bytes(buffer, field, value)
}

/// Write a bytes field even if it is empty. Used for optional and repeated fields, where
/// presence carries meaning.
pub fn put_raw_bytes(buffer: &mut dyn BufMut, field: u32, value: &[u8]) -> Result<()> {
    put_tag(buffer, field, WireType::LengthDelimited)?;
    varint_encode(buffer, value.len() as u64)?;
    buffer.put_slice(value);
    Ok(())
}

pub fn bytes_size(field: u32, value: &[u8]) -> u64 {
    match value.len() {
        0 => 0,
        n => delimited_size(field, n as u64),
    }
}

pub fn delimited_size(field: u32, len: u64) -> u64 {
    tag_size(field) + varint_size(len) + len
}

pub fn put_string(buffer: &mut dyn BufMut, field: u32, value: &str) -> Result<()> {
    put_bytes(buffer, field, value.as_bytes())
}

pub fn string_size(field: u32, value: &str) -> u64 {
    bytes_size(field, value.as_bytes())
}

/// Write an embedded message. Messages are always written, an empty message as a zero length.
pub fn put_message(buffer: &mut dyn BufMut, field: u32, value: &dyn Encodable) -> Result<()> {
    put_tag(buffer, field, WireType::LengthDelimited)?;
    varint_encode(buffer, value.encoded_size())?;
    value.to_binary(buffer)
}

pub fn message_size(field: u32, value: &dyn Encodable) -> u64 {
    delimited_size(field, value.encoded_size())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn zero_values_are_omitted() {
        let mut v = Vec::new();
        put_int64(&mut v, 1, 0).unwrap();
        put_int32(&mut v, 2, 0).unwrap();
        put_bool(&mut v, 3, false).unwrap();
        put_bytes(&mut v, 4, &[]).unwrap();
        put_string(&mut v, 5, "").unwrap();
        assert!(v.is_empty());
        assert_eq!(int64_size(1, 0), 0);
        assert_eq!(string_size(5, ""), 0);
    }

    #[test]
    fn negative_int64_takes_ten_bytes() {
        let mut v = Vec::new();
        put_int64(&mut v, 1, -1).unwrap();
        assert_eq!(v, hex!("08ffffffffffffffffff01"));
        assert_eq!(int64_size(1, -1), 11);
        let mut b: &[u8] = &v;
        let field = read_field(&mut b).unwrap();
        assert_eq!(field.as_int64().unwrap(), -1);
    }

    #[test]
    fn negative_int32_is_sign_extended() {
        let mut v = Vec::new();
        put_int32(&mut v, 3, -2).unwrap();
        assert_eq!(v.len(), 11);
        let mut b: &[u8] = &v;
        assert_eq!(read_field(&mut b).unwrap().as_int32().unwrap(), -2);
    }

    #[test]
    fn read_fields() {
        // ticker "IOV" as field 3 and whole 878 as field 1
        let mut b: &[u8] = &hex!("1a03494f5608ee06");
        let f = read_field(&mut b).unwrap();
        assert_eq!(f.number, 3);
        assert_eq!(f.as_string().unwrap(), "IOV");
        assert!(f.as_int64().is_err());
        let f = read_field(&mut b).unwrap();
        assert_eq!(f.number, 1);
        assert_eq!(f.as_int64().unwrap(), 878);
        assert!(!b.has_remaining());
    }

    #[test]
    fn skips_fixed_width_fields() {
        let mut b: &[u8] = &hex!("0901020304050607080d0a0b0c0d");
        let f = read_field(&mut b).unwrap();
        assert_eq!(f.value, FieldValue::Fixed64(0x0807060504030201));
        let f = read_field(&mut b).unwrap();
        assert_eq!(f.value, FieldValue::Fixed32(0x0d0c0b0a));
    }

    #[test]
    fn rejects_bad_tags() {
        // field number 0
        let mut b: &[u8] = &hex!("0001");
        assert!(read_field(&mut b).is_err());
        // wire types 3, 4, 6 and 7
        for tag in [0x0b_u8, 0x0c, 0x0e, 0x0f] {
            let data = [tag, 0x00];
            let mut b: &[u8] = &data;
            assert!(matches!(read_field(&mut b), Err(Error::MalformedWireData(_))));
        }
    }

    #[test]
    fn rejects_truncated_payloads() {
        let mut b: &[u8] = &hex!("0a05010203");
        assert!(matches!(read_field(&mut b), Err(Error::MalformedWireData(_))));
        let mut b: &[u8] = &hex!("09010203");
        assert!(read_field(&mut b).is_err());
        let mut b: &[u8] = &hex!("08");
        assert!(read_field(&mut b).is_err());
    }

    #[test]
    fn field_numbers_are_capped() {
        // the largest field number, varint value 0
        let mut b: &[u8] = &hex!("f8ffffff0f00");
        let f = read_field(&mut b).unwrap();
        assert_eq!(f.number, MAX_FIELD_NUMBER);
        assert_eq!(f.value, FieldValue::Varint(0));
        // one past it
        let mut b: &[u8] = &hex!("808080801000");
        assert!(matches!(read_field(&mut b), Err(Error::MalformedWireData(_))));
        // fits in a u32 but not in a field number
        let mut b: &[u8] = &hex!("f8ffffff7f00");
        assert!(matches!(read_field(&mut b), Err(Error::MalformedWireData(_))));
    }
}
