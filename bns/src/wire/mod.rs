/// The wire module contains the protobuf subset used by the BNS transaction format.

mod encoding;
pub mod schema;
mod var_int;

pub use self::encoding::{
    bool_size, bytes_size, delimited_size, int32_size, int64_size, message_size, put_bool,
    put_bytes, put_int32, put_int64, put_message, put_raw_bytes, put_string, put_tag,
    read_field, string_size, tag_size, Encodable, Field, FieldValue, WireType,
};
pub use self::schema::{MessageKind, TX_FEES_FIELD, TX_PREIMAGE_FIELD, TX_SIGNATURES_FIELD};
pub use self::var_int::{varint_decode, varint_encode, varint_size, MAX_VARINT_SIZE};
