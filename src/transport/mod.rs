//! Transport layer: HTTP and wire-format details (serialization/deserialization).

mod push;

pub use push::{decode_error_json_response, decode_push_json_response, encode_push_json};
