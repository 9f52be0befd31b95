//! Conversion between fixed-width primitives and their byte representation.
//!
//! Floating-point values are converted through their bit patterns, so NaN
//! payloads, signed zeros and infinities survive a round trip unchanged.

use crate::config::ByteOrder;
use byteorder::{BigEndian, ByteOrder as _, LittleEndian};

macro_rules! integer_codec {
    ($decode:ident, $encode:ident, $ty:ty, $width:literal, $read:ident, $write:ident) => {
        #[doc = concat!("Decode a `", stringify!($ty), "` from its ", stringify!($width), "-byte representation.")]
        pub fn $decode(order: ByteOrder, bytes: [u8; $width]) -> $ty {
            match order {
                ByteOrder::BigEndian => BigEndian::$read(&bytes),
                ByteOrder::LittleEndian => LittleEndian::$read(&bytes),
            }
        }

        #[doc = concat!("Encode a `", stringify!($ty), "` into its ", stringify!($width), "-byte representation.")]
        pub fn $encode(order: ByteOrder, value: $ty) -> [u8; $width] {
            let mut bytes = [0u8; $width];
            match order {
                ByteOrder::BigEndian => BigEndian::$write(&mut bytes, value),
                ByteOrder::LittleEndian => LittleEndian::$write(&mut bytes, value),
            }
            bytes
        }
    };
}

integer_codec!(decode_u16, encode_u16, u16, 2, read_u16, write_u16);
integer_codec!(decode_i16, encode_i16, i16, 2, read_i16, write_i16);
integer_codec!(decode_u32, encode_u32, u32, 4, read_u32, write_u32);
integer_codec!(decode_i32, encode_i32, i32, 4, read_i32, write_i32);
integer_codec!(decode_u64, encode_u64, u64, 8, read_u64, write_u64);
integer_codec!(decode_i64, encode_i64, i64, 8, read_i64, write_i64);

/// Decode an `f32` from its 4-byte representation.
pub fn decode_f32(order: ByteOrder, bytes: [u8; 4]) -> f32 {
    f32::from_bits(decode_u32(order, bytes))
}

/// Encode an `f32` into its 4-byte representation.
pub fn encode_f32(order: ByteOrder, value: f32) -> [u8; 4] {
    encode_u32(order, value.to_bits())
}

/// Decode an `f64` from its 8-byte representation.
pub fn decode_f64(order: ByteOrder, bytes: [u8; 8]) -> f64 {
    f64::from_bits(decode_u64(order, bytes))
}

/// Encode an `f64` into its 8-byte representation.
pub fn encode_f64(order: ByteOrder, value: f64) -> [u8; 8] {
    encode_u64(order, value.to_bits())
}
