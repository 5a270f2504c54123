//! Encoders and decoders named by resolved field types.
//!
//! Fixed-width values are written big-endian in exactly their declared
//! width; signed values use two's complement. Dynamic values (`bytes`,
//! `string`) are written as-is.

use thiserror::Error;

use crate::{Address, Hash, U256};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("value does not fit in {bytes} bytes")]
    ValueOutOfRange { bytes: usize },
    #[error("invalid boolean byte {0:#04x}")]
    InvalidBool(u8),
    #[error("fixed byte array of {0} bytes is longer than 32")]
    FixedBytesTooLong(usize),
    #[error("string is not valid UTF-8")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

fn expect_len(data: &[u8], expected: usize) -> Result<(), Error> {
    if data.len() == expected {
        Ok(())
    } else {
        Err(Error::InvalidLength {
            expected,
            actual: data.len(),
        })
    }
}

fn fixed<const N: usize>(data: &[u8]) -> Result<[u8; N], Error> {
    data.try_into().map_err(|_| Error::InvalidLength {
        expected: N,
        actual: data.len(),
    })
}

pub fn encode_address(value: &Address) -> Result<Vec<u8>, Error> {
    Ok(value.0.to_vec())
}

pub fn decode_address(data: &[u8]) -> Result<Address, Error> {
    fixed(data).map(Address)
}

pub fn encode_bool(value: &bool) -> Result<Vec<u8>, Error> {
    Ok(vec![u8::from(*value)])
}

pub fn decode_bool(data: &[u8]) -> Result<bool, Error> {
    expect_len(data, 1)?;
    match data[0] {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(Error::InvalidBool(other)),
    }
}

pub fn encode_bytes(value: &[u8]) -> Result<Vec<u8>, Error> {
    Ok(value.to_vec())
}

pub fn decode_bytes(data: &[u8]) -> Result<Vec<u8>, Error> {
    Ok(data.to_vec())
}

pub fn encode_string(value: &str) -> Result<Vec<u8>, Error> {
    Ok(value.as_bytes().to_vec())
}

pub fn decode_string(data: &[u8]) -> Result<String, Error> {
    Ok(std::str::from_utf8(data)?.to_owned())
}

/// `bytesN` for N below 32; `size` is N.
pub fn encode_fixed_bytes(value: &[u8], size: usize) -> Result<Vec<u8>, Error> {
    if size > 32 {
        return Err(Error::FixedBytesTooLong(size));
    }
    expect_len(value, size)?;
    Ok(value.to_vec())
}

pub fn decode_fixed_bytes(data: &[u8], size: usize) -> Result<Vec<u8>, Error> {
    if size > 32 {
        return Err(Error::FixedBytesTooLong(size));
    }
    expect_len(data, size)?;
    Ok(data.to_vec())
}

pub fn encode_hash(value: &Hash) -> Result<Vec<u8>, Error> {
    Ok(value.0.to_vec())
}

pub fn decode_hash(data: &[u8]) -> Result<Hash, Error> {
    fixed(data).map(Hash)
}

pub fn encode_uint256(value: &U256) -> Result<Vec<u8>, Error> {
    Ok(value.to_be_bytes().to_vec())
}

pub fn decode_uint256(data: &[u8]) -> Result<U256, Error> {
    fixed(data).map(U256::from_be_bytes)
}

macro_rules! unsigned_codecs {
    ($($encode:ident, $decode:ident, $host:ty, $bytes:expr;)*) => {$(
        pub fn $encode(value: &$host) -> Result<Vec<u8>, Error> {
            let full = value.to_be_bytes();
            let (high, low) = full.split_at(full.len() - $bytes);
            if high.iter().any(|b| *b != 0) {
                return Err(Error::ValueOutOfRange { bytes: $bytes });
            }
            Ok(low.to_vec())
        }

        pub fn $decode(data: &[u8]) -> Result<$host, Error> {
            expect_len(data, $bytes)?;
            let mut full = [0u8; std::mem::size_of::<$host>()];
            full[std::mem::size_of::<$host>() - $bytes..].copy_from_slice(data);
            Ok(<$host>::from_be_bytes(full))
        }
    )*};
}

macro_rules! signed_codecs {
    ($($encode:ident, $decode:ident, $host:ty, $bytes:expr;)*) => {$(
        pub fn $encode(value: &$host) -> Result<Vec<u8>, Error> {
            let full = value.to_be_bytes();
            let (high, low) = full.split_at(full.len() - $bytes);
            let fill = if low[0] & 0x80 == 0 { 0x00 } else { 0xff };
            if high.iter().any(|b| *b != fill) {
                return Err(Error::ValueOutOfRange { bytes: $bytes });
            }
            Ok(low.to_vec())
        }

        pub fn $decode(data: &[u8]) -> Result<$host, Error> {
            expect_len(data, $bytes)?;
            let fill = if data[0] & 0x80 == 0 { 0x00 } else { 0xff };
            let mut full = [fill; std::mem::size_of::<$host>()];
            full[std::mem::size_of::<$host>() - $bytes..].copy_from_slice(data);
            Ok(<$host>::from_be_bytes(full))
        }
    )*};
}

unsigned_codecs! {
    encode_uint8, decode_uint8, u8, 1;
    encode_uint16, decode_uint16, u16, 2;
    encode_uint24, decode_uint24, u32, 3;
    encode_uint32, decode_uint32, u32, 4;
    encode_uint40, decode_uint40, u64, 5;
    encode_uint48, decode_uint48, u64, 6;
    encode_uint56, decode_uint56, u64, 7;
    encode_uint64, decode_uint64, u64, 8;
}

signed_codecs! {
    encode_int8, decode_int8, i8, 1;
    encode_int16, decode_int16, i16, 2;
    encode_int24, decode_int24, i32, 3;
    encode_int32, decode_int32, i32, 4;
    encode_int40, decode_int40, i64, 5;
    encode_int48, decode_int48, i64, 6;
    encode_int56, decode_int56, i64, 7;
    encode_int64, decode_int64, i64, 8;
}
