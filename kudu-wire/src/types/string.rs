use std::fmt;
use std::path::Path;
use std::str::from_utf8;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use snafu::ensure;

use crate::{AntelopeType, ByteStream, InvalidValue, Primitive, SerializeError};
use crate::antelopetype::NonAsciiStringSnafu;
use crate::loader::{self, LoadError};
use crate::types::varint::{read_length, write_length};


// -----------------------------------------------------------------------------
//     String
// -----------------------------------------------------------------------------

/// String prefixed with its length in bytes as a [`Varuint32`](crate::Varuint32).
///
/// Only ASCII content is supported.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct AntelopeString(String);

impl AntelopeString {
    pub fn new(value: impl Into<String>) -> Result<Self, InvalidValue> {
        Self::from_value(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Primitive for AntelopeString {
    type Value = String;

    fn from_value(value: String) -> Result<Self, InvalidValue> {
        ensure!(value.is_ascii(), NonAsciiStringSnafu { value });
        Ok(Self(value))
    }

    fn value(&self) -> String {
        self.0.clone()
    }
}

impl AntelopeType for AntelopeString {
    fn encode(&self, stream: &mut ByteStream) {
        write_length(stream, self.0.len());
        stream.write_bytes(self.0.as_bytes());
    }

    fn decode(stream: &mut ByteStream) -> Result<Self, SerializeError> {
        let len = read_length(stream)?;
        let s = from_utf8(stream.read_bytes(len)?)?.to_owned();
        Ok(Self::from_value(s)?)
    }
}

impl From<AntelopeString> for String {
    fn from(s: AntelopeString) -> String { s.0 }
}

impl TryFrom<&str> for AntelopeString {
    type Error = InvalidValue;

    fn try_from(s: &str) -> Result<Self, InvalidValue> {
        Self::new(s)
    }
}

impl PartialEq<&str> for AntelopeString {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for AntelopeString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for AntelopeString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for AntelopeString {
    fn deserialize<D>(deserializer: D) -> Result<AntelopeString, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        AntelopeString::from_value(s).map_err(de::Error::custom)
    }
}


// -----------------------------------------------------------------------------
//     Bytes
// -----------------------------------------------------------------------------

/// Raw binary data, without any length prefix.
///
/// As there is no length prefix, decoding a `Bytes` value consumes the
/// whole remaining input. Its JSON representation is a hex string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Bytes(Vec<u8>);

impl Bytes {
    pub fn new(value: impl Into<Vec<u8>>) -> Result<Self, InvalidValue> {
        Self::from_value(value.into())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Primitive for Bytes {
    type Value = Vec<u8>;

    fn from_value(value: Vec<u8>) -> Result<Self, InvalidValue> {
        Ok(Self(value))
    }

    fn value(&self) -> Vec<u8> {
        self.0.clone()
    }
}

impl AntelopeType for Bytes {
    fn encode(&self, stream: &mut ByteStream) {
        stream.write_bytes(&self.0)
    }

    fn decode(stream: &mut ByteStream) -> Result<Self, SerializeError> {
        Ok(Self(stream.read_remaining().to_vec()))
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(data: Vec<u8>) -> Bytes { Bytes(data) }
}

impl From<Bytes> for Vec<u8> {
    fn from(data: Bytes) -> Vec<u8> { data.0 }
}

impl fmt::Display for Bytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

impl Serialize for Bytes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        hex::encode(&self.0).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Bytes {
    fn deserialize<D>(deserializer: D) -> Result<Bytes, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Bytes(hex::decode(s).map_err(de::Error::custom)?))
    }
}


// -----------------------------------------------------------------------------
//     Wasm
// -----------------------------------------------------------------------------

/// Compiled contract code, prefixed with its length.
///
/// The binary layout is the same as an `Array<Uint8>`, the JSON
/// representation is a hex string.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Wasm(Vec<u8>);

impl Wasm {
    pub fn new(value: impl Into<Vec<u8>>) -> Result<Self, InvalidValue> {
        Self::from_value(value.into())
    }

    /// Read the contract code from a `.wasm` file, or from the `<stem>.wasm`
    /// entry of a `<stem>.zip` archive.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        Ok(Wasm(loader::load_bytes(path, "wasm")?))
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl Primitive for Wasm {
    type Value = Vec<u8>;

    fn from_value(value: Vec<u8>) -> Result<Self, InvalidValue> {
        Ok(Self(value))
    }

    fn value(&self) -> Vec<u8> {
        self.0.clone()
    }
}

impl AntelopeType for Wasm {
    fn encode(&self, stream: &mut ByteStream) {
        write_length(stream, self.0.len());
        stream.write_bytes(&self.0);
    }

    fn decode(stream: &mut ByteStream) -> Result<Self, SerializeError> {
        let len = read_length(stream)?;
        Ok(Self(stream.read_bytes(len)?.to_vec()))
    }
}

// contract code can be big, only show its size
impl fmt::Debug for Wasm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Wasm({} bytes)", self.0.len())
    }
}

impl Serialize for Wasm {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        hex::encode(&self.0).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Wasm {
    fn deserialize<D>(deserializer: D) -> Result<Wasm, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Wasm(hex::decode(s).map_err(de::Error::custom)?))
    }
}


// =============================================================================
//
//     Unittests
//
// =============================================================================
