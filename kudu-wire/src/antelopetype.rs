use std::any::type_name;
use std::fmt::Debug;
use std::str::Utf8Error;

use hex::FromHexError;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use snafu::{IntoError, ResultExt, Snafu};

use crate::{
    json, ByteStream, JsonError, JsonValue, StreamError,
    impl_auto_error_conversion,
};
use crate::registry::LookupError;
use crate::types::{InvalidAsset, InvalidName, InvalidSymbol, InvalidTime};


/// Error raised when a value does not satisfy the constraints of the type
/// it is being converted to.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum InvalidValue {
    #[snafu(display("integer {value} out of range for {typename} (min: {min}, max: {max})"))]
    IntegerOutOfRange {
        typename: &'static str,
        value: i128,
        min: i128,
        max: i128,
    },

    #[snafu(display("float {value} cannot be represented as a {typename}"))]
    FloatOutOfRange { typename: &'static str, value: f64 },

    #[snafu(display(r#"only ASCII strings are supported, got: "{value}""#))]
    NonAsciiString { value: String },

    #[snafu(display("invalid name"))]
    InvalidName { source: InvalidName },

    #[snafu(display("invalid symbol"))]
    InvalidSymbol { source: InvalidSymbol },

    #[snafu(display("invalid asset"))]
    InvalidAsset { source: InvalidAsset },

    #[snafu(display("invalid time"))]
    InvalidTime { source: InvalidTime },

    #[snafu(display("invalid hex representation"))]
    InvalidHex { source: FromHexError },

    #[snafu(display(r#"unsupported ABI version: "{version}""#))]
    AbiVersion { version: String },

    #[snafu(display("cannot build `{typename}` from JSON value"))]
    Mapping { typename: &'static str, source: JsonError },

    #[snafu(display(r#"type mismatch: expected a value of type "{expected}", got "{actual}""#))]
    TypeMismatch { expected: String, actual: String },

    #[snafu(display("unknown type"))]
    UnknownType { source: LookupError },
}

impl_auto_error_conversion!(InvalidName, InvalidValue, InvalidNameSnafu);
impl_auto_error_conversion!(InvalidSymbol, InvalidValue, InvalidSymbolSnafu);
impl_auto_error_conversion!(InvalidAsset, InvalidValue, InvalidAssetSnafu);
impl_auto_error_conversion!(InvalidTime, InvalidValue, InvalidTimeSnafu);
impl_auto_error_conversion!(FromHexError, InvalidValue, InvalidHexSnafu);
impl_auto_error_conversion!(LookupError, InvalidValue, UnknownTypeSnafu);


/// Error raised when a value cannot be decoded from its binary representation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SerializeError {
    #[snafu(display("stream error"))]
    StreamError { source: StreamError },

    #[snafu(display("cannot decode bytes as utf-8"))]
    Utf8Error { source: Utf8Error },

    #[snafu(display("{msg}"))]
    InvalidData { msg: String },  // acts as a generic error type with a given message

    #[snafu(display("decoded value is invalid"))]
    InvalidValue { source: InvalidValue },

    #[snafu(display("cannot find type to decode"))]
    Lookup { source: LookupError },
}

impl_auto_error_conversion!(StreamError, SerializeError, StreamSnafu);
impl_auto_error_conversion!(Utf8Error, SerializeError, Utf8Snafu);
impl_auto_error_conversion!(InvalidValue, SerializeError, InvalidValueSnafu);
impl_auto_error_conversion!(LookupError, SerializeError, LookupSnafu);


// -----------------------------------------------------------------------------
//     Type traits
// -----------------------------------------------------------------------------

/// Define the capabilities shared by all the types that can be sent over
/// the wire to an Antelope blockchain.
///
/// The binary representation is given by [`encode`](AntelopeType::encode) and
/// [`decode`](AntelopeType::decode), the JSON representation (also called
/// *mapping form*) is given by the `serde` traits.
///
/// Decoding must be the left inverse of encoding, ie: for any valid value `v`,
/// `T::from_bytes(&v.to_bytes())? == v`.
pub trait AntelopeType: Clone + Debug + PartialEq + Serialize + DeserializeOwned {
    /// Append the binary representation of `self` to the stream.
    fn encode(&self, stream: &mut ByteStream);

    /// Read a value from the stream, advancing its read position.
    fn decode(stream: &mut ByteStream) -> Result<Self, SerializeError>;

    fn to_bytes(&self) -> Vec<u8> {
        let mut stream = ByteStream::new();
        self.encode(&mut stream);
        stream.into_bytes()
    }

    fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Decode a value from the start of the given buffer.
    ///
    /// Trailing bytes are left untouched, the number of bytes that have been
    /// consumed is given by `byte_length()` on the returned value.
    fn from_bytes(data: &[u8]) -> Result<Self, SerializeError> {
        // FIXME: this makes an unnecessary copy
        let mut stream = ByteStream::from(data.to_vec());
        Self::decode(&mut stream)
    }

    fn from_hex(repr: &str) -> Result<Self, SerializeError> {
        let mut stream = ByteStream::from_hex(repr)?;
        Self::decode(&mut stream)
    }

    /// Size in bytes of the binary representation.
    fn byte_length(&self) -> usize {
        self.to_bytes().len()
    }

    fn to_json(&self) -> JsonValue {
        json!(self)
    }

    fn from_json(value: &JsonValue) -> Result<Self, InvalidValue> {
        Self::deserialize(value).context(MappingSnafu { typename: type_name::<Self>() })
    }
}

/// A type wrapping exactly one validated value.
pub trait Primitive: AntelopeType {
    /// Raw type accepted by the constructor and returned by [`Primitive::value`].
    type Value;

    fn from_value(value: Self::Value) -> Result<Self, InvalidValue>;

    fn value(&self) -> Self::Value;
}

/// A type made of named fields, each of them an [`AntelopeType`].
pub trait Composite: AntelopeType {
    /// Build an instance from its JSON object representation, recursively
    /// building its fields.
    fn from_mapping(mapping: &JsonValue) -> Result<Self, InvalidValue> {
        Self::from_json(mapping)
    }

    fn to_mapping(&self) -> JsonValue {
        self.to_json()
    }
}

impl<T: AntelopeType> AntelopeType for Box<T> {
    fn encode(&self, stream: &mut ByteStream) {
        (**self).encode(stream)
    }

    fn decode(stream: &mut ByteStream) -> Result<Self, SerializeError> {
        Ok(Box::new(T::decode(stream)?))
    }
}


// -----------------------------------------------------------------------------
//     Boilerplate macros
// -----------------------------------------------------------------------------

/// Implement [`AntelopeType`] and [`Composite`] for a struct by encoding
/// (resp. decoding) all the given fields sequentially.
#[macro_export]
macro_rules! impl_composite {
    ($typ:ty { $($field:ident),+ $(,)? }) => {
        impl $crate::AntelopeType for $typ {
            fn encode(&self, stream: &mut $crate::ByteStream) {
                $( $crate::AntelopeType::encode(&self.$field, stream); )+
            }

            fn decode(stream: &mut $crate::ByteStream) -> Result<Self, $crate::SerializeError> {
                Ok(Self {
                    $( $field: $crate::AntelopeType::decode(stream)?, )+
                })
            }
        }

        impl $crate::Composite for $typ {}
    }
}
