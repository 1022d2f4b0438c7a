//! Static registry of all the types that can be built from their name.
//!
//! Each type is identified by its lowercase name (eg: `"uint32"`, `"abistruct"`),
//! and lookups are case-insensitive. Values of any registered type can be held
//! in an [`AntelopeValue`].
//!
//! There is no `"array"` entry: an array is only meaningful with its element
//! type, which is fixed at compile time by using [`Array<T>`](crate::Array)
//! directly. Dynamically built values can be collected into one with
//! [`Array::from_antelope_values`](crate::Array::from_antelope_values).
//!
//! ## Example
//! ```
//! # use kudu_wire::{registry, json, InvalidValue};
//! let value = registry::from_json("Name", &json!("eosio"))?;
//! assert_eq!(value.to_bytes(), [0x00, 0x00, 0x00, 0x00, 0x00, 0xea, 0x30, 0x55]);
//! # Ok::<(), InvalidValue>(())
//! ```

use std::str::FromStr;

use snafu::{OptionExt, Snafu};
use strum::{AsRefStr, Display, EnumDiscriminants, EnumString, VariantNames};
use tracing::instrument;

use crate::{
    Abi, AbiAction, AbiActionResult, AbiClause, AbiErrorMessage, AbiExtension, AbiStruct,
    AbiStructField, AbiTable, AbiType, AbiVariant, AntelopeString, AntelopeType, Array,
    Asset, Bool, ByteStream, Bytes, Float32, Float64, Int16, Int32, Int64, Int8,
    InvalidValue, JsonValue, KvTable, Name, SerializeError, Symbol, TimePoint,
    Uint16, Uint32, Uint64, Uint8, UnixTimestamp, Varuint32, Wasm,
};
use crate::antelopetype::TypeMismatchSnafu;


#[derive(Debug, Snafu)]
pub enum LookupError {
    #[snafu(display(r#"unknown type "{name}", valid types are: {available}"#))]
    UnknownType { name: String, available: String },
}


macro_rules! antelope_values {
    ($($variant:ident($typ:ty)),+ $(,)?) => {
        /// A value of any of the registered types.
        ///
        /// Its discriminant [`TypeKind`] identifies the type itself, and can
        /// be used to build values from their JSON or binary representation.
        #[derive(Debug, Clone, PartialEq, EnumDiscriminants, AsRefStr)]
        #[strum(serialize_all = "lowercase")]
        #[strum_discriminants(name(TypeKind))]
        #[strum_discriminants(derive(Display, EnumString, VariantNames, Hash, PartialOrd, Ord))]
        #[strum_discriminants(strum(serialize_all = "lowercase", ascii_case_insensitive))]
        pub enum AntelopeValue {
            $( $variant($typ), )+
        }

        impl AntelopeValue {
            pub fn encode(&self, stream: &mut ByteStream) {
                match self {
                    $( AntelopeValue::$variant(v) => v.encode(stream), )+
                }
            }

            pub fn to_json(&self) -> JsonValue {
                match self {
                    $( AntelopeValue::$variant(v) => v.to_json(), )+
                }
            }
        }

        impl TypeKind {
            pub fn from_json(self, value: &JsonValue) -> Result<AntelopeValue, InvalidValue> {
                Ok(match self {
                    $( TypeKind::$variant => AntelopeValue::$variant(<$typ as AntelopeType>::from_json(value)?), )+
                })
            }

            pub fn decode(self, stream: &mut ByteStream) -> Result<AntelopeValue, SerializeError> {
                Ok(match self {
                    $( TypeKind::$variant => AntelopeValue::$variant(<$typ as AntelopeType>::decode(stream)?), )+
                })
            }
        }

        $(
            impl From<$typ> for AntelopeValue {
                fn from(v: $typ) -> AntelopeValue {
                    AntelopeValue::$variant(v)
                }
            }

            impl TryFrom<AntelopeValue> for $typ {
                type Error = InvalidValue;

                fn try_from(value: AntelopeValue) -> Result<$typ, InvalidValue> {
                    match value {
                        AntelopeValue::$variant(v) => Ok(v),
                        other => {
                            let actual: &str = other.as_ref();
                            TypeMismatchSnafu { expected: TypeKind::$variant.to_string(), actual }.fail()
                        },
                    }
                }
            }
        )+
    }
}

antelope_values! {
    Bool(Bool),

    Int8(Int8),
    Int16(Int16),
    Int32(Int32),
    Int64(Int64),

    Uint8(Uint8),
    Uint16(Uint16),
    Uint32(Uint32),
    Uint64(Uint64),

    Float32(Float32),
    Float64(Float64),

    Varuint32(Varuint32),

    String(AntelopeString),
    Bytes(Bytes),

    Name(Name),
    Symbol(Symbol),
    Asset(Asset),

    UnixTimestamp(UnixTimestamp),
    TimePoint(TimePoint),

    Wasm(Wasm),

    AbiType(AbiType),
    AbiStructField(AbiStructField),
    AbiStruct(AbiStruct),
    AbiAction(AbiAction),
    AbiTable(AbiTable),
    AbiClause(AbiClause),
    AbiErrorMessage(AbiErrorMessage),
    AbiExtension(AbiExtension),
    AbiVariant(AbiVariant),
    AbiActionResult(AbiActionResult),
    KvTable(KvTable),
    Abi(Box<Abi>),
}

impl AntelopeValue {
    pub fn kind(&self) -> TypeKind {
        TypeKind::from(self)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut stream = ByteStream::new();
        self.encode(&mut stream);
        stream.into_bytes()
    }

    pub fn byte_length(&self) -> usize {
        self.to_bytes().len()
    }
}

impl From<Abi> for AntelopeValue {
    fn from(abi: Abi) -> AntelopeValue {
        AntelopeValue::Abi(Box::new(abi))
    }
}

impl<T> Array<T>
where
    T: TryFrom<AntelopeValue, Error = InvalidValue>,
{
    /// Build a typed array from values that have been built dynamically.
    ///
    /// Returns an `InvalidValue::TypeMismatch` error if any of the values
    /// is not of type `T`.
    pub fn from_antelope_values<I>(values: I) -> Result<Self, InvalidValue>
    where
        I: IntoIterator<Item = AntelopeValue>,
    {
        values.into_iter().map(T::try_from).collect()
    }
}


// -----------------------------------------------------------------------------
//     Registry functions
// -----------------------------------------------------------------------------

/// Return the names of all the registered types.
pub fn type_names() -> &'static [&'static str] {
    TypeKind::VARIANTS
}

/// Find the type with the given name, ignoring case.
#[instrument]
pub fn lookup(name: &str) -> Result<TypeKind, LookupError> {
    TypeKind::from_str(name).ok().with_context(|| UnknownTypeSnafu {
        name,
        available: type_names().join(", "),
    })
}

/// Build a value of the type with the given name from its JSON representation.
pub fn from_json(typename: &str, value: &JsonValue) -> Result<AntelopeValue, InvalidValue> {
    lookup(typename)?.from_json(value)
}

/// Decode a value of the type with the given name from the start of `data`.
pub fn from_bin(typename: &str, data: &[u8]) -> Result<AntelopeValue, SerializeError> {
    let kind = lookup(typename)?;
    let mut stream = ByteStream::from(data.to_vec());
    kind.decode(&mut stream)
}


// =============================================================================
//
//     Unittests
//
// =============================================================================

#[cfg(test)]
mod tests {
    use color_eyre::eyre::Result;
    use serde_json::json;
    use super::*;

    #[test]
    fn names() {
        let names = type_names();
        assert_eq!(names.len(), 32);
        for name in ["bool", "varuint32", "string", "unixtimestamp", "timepoint",
                     "abistructfield", "abierrormessage", "kvtable", "abi"] {
            assert!(names.contains(&name), "missing type: {name}");
        }
    }

    #[test]
    fn case_insensitive_lookup() -> Result<()> {
        assert_eq!(lookup("uint32")?, TypeKind::Uint32);
        assert_eq!(lookup("UINT32")?, TypeKind::Uint32);
        assert_eq!(lookup("AbiStruct")?, TypeKind::AbiStruct);
        assert_eq!(lookup("timePoint")?, TypeKind::TimePoint);
        assert_eq!(TypeKind::AbiStructField.to_string(), "abistructfield");
        Ok(())
    }

    #[test]
    fn unknown_type() {
        let err = lookup("uint128").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("uint128"));
        assert!(msg.contains("varuint32"));
        assert!(msg.contains("abiactionresult"));
    }

    #[test]
    fn arrays_are_not_registered() {
        assert!(lookup("array").is_err());
        assert!(lookup("uint8[]").is_err());
        assert!(!type_names().contains(&"array"));
    }

    #[test]
    fn dynamic_values() -> Result<()> {
        let v = from_json("uint16", &json!(256))?;
        assert_eq!(v.kind(), TypeKind::Uint16);
        assert_eq!(v.to_bytes(), vec![0x00, 0x01]);
        assert_eq!(v.byte_length(), 2);
        assert_eq!(v.to_json(), json!(256));
        assert_eq!(from_bin("UINT16", &[0x00, 0x01])?, v);
        assert!(from_json("uint16", &json!(65536)).is_err());
        Ok(())
    }

    #[test]
    fn typed_arrays_from_dynamic_values() -> Result<()> {
        let values = vec![AntelopeValue::from(Uint8::new(1)?), AntelopeValue::from(Uint8::new(2)?)];
        let arr = Array::<Uint8>::from_antelope_values(values)?;
        assert_eq!(arr.to_hex(), "020102");

        let mixed = vec![AntelopeValue::from(Uint8::new(1)?), AntelopeValue::from(Name::new("bob")?)];
        let err = Array::<Uint8>::from_antelope_values(mixed).unwrap_err();
        assert!(matches!(&err, InvalidValue::TypeMismatch { expected, actual }
                         if expected == "uint8" && actual == "name"), "{err}");
        Ok(())
    }
}
