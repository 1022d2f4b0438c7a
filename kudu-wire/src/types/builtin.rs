use std::fmt;
use std::hash::{Hash, Hasher};

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use snafu::{ensure, OptionExt};

use crate::{AntelopeType, ByteStream, InvalidValue, Primitive, SerializeError};
use crate::antelopetype::{FloatOutOfRangeSnafu, IntegerOutOfRangeSnafu, InvalidDataSnafu};


// -----------------------------------------------------------------------------
//     Bool
// -----------------------------------------------------------------------------

/// Boolean value, encoded as a single `0x00` or `0x01` byte.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Bool(bool);

impl Bool {
    pub fn new(value: impl Into<bool>) -> Result<Self, InvalidValue> {
        Self::from_value(value.into())
    }

    pub fn get(&self) -> bool { self.0 }
}

impl Primitive for Bool {
    type Value = bool;

    fn from_value(value: bool) -> Result<Self, InvalidValue> {
        Ok(Self(value))
    }

    fn value(&self) -> bool { self.0 }
}

impl AntelopeType for Bool {
    #[inline]
    fn encode(&self, stream: &mut ByteStream) {
        stream.write_byte(match self.0 {
            true => 1u8,
            false => 0u8,
        })
    }

    #[inline]
    fn decode(stream: &mut ByteStream) -> Result<Self, SerializeError> {
        match stream.read_byte()? {
            1 => Ok(Self(true)),
            0 => Ok(Self(false)),
            b => InvalidDataSnafu { msg: format!("cannot parse bool from byte 0x{b:02x}") }.fail(),
        }
    }
}

impl From<bool> for Bool {
    fn from(b: bool) -> Bool { Bool(b) }
}

impl From<Bool> for bool {
    fn from(b: Bool) -> bool { b.0 }
}

impl fmt::Display for Bool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Bool {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bool(self.0)
    }
}

impl<'de> Deserialize<'de> for Bool {
    fn deserialize<D>(deserializer: D) -> Result<Bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Bool(bool::deserialize(deserializer)?))
    }
}


// -----------------------------------------------------------------------------
//     Integers
// -----------------------------------------------------------------------------

/// Accept JSON numbers as well as their decimal string representation,
/// as 64-bit integers are often quoted in JSON documents.
pub(crate) struct IntegerVisitor;

impl<'de> Visitor<'de> for IntegerVisitor {
    type Value = i128;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "an integer or a string containing an integer")
    }

    fn visit_i64<E: de::Error>(self, n: i64) -> Result<i128, E> {
        Ok(n as i128)
    }

    fn visit_u64<E: de::Error>(self, n: u64) -> Result<i128, E> {
        Ok(n as i128)
    }

    fn visit_i128<E: de::Error>(self, n: i128) -> Result<i128, E> {
        Ok(n)
    }

    fn visit_str<E: de::Error>(self, s: &str) -> Result<i128, E> {
        s.trim().parse().map_err(|e| de::Error::custom(format!(r#"cannot parse "{s}" as integer: {e}"#)))
    }
}

macro_rules! impl_integer {
    ($typ:ident, $native:ty, $typename:literal) => {
        #[doc = concat!("`", $typename, "` integer, encoded in little-endian.")]
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $typ($native);

        impl $typ {
            pub fn new(value: impl Into<i128>) -> Result<Self, InvalidValue> {
                Self::from_value(value.into())
            }

            pub fn get(&self) -> $native { self.0 }
        }

        impl Primitive for $typ {
            type Value = i128;

            fn from_value(value: i128) -> Result<Self, InvalidValue> {
                let n = <$native>::try_from(value).ok().context(IntegerOutOfRangeSnafu {
                    typename: $typename,
                    value,
                    min: <$native>::MIN as i128,
                    max: <$native>::MAX as i128,
                })?;
                Ok(Self(n))
            }

            fn value(&self) -> i128 { self.0 as i128 }
        }

        impl AntelopeType for $typ {
            #[inline]
            fn encode(&self, stream: &mut ByteStream) {
                stream.write_bytes(&self.0.to_le_bytes())
            }

            #[inline]
            fn decode(stream: &mut ByteStream) -> Result<Self, SerializeError> {
                Ok(Self(<$native>::from_le_bytes(stream.read_array()?)))
            }
        }

        impl From<$native> for $typ {
            fn from(n: $native) -> $typ { Self(n) }
        }

        impl From<$typ> for $native {
            fn from(n: $typ) -> $native { n.0 }
        }

        impl From<$typ> for i128 {
            fn from(n: $typ) -> i128 { n.0 as i128 }
        }

        impl fmt::Display for $typ {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl Serialize for $typ {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                self.0.serialize(serializer)
            }
        }

        impl<'de> Deserialize<'de> for $typ {
            fn deserialize<D>(deserializer: D) -> Result<$typ, D::Error>
            where
                D: Deserializer<'de>,
            {
                let n = deserializer.deserialize_any(IntegerVisitor)?;
                <$typ>::from_value(n).map_err(de::Error::custom)
            }
        }
    }
}

impl_integer!(Int8, i8, "int8");
impl_integer!(Int16, i16, "int16");
impl_integer!(Int32, i32, "int32");
impl_integer!(Int64, i64, "int64");
impl_integer!(Uint8, u8, "uint8");
impl_integer!(Uint16, u16, "uint16");
impl_integer!(Uint32, u32, "uint32");
impl_integer!(Uint64, u64, "uint64");


// -----------------------------------------------------------------------------
//     Floats
// -----------------------------------------------------------------------------

// floats compare and hash on their bit pattern so that they can be used as
// keys and so that `NaN` values survive a round-trip
macro_rules! impl_float {
    ($typ:ident, $native:ty, $typename:literal) => {
        #[doc = concat!("`", $typename, "` IEEE-754 floating-point number, encoded in little-endian.")]
        #[derive(Copy, Clone, Debug, Default)]
        pub struct $typ($native);

        impl $typ {
            pub fn new(value: impl Into<$native>) -> Result<Self, InvalidValue> {
                Self::from_value(value.into())
            }

            pub fn get(&self) -> $native { self.0 }
        }

        impl Primitive for $typ {
            type Value = $native;

            fn from_value(value: $native) -> Result<Self, InvalidValue> {
                Ok(Self(value))
            }

            fn value(&self) -> $native { self.0 }
        }

        impl AntelopeType for $typ {
            #[inline]
            fn encode(&self, stream: &mut ByteStream) {
                stream.write_bytes(&self.0.to_le_bytes())
            }

            #[inline]
            fn decode(stream: &mut ByteStream) -> Result<Self, SerializeError> {
                Ok(Self(<$native>::from_le_bytes(stream.read_array()?)))
            }
        }

        impl PartialEq for $typ {
            fn eq(&self, other: &Self) -> bool {
                self.0.to_bits() == other.0.to_bits()
            }
        }

        impl Eq for $typ {}

        impl Hash for $typ {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.0.to_bits().hash(state)
            }
        }

        impl From<$native> for $typ {
            fn from(x: $native) -> $typ { Self(x) }
        }

        impl From<$typ> for $native {
            fn from(x: $typ) -> $native { x.0 }
        }

        impl fmt::Display for $typ {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl Serialize for $typ {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                if self.0.is_finite() {
                    self.0.serialize(serializer)
                }
                else if self.0.is_nan() {
                    serializer.serialize_str("nan")
                }
                else if self.0.is_sign_positive() {
                    serializer.serialize_str("inf")
                }
                else {
                    serializer.serialize_str("-inf")
                }
            }
        }
    }
}

/// Accept JSON numbers, and strings for the values JSON cannot represent
/// (`"nan"`, `"inf"`, `"-inf"`). NaN payloads are not preserved.
struct FloatVisitor;

impl<'de> Visitor<'de> for FloatVisitor {
    type Value = f64;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "a number or one of \"nan\", \"inf\", \"-inf\"")
    }

    fn visit_f64<E: de::Error>(self, x: f64) -> Result<f64, E> {
        Ok(x)
    }

    fn visit_i64<E: de::Error>(self, n: i64) -> Result<f64, E> {
        Ok(n as f64)
    }

    fn visit_u64<E: de::Error>(self, n: u64) -> Result<f64, E> {
        Ok(n as f64)
    }

    fn visit_str<E: de::Error>(self, s: &str) -> Result<f64, E> {
        s.trim().parse().map_err(|e| de::Error::custom(format!(r#"cannot parse "{s}" as float: {e}"#)))
    }
}

impl_float!(Float32, f32, "float32");
impl_float!(Float64, f64, "float64");

impl Float32 {
    /// Narrow a `f64` to a `Float32`, failing if a finite value would overflow.
    pub fn from_f64(value: f64) -> Result<Self, InvalidValue> {
        let narrowed = value as f32;
        ensure!(!value.is_finite() || narrowed.is_finite(),
                FloatOutOfRangeSnafu { typename: "float32", value });
        Ok(Self(narrowed))
    }
}

impl<'de> Deserialize<'de> for Float32 {
    fn deserialize<D>(deserializer: D) -> Result<Float32, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = deserializer.deserialize_any(FloatVisitor)?;
        if value.is_nan() {
            return Ok(Float32(f32::NAN));
        }
        Float32::from_f64(value).map_err(de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for Float64 {
    fn deserialize<D>(deserializer: D) -> Result<Float64, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Float64(deserializer.deserialize_any(FloatVisitor)?))
    }
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
    fn integer_bounds() -> Result<()> {
        assert_eq!(Int8::new(-128)?.get(), -128);
        assert_eq!(Int8::new(127)?.get(), 127);
        assert!(Int8::new(128).is_err());
        assert!(Int8::new(-129).is_err());
        assert!(Uint8::new(-1).is_err());
        assert!(Uint16::new(65536).is_err());
        assert!(Int64::new(i64::MAX as i128 + 1).is_err());
        assert!(Uint64::new(-1).is_err());
        assert_eq!(Uint64::new(u64::MAX)?.value(), u64::MAX as i128);
        Ok(())
    }

    #[test]
    fn integer_construction_is_idempotent() -> Result<()> {
        let n = Int32::new(-42)?;
        assert_eq!(Int32::new(n)?, n);
        Ok(())
    }

    #[test]
    fn integer_encoding() -> Result<()> {
        assert_eq!(Int16::new(-32768)?.to_hex(), "0080");
        assert_eq!(Uint32::new(0xdeadbeef_u32)?.to_hex(), "efbeadde");
        assert_eq!(Int64::new(-1)?.to_hex(), "ffffffffffffffff");
        assert_eq!(Uint16::from_hex("ffff")?, Uint16::from(u16::MAX));
        Ok(())
    }

    #[test]
    fn integer_json() -> Result<()> {
        assert_eq!(Int8::from_json(&json!(-5))?, Int8::from(-5));
        assert_eq!(Uint64::from_json(&json!("18446744073709551615"))?, Uint64::from(u64::MAX));
        assert!(Uint8::from_json(&json!(256)).is_err());
        assert!(Uint8::from_json(&json!("abc")).is_err());
        assert_eq!(Int16::from(-300).to_json(), json!(-300));
        Ok(())
    }

    #[test]
    fn bools() -> Result<()> {
        assert_eq!(Bool::new(true)?.to_hex(), "01");
        assert_eq!(Bool::from_hex("00")?, Bool::from(false));
        assert!(Bool::from_hex("02").is_err());
        assert!(Bool::from_hex("").is_err());
        Ok(())
    }

    #[test]
    fn floats() -> Result<()> {
        assert_eq!(Float32::new(1.0_f32)?.to_hex(), "0000803f");
        assert_eq!(Float64::new(-1.5)?.to_hex(), "000000000000f8bf");
        assert_eq!(Float32::from_hex("0000803f")?, Float32::from(1.0_f32));

        let nan = Float64::new(f64::NAN)?;
        assert_eq!(Float64::from_bytes(&nan.to_bytes())?, nan);

        assert!(Float32::from_f64(1e300).is_err());
        assert!(Float32::from_f64(f64::INFINITY).is_ok());
        assert!(Float32::from_json(&json!(1e39)).is_err());
        Ok(())
    }

    #[test]
    fn non_finite_floats_json() -> Result<()> {
        let vals = [
            (Float64::from(f64::NAN), json!("nan")),
            (Float64::from(f64::INFINITY), json!("inf")),
            (Float64::from(f64::NEG_INFINITY), json!("-inf")),
        ];
        for (x, repr) in vals {
            assert_eq!(x.to_json(), repr);
            assert_eq!(Float64::from_json(&repr)?, x);
        }

        let nan = Float32::from(f32::NAN);
        assert_eq!(nan.to_json(), json!("nan"));
        assert_eq!(Float32::from_json(&nan.to_json())?, nan);
        assert_eq!(Float32::from_json(&json!("-inf"))?, Float32::from(f32::NEG_INFINITY));

        assert_eq!(Float64::from_json(&json!(3))?, Float64::from(3.0));
        assert!(Float64::from_json(&json!(null)).is_err());
        assert!(Float64::from_json(&json!("abc")).is_err());
        Ok(())
    }
}
