use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use snafu::ensure;

use crate::{config, AntelopeType, ByteStream, InvalidValue, Primitive, SerializeError};
use crate::antelopetype::IntegerOutOfRangeSnafu;
use crate::types::builtin::IntegerVisitor;


/// Unsigned integer encoded with a variable number of bytes (LEB128).
///
/// Lengths of strings and arrays are encoded using this type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Varuint32(u64);

impl Varuint32 {
    pub fn new(value: impl Into<i128>) -> Result<Self, InvalidValue> {
        Self::from_value(value.into())
    }

    pub fn get(&self) -> u64 { self.0 }
}

impl Primitive for Varuint32 {
    type Value = i128;

    fn from_value(value: i128) -> Result<Self, InvalidValue> {
        ensure!((0..=config::VARUINT32_MAX as i128).contains(&value),
                IntegerOutOfRangeSnafu {
                    typename: "varuint32",
                    value,
                    min: 0,
                    max: config::VARUINT32_MAX as i128,
                });
        Ok(Self(value as u64))
    }

    fn value(&self) -> i128 { self.0 as i128 }
}

impl AntelopeType for Varuint32 {
    fn encode(&self, stream: &mut ByteStream) {
        stream.write_var_u64(self.0)
    }

    fn decode(stream: &mut ByteStream) -> Result<Self, SerializeError> {
        let n = stream.read_var_u64()?;
        Ok(Self::from_value(n as i128)?)
    }
}

impl From<u32> for Varuint32 {
    fn from(n: u32) -> Varuint32 { Self(n as u64) }
}

impl From<Varuint32> for i128 {
    fn from(n: Varuint32) -> i128 { n.0 as i128 }
}

impl TryFrom<usize> for Varuint32 {
    type Error = InvalidValue;

    fn try_from(n: usize) -> Result<Varuint32, InvalidValue> {
        Self::from_value(n as i128)
    }
}

impl fmt::Display for Varuint32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Varuint32 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Varuint32 {
    fn deserialize<D>(deserializer: D) -> Result<Varuint32, D::Error>
    where
        D: Deserializer<'de>,
    {
        let n = deserializer.deserialize_any(IntegerVisitor)?;
        Varuint32::from_value(n).map_err(de::Error::custom)
    }
}


// -----------------------------------------------------------------------------
//     Length prefix helpers
// -----------------------------------------------------------------------------

/// Write the length prefix of a string, blob or array.
pub(crate) fn write_length(stream: &mut ByteStream, len: usize) {
    stream.write_var_u64(len as u64)
}

/// Read the length prefix of a string, blob or array.
pub(crate) fn read_length(stream: &mut ByteStream) -> Result<usize, SerializeError> {
    let len = Varuint32::decode(stream)?;
    Ok(len.get() as usize)
}


// =============================================================================
//
//     Unittests
//
// =============================================================================

#[cfg(test)]
mod tests {
    use color_eyre::eyre::Result;
    use super::*;

    #[test]
    fn encoding() -> Result<()> {
        let vals: [(i128, &str); 8] = [
            (0, "00"),
            (127, "7f"),
            (128, "8001"),
            (255, "ff01"),
            (16384, "808001"),
            (u32::MAX as i128, "ffffffff0f"),
            (1 << 32, "8080808010"),
            (20_989_371_979, "cbccc1984e"),
        ];

        for (n, repr) in vals {
            let v = Varuint32::new(n)?;
            assert_eq!(v.to_hex(), repr);
            assert_eq!(v.byte_length(), repr.len() / 2);
            assert_eq!(Varuint32::from_hex(repr)?, v);
        }
        Ok(())
    }

    #[test]
    fn out_of_range() {
        assert!(Varuint32::new(-1).is_err());
        assert!(Varuint32::new(20_989_371_980_i64).is_err());
        // decodes to a value larger than the max allowed
        assert!(Varuint32::from_hex("ffffffffffffffff7f").is_err());
    }

    #[test]
    fn truncated_input() {
        let err = Varuint32::from_hex("8080").unwrap_err();
        assert!(matches!(err, SerializeError::StreamError { .. }));
    }
}
