use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use snafu::{ensure, OptionExt, ResultExt, Snafu};

use crate::{config, AntelopeType, ByteStream, InvalidValue, Primitive, SerializeError};


#[derive(Debug, Snafu)]
pub enum InvalidSymbol {
    #[snafu(display("creating symbol from empty string"))]
    Empty,

    #[snafu(display(r#"symbol name longer than 7 characters: "{name}""#))]
    TooLong { name: String },

    #[snafu(display(r#"missing comma in symbol: "{symbol}""#))]
    MissingComma { symbol: String },

    #[snafu(display(r#"invalid char '{c}' in symbol name "{name}", only A-Z allowed"#))]
    CharError { name: String, c: char },

    #[snafu(display(r#"could not parse precision for symbol: "{precision}""#))]
    ParsePrecisionError { precision: String, source: ParseIntError },

    #[snafu(display("given precision {given} should be <= max precision {max}"))]
    PrecisionError { given: u8, max: u8 },

    #[snafu(display("invalid u64 representation: {value:#018x} cannot be turned into a valid symbol"))]
    InvalidU64Representation { value: u64 },
}


/// A token symbol, made of a precision (number of decimals) and a name.
///
/// Its string representation is `"<precision>,<NAME>"`, eg: `"4,EOS"`.
/// It is encoded as a `uint64` where the lowest byte is the precision and
/// the following bytes contain the name, zero-padded.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol {
    value: u64,
}

impl Symbol {
    /// Build a `Symbol` from its string representation.
    ///
    /// ## Example
    /// ```
    /// # use kudu_wire::{Symbol, InvalidSymbol};
    /// let sym = Symbol::new("4,EOS")?;
    /// assert_eq!(sym.decimals(), 4);
    /// assert_eq!(sym.code(), "EOS");
    /// # Ok::<(), InvalidSymbol>(())
    /// ```
    pub fn new(s: impl Into<String>) -> Result<Self, InvalidSymbol> {
        let s: String = s.into();
        ensure!(!s.is_empty(), EmptySnafu);
        let (precision, name) = s.split_once(',').context(MissingCommaSnafu { symbol: &s })?;
        let precision: u8 = precision.parse().context(ParsePrecisionSnafu { precision })?;
        Self::from_prec_and_str(precision, name)
    }

    pub fn from_prec_and_str(precision: u8, name: &str) -> Result<Self, InvalidSymbol> {
        Ok(Self {
            value: string_to_symbol(precision, name)?,
        })
    }

    pub fn from_u64(n: u64) -> Result<Self, InvalidSymbol> {
        let result = Self { value: n };
        ensure!(result.is_valid(), InvalidU64RepresentationSnafu { value: n });
        Ok(result)
    }

    pub fn as_u64(&self) -> u64 { self.value }

    /// Number of decimals.
    pub fn decimals(&self) -> u8 {
        (self.value & 0xFF) as u8
    }

    /// `10^decimals`, ie: the amount of the smallest units in one token.
    pub fn precision(&self) -> u64 {
        10u64.pow(self.decimals() as u32)
    }

    pub fn code(&self) -> String {
        symbol_code_to_string(self.value >> 8)
    }

    fn is_valid(&self) -> bool {
        self.decimals() <= config::SYMBOL_MAX_PRECISION && is_valid_symbol_name(&self.code())
    }
}


// -----------------------------------------------------------------------------
//     Helper functions
// -----------------------------------------------------------------------------

// see ref implementation in AntelopeIO/spring/libraries/chain/symbol.{hpp,cpp}

fn string_to_symbol_code(name: &str) -> Result<u64, InvalidSymbol> {
    let mut result: u64 = 0;
    ensure!(!name.is_empty(), EmptySnafu);
    ensure!(name.len() <= config::SYMBOL_CODE_MAX_LEN, TooLongSnafu { name });

    for (i, c) in name.chars().enumerate() {
        ensure!(c.is_ascii_uppercase(), CharSnafu { name, c });
        result |= (c as u64) << (8 * i);
    }
    Ok(result)
}

// zero bytes in the middle of the code are kept so that validation can catch them
fn symbol_code_to_string(value: u64) -> String {
    let mut v: u64 = value;
    let mut result = String::with_capacity(7);
    while v != 0 {
        let c = (v & 0xFF) as u8;
        result.push(c as char);
        v >>= 8;
    }
    result
}

fn string_to_symbol(precision: u8, s: &str) -> Result<u64, InvalidSymbol> {
    ensure!(precision <= config::SYMBOL_MAX_PRECISION,
            PrecisionSnafu { given: precision, max: config::SYMBOL_MAX_PRECISION });
    Ok(string_to_symbol_code(s)? << 8 | (precision as u64))
}

fn is_valid_symbol_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_uppercase())
}


// -----------------------------------------------------------------------------
//     Wire and conversion traits
// -----------------------------------------------------------------------------

impl Primitive for Symbol {
    type Value = String;

    fn from_value(value: String) -> Result<Self, InvalidValue> {
        Ok(Symbol::new(value)?)
    }

    fn value(&self) -> String {
        self.to_string()
    }
}

impl AntelopeType for Symbol {
    fn encode(&self, stream: &mut ByteStream) {
        stream.write_bytes(&self.value.to_le_bytes())
    }

    fn decode(stream: &mut ByteStream) -> Result<Self, SerializeError> {
        let n = u64::from_le_bytes(stream.read_array()?);
        Ok(Symbol::from_u64(n).map_err(InvalidValue::from)?)
    }
}

impl From<Symbol> for String {
    fn from(sym: Symbol) -> String {
        sym.to_string()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.decimals(), self.code())
    }
}

impl FromStr for Symbol {
    type Err = InvalidSymbol;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Symbol::new(s)
    }
}

impl Serialize for Symbol {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_string().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Symbol {
    fn deserialize<D>(deserializer: D) -> Result<Symbol, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Symbol::new(s).map_err(|e| de::Error::custom(e.to_string()))
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
    use super::*;

    #[test]
    fn basic_functionality() -> Result<()> {
        let obj = Symbol::new("4,FOO")?;
        let json = r#""4,FOO""#;

        assert_eq!(obj.decimals(), 4);
        assert_eq!(obj.precision(), 10_000);
        assert_eq!(obj.code(), "FOO");

        assert_eq!(serde_json::from_str::<Symbol>(json)?, obj);
        assert_eq!(serde_json::to_string(&obj)?, json);
        Ok(())
    }

    #[test]
    fn encoding() -> Result<()> {
        let vals = [
            ("0,W", "0057000000000000"),
            ("4,WAX", "0457415800000000"),
            ("16,WAX", "1057415800000000"),
            ("0,WAXXXXX", "0057415858585858"),
        ];
        for (sym, repr) in vals {
            let s = Symbol::new(sym)?;
            assert_eq!(s.to_hex(), repr);
            assert_eq!(Symbol::from_hex(repr)?, s);
        }
        Ok(())
    }

    #[test]
    fn invalid_symbols() {
        let symbols = [
            "0,WAXXXXXX",
            "0,",
            "0, ",
            ",",
            "",
            "WAX",
            "17,WAX",
            "-1,WAX",
            "4,wax",
            "4,W1X",
        ];

        for s in symbols {
            assert!(Symbol::new(s).is_err(), "Symbol \"{}\" should fail constructing but does not", s);
        }
    }

    #[test]
    fn invalid_wire_representation() {
        // precision too high
        assert!(Symbol::from_hex("1157415800000000").is_err());
        // empty name
        assert!(Symbol::from_hex("0400000000000000").is_err());
        // zero byte in the middle of the name
        assert!(Symbol::from_hex("0457005800000000").is_err());
        // lowercase chars
        assert!(Symbol::from_hex("0477617800000000").is_err());
    }
}
