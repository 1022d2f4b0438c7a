use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use snafu::{ensure, IntoError, OptionExt, ResultExt, Snafu};

use crate::{
    config, AntelopeType, ByteStream, InvalidSymbol, InvalidValue, Primitive,
    SerializeError, Symbol, impl_auto_error_conversion,
};


#[derive(Debug, Snafu)]
pub enum InvalidAsset {
    #[snafu(display(r#"asset amount and symbol should be separated with a single space: "{asset}""#))]
    MissingSpace { asset: String },

    #[snafu(display(r#"negative amounts are not allowed: "{asset}""#))]
    NegativeAmount { asset: String },

    #[snafu(display(r#"missing decimal fraction after decimal point: "{asset}""#))]
    MissingDecimal { asset: String },

    #[snafu(display(r#"amount should only contain digits and at most one decimal point: "{amount}""#))]
    InvalidAmount { amount: String },

    #[snafu(display("too many decimals: {given}, max is {max}"))]
    TooManyDecimals { given: usize, max: u8 },

    #[snafu(display("amount overflow for: {amount}, max is 2^64-1"))]
    AmountOverflow { amount: String },

    #[snafu(display("could not parse symbol from asset string"))]
    InvalidSymbol { source: InvalidSymbol },
}

impl_auto_error_conversion!(InvalidSymbol, InvalidAsset, InvalidSymbolSnafu);


/// `Asset` includes a non-negative amount and a currency symbol.
///
/// ## Example
/// ```
/// # use kudu_wire::{Asset, InvalidAsset, Symbol};
/// let asset: Asset = "10.0000 CUR".parse()?;
/// assert_eq!(asset.amount(), 100_000);
/// assert_eq!(asset.to_real(), 10.0);
/// assert_eq!(asset.symbol(), Symbol::new("4,CUR")?);
/// # Ok::<(), InvalidAsset>(())
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Asset {
    amount: u64,
    symbol: Symbol,
}

impl Asset {
    /// Build an `Asset` from its string representation, eg: `"1.0000 EOS"`.
    pub fn new(s: impl Into<String>) -> Result<Self, InvalidAsset> {
        s.into().parse()
    }

    /// Build an `Asset` from an amount expressed in the smallest unit of its symbol.
    pub fn from_amount(amount: u64, symbol: Symbol) -> Self {
        // no need to validate the symbol as it has been successfully constructed
        Asset { amount, symbol }
    }

    pub fn amount(&self) -> u64 { self.amount }
    pub fn symbol(&self) -> Symbol { self.symbol }
    pub fn symbol_code(&self) -> String { self.symbol.code() }
    pub fn decimals(&self) -> u8 { self.symbol.decimals() }
    pub fn precision(&self) -> u64 { self.symbol.precision() }

    pub fn to_real(&self) -> f64 {
        self.amount as f64 / self.precision() as f64
    }
}


// -----------------------------------------------------------------------------
//     Wire and conversion traits
// -----------------------------------------------------------------------------

impl Primitive for Asset {
    type Value = String;

    fn from_value(value: String) -> Result<Self, InvalidValue> {
        Ok(Asset::new(value)?)
    }

    fn value(&self) -> String {
        self.to_string()
    }
}

impl AntelopeType for Asset {
    fn encode(&self, stream: &mut ByteStream) {
        stream.write_bytes(&self.amount.to_le_bytes());
        self.symbol.encode(stream);
    }

    fn decode(stream: &mut ByteStream) -> Result<Self, SerializeError> {
        let amount = u64::from_le_bytes(stream.read_array()?);
        let symbol = Symbol::decode(stream)?;
        Ok(Asset { amount, symbol })
    }
}

impl TryFrom<&str> for Asset {
    type Error = InvalidAsset;

    fn try_from(s: &str) -> Result<Asset, InvalidAsset> {
        Asset::from_str(s)
    }
}

impl From<Asset> for String {
    fn from(asset: Asset) -> String {
        asset.to_string()
    }
}


// -----------------------------------------------------------------------------
//     `Display` implementation
// -----------------------------------------------------------------------------

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let decimals = self.decimals() as usize;
        let digits = format!("{:0>width$}", self.amount, width = decimals + 1);
        let (int_part, frac_part) = digits.split_at(digits.len() - decimals);
        if decimals == 0 {
            write!(f, "{} {}", int_part, self.symbol_code())
        }
        else {
            write!(f, "{}.{} {}", int_part, frac_part, self.symbol_code())
        }
    }
}


// -----------------------------------------------------------------------------
//     `FromStr` implementation
// -----------------------------------------------------------------------------

impl FromStr for Asset {
    type Err = InvalidAsset;

    fn from_str(s: &str) -> Result<Self, InvalidAsset> {
        let s = s.trim();

        // split amount and symbol, there should be exactly one space
        let (amount_str, symbol_str) = s.split_once(' ').context(MissingSpaceSnafu { asset: s })?;
        ensure!(!symbol_str.contains(' '), MissingSpaceSnafu { asset: s });
        ensure!(!amount_str.starts_with('-'), NegativeAmountSnafu { asset: s });

        let (int_part, frac_part) = match amount_str.split_once('.') {
            Some((int_part, frac_part)) => {
                ensure!(!frac_part.is_empty(), MissingDecimalSnafu { asset: s });
                (int_part, frac_part)
            },
            None => (amount_str, ""),
        };

        let is_number = |p: &str| p.chars().all(|c| c.is_ascii_digit());
        ensure!(!int_part.is_empty() && is_number(int_part) && is_number(frac_part),
                InvalidAmountSnafu { amount: amount_str });

        let precision = frac_part.len();
        ensure!(precision <= config::SYMBOL_MAX_PRECISION as usize,
                TooManyDecimalsSnafu { given: precision, max: config::SYMBOL_MAX_PRECISION });
        let symbol = Symbol::from_prec_and_str(precision as u8, symbol_str)?;

        // amount is stored without its decimal point
        let amount: u64 = format!("{int_part}{frac_part}").parse()
            .ok().context(AmountOverflowSnafu { amount: amount_str })?;

        Ok(Asset::from_amount(amount, symbol))
    }
}


// -----------------------------------------------------------------------------
//     `Serde` traits implementation
// -----------------------------------------------------------------------------

impl Serialize for Asset {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_string().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Asset {
    fn deserialize<D>(deserializer: D) -> Result<Asset, D::Error>
    where
        D: Deserializer<'de>,
    {
        let asset = String::deserialize(deserializer)?;
        Asset::from_str(&asset).map_err(|e| de::Error::custom(e.to_string()))
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
    fn invalid_assets() {
        let assets = [
            "99 WAXIBULGLOUBI",  // symbol name too long
            "99.2A3 WAX",        // cannot parse amount
            "1WAX",
            "1 1 WAX",
            "1  WAX",
            "WAX",
            "-1 WAX",
            "-0.5 WAX",
            &format!("{} WAX", i128::pow(2, 64)),
            "1 WAXXXXXX",
            "1 wax",
            "99 ",
            "99",
            "99. WAX",
            ".5 WAX",
            "1.2.3 WAX",
            "1.00000000000000000 WAX",  // 17 decimals
        ];

        for a in assets {
            assert!(Asset::from_str(a).is_err(), "Asset \"{}\" should fail constructing but does not", a);
        }
    }

    #[test]
    fn basic_functionality() -> Result<()> {
        let obj: Asset = "1.2345 FOO".parse()?;
        let json = r#""1.2345 FOO""#;

        assert_eq!(obj.amount(), 12345);
        assert_eq!(obj.decimals(), 4);
        assert_eq!(obj.precision(), 10000);

        assert_eq!(serde_json::from_str::<Asset>(json)?, obj);
        assert_eq!(serde_json::to_string(&obj)?, json);
        Ok(())
    }

    #[test]
    fn display_keeps_leading_zeros() -> Result<()> {
        for repr in ["0.0001 EOS", "0.1000 EOS", "12.0000 EOS", "0 EOS", "18446744073709551615 MAX",
                     "0.0000000000000001 TINY"] {
            assert_eq!(Asset::new(repr)?.to_string(), repr);
        }
        Ok(())
    }

    #[test]
    fn encoding() -> Result<()> {
        let vals = [
            ("99 WAX", "63000000000000000057415800000000"),
            ("99.9 WAX", "e7030000000000000157415800000000"),
            ("1.0000 EOS", "102700000000000004454f5300000000"),
        ];
        for (asset, repr) in vals {
            let a = Asset::new(asset)?;
            assert_eq!(a.to_hex(), repr);
            assert_eq!(Asset::from_hex(repr)?, a);
        }
        Ok(())
    }
}
