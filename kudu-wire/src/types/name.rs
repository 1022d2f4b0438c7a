use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use snafu::{ensure, Snafu};

use crate::{config, AntelopeType, ByteStream, InvalidValue, Primitive, SerializeError};


#[derive(Debug, Snafu)]
pub enum InvalidName {
    #[snafu(display(r#"Name is longer than 13 characters: "{name}""#))]
    TooLong { name: String },

    #[snafu(display(r#"invalid char '{c}' in name "{name}", allowed chars are: a-z, 1-5 and '.'"#))]
    InvalidChar { name: String, c: char },

    #[snafu(display(r#"13th char of name "{name}" should be one of a-j or '.', got: '{c}'"#))]
    InvalidLastChar { name: String, c: char },

    #[snafu(display(r#"Name cannot be made only of dots: "{name}""#))]
    OnlyDots { name: String },
}

/// Represent an account or action name, encoded as a `uint64`.
///
/// Names compare equal if they only differ by `.` characters, eg: `"a"` and
/// `"a."` are the same name.
#[derive(Clone, Debug, Default)]
pub struct Name {
    value: String,
}

impl Name {
    /// Build a `Name` from its string representation.
    ///
    /// ## Example
    /// ```
    /// # use kudu_wire::{Name, InvalidName};
    /// assert!(Name::new("nico").is_ok());
    /// assert_eq!(Name::new("eosio.token")?.to_string(), "eosio.token");
    /// assert_eq!(Name::new("a.b.c.d.e")?.as_u64(), 3462709566378082304);
    /// assert_eq!(Name::new("")?.as_u64(), 0);
    /// # Ok::<(), InvalidName>(())
    /// ```
    pub fn new(s: impl Into<String>) -> Result<Self, InvalidName> {
        let name: String = s.into();
        ensure!(name.len() <= config::NAME_MAX_LEN, TooLongSnafu { name });

        if let Some(c) = name.chars().find(|&c| !is_valid_char(c)) {
            return InvalidCharSnafu { name, c }.fail();
        }

        if let Some(c) = name.chars().nth(12) {
            ensure!(matches!(c, 'a'..='j' | '.'), InvalidLastCharSnafu { name, c });
        }

        ensure!(name.is_empty() || name.chars().any(|c| c != '.'), OnlyDotsSnafu { name });

        Ok(Name { value: name })
    }

    /// Build a `Name` from its `u64` representation, trailing dots are stripped.
    pub fn from_u64(n: u64) -> Self {
        // NOTE: no validation here, all u64 are valid names
        Self { value: u64_to_string(n) }
    }

    /// Return the name `u64` representation.
    pub fn as_u64(&self) -> u64 {
        string_to_u64(self.value.as_bytes())
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// The name without any dot, used for comparison.
    fn stripped(&self) -> impl Iterator<Item = char> + '_ {
        self.value.chars().filter(|&c| c != '.')
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.stripped().eq(other.stripped())
    }
}

impl Eq for Name {}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for c in self.stripped() {
            c.hash(state);
        }
    }
}

impl Primitive for Name {
    type Value = String;

    fn from_value(value: String) -> Result<Self, InvalidValue> {
        Ok(Name::new(value)?)
    }

    fn value(&self) -> String {
        self.value.clone()
    }
}

impl AntelopeType for Name {
    fn encode(&self, stream: &mut ByteStream) {
        stream.write_bytes(&self.as_u64().to_le_bytes())
    }

    fn decode(stream: &mut ByteStream) -> Result<Self, SerializeError> {
        Ok(Name::from_u64(u64::from_le_bytes(stream.read_array()?)))
    }
}


// -----------------------------------------------------------------------------
//     Helper functions
// -----------------------------------------------------------------------------

fn is_valid_char(c: char) -> bool {
    matches!(c, 'a'..='z' | '1'..='5' | '.')
}

const fn char_to_symbol(c: u8) -> u64 {
    match c {
        b'a'..=b'z' => (c - b'a') as u64 + 6,
        b'1'..=b'5' => (c - b'1') as u64 + 1,
        _ => 0,
    }
}

// see ref implementation in AntelopeIO/spring/libraries/chain/name.{hpp,cpp}
const fn string_to_u64(s: &[u8]) -> u64 {
    let mut n: u64 = 0;
    let maxlen = if s.len() < 12 { s.len() } else { 12 };
    let mut i = 0;
    while i < maxlen {
        n |= char_to_symbol(s[i]) << (64 - 5 * (i + 1));
        i += 1;
    }

    // the loop encoded up to 60 high bits, the 13th char (if any)
    // goes into the remaining low 4 bits
    if s.len() >= 13 {
        n |= char_to_symbol(s[12]) & 0x0F;
    }

    n
}

const CHARMAP: &[u8] = b".12345abcdefghijklmnopqrstuvwxyz";

fn u64_to_string(n: u64) -> String {
    let mut n = n;
    let mut s: Vec<u8> = vec![b'.'; 13];
    for i in 0..=12 {
        let c: u8 = CHARMAP[n as usize & match i { 0 => 0x0F, _ => 0x1F }];
        s[12-i] = c;
        n >>= match i { 0 => 4, _ => 5 };
    }

    // truncate string with unused trailing symbols
    while s.last() == Some(&b'.') {
        s.pop();
    }

    s.into_iter().map(char::from).collect()
}


// -----------------------------------------------------------------------------
//     Conversion traits
// -----------------------------------------------------------------------------

impl TryFrom<&str> for Name {
    type Error = InvalidName;

    fn try_from(s: &str) -> Result<Name, InvalidName> {
        Name::new(s)
    }
}

impl From<u64> for Name {
    fn from(n: u64) -> Name {
        Name::from_u64(n)
    }
}

impl From<Name> for String {
    fn from(name: Name) -> String {
        name.value
    }
}


// -----------------------------------------------------------------------------
//     `Display` and `FromStr` implementation
// -----------------------------------------------------------------------------

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl FromStr for Name {
    type Err = InvalidName;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Name::new(s)
    }
}


// -----------------------------------------------------------------------------
//     `Serde` traits implementation
// -----------------------------------------------------------------------------

impl Serialize for Name {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.value.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Name {
    fn deserialize<D>(deserializer: D) -> Result<Name, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Name::new(name).map_err(|e| de::Error::custom(e.to_string()))
    }
}


// =============================================================================
//
//     Unittests
//
// =============================================================================

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use color_eyre::eyre::Result;
    use super::*;

    #[test]
    fn simple_names() -> Result<()> {
        let n = Name::new("nico")?;
        assert_eq!(n.to_string(), "nico");

        let n2 = Name::new("eosio.token")?;
        assert_eq!(n2.to_string(), "eosio.token");

        assert_eq!(Name::new("")?, Name::from_u64(0));
        assert_eq!(Name::new("foobar")?.as_u64(), 6712742083569909760);
        Ok(())
    }

    #[test]
    fn invalid_names() {
        let names = [
            "yepthatstoolong",
            "abcDef",
            "A",
            "zzzzzzzzzzzzzz",
            "á",
            "a b",
            "0",
            "6",
            ".",
            "....",
            "zzzzzzzzzzzzz",
            "aaaaaaaaaaaaz",
        ];

        for n in names {
            assert!(Name::new(n).is_err(), "Name \"{}\" should fail constructing but does not", n);
        }
    }

    #[test]
    fn dots_are_ignored_for_equality() -> Result<()> {
        assert_eq!(Name::new("a")?, Name::new("a.")?);
        assert_eq!(Name::new("a")?, Name::new("a....")?);
        assert_ne!(Name::new("a")?, Name::new("b")?);

        let set: HashSet<Name> = [Name::new("eosio")?, Name::new("eosio..")?].into_iter().collect();
        assert_eq!(set.len(), 1);
        Ok(())
    }

    #[test]
    fn encoding() -> Result<()> {
        let vals = [
            ("", "0000000000000000"),
            ("a", "0000000000000030"),
            ("user2", "00000000007115d6"),
            ("eosio", "0000000000ea3055"),
            ("kacjndfvdfa", "00cc4a7ba5f99081"),
            ("zzzzzzzzzzzzj", "ffffffffffffffff"),
        ];

        for (name, repr) in vals {
            let n = Name::new(name)?;
            assert_eq!(n.to_hex(), repr);
            assert_eq!(Name::from_hex(repr)?.as_str(), name);
        }
        Ok(())
    }

    #[test]
    fn decoding_strips_trailing_dots() -> Result<()> {
        let n = Name::new("abc...")?;
        assert_eq!(n.as_str(), "abc...");
        assert_eq!(Name::from_bytes(&n.to_bytes())?.as_str(), "abc");
        Ok(())
    }

    #[test]
    fn json() -> Result<()> {
        let name = Name::new("foobar")?;
        assert_eq!(serde_json::from_str::<Name>(r#""foobar""#)?, name);
        assert_eq!(serde_json::to_string(&name)?, r#""foobar""#);
        assert!(serde_json::from_str::<Name>(r#""FOO""#).is_err());
        Ok(())
    }
}
