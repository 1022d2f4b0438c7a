//! Typed representation of an ABI document.
//!
//! An ABI describes the types, structs, actions and tables of a smart contract.
//! [`Abi`] can be built from its JSON representation (as found in `.abi` files)
//! and converted to its binary representation, as sent to the `setabi` action.

mod definition;
mod kvtable;

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use snafu::{ensure, ResultExt};
use tracing::debug;

use crate::{
    config, AntelopeString, AntelopeType, Array, ByteStream, Composite, InvalidValue,
    Name, SerializeError,
};
use crate::antelopetype::{AbiVersionSnafu, MappingSnafu};
use crate::loader::{self, InvalidAbiSnafu, JsonSnafu, LoadError};

pub use definition::{
    AbiAction, AbiActionResult, AbiClause, AbiErrorMessage, AbiExtension,
    AbiStruct, AbiStructField, AbiTable, AbiType, AbiVariant,
};
pub use kvtable::{KvTable, NamedMap, PrimaryIndex, SecondaryIndex};


/// Full ABI document of a contract.
///
/// The `variants`, `action_results` and `kv_tables` sections were added in
/// later versions of the ABI format and might be missing, in which case they
/// are not present in the binary representation either. As the binary
/// representation is positional, an ABI that has one of those sections always
/// has all the previous ones too (possibly empty).
///
/// Equality ignores the `____comment` field, which is never encoded.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(try_from = "AbiMapping")]
pub struct Abi {
    #[serde(rename = "____comment", skip_serializing_if = "String::is_empty")]
    comment: String,

    version: AntelopeString,
    types: Array<AbiType>,
    structs: Array<AbiStruct>,
    actions: Array<AbiAction>,
    tables: Array<AbiTable>,
    ricardian_clauses: Array<AbiClause>,
    error_messages: Array<AbiErrorMessage>,
    abi_extensions: Array<AbiExtension>,

    #[serde(skip_serializing_if = "Option::is_none")]
    variants: Option<Array<AbiVariant>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    action_results: Option<Array<AbiActionResult>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    kv_tables: Option<NamedMap<KvTable>>,
}

#[derive(Deserialize)]
struct AbiMapping {
    #[serde(rename = "____comment", default)]
    comment: String,

    version: AntelopeString,
    types: Array<AbiType>,
    structs: Array<AbiStruct>,
    actions: Array<AbiAction>,
    tables: Array<AbiTable>,

    #[serde(default)]
    ricardian_clauses: Array<AbiClause>,
    #[serde(default)]
    error_messages: Array<AbiErrorMessage>,
    #[serde(default)]
    abi_extensions: Array<AbiExtension>,

    #[serde(default)]
    variants: Option<Array<AbiVariant>>,
    #[serde(default)]
    action_results: Option<Array<AbiActionResult>>,
    #[serde(default)]
    kv_tables: Option<NamedMap<KvTable>>,
}

impl TryFrom<AbiMapping> for Abi {
    type Error = InvalidValue;

    fn try_from(m: AbiMapping) -> Result<Abi, InvalidValue> {
        check_version(&m.version)?;

        // a trailing section can only be encoded if all the previous ones are
        let action_results = match m.action_results {
            None if m.kv_tables.is_some() => Some(Array::default()),
            r => r,
        };
        let variants = match m.variants {
            None if action_results.is_some() => Some(Array::default()),
            v => v,
        };

        Ok(Abi {
            comment: m.comment,
            version: m.version,
            types: m.types,
            structs: m.structs,
            actions: m.actions,
            tables: m.tables,
            ricardian_clauses: m.ricardian_clauses,
            error_messages: m.error_messages,
            abi_extensions: m.abi_extensions,
            variants,
            action_results,
            kv_tables: m.kv_tables,
        })
    }
}

fn check_version(version: &AntelopeString) -> Result<(), InvalidValue> {
    ensure!(version.as_str().starts_with(config::ABI_VERSION_PREFIX),
            AbiVersionSnafu { version: version.as_str() });
    Ok(())
}

impl Abi {
    /// Read an ABI from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Abi, LoadError> {
        let data = loader::load_bytes(path, "abi")?;
        let mapping: serde_json::Value = serde_json::from_slice(&data).context(JsonSnafu)?;
        Abi::from_mapping(&mapping).context(InvalidAbiSnafu)
    }

    pub fn version(&self) -> &str { self.version.as_str() }
    pub fn comment(&self) -> &str { &self.comment }
    pub fn types(&self) -> &Array<AbiType> { &self.types }
    pub fn structs(&self) -> &Array<AbiStruct> { &self.structs }
    pub fn actions(&self) -> &Array<AbiAction> { &self.actions }
    pub fn tables(&self) -> &Array<AbiTable> { &self.tables }
    pub fn ricardian_clauses(&self) -> &Array<AbiClause> { &self.ricardian_clauses }
    pub fn error_messages(&self) -> &Array<AbiErrorMessage> { &self.error_messages }
    pub fn abi_extensions(&self) -> &Array<AbiExtension> { &self.abi_extensions }
    pub fn variants(&self) -> Option<&Array<AbiVariant>> { self.variants.as_ref() }
    pub fn action_results(&self) -> Option<&Array<AbiActionResult>> { self.action_results.as_ref() }
    pub fn kv_tables(&self) -> Option<&NamedMap<KvTable>> { self.kv_tables.as_ref() }

    pub fn struct_named(&self, name: &str) -> Option<&AbiStruct> {
        self.structs.iter().find(|s| s.name == name)
    }

    pub fn action_named(&self, name: &str) -> Option<&AbiAction> {
        let name = Name::new(name).ok()?;
        self.actions.iter().find(|a| a.name == name)
    }
}

impl PartialEq for Abi {
    fn eq(&self, other: &Abi) -> bool {
        self.version == other.version &&
            self.types == other.types &&
            self.structs == other.structs &&
            self.actions == other.actions &&
            self.tables == other.tables &&
            self.ricardian_clauses == other.ricardian_clauses &&
            self.error_messages == other.error_messages &&
            self.abi_extensions == other.abi_extensions &&
            self.variants == other.variants &&
            self.action_results == other.action_results &&
            self.kv_tables == other.kv_tables
    }
}

impl Eq for Abi {}

fn decode_trailing<T: AntelopeType>(stream: &mut ByteStream) -> Result<Option<T>, SerializeError> {
    if stream.leftover().is_empty() {
        return Ok(None);
    }
    Ok(Some(T::decode(stream)?))
}

impl AntelopeType for Abi {
    fn encode(&self, stream: &mut ByteStream) {
        self.version.encode(stream);
        self.types.encode(stream);
        self.structs.encode(stream);
        self.actions.encode(stream);
        self.tables.encode(stream);
        self.ricardian_clauses.encode(stream);
        self.error_messages.encode(stream);
        self.abi_extensions.encode(stream);

        if let Some(variants) = &self.variants { variants.encode(stream); }
        if let Some(action_results) = &self.action_results { action_results.encode(stream); }
        if let Some(kv_tables) = &self.kv_tables { kv_tables.encode(stream); }
    }

    fn decode(stream: &mut ByteStream) -> Result<Self, SerializeError> {
        let version = AntelopeString::decode(stream)?;
        check_version(&version)?;
        debug!(%version, "decoding ABI");

        let abi = Abi {
            comment: String::new(),
            version,
            types: Array::decode(stream)?,
            structs: Array::decode(stream)?,
            actions: Array::decode(stream)?,
            tables: Array::decode(stream)?,
            ricardian_clauses: Array::decode(stream)?,
            error_messages: Array::decode(stream)?,
            abi_extensions: Array::decode(stream)?,
            variants: decode_trailing(stream)?,
            action_results: decode_trailing(stream)?,
            kv_tables: decode_trailing(stream)?,
        };

        debug!(structs = abi.structs.len(), actions = abi.actions.len(), tables = abi.tables.len(),
               "decoded ABI");
        Ok(abi)
    }
}

impl Composite for Abi {}

impl FromStr for Abi {
    type Err = InvalidValue;

    fn from_str(s: &str) -> Result<Abi, InvalidValue> {
        serde_json::from_str(s).context(MappingSnafu { typename: "Abi" })
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

    fn minimal() -> serde_json::Value {
        json!({
            "version": "eosio::abi/1.1",
            "types": [],
            "structs": [],
            "actions": [],
            "tables": [],
        })
    }

    #[test]
    fn minimal_abi() -> Result<()> {
        let abi = Abi::from_mapping(&minimal())?;
        assert!(abi.variants().is_none());
        assert_eq!(abi.to_hex(), "0e656f73696f3a3a6162692f312e3100000000000000");
        assert_eq!(Abi::from_hex(&abi.to_hex())?, abi);

        let mut json = minimal();
        json["ricardian_clauses"] = json!([]);
        json["error_messages"] = json!([]);
        json["abi_extensions"] = json!([]);
        assert_eq!(abi.to_json(), json);
        Ok(())
    }

    #[test]
    fn trailing_sections_are_normalized() -> Result<()> {
        let mut json = minimal();
        json["kv_tables"] = json!({});
        let abi = Abi::from_mapping(&json)?;
        assert_eq!(abi.variants().map(Array::len), Some(0));
        assert_eq!(abi.action_results().map(Array::len), Some(0));
        assert_eq!(abi.kv_tables().map(NamedMap::len), Some(0));
        assert_eq!(abi.to_hex(), "0e656f73696f3a3a6162692f312e3100000000000000000000");
        assert_eq!(Abi::from_hex(&abi.to_hex())?, abi);
        Ok(())
    }

    #[test]
    fn missing_required_section() {
        let mut json = minimal();
        json.as_object_mut().unwrap().remove("tables");
        assert!(Abi::from_mapping(&json).is_err());
    }

    #[test]
    fn invalid_version() {
        let mut json = minimal();
        json["version"] = json!("eosio::abi/2.0");
        assert!(matches!(Abi::from_mapping(&json), Err(InvalidValue::Mapping { .. })));
        assert!(Abi::from_hex("0e656f73696f3a3a6162692f322e3000000000000000").is_err());
    }

    #[test]
    fn comment_is_ignored() -> Result<()> {
        let mut json = minimal();
        json["____comment"] = json!("generated by hand");
        let abi = Abi::from_mapping(&json)?;
        assert_eq!(abi.comment(), "generated by hand");
        assert_eq!(abi, Abi::from_mapping(&minimal())?);
        assert_eq!(abi.to_bytes(), Abi::from_mapping(&minimal())?.to_bytes());
        Ok(())
    }

    #[test]
    fn lookup_helpers() -> Result<()> {
        let mut json = minimal();
        json["structs"] = json!([{"name": "hi", "base": "", "fields": [{"name": "user", "type": "name"}]}]);
        json["actions"] = json!([{"name": "hi", "type": "hi", "ricardian_contract": ""}]);
        let abi: Abi = serde_json::to_string(&json)?.parse()?;
        assert_eq!(abi.struct_named("hi").map(|s| s.fields.len()), Some(1));
        assert!(abi.struct_named("bye").is_none());
        assert_eq!(abi.action_named("hi").map(|a| a.type_.as_str()), Some("hi"));
        assert!(abi.action_named("Not A Name").is_none());
        Ok(())
    }
}
