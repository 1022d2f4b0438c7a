use serde::{Deserialize, Serialize};

use crate::{
    impl_composite,
    AntelopeString, AntelopeType, Array, ByteStream, Bytes, Composite, InvalidValue,
    Name, SerializeError, Uint16, Uint64,
};
use crate::types::varint::{read_length, write_length};

// see doc at: https://docs.eosnetwork.com/docs/latest/advanced-topics/understanding-ABI-files/

// C++ reference implementation is at:
// https://github.com/AntelopeIO/spring/blob/main/libraries/chain/include/eosio/chain/abi_def.hpp


/// Type alias declared in an ABI.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct AbiType {
    pub new_type_name: AntelopeString,

    #[serde(rename = "type")]
    pub type_: AntelopeString,
}

impl AbiType {
    pub fn new(new_type_name: &str, type_: &str) -> Result<Self, InvalidValue> {
        Ok(AbiType {
            new_type_name: AntelopeString::new(new_type_name)?,
            type_: AntelopeString::new(type_)?,
        })
    }
}

impl_composite!(AbiType { new_type_name, type_ });


#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct AbiStructField {
    pub name: AntelopeString,

    #[serde(rename = "type")]
    pub type_: AntelopeString,
}

impl AbiStructField {
    pub fn new(name: &str, type_: &str) -> Result<Self, InvalidValue> {
        Ok(AbiStructField {
            name: AntelopeString::new(name)?,
            type_: AntelopeString::new(type_)?,
        })
    }
}

impl_composite!(AbiStructField { name, type_ });


/// Struct declared in an ABI, its `base` is empty when it has no parent.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct AbiStruct {
    pub name: AntelopeString,

    #[serde(default)]
    pub base: AntelopeString,

    pub fields: Array<AbiStructField>,
}

impl_composite!(AbiStruct { name, base, fields });


#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct AbiAction {
    pub name: Name,

    #[serde(rename = "type")]
    pub type_: AntelopeString,

    #[serde(default)]
    pub ricardian_contract: AntelopeString,
}

impl_composite!(AbiAction { name, type_, ricardian_contract });


#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct AbiTable {
    pub name: Name,

    #[serde(default)]
    pub index_type: AntelopeString,

    #[serde(default)]
    pub key_names: Array<AntelopeString>,

    #[serde(default)]
    pub key_types: Array<AntelopeString>,

    #[serde(rename = "type")]
    pub type_: AntelopeString,
}

impl_composite!(AbiTable { name, index_type, key_names, key_types, type_ });


#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct AbiClause {
    pub id: AntelopeString,
    pub body: AntelopeString,
}

impl_composite!(AbiClause { id, body });


#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct AbiErrorMessage {
    pub error_code: Uint64,
    pub error_msg: AntelopeString,
}

impl_composite!(AbiErrorMessage { error_code, error_msg });


/// Extension of an ABI, tagged with a numeric identifier.
///
/// Its JSON representation is a pair `[tag, "hex data"]`, the data is
/// prefixed with its length on the wire.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct AbiExtension(pub Uint16, pub Bytes);

impl AbiExtension {
    pub fn tag(&self) -> u16 {
        self.0.get()
    }

    pub fn data(&self) -> &[u8] {
        self.1.as_slice()
    }
}

impl AntelopeType for AbiExtension {
    fn encode(&self, stream: &mut ByteStream) {
        self.0.encode(stream);
        write_length(stream, self.1.len());
        stream.write_bytes(self.1.as_slice());
    }

    fn decode(stream: &mut ByteStream) -> Result<Self, SerializeError> {
        let tag = Uint16::decode(stream)?;
        let len = read_length(stream)?;
        let data = stream.read_bytes(len)?.to_vec();
        Ok(AbiExtension(tag, Bytes::from(data)))
    }
}

impl Composite for AbiExtension {}


#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct AbiVariant {
    pub name: AntelopeString,

    #[serde(default)]
    pub types: Array<AntelopeString>,
}

impl_composite!(AbiVariant { name, types });


#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct AbiActionResult {
    pub name: Name,
    pub result_type: AntelopeString,
}

impl_composite!(AbiActionResult { name, result_type });


// =============================================================================
//
//     Unittests
//
// =============================================================================
