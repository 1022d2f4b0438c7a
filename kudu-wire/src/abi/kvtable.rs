use std::fmt;
use std::marker::PhantomData;

use serde::{
    de::{MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};

use crate::{impl_composite, AntelopeString, AntelopeType, ByteStream, Name, SerializeError};
use crate::types::varint::{read_length, write_length};


/// Ordered list of values indexed by a [`Name`].
///
/// It is encoded as an element count followed by each `(name, value)` pair,
/// and represented in JSON as an object whose keys are the names.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NamedMap<V> {
    entries: Vec<(Name, V)>,
}

impl<V> NamedMap<V> {
    pub fn new(entries: Vec<(Name, V)>) -> Self {
        NamedMap { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &Name) -> Option<&V> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Name, V)> {
        self.entries.iter()
    }
}

impl<V> Default for NamedMap<V> {
    fn default() -> Self {
        NamedMap::new(vec![])
    }
}

impl<V: AntelopeType> AntelopeType for NamedMap<V> {
    fn encode(&self, stream: &mut ByteStream) {
        write_length(stream, self.entries.len());
        for (name, value) in &self.entries {
            name.encode(stream);
            value.encode(stream);
        }
    }

    fn decode(stream: &mut ByteStream) -> Result<Self, SerializeError> {
        let len = read_length(stream)?;
        let mut entries = Vec::with_capacity(len.min(stream.leftover().len()));
        for _ in 0..len {
            let name = Name::decode(stream)?;
            let value = V::decode(stream)?;
            entries.push((name, value));
        }
        Ok(NamedMap::new(entries))
    }
}

impl<V: Serialize> Serialize for NamedMap<V> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

struct NamedMapVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for NamedMapVisitor<V> {
    type Value = NamedMap<V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map with names as keys")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((name, value)) = access.next_entry::<Name, V>()? {
            entries.push((name, value));
        }
        Ok(NamedMap::new(entries))
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for NamedMap<V> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(NamedMapVisitor(PhantomData))
    }
}


// -----------------------------------------------------------------------------
//     Key-value tables
// -----------------------------------------------------------------------------

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrimaryIndex {
    pub name: Name,

    #[serde(rename = "type")]
    pub type_: AntelopeString,
}

impl_composite!(PrimaryIndex { name, type_ });


#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SecondaryIndex {
    #[serde(rename = "type")]
    pub type_: AntelopeString,
}

impl_composite!(SecondaryIndex { type_ });


/// Key-value table declared in an ABI.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct KvTable {
    #[serde(rename = "type")]
    pub type_: AntelopeString,

    pub primary_index: PrimaryIndex,

    #[serde(default)]
    pub secondary_indices: NamedMap<SecondaryIndex>,
}

impl_composite!(KvTable { type_, primary_index, secondary_indices });


// =============================================================================
//
//     Unittests
//
// =============================================================================
