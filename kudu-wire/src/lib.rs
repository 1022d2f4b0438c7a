//!
//! This library provides the data types used by [Antelope](https://antelope.io)
//! blockchains along with their binary serialization format.
//!
//! The basic types can be found in the [`types`] module, ABI documents and their
//! components in the [`abi`] module, and the [`registry`] allows to build values
//! of any of those types from their name.
//!
//! # Feature flags
//!
//! - `cli`: whether to compile the command-line tools alongside the library.
//!          This feature is enabled by default and currently installs the `kuduwire` tool.
//!
//! # Antelope data model
//!
//! All the types implement the [`AntelopeType`] trait, which provides the conversions
//! between the following representations:
//!  - Rust native values (structs defined in this library)
//!  - JSON values (`serde_json::Value`), also called mapping form for composite types
//!  - binary data, either as bytes or as a hex string
//!
//! Types wrapping a single value additionally implement [`Primitive`], types made
//! of named fields implement [`Composite`].
//!
//! All constructors validate their input, so an instance of a type is always valid
//! and can always be encoded.
//!
//! ## Example
//! ```
//! # use kudu_wire::{AntelopeType, Asset, Name};
//! # use color_eyre::eyre::Result;
//! # fn main() -> Result<()> {
//! let quantity = Asset::new("1.0000 EOS")?;
//! assert_eq!(quantity.to_hex(), "102700000000000004454f5300000000");
//!
//! let account = Name::from_hex("0000000000ea3055")?;
//! assert_eq!(account.to_string(), "eosio");
//! # Ok(())
//! # }
//! ```
//!
//! # `kuduwire` CLI tool
//!
//! The `kuduwire` tool converts values of any registered type between their JSON
//! and hex representations.
//!
//! Example:
//! ```sh
//! $ kuduwire to-hex asset '"1.0000 EOS"'
//! 102700000000000004454f5300000000
//!
//! $ kuduwire from-hex name 0000000000ea3055
//! "eosio"
//! ```
//!
//! # Differences between this library and the Antelope C++ library
//!
//!  - hex numbers here are lowercase whereas C++ outputs hex data in upper case
//!  - C++ outputs `i64` and `u64` as double-quoted, this library doesn't


// disable this lint to allow our types to implement a `from` constructor
// without implementing the `std::convert::From` trait
#![allow(clippy::should_implement_trait)]

pub mod abi;
pub mod array;
pub mod config;
pub mod loader;
pub mod registry;
pub mod types;

mod antelopetype;
mod bytestream;
mod error;

pub use serde_json::{
    Map as JsonMap,
    Value as JsonValue,
    Error as JsonError,
    json
};

pub use antelopetype::{AntelopeType, Composite, InvalidValue, Primitive, SerializeError};
pub use array::Array;
pub use bytestream::{ByteStream, StreamError};
pub use types::*;
pub use abi::{
    Abi, AbiAction, AbiActionResult, AbiClause, AbiErrorMessage, AbiExtension, AbiStruct,
    AbiStructField, AbiTable, AbiType, AbiVariant, KvTable, NamedMap, PrimaryIndex,
    SecondaryIndex,
};
pub use registry::{AntelopeValue, LookupError, TypeKind};
pub use loader::LoadError;
