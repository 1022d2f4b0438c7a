//! Primitive types of the Antelope data model.
//!
//! Each of these types wraps one validated value and knows how to encode
//! itself to (and decode itself from) the wire format.

pub mod asset;
pub mod builtin;
pub mod name;
pub mod string;
pub mod symbol;
pub mod time;
pub mod varint;

pub use asset::{Asset, InvalidAsset};
pub use builtin::{
    Bool,
    Int8, Int16, Int32, Int64,
    Uint8, Uint16, Uint32, Uint64,
    Float32, Float64,
};
pub use name::{Name, InvalidName};
pub use string::{AntelopeString, Bytes, Wasm};
pub use symbol::{Symbol, InvalidSymbol};
pub use time::{InvalidTime, TimePoint, UnixTimestamp};
pub use varint::Varuint32;
