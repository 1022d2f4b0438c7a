//! Compile-time configuration and protocol limits.

/// Version of this crate, as given by `git describe` when built from a
/// git checkout, or the Cargo package version otherwise.
pub const VERSION: &str = include_str!(concat!(env!("OUT_DIR"), "/version"));

/// Largest value accepted by the `Varuint32` type.
///
/// This does not fit in a `u32`, values above `u32::MAX` still encode to 5 bytes.
pub const VARUINT32_MAX: u64 = 20_989_371_979;

/// A variable-length integer is never read past this many bytes.
pub const VARUINT_MAX_BYTES: usize = 9;

/// Maximum number of characters in a `Name`.
pub const NAME_MAX_LEN: usize = 13;

/// Maximum number of decimals for a `Symbol` (and hence an `Asset`).
pub const SYMBOL_MAX_PRECISION: u8 = 16;

/// Maximum number of characters in a symbol code.
pub const SYMBOL_CODE_MAX_LEN: usize = 7;

/// Every supported ABI document has a version starting with this prefix.
pub const ABI_VERSION_PREFIX: &str = "eosio::abi/1.";
