//! IPv4 address arithmetic and VLSM allocation.
//!
//! This crate owns the only real logic in the `vlsm` workspace:
//!
//! - **Address arithmetic** ([`addr`]): dotted-quad ⇄ `u32`
//!   conversion, prefix → subnet/wildcard mask derivation, and
//!   [`validate_cidr`], the syntactic gate callers apply before handing
//!   text to anything else.
//!
//! - **[`Block`]**: a normalized network address plus prefix, with the
//!   broadcast / capacity / usable-range derivations.
//!
//! - **Sizing** ([`sizing`]): [`minimal_prefix`] picks the smallest
//!   power-of-two block that holds a host count plus the network and
//!   broadcast addresses.
//!
//! - **[`allocate`]**: sorts requirements largest-first (stable) and
//!   packs their blocks contiguously from the parent's network address,
//!   failing the whole batch with [`CoreError::CapacityExceeded`] at the
//!   first block that runs past the parent. [`calculate`] is the same
//!   operation with the failure folded into [`AllocationResult::error`].
//!
//! Everything is a pure function of its inputs: no I/O, no shared state,
//! safe to call from any number of threads.

pub mod addr;
pub mod allocator;
pub mod block;
pub mod error;
pub mod model;
pub mod sizing;

// ── Primary re-exports ──────────────────────────────────────────────
pub use addr::{
    MAX_PREFIX, format_address, mask_from_prefix, parse_address, parse_cidr, to_binary,
    validate_cidr, wildcard_from_prefix,
};
pub use allocator::{allocate, calculate};
pub use block::Block;
pub use error::CoreError;
pub use model::{AllocatedSubnet, AllocationResult, SubnetRequirement};
pub use sizing::{block_size, minimal_prefix, usable_hosts};
