//! Memory model for the lesson machine
//!
//! This module provides the core memory abstractions:
//! - [`value`]: Runtime value representation (Int, Pointer, Null, Uninitialized)
//!   and the opaque [`value::Address`] token
//! - [`stack`]: Call stack with frames, nested scopes and named bindings
//! - [`heap`]: Integer cells with explicit allocation and tombstone tracking
//!
//! # Slot Sizes
//!
//! Every slot is an `int` or a pointer, and every slot takes 4 bytes of
//! address space. The size only spaces out the displayed addresses; nothing
//! ever offsets an address.
//!
//! # Ownership
//!
//! Stack bindings belong to the scope that declared them. Heap cells belong to
//! the scope that allocated them and are released when that scope closes, so a
//! finished run never leaves a live cell behind.

pub mod heap;
pub mod stack;
pub mod value;

use thiserror::Error;
use value::Address;

/// Address space taken by one slot
pub const SLOT_SIZE: u64 = 4;

/// Errors raised by the stack and heap before the interpreter attaches lesson context
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    #[error("out of memory: heap is limited to {limit} cells")]
    OutOfMemory { limit: usize },

    #[error("double free of {0}")]
    DoubleFree(Address),

    #[error("invalid free: {0} was never allocated")]
    InvalidFree(Address),

    #[error("use after free: {0} has been released")]
    UseAfterFree(Address),

    #[error("no storage at {0}")]
    Dangling(Address),
}
