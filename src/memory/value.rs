//! Runtime value representation
//!
//! This module defines the [`Value`] enum stored in every stack slot and heap
//! cell, and the opaque [`Address`] token that identifies a slot.
//!
//! # Value Types
//!
//! - [`Value::Int`]: 32-bit signed integer
//! - [`Value::Pointer`]: address of another slot
//! - [`Value::Null`]: pointer that was explicitly set to point nowhere
//! - [`Value::Uninitialized`]: declared but never assigned
//!
//! # Addresses
//!
//! An [`Address`] can be compared and displayed, nothing else. There is no
//! pointer arithmetic: the token exists so a lesson can show *where* a value
//! lives, not so code can compute with it.

use std::fmt;

/// Opaque storage location of a stack slot or heap cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(u64);

impl Address {
    pub(crate) const fn new(raw: u64) -> Self {
        Address(raw)
    }

    /// Allocators hand out addresses in increasing order; this yields the one after `self`.
    pub(crate) const fn following(self, slot_size: u64) -> Self {
        Address(self.0 + slot_size)
    }

    /// Whether this address lies in the heap region
    pub fn is_heap(self) -> bool {
        self.0 >= crate::interpreter::constants::HEAP_ADDRESS_START
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

/// Runtime values in the virtual machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Value {
    Int(i32),
    Pointer(Address),
    Null,
    #[default]
    Uninitialized,
}

impl Value {
    /// Get the integer value, returns None if not an Int
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the pointee address, returns None for anything but a bound pointer
    pub fn as_pointer(&self) -> Option<Address> {
        match self {
            Value::Pointer(addr) => Some(*addr),
            _ => None,
        }
    }

    /// Expect an integer value, returns the name of the actual kind otherwise
    pub fn expect_int(&self) -> Result<i32, &'static str> {
        self.as_int().ok_or_else(|| self.kind_name())
    }

    /// Expect a bound pointer, returns the name of the actual kind otherwise
    pub fn expect_pointer(&self) -> Result<Address, &'static str> {
        self.as_pointer().ok_or_else(|| self.kind_name())
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Pointer(_) => "pointer",
            Value::Null => "null pointer",
            Value::Uninitialized => "uninitialized value",
        }
    }
}

/// Marker shown wherever an uninitialized slot is printed. The C program this
/// cheat sheet is modeled on printed whatever garbage the slot held.
pub const GARBAGE_MARKER: &str = "<garbage>";

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Pointer(addr) => write!(f, "{}", addr),
            Value::Null => write!(f, "NULL"),
            Value::Uninitialized => write!(f, "{}", GARBAGE_MARKER),
        }
    }
}
