//! Runtime error types for the lesson machine
//!
//! This module defines [`RuntimeError`], which represents all errors that can occur
//! while executing a script. None of them are reachable from the canonical
//! lessons; they exist so that every unsafe operation of the C++ original
//! (dereferencing garbage, touching freed memory) is a reported failure instead
//! of undefined behavior.
//!
//! All runtime errors are fatal - they halt execution and are reported by the binary.

use crate::memory::value::Address;
use crate::memory::MemoryError;
use crate::script::LessonId;
use thiserror::Error;

/// Runtime errors that can occur during execution
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// Reference to a name with no binding in the current frame
    #[error("undefined variable '{name}'{}", in_lesson(.lesson))]
    UndefinedVariable {
        name: String,
        lesson: Option<LessonId>,
    },

    /// Call to a function the script does not define
    #[error("undefined function '{name}'{}", in_lesson(.lesson))]
    UndefinedFunction {
        name: String,
        lesson: Option<LessonId>,
    },

    /// Dereference of a pointer that was declared but never assigned
    #[error("pointer '{name}' was never bound and cannot be dereferenced{}", in_lesson(.lesson))]
    UnboundPointer {
        name: String,
        lesson: Option<LessonId>,
    },

    /// Null pointer dereference
    #[error("null pointer dereference through '{name}'{}", in_lesson(.lesson))]
    NullDereference {
        name: String,
        lesson: Option<LessonId>,
    },

    /// Pointer to a stack slot whose binding has gone out of scope
    #[error("dangling pointer: no live storage at {address}{}", in_lesson(.lesson))]
    DanglingPointer {
        address: Address,
        lesson: Option<LessonId>,
    },

    /// Use-after-free (accessing a released heap cell)
    #[error("use after free: {address} has been released{}", in_lesson(.lesson))]
    UseAfterFree {
        address: Address,
        lesson: Option<LessonId>,
    },

    /// Double free
    #[error("double free of {address}{}", in_lesson(.lesson))]
    DoubleFree {
        address: Address,
        lesson: Option<LessonId>,
    },

    /// Invalid free (releasing memory that was never allocated)
    #[error("invalid free of {address}{}", in_lesson(.lesson))]
    InvalidFree {
        address: Address,
        lesson: Option<LessonId>,
    },

    /// Out of heap cells
    #[error("out of memory: heap is limited to {limit} cells{}", in_lesson(.lesson))]
    OutOfMemory {
        limit: usize,
        lesson: Option<LessonId>,
    },

    /// Type error
    #[error("type error: expected {expected}, got {got}{}", in_lesson(.lesson))]
    TypeError {
        expected: &'static str,
        got: &'static str,
        lesson: Option<LessonId>,
    },

    /// Integer overflow in arithmetic operation
    #[error("integer overflow in {operation}{}", in_lesson(.lesson))]
    IntegerOverflow {
        operation: &'static str,
        lesson: Option<LessonId>,
    },

    /// Two expressions expected to name the same storage did not
    #[error("expected {lhs} and {rhs} to be the same address{}", in_lesson(.lesson))]
    AliasMismatch {
        lhs: Address,
        rhs: Address,
        lesson: Option<LessonId>,
    },

    /// No stack frame available
    #[error("no stack frame available{}", in_lesson(.lesson))]
    NoStackFrame { lesson: Option<LessonId> },

    /// Snapshot history limit exceeded
    #[error("snapshot memory limit exceeded: {current} bytes used, limit is {limit}")]
    SnapshotLimitExceeded { current: usize, limit: usize },

    /// Stepping past either end of the history
    #[error("{0}")]
    HistoryBoundary(&'static str),
}

fn in_lesson(lesson: &Option<LessonId>) -> String {
    match lesson {
        Some(id) => format!(" in {}", id),
        None => String::new(),
    }
}

impl RuntimeError {
    /// Lift a stack/heap error, attaching the lesson it happened in
    pub fn from_memory(err: MemoryError, lesson: Option<LessonId>) -> Self {
        match err {
            MemoryError::OutOfMemory { limit } => RuntimeError::OutOfMemory { limit, lesson },
            MemoryError::DoubleFree(address) => RuntimeError::DoubleFree { address, lesson },
            MemoryError::InvalidFree(address) => RuntimeError::InvalidFree { address, lesson },
            MemoryError::UseAfterFree(address) => RuntimeError::UseAfterFree { address, lesson },
            MemoryError::Dangling(address) => RuntimeError::DanglingPointer { address, lesson },
        }
    }

    /// The lesson that was running when the error occurred
    pub fn lesson(&self) -> Option<LessonId> {
        match self {
            RuntimeError::UndefinedVariable { lesson, .. }
            | RuntimeError::UndefinedFunction { lesson, .. }
            | RuntimeError::UnboundPointer { lesson, .. }
            | RuntimeError::NullDereference { lesson, .. }
            | RuntimeError::DanglingPointer { lesson, .. }
            | RuntimeError::UseAfterFree { lesson, .. }
            | RuntimeError::DoubleFree { lesson, .. }
            | RuntimeError::InvalidFree { lesson, .. }
            | RuntimeError::OutOfMemory { lesson, .. }
            | RuntimeError::TypeError { lesson, .. }
            | RuntimeError::IntegerOverflow { lesson, .. }
            | RuntimeError::AliasMismatch { lesson, .. }
            | RuntimeError::NoStackFrame { lesson } => *lesson,
            RuntimeError::SnapshotLimitExceeded { .. } | RuntimeError::HistoryBoundary(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_lesson() {
        let err = RuntimeError::UnboundPointer {
            name: "p".to_string(),
            lesson: Some(LessonId::DerefRead),
        };
        assert_eq!(
            err.to_string(),
            "pointer 'p' was never bound and cannot be dereferenced in lesson 6"
        );

        let err = RuntimeError::NoStackFrame { lesson: None };
        assert_eq!(err.to_string(), "no stack frame available");
    }

    #[test]
    fn memory_errors_keep_their_address() {
        let addr = Address::new(0x1000_0000);
        let err = RuntimeError::from_memory(
            MemoryError::UseAfterFree(addr),
            Some(LessonId::HeapAllocate),
        );
        assert_eq!(
            err,
            RuntimeError::UseAfterFree {
                address: addr,
                lesson: Some(LessonId::HeapAllocate)
            }
        );
        assert_eq!(err.lesson(), Some(LessonId::HeapAllocate));
    }
}
