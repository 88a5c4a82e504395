//! Lesson execution engine
//!
//! This module provides the core execution logic:
//! - [`engine`]: Interpreter that runs a script on the virtual stack and heap
//! - [`errors`]: Runtime error types
//! - [`constants`]: Address bases, lesson literals and resource limits
//!
//! # Execution Model
//!
//! The interpreter walks the lesson list once, in order. After each
//! instruction (including those inside helper functions and nested scopes) a
//! snapshot is taken, so the UI can step backward and forward through the run.
//!
//! # Aliasing
//!
//! Writes through a dereferenced pointer and writes to a reference binding go
//! through the same address-based store. Passing by pointer and passing by
//! reference differ only in how the call site names the argument.

pub mod constants;
pub mod engine;
pub mod errors;
