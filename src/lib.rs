//! # Introduction
//!
//! Pointer Cheat Sheet runs a fixed sequence of lessons about values,
//! addresses, pointers, references and heap cells. Each lesson executes on a
//! small virtual machine (a call stack and a heap of `int` cells) and prints
//! what it observed. A snapshot of the machine is taken after every
//! instruction, so the run can also be stepped through in a terminal UI built
//! with [ratatui](https://docs.rs/ratatui).
//!
//! ## Execution pipeline
//!
//! ```text
//! Lesson script → Interpreter → Snapshots → stdout transcript / TUI
//! ```
//!
//! 1. [`script`]: the lessons and helper functions, as data.
//! 2. [`interpreter`]: walks the script and captures [`snapshot::Snapshot`]s.
//! 3. [`memory`]: tagged [`memory::value::Value`]s with opaque addresses,
//!    stored in a virtual [`memory::stack::Stack`] and [`memory::heap::Heap`].
//! 4. [`snapshot`]: snapshot history with a memory limit and a
//!    [`snapshot::MockTerminal`] that records printed lines.
//! 5. [`ui`]: ratatui-based TUI; not part of the stable library API.
//! 6. [`cli`]: command-line options for the binary.
//!
//! ## Safety by construction
//!
//! Nothing here is undefined. Dereferencing an unbound pointer, a null pointer
//! or a released heap cell is a [`interpreter::errors::RuntimeError`], and heap
//! cells are released when the scope that allocated them closes.

pub mod cli;
pub mod interpreter;
pub mod memory;
pub mod script;
pub mod snapshot;
pub mod ui;
