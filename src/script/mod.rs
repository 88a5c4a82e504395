//! Lesson scripts
//!
//! A script is plain data: helper functions and a fixed list of lessons, each a
//! short sequence of [`ast::Instruction`]s. The interpreter walks it exactly
//! once, top to bottom.
//!
//! - [`ast`]: expressions, places, printed fragments and instructions
//! - [`lessons`]: the canonical lesson table and narration levels

pub mod ast;
pub mod lessons;

pub use lessons::{Lesson, LessonId, Narration, Script};
