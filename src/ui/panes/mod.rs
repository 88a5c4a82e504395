//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`lessons`]: Lesson list with the current lesson highlighted and its commentary
//! - [`stack`]: Call stack visualization with bindings, kinds and addresses
//! - [`heap`]: Heap cells with their state (allocated or released)
//! - [`terminal`]: Lines printed so far
//! - [`status`]: Status bar with keybindings and execution state
//! - `utils`: Shared border and scrolling helpers
//!
//! Each pane module exports a primary `render_*` function that takes the frame,
//! its area, borrowed machine state, focus, and a scroll offset it may clamp.

mod utils;

pub mod heap;
pub mod lessons;
pub mod stack;
pub mod status;
pub mod terminal;

// Re-export render functions for convenience
pub use heap::render_heap_pane;
pub use lessons::render_lessons_pane;
pub use stack::render_stack_pane;
pub use status::render_status_bar;
pub use terminal::render_terminal_pane;
