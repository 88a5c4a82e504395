// Snapshot management for stepping through lessons

use crate::memory::{heap::Heap, stack::Stack, value::Address};
use crate::script::LessonId;

/// Whether a captured line is lesson output or narration around it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Output,
    Commentary,
}

/// A line of terminal output tagged with the lesson that printed it
#[derive(Debug, Clone)]
pub struct TerminalLine {
    pub text: String,
    pub lesson: Option<LessonId>,
    pub kind: LineKind,
}

/// Mock terminal capturing everything the lessons print
#[derive(Debug, Clone)]
pub struct MockTerminal {
    pub lines: Vec<TerminalLine>,
}

impl MockTerminal {
    pub fn new() -> Self {
        MockTerminal { lines: Vec::new() }
    }

    /// Print one line of lesson output
    pub fn println(&mut self, text: String, lesson: Option<LessonId>) {
        self.lines.push(TerminalLine {
            text,
            lesson,
            kind: LineKind::Output,
        });
    }

    /// Print one line of narration
    pub fn comment(&mut self, text: String, lesson: Option<LessonId>) {
        self.lines.push(TerminalLine {
            text,
            lesson,
            kind: LineKind::Commentary,
        });
    }

    /// Get all lines as a vector of strings
    pub fn get_output(&self) -> Vec<String> {
        self.lines.iter().map(|tl| tl.text.clone()).collect()
    }

    /// Lesson output only, narration dropped
    pub fn output_lines(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|tl| tl.kind == LineKind::Output)
            .map(|tl| tl.text.as_str())
            .collect()
    }
}

impl Default for MockTerminal {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of execution state
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub stack: Stack,
    pub heap: Heap,
    pub terminal: MockTerminal,
    pub lesson: Option<LessonId>,
    pub next_stack_address: Address,
}

impl Snapshot {
    /// Estimate the memory usage of this snapshot in bytes
    pub fn estimated_size(&self) -> usize {
        // Rough figures: a frame with a handful of locals, a cell, a short line
        let stack_size = self.stack.depth() * 100;
        let heap_size = self.heap.total_cells() * 16;
        let terminal_size = self.terminal.lines.len() * 50;

        stack_size + heap_size + terminal_size
    }
}

/// Snapshot history could not take another entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryFull {
    pub current: usize,
    pub limit: usize,
}

/// Manages execution history for stepping backward and forward
#[derive(Debug)]
pub struct SnapshotManager {
    snapshots: Vec<Snapshot>,
    max_memory: usize,
    current_memory: usize,
}

impl SnapshotManager {
    pub fn new(max_memory: usize) -> Self {
        SnapshotManager {
            snapshots: Vec::new(),
            max_memory,
            current_memory: 0,
        }
    }

    /// Add a snapshot to history
    pub fn push(&mut self, snapshot: Snapshot) -> Result<(), HistoryFull> {
        let snapshot_size = snapshot.estimated_size();

        if self.current_memory + snapshot_size > self.max_memory {
            return Err(HistoryFull {
                current: self.current_memory,
                limit: self.max_memory,
            });
        }

        self.current_memory += snapshot_size;
        self.snapshots.push(snapshot);
        Ok(())
    }

    /// Get a snapshot by index
    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    /// Index of the last snapshot taken while `lesson` was running
    pub fn last_index_of(&self, lesson: LessonId) -> Option<usize> {
        self.snapshots.iter().rposition(|s| s.lesson == Some(lesson))
    }

    /// Get the number of snapshots
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Get current memory usage
    pub fn memory_usage(&self) -> usize {
        self.current_memory
    }

    /// Get max memory limit
    pub fn memory_limit(&self) -> usize {
        self.max_memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::constants::STACK_ADDRESS_START;

    fn snapshot(lesson: Option<LessonId>, lines: usize) -> Snapshot {
        let mut terminal = MockTerminal::new();
        for i in 0..lines {
            terminal.println(format!("line {}", i), lesson);
        }
        Snapshot {
            stack: Stack::new(),
            heap: Heap::default(),
            terminal,
            lesson,
            next_stack_address: Address::new(STACK_ADDRESS_START),
        }
    }

    #[test]
    fn terminal_separates_output_from_commentary() {
        let mut terminal = MockTerminal::new();
        terminal.comment("// why".to_string(), Some(LessonId::ShowAddress));
        terminal.println("what".to_string(), Some(LessonId::ShowAddress));

        assert_eq!(terminal.get_output(), vec!["// why", "what"]);
        assert_eq!(terminal.output_lines(), vec!["what"]);
    }

    #[test]
    fn push_rejects_snapshots_over_the_limit() {
        let mut manager = SnapshotManager::new(120);
        assert!(manager.push(snapshot(None, 2)).is_ok());
        assert_eq!(manager.memory_usage(), 100);

        let err = manager.push(snapshot(None, 1)).unwrap_err();
        assert_eq!(
            err,
            HistoryFull {
                current: 100,
                limit: 120
            }
        );
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn last_index_of_finds_latest_lesson_snapshot() {
        let mut manager = SnapshotManager::new(usize::MAX);
        manager.push(snapshot(None, 0)).unwrap();
        manager.push(snapshot(Some(LessonId::DeclareAndPrint), 0)).unwrap();
        manager.push(snapshot(Some(LessonId::DeclareAndPrint), 1)).unwrap();
        manager.push(snapshot(Some(LessonId::MutateInPlace), 1)).unwrap();

        assert_eq!(manager.last_index_of(LessonId::DeclareAndPrint), Some(2));
        assert_eq!(manager.last_index_of(LessonId::HeapAllocate), None);
    }
}
