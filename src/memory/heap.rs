//! Heap implementation for the lesson machine
//!
//! This module provides heap memory management with:
//! - Explicit allocation/deallocation of single `int` cells
//! - Tombstone tracking for released cells (enables stepping backward and
//!   use-after-free detection)
//! - Double-free and invalid-free detection

use super::value::{Address, Value};
use super::{MemoryError, SLOT_SIZE};
use crate::interpreter::constants::HEAP_ADDRESS_START;
use rustc_hash::FxHashMap;

/// State of a heap cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Allocated,
    Tombstone, // Released but kept so stale pointers can be diagnosed
}

/// A single heap cell
#[derive(Debug, Clone)]
pub struct HeapCell {
    pub value: Value,
    pub state: CellState,
}

/// The heap
#[derive(Debug, Clone)]
pub struct Heap {
    cells: FxHashMap<Address, HeapCell>,
    next_address: Address,
    live_cells: usize,
    max_cells: usize,
}

impl Heap {
    /// Create a new heap holding at most `max_cells` live cells
    pub fn new(max_cells: usize) -> Self {
        Heap {
            cells: FxHashMap::default(),
            next_address: Address::new(HEAP_ADDRESS_START),
            live_cells: 0,
            max_cells,
        }
    }

    /// Allocate one uninitialized cell
    pub fn allocate(&mut self) -> Result<Address, MemoryError> {
        if self.live_cells >= self.max_cells {
            return Err(MemoryError::OutOfMemory {
                limit: self.max_cells,
            });
        }

        let addr = self.next_address;
        self.next_address = addr.following(SLOT_SIZE);
        self.cells.insert(
            addr,
            HeapCell {
                value: Value::Uninitialized,
                state: CellState::Allocated,
            },
        );
        self.live_cells += 1;

        Ok(addr)
    }

    /// Release a cell (mark as tombstone)
    pub fn free(&mut self, addr: Address) -> Result<(), MemoryError> {
        match self.cells.get_mut(&addr) {
            Some(cell) if cell.state == CellState::Allocated => {
                cell.state = CellState::Tombstone;
                self.live_cells -= 1;
                Ok(())
            }
            Some(_) => Err(MemoryError::DoubleFree(addr)),
            None => Err(MemoryError::InvalidFree(addr)),
        }
    }

    fn live_cell(&self, addr: Address) -> Result<&HeapCell, MemoryError> {
        match self.cells.get(&addr) {
            Some(cell) if cell.state == CellState::Allocated => Ok(cell),
            Some(_) => Err(MemoryError::UseAfterFree(addr)),
            None => Err(MemoryError::Dangling(addr)),
        }
    }

    /// Read the value stored in a live cell
    pub fn read(&self, addr: Address) -> Result<Value, MemoryError> {
        self.live_cell(addr).map(|cell| cell.value)
    }

    /// Overwrite the value stored in a live cell
    pub fn write(&mut self, addr: Address, value: Value) -> Result<(), MemoryError> {
        match self.cells.get_mut(&addr) {
            Some(cell) if cell.state == CellState::Allocated => {
                cell.value = value;
                Ok(())
            }
            Some(_) => Err(MemoryError::UseAfterFree(addr)),
            None => Err(MemoryError::Dangling(addr)),
        }
    }

    /// All cells sorted by address, tombstones included (for UI display)
    pub fn cells_sorted(&self) -> Vec<(Address, &HeapCell)> {
        let mut cells: Vec<_> = self.cells.iter().map(|(a, c)| (*a, c)).collect();
        cells.sort_by_key(|(addr, _)| *addr);
        cells
    }

    /// Number of cells ever allocated, released ones included
    pub fn total_cells(&self) -> usize {
        self.cells.len()
    }

    /// Number of cells not yet released
    pub fn live_count(&self) -> usize {
        self.live_cells
    }

    pub fn max_cells(&self) -> usize {
        self.max_cells
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new(crate::interpreter::constants::DEFAULT_MAX_HEAP_CELLS)
    }
}
