// Constants for the lesson machine

/// Starting address for heap allocations
/// Heap addresses start at 0x10000000 to clearly distinguish them from stack addresses
pub const HEAP_ADDRESS_START: u64 = 0x1000_0000;

/// Starting address for stack variable addresses
/// Stack addresses start at 0x00000004
pub const STACK_ADDRESS_START: u64 = 0x0000_0004;

/// Live heap cells allowed at once
pub const DEFAULT_MAX_HEAP_CELLS: usize = 1024;

/// Snapshot history budget (estimated bytes)
pub const DEFAULT_SNAPSHOT_LIMIT: usize = 64 * 1024 * 1024;

/// Value `number` and `x` start with
pub const INITIAL_VALUE: i32 = 3;

/// Factor applied after the increment in the mutate-in-place lesson
pub const MULTIPLIER: i32 = 2;

/// Value written through `numberPointer`
pub const WRITE_THROUGH_LITERAL: i32 = 4;

/// Value every helper function assigns
pub const CALLEE_LITERAL: i32 = 5;

/// Value stored in the heap cell
pub const HEAP_LITERAL: i32 = 3;
