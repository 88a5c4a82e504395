// Execution engine for lesson scripts

use crate::interpreter::constants::STACK_ADDRESS_START;
use crate::interpreter::errors::RuntimeError;
use crate::memory::{
    heap::Heap,
    stack::{LocalVar, Stack, Storage},
    value::{Address, Value},
    SLOT_SIZE,
};
use crate::script::ast::{BindingKind, Expr, Fragment, FunctionDef, Instruction, Place};
use crate::script::{Lesson, LessonId, Narration, Script};
use crate::snapshot::{MockTerminal, Snapshot, SnapshotManager};
use tracing::{debug, info};

/// Runs a [`Script`] on the virtual stack and heap
pub struct Interpreter {
    /// Lessons and helper functions
    script: Script,

    /// Whether titles and commentary are printed alongside the output
    narration: Narration,

    /// Call stack
    stack: Stack,

    /// Heap cells
    heap: Heap,

    /// Mock terminal for printed lines
    terminal: MockTerminal,

    /// Lesson currently executing (None before the first and after the last)
    current_lesson: Option<LessonId>,

    /// Snapshot manager for stepping backward and forward
    snapshot_manager: SnapshotManager,

    /// Current position in execution history
    history_position: usize,

    /// Next available stack address
    next_stack_address: Address,

    /// Whether execution has finished
    finished: bool,
}

impl Interpreter {
    /// Create a new interpreter for the given script
    pub fn new(script: Script, narration: Narration, snapshot_memory_limit: usize) -> Self {
        Interpreter {
            script,
            narration,
            stack: Stack::new(),
            heap: Heap::default(),
            terminal: MockTerminal::new(),
            current_lesson: None,
            snapshot_manager: SnapshotManager::new(snapshot_memory_limit),
            history_position: 0,
            next_stack_address: Address::new(STACK_ADDRESS_START),
            finished: false,
        }
    }

    /// Run every lesson from start to finish
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        // Initial snapshot: empty machine
        self.take_snapshot()?;

        self.stack.push_frame("main".to_string());
        self.take_snapshot()?;

        let lessons = self.script.lessons.clone();
        for lesson in &lessons {
            self.run_lesson(lesson)?;
        }

        self.current_lesson = None;
        if let Some(mut frame) = self.stack.pop_frame() {
            self.release_cells(frame.release_all())?;
        }
        self.take_snapshot()?;

        self.finished = true;
        Ok(())
    }

    fn run_lesson(&mut self, lesson: &Lesson) -> Result<(), RuntimeError> {
        self.current_lesson = Some(lesson.id);
        info!(lesson = lesson.id.number(), title = lesson.title, "running lesson");

        if self.narration == Narration::Explained {
            self.terminal.comment(
                format!("// {}. {}", lesson.id.number(), lesson.title),
                self.current_lesson,
            );
            for line in lesson.commentary {
                self.terminal
                    .comment(format!("//    {}", line), self.current_lesson);
            }
        }

        self.execute_block(&lesson.body)
    }

    /// Execute instructions in order, snapshotting after each one
    fn execute_block(&mut self, body: &[Instruction]) -> Result<(), RuntimeError> {
        for instruction in body {
            self.execute_instruction(instruction)?;
            self.take_snapshot()?;
        }
        Ok(())
    }

    fn execute_instruction(&mut self, instruction: &Instruction) -> Result<(), RuntimeError> {
        debug!(lesson = ?self.current_lesson, ?instruction, "executing");

        match instruction {
            Instruction::Declare { name, kind, init } => {
                let var = self.make_binding(*kind, init.as_ref())?;
                self.frame_mut()?.declare_var(name.clone(), var);
                Ok(())
            }

            Instruction::Assign { place, value } => {
                let value = self.evaluate_expr(value)?;
                self.store(place, value)
            }

            Instruction::Increment(name) => {
                let current = self.read_var(name)?;
                let n = self.expect_int(current)?;
                let incremented = n.checked_add(1).ok_or(RuntimeError::IntegerOverflow {
                    operation: "increment",
                    lesson: self.current_lesson,
                })?;
                self.store(&Place::Var(name.clone()), Value::Int(incremented))
            }

            Instruction::Print(fragments) => {
                let line = self.format_line(fragments)?;
                self.terminal.println(line, self.current_lesson);
                Ok(())
            }

            Instruction::Call { function, arg } => self.call_function(function, arg),

            Instruction::Scope(body) => {
                self.frame_mut()?.push_scope();
                self.execute_block(body)?;
                let owned = self.frame_mut()?.pop_scope();
                self.release_cells(owned)
            }

            Instruction::AssertSameAddress { lhs, rhs } => {
                let lhs = self.evaluate_pointer(lhs)?;
                let rhs = self.evaluate_pointer(rhs)?;
                if lhs == rhs {
                    Ok(())
                } else {
                    Err(RuntimeError::AliasMismatch {
                        lhs,
                        rhs,
                        lesson: self.current_lesson,
                    })
                }
            }
        }
    }

    /// Build a binding for `kind`, evaluating `init` in the current frame.
    ///
    /// Int and pointer bindings get a fresh slot. A reference binding gets no
    /// slot: it takes the address of the named binding it aliases.
    fn make_binding(
        &mut self,
        kind: BindingKind,
        init: Option<&Expr>,
    ) -> Result<LocalVar, RuntimeError> {
        if kind == BindingKind::Reference {
            let target = match init {
                Some(Expr::Var(target)) => target,
                _ => {
                    return Err(RuntimeError::TypeError {
                        expected: "named int binding",
                        got: "expression",
                        lesson: self.current_lesson,
                    })
                }
            };
            let target_var = self.lookup(target)?;
            if target_var.kind == BindingKind::Pointer {
                return Err(RuntimeError::TypeError {
                    expected: "int",
                    got: "pointer",
                    lesson: self.current_lesson,
                });
            }
            return Ok(LocalVar::alias(target_var.address));
        }

        let value = match init {
            Some(expr) => self.evaluate_expr(expr)?,
            None => Value::Uninitialized,
        };
        self.check_kind(kind, value)?;

        let address = self.next_stack_address;
        self.next_stack_address = address.following(SLOT_SIZE);
        Ok(LocalVar::slot(kind, address, value))
    }

    /// Call a helper function with a single argument.
    ///
    /// By-value and by-pointer parameters are fresh slots holding the evaluated
    /// argument. A by-reference parameter is an alias, so writes to it take the
    /// same path as writes through a pointer.
    fn call_function(&mut self, name: &str, arg: &Expr) -> Result<(), RuntimeError> {
        let func: FunctionDef = self.script.function(name).cloned().ok_or_else(|| {
            RuntimeError::UndefinedFunction {
                name: name.to_string(),
                lesson: self.current_lesson,
            }
        })?;

        // Arguments are evaluated in the caller's frame
        let param = self.make_binding(func.param.kind, Some(arg))?;

        self.stack.push_frame(func.name.clone());
        self.frame_mut()?.declare_var(func.param.name.clone(), param);
        // Snapshot at function entry
        self.take_snapshot()?;

        self.execute_block(&func.body)?;

        if let Some(mut frame) = self.stack.pop_frame() {
            self.release_cells(frame.release_all())?;
        }
        Ok(())
    }

    fn evaluate_expr(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Int(n) => Ok(Value::Int(*n)),

            Expr::Null => Ok(Value::Null),

            Expr::Var(name) => self.read_var(name),

            Expr::AddressOf(name) => Ok(Value::Pointer(self.lookup(name)?.address)),

            Expr::Deref(name) => {
                let target = self.pointee(name)?;
                self.read_at(target)
            }

            Expr::Add(lhs, rhs) => {
                let (a, b) = self.evaluate_int_pair(lhs, rhs)?;
                a.checked_add(b)
                    .map(Value::Int)
                    .ok_or(RuntimeError::IntegerOverflow {
                        operation: "addition",
                        lesson: self.current_lesson,
                    })
            }

            Expr::Mul(lhs, rhs) => {
                let (a, b) = self.evaluate_int_pair(lhs, rhs)?;
                a.checked_mul(b)
                    .map(Value::Int)
                    .ok_or(RuntimeError::IntegerOverflow {
                        operation: "multiplication",
                        lesson: self.current_lesson,
                    })
            }

            Expr::New => {
                let lesson = self.current_lesson;
                let addr = self
                    .heap
                    .allocate()
                    .map_err(|e| RuntimeError::from_memory(e, lesson))?;
                self.frame_mut()?.adopt_cell(addr);
                debug!(%addr, "allocated heap cell");
                Ok(Value::Pointer(addr))
            }
        }
    }

    fn evaluate_int_pair(&mut self, lhs: &Expr, rhs: &Expr) -> Result<(i32, i32), RuntimeError> {
        // Left operand first
        let a = self.evaluate_expr(lhs)?;
        let a = self.expect_int(a)?;
        let b = self.evaluate_expr(rhs)?;
        let b = self.expect_int(b)?;
        Ok((a, b))
    }

    fn evaluate_pointer(&mut self, expr: &Expr) -> Result<Address, RuntimeError> {
        let value = self.evaluate_expr(expr)?;
        value
            .expect_pointer()
            .map_err(|got| RuntimeError::TypeError {
                expected: "pointer",
                got,
                lesson: self.current_lesson,
            })
    }

    fn format_line(&mut self, fragments: &[Fragment]) -> Result<String, RuntimeError> {
        let mut line = String::new();
        for fragment in fragments {
            match fragment {
                Fragment::Text(text) => line.push_str(text),
                Fragment::Value(expr) => {
                    let value = self.evaluate_expr(expr)?;
                    line.push_str(&value.to_string());
                }
            }
        }
        Ok(line)
    }

    /// Write `value` to an assignment target
    fn store(&mut self, place: &Place, value: Value) -> Result<(), RuntimeError> {
        let target = match place {
            Place::Var(name) => {
                let var = self.lookup(name)?;
                let kind = var.kind;
                let address = var.address;
                self.check_kind(kind, value)?;
                address
            }
            Place::Deref(name) => {
                let target = self.pointee(name)?;
                self.check_kind(BindingKind::Int, value)?;
                target
            }
        };
        self.write_at(target, value)
    }

    /// Resolve the address a pointer binding currently points at
    fn pointee(&self, name: &str) -> Result<Address, RuntimeError> {
        match self.read_var(name)? {
            Value::Pointer(addr) => Ok(addr),
            Value::Uninitialized => Err(RuntimeError::UnboundPointer {
                name: name.to_string(),
                lesson: self.current_lesson,
            }),
            Value::Null => Err(RuntimeError::NullDereference {
                name: name.to_string(),
                lesson: self.current_lesson,
            }),
            Value::Int(_) => Err(RuntimeError::TypeError {
                expected: "pointer",
                got: "int",
                lesson: self.current_lesson,
            }),
        }
    }

    /// Read a binding of the current frame, following references to their target
    fn read_var(&self, name: &str) -> Result<Value, RuntimeError> {
        let var = self.lookup(name)?;
        match var.storage {
            Storage::Slot(value) => Ok(value),
            Storage::Alias => self.read_at(var.address),
        }
    }

    fn read_at(&self, addr: Address) -> Result<Value, RuntimeError> {
        if addr.is_heap() {
            self.heap
                .read(addr)
                .map_err(|e| RuntimeError::from_memory(e, self.current_lesson))
        } else {
            self.stack
                .read_slot(addr)
                .ok_or(RuntimeError::DanglingPointer {
                    address: addr,
                    lesson: self.current_lesson,
                })
        }
    }

    /// The one write path for variables, dereferenced pointers and references
    fn write_at(&mut self, addr: Address, value: Value) -> Result<(), RuntimeError> {
        if addr.is_heap() {
            let lesson = self.current_lesson;
            self.heap
                .write(addr, value)
                .map_err(|e| RuntimeError::from_memory(e, lesson))
        } else if self.stack.write_slot(addr, value) {
            Ok(())
        } else {
            Err(RuntimeError::DanglingPointer {
                address: addr,
                lesson: self.current_lesson,
            })
        }
    }

    fn lookup(&self, name: &str) -> Result<&LocalVar, RuntimeError> {
        let frame = self
            .stack
            .current_frame()
            .ok_or(RuntimeError::NoStackFrame {
                lesson: self.current_lesson,
            })?;
        frame
            .get_var(name)
            .ok_or_else(|| RuntimeError::UndefinedVariable {
                name: name.to_string(),
                lesson: self.current_lesson,
            })
    }

    fn frame_mut(&mut self) -> Result<&mut crate::memory::stack::StackFrame, RuntimeError> {
        let lesson = self.current_lesson;
        self.stack
            .current_frame_mut()
            .ok_or(RuntimeError::NoStackFrame { lesson })
    }

    fn expect_int(&self, value: Value) -> Result<i32, RuntimeError> {
        value.expect_int().map_err(|got| RuntimeError::TypeError {
            expected: "int",
            got,
            lesson: self.current_lesson,
        })
    }

    fn check_kind(&self, kind: BindingKind, value: Value) -> Result<(), RuntimeError> {
        let ok = match kind {
            BindingKind::Int | BindingKind::Reference => {
                matches!(value, Value::Int(_) | Value::Uninitialized)
            }
            BindingKind::Pointer => {
                matches!(value, Value::Pointer(_) | Value::Null | Value::Uninitialized)
            }
        };
        if ok {
            Ok(())
        } else {
            Err(RuntimeError::TypeError {
                expected: match kind {
                    BindingKind::Pointer => "pointer",
                    _ => "int",
                },
                got: value.kind_name(),
                lesson: self.current_lesson,
            })
        }
    }

    /// Release heap cells whose owning scope has closed
    fn release_cells(&mut self, cells: Vec<Address>) -> Result<(), RuntimeError> {
        for addr in cells {
            self.heap
                .free(addr)
                .map_err(|e| RuntimeError::from_memory(e, self.current_lesson))?;
            debug!(%addr, "released heap cell at scope exit");
        }
        Ok(())
    }

    // ========== Snapshots ==========

    fn take_snapshot(&mut self) -> Result<(), RuntimeError> {
        let snapshot = Snapshot {
            stack: self.stack.clone(),
            heap: self.heap.clone(),
            terminal: self.terminal.clone(),
            lesson: self.current_lesson,
            next_stack_address: self.next_stack_address,
        };

        self.snapshot_manager
            .push(snapshot)
            .map_err(|full| RuntimeError::SnapshotLimitExceeded {
                current: full.current,
                limit: full.limit,
            })?;

        self.history_position = self.snapshot_manager.len() - 1;
        Ok(())
    }

    /// Restore execution state from a snapshot
    fn restore_snapshot(&mut self, index: usize) -> Result<(), RuntimeError> {
        let snapshot = self
            .snapshot_manager
            .get(index)
            .ok_or(RuntimeError::HistoryBoundary("no snapshot at that position"))?
            .clone();
        self.stack = snapshot.stack;
        self.heap = snapshot.heap;
        self.terminal = snapshot.terminal;
        self.current_lesson = snapshot.lesson;
        self.next_stack_address = snapshot.next_stack_address;
        self.history_position = index;
        Ok(())
    }

    /// Step backward in execution (restore previous snapshot)
    pub fn step_backward(&mut self) -> Result<(), RuntimeError> {
        if self.history_position == 0 {
            return Err(RuntimeError::HistoryBoundary("already at the start"));
        }
        self.restore_snapshot(self.history_position - 1)
    }

    /// Step forward in execution (replay the next snapshot)
    pub fn step_forward(&mut self) -> Result<(), RuntimeError> {
        if self.history_position + 1 >= self.snapshot_manager.len() {
            return Err(RuntimeError::HistoryBoundary(
                "no more snapshots available (execution finished)",
            ));
        }
        self.restore_snapshot(self.history_position + 1)
    }

    /// Rewind to the beginning of execution
    pub fn rewind_to_start(&mut self) -> Result<(), RuntimeError> {
        self.restore_snapshot(0)
    }

    /// Jump to the last recorded snapshot
    pub fn jump_to_end(&mut self) -> Result<(), RuntimeError> {
        let last = self
            .snapshot_manager
            .len()
            .checked_sub(1)
            .ok_or(RuntimeError::HistoryBoundary("history is empty"))?;
        self.restore_snapshot(last)
    }

    /// Jump to the state right after `lesson` finished
    pub fn seek_lesson_end(&mut self, lesson: LessonId) -> Result<(), RuntimeError> {
        let index = self
            .snapshot_manager
            .last_index_of(lesson)
            .ok_or(RuntimeError::HistoryBoundary("lesson has not run"))?;
        self.restore_snapshot(index)
    }

    // ========== Getter methods for UI ==========

    pub fn script(&self) -> &Script {
        &self.script
    }

    /// Get a reference to the stack
    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    /// Get a reference to the heap
    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    /// Get a reference to the terminal output
    pub fn terminal(&self) -> &MockTerminal {
        &self.terminal
    }

    /// Lesson the current state belongs to
    pub fn current_lesson(&self) -> Option<LessonId> {
        self.current_lesson
    }

    /// Get the current history position
    pub fn history_position(&self) -> usize {
        self.history_position
    }

    /// Get the total number of snapshots
    pub fn total_snapshots(&self) -> usize {
        self.snapshot_manager.len()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Every line printed so far, narration included
    pub fn lines(&self) -> Vec<String> {
        self.terminal.get_output()
    }

    /// Integer held by (or aliased by) a binding in the current frame
    pub fn int_value(&self, name: &str) -> Option<i32> {
        self.read_var(name).ok().and_then(|v| v.as_int())
    }

    /// Value held by a binding in the current frame, references followed
    pub fn value_of(&self, name: &str) -> Option<Value> {
        self.read_var(name).ok()
    }

    /// Address of a binding in the current frame
    pub fn address_of(&self, name: &str) -> Option<Address> {
        self.lookup(name).ok().map(|var| var.address)
    }
}
