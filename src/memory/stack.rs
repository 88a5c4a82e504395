//! Call stack implementation
//!
//! This module provides the call stack for lesson execution:
//! - [`Stack`]: The call stack containing frames
//! - [`StackFrame`]: A single function's activation record
//! - [`LocalVar`]: A named binding with its kind, address and storage
//! - [`Storage`]: Whether a binding owns a slot or aliases someone else's
//!
//! # References
//!
//! A reference binding has no slot of its own. Its address *is* the target's
//! address, and the interpreter resolves every read or write of it to the
//! target slot. That is what makes `int &x` observably the same as `int *x`
//! with an implicit dereference.
//!
//! # Heap ownership
//!
//! Each scope (and the frame's outermost level) records the heap cells
//! allocated inside it. Closing the scope hands those addresses back to the
//! caller, which releases them.

use super::value::{Address, Value};
use crate::script::ast::BindingKind;
use rustc_hash::FxHashMap;

/// Where a binding's value lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    /// The binding owns a slot at its address
    Slot(Value),
    /// The binding names a slot owned by another binding
    Alias,
}

/// Local variable on the stack
#[derive(Debug, Clone)]
pub struct LocalVar {
    pub kind: BindingKind,
    pub address: Address,
    pub storage: Storage,
}

impl LocalVar {
    pub fn slot(kind: BindingKind, address: Address, value: Value) -> Self {
        LocalVar {
            kind,
            address,
            storage: Storage::Slot(value),
        }
    }

    pub fn alias(target: Address) -> Self {
        LocalVar {
            kind: BindingKind::Reference,
            address: target,
            storage: Storage::Alias,
        }
    }

    pub fn is_alias(&self) -> bool {
        matches!(self.storage, Storage::Alias)
    }

    /// The owned value, None for aliases
    pub fn own_value(&self) -> Option<Value> {
        match self.storage {
            Storage::Slot(value) => Some(value),
            Storage::Alias => None,
        }
    }
}

/// Stack frame for a function call
#[derive(Debug, Clone)]
pub struct StackFrame {
    pub function_name: String,
    pub locals: FxHashMap<String, LocalVar>,
    pub insertion_order: Vec<String>, // Track order of variable declarations
    owned_cells: Vec<Address>,
    scope_stack: Vec<ScopeData>,
}

#[derive(Debug, Clone, Default)]
struct ScopeData {
    shadowed: Vec<(String, LocalVar)>,
    declared: Vec<String>,
    owned_cells: Vec<Address>,
}

impl StackFrame {
    pub fn new(function_name: String) -> Self {
        StackFrame {
            function_name,
            locals: FxHashMap::default(),
            insertion_order: Vec::new(),
            owned_cells: Vec::new(),
            scope_stack: Vec::new(),
        }
    }

    /// Enter a new scope
    pub fn push_scope(&mut self) {
        self.scope_stack.push(ScopeData::default());
    }

    /// Exit the current scope, returning the heap cells it owned
    pub fn pop_scope(&mut self) -> Vec<Address> {
        let Some(scope) = self.scope_stack.pop() else {
            return Vec::new();
        };

        // Remove variables declared in this scope
        for name in scope.declared {
            self.locals.remove(&name);
            if let Some(pos) = self.insertion_order.iter().rposition(|x| x == &name) {
                self.insertion_order.remove(pos);
            }
        }

        // Restore shadowed variables, latest first
        for (name, var) in scope.shadowed.into_iter().rev() {
            self.locals.insert(name, var);
        }

        scope.owned_cells
    }

    /// Number of nested scopes currently open
    pub fn scope_depth(&self) -> usize {
        self.scope_stack.len()
    }

    /// Declare a new binding in the innermost scope
    pub fn declare_var(&mut self, name: String, var: LocalVar) {
        if let Some(scope) = self.scope_stack.last_mut() {
            let owned_here = scope.declared.contains(&name)
                || scope.shadowed.iter().any(|(shadowed, _)| shadowed == &name);
            match self.locals.insert(name.clone(), var) {
                // Redeclared in the same scope: the earlier binding dies with it
                Some(_) if owned_here => {}
                Some(old_var) => scope.shadowed.push((name, old_var)),
                None => {
                    scope.declared.push(name.clone());
                    self.insertion_order.push(name);
                }
            }
        } else {
            if !self.locals.contains_key(&name) {
                self.insertion_order.push(name.clone());
            }
            self.locals.insert(name, var);
        }
    }

    /// Record a heap cell as owned by the innermost scope
    pub fn adopt_cell(&mut self, addr: Address) {
        match self.scope_stack.last_mut() {
            Some(scope) => scope.owned_cells.push(addr),
            None => self.owned_cells.push(addr),
        }
    }

    /// Close every open scope and return all heap cells the frame owned
    pub fn release_all(&mut self) -> Vec<Address> {
        let mut cells = Vec::new();
        while !self.scope_stack.is_empty() {
            cells.extend(self.pop_scope());
        }
        cells.append(&mut self.owned_cells);
        cells
    }

    /// Get a local variable
    pub fn get_var(&self, name: &str) -> Option<&LocalVar> {
        self.locals.get(name)
    }

    /// Visible bindings in declaration order (for UI display)
    pub fn ordered_locals(&self) -> impl Iterator<Item = (&str, &LocalVar)> {
        self.insertion_order
            .iter()
            .filter_map(|name| self.locals.get(name).map(|var| (name.as_str(), var)))
    }

    fn slot_mut(&mut self, addr: Address) -> Option<&mut LocalVar> {
        let visible = self.locals.values_mut();
        let shadowed = self
            .scope_stack
            .iter_mut()
            .flat_map(|scope| scope.shadowed.iter_mut().map(|(_, var)| var));
        visible
            .chain(shadowed)
            .find(|var| !var.is_alias() && var.address == addr)
    }
}

/// The call stack
#[derive(Debug, Clone)]
pub struct Stack {
    frames: Vec<StackFrame>,
}

impl Stack {
    pub fn new() -> Self {
        Stack { frames: Vec::new() }
    }

    /// Push a new stack frame
    pub fn push_frame(&mut self, function_name: String) {
        self.frames.push(StackFrame::new(function_name));
    }

    /// Pop the top stack frame
    pub fn pop_frame(&mut self) -> Option<StackFrame> {
        self.frames.pop()
    }

    /// Get the current (top) frame
    pub fn current_frame(&self) -> Option<&StackFrame> {
        self.frames.last()
    }

    /// Get a mutable reference to the current frame
    pub fn current_frame_mut(&mut self) -> Option<&mut StackFrame> {
        self.frames.last_mut()
    }

    /// Get all frames (for UI display)
    pub fn frames(&self) -> &[StackFrame] {
        &self.frames
    }

    /// Get the depth of the call stack
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Check if stack is empty
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Read the slot that owns `addr`, in any frame
    pub fn read_slot(&self, addr: Address) -> Option<Value> {
        self.frames.iter().find_map(|frame| {
            let visible = frame.locals.values();
            let shadowed = frame
                .scope_stack
                .iter()
                .flat_map(|scope| scope.shadowed.iter().map(|(_, var)| var));
            visible
                .chain(shadowed)
                .find(|var| !var.is_alias() && var.address == addr)
                .and_then(LocalVar::own_value)
        })
    }

    /// Overwrite the slot that owns `addr`, in any frame.
    /// Returns false when no live slot has that address.
    pub fn write_slot(&mut self, addr: Address, value: Value) -> bool {
        for frame in self.frames.iter_mut().rev() {
            if let Some(var) = frame.slot_mut(addr) {
                var.storage = Storage::Slot(value);
                return true;
            }
        }
        false
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(raw: u64) -> Address {
        Address::new(raw)
    }

    #[test]
    fn slots_are_found_by_address_across_frames() {
        let mut stack = Stack::new();
        stack.push_frame("main".to_string());
        stack.current_frame_mut().unwrap().declare_var(
            "number".to_string(),
            LocalVar::slot(BindingKind::Int, addr(4), Value::Int(3)),
        );
        stack.push_frame("callee".to_string());

        assert_eq!(stack.read_slot(addr(4)), Some(Value::Int(3)));
        assert!(stack.write_slot(addr(4), Value::Int(5)));
        assert_eq!(stack.read_slot(addr(4)), Some(Value::Int(5)));
        assert!(!stack.write_slot(addr(400), Value::Int(1)));
    }

    #[test]
    fn alias_has_no_slot_of_its_own() {
        let mut frame = StackFrame::new("f".to_string());
        frame.declare_var("x".to_string(), LocalVar::alias(addr(8)));
        let x = frame.get_var("x").unwrap();
        assert!(x.is_alias());
        assert_eq!(x.address, addr(8));
        assert_eq!(x.own_value(), None);
    }

    #[test]
    fn scope_exit_restores_shadowed_and_returns_owned_cells() {
        let mut frame = StackFrame::new("main".to_string());
        frame.declare_var(
            "a".to_string(),
            LocalVar::slot(BindingKind::Int, addr(4), Value::Int(1)),
        );

        frame.push_scope();
        frame.declare_var(
            "a".to_string(),
            LocalVar::slot(BindingKind::Pointer, addr(8), Value::Null),
        );
        frame.declare_var(
            "b".to_string(),
            LocalVar::slot(BindingKind::Int, addr(12), Value::Int(2)),
        );
        frame.adopt_cell(addr(0x1000_0000));
        assert_eq!(frame.scope_depth(), 1);

        let released = frame.pop_scope();
        assert_eq!(released, vec![addr(0x1000_0000)]);
        assert_eq!(frame.get_var("a").unwrap().address, addr(4));
        assert!(frame.get_var("b").is_none());
        let names: Vec<_> = frame.ordered_locals().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a"]);
    }

    #[test]
    fn redeclaring_in_one_scope_does_not_outlive_it() {
        let mut frame = StackFrame::new("main".to_string());
        frame.push_scope();
        frame.declare_var(
            "y".to_string(),
            LocalVar::slot(BindingKind::Int, addr(4), Value::Int(1)),
        );
        frame.declare_var(
            "y".to_string(),
            LocalVar::slot(BindingKind::Int, addr(8), Value::Int(2)),
        );
        assert_eq!(frame.get_var("y").unwrap().address, addr(8));

        frame.pop_scope();
        assert!(frame.get_var("y").is_none());
        assert_eq!(frame.ordered_locals().count(), 0);
    }

    #[test]
    fn redeclaring_a_shadowing_name_restores_the_outer_binding() {
        let mut frame = StackFrame::new("main".to_string());
        frame.declare_var(
            "y".to_string(),
            LocalVar::slot(BindingKind::Int, addr(4), Value::Int(1)),
        );
        frame.push_scope();
        frame.declare_var(
            "y".to_string(),
            LocalVar::slot(BindingKind::Int, addr(8), Value::Int(2)),
        );
        frame.declare_var(
            "y".to_string(),
            LocalVar::slot(BindingKind::Int, addr(12), Value::Int(3)),
        );

        frame.pop_scope();
        assert_eq!(frame.get_var("y").unwrap().address, addr(4));
        assert_eq!(frame.get_var("y").unwrap().own_value(), Some(Value::Int(1)));
    }

    #[test]
    fn release_all_collects_cells_from_every_level() {
        let mut frame = StackFrame::new("main".to_string());
        frame.adopt_cell(addr(0x1000_0000));
        frame.push_scope();
        frame.adopt_cell(addr(0x1000_0004));

        let mut released = frame.release_all();
        released.sort();
        assert_eq!(released, vec![addr(0x1000_0000), addr(0x1000_0004)]);
        assert_eq!(frame.scope_depth(), 0);
        assert!(frame.release_all().is_empty());
    }
}
