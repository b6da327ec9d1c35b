use std::collections::HashMap;

use super::ty::{TyArena, TyId};

/// Name to type bindings of one lexical scope.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    bindings: HashMap<String, TyId>,
}

impl Scope {
    pub fn new() -> Self {
        Scope::default()
    }

    /// Binds `name`, shadowing any previous binding in this scope. Returns
    /// whether a binding was replaced.
    pub fn bind(&mut self, name: impl Into<String>, ty: TyId) -> bool {
        self.bindings.insert(name.into(), ty).is_some()
    }

    pub fn get(&self, name: &str) -> Option<TyId> {
        self.bindings.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[derive(Debug, Clone)]
enum Frame {
    /// The builtin scope shared by every module
    Global,
    /// The scope of a module type, stored in the arena
    Module(TyId),
    /// A block scope owned by the stack
    Block(Scope),
}

/// The scopes visible at one point of a module, innermost last.
///
/// The global scope and the module scope are only referred to; they are
/// shared with every other context and outlive the stack. Block scopes are
/// owned and dropped when closed.
#[derive(Debug, Clone, Default)]
pub struct ScopeStack {
    frames: Vec<Frame>,
}

impl ScopeStack {
    /// An empty stack, as used outside of any module.
    pub fn new() -> Self {
        ScopeStack::default()
    }

    /// Global scope, then the scope of `module`, then one block scope for
    /// the top level statements of the module.
    pub fn for_module(module: TyId) -> Self {
        ScopeStack {
            frames: vec![
                Frame::Global,
                Frame::Module(module),
                Frame::Block(Scope::new()),
            ],
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn open(&mut self) {
        self.frames.push(Frame::Block(Scope::new()));
    }

    /// Drops the innermost block scope. Shared scopes are never popped.
    pub fn close(&mut self) -> Option<Scope> {
        match self.frames.last() {
            Some(Frame::Block(_)) => match self.frames.pop() {
                Some(Frame::Block(scope)) => Some(scope),
                _ => None,
            },
            _ => None,
        }
    }

    /// Binds `name` in the innermost block scope. Returns `None` if no
    /// block scope is open.
    pub fn bind(&mut self, name: impl Into<String>, ty: TyId) -> Option<bool> {
        match self.frames.last_mut() {
            Some(Frame::Block(scope)) => Some(scope.bind(name, ty)),
            _ => None,
        }
    }

    /// The module whose scope this stack sees, if any.
    pub fn module(&self) -> Option<TyId> {
        self.frames.iter().find_map(|frame| match frame {
            Frame::Module(id) => Some(*id),
            _ => None,
        })
    }

    /// Looks `name` up from the innermost scope outwards.
    pub fn lookup(&self, name: &str, globals: &Scope, types: &TyArena) -> Option<TyId> {
        self.frames.iter().rev().find_map(|frame| match frame {
            Frame::Block(scope) => scope.get(name),
            Frame::Module(id) => types.as_module(*id)?.scope.get(name),
            Frame::Global => globals.get(name),
        })
    }
}
