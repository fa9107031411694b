use crate::language::types::CType;
use std::collections::HashMap;

/// Stack of name-to-type frames: one global frame for the program, one frame
/// per function or method body. Struct fields are not bindings; they live in
/// the registry and are reached through the receiver's type.
pub(crate) struct ScopeStack {
    frames: Vec<HashMap<String, CType>>,
}

impl ScopeStack {
    pub(crate) fn new() -> Self {
        Self {
            frames: vec![HashMap::new()],
        }
    }

    pub(crate) fn push(&mut self) {
        self.frames.push(HashMap::new());
    }

    pub(crate) fn pop(&mut self) {
        // The global frame stays.
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Binds a name in the innermost frame. Last writer wins within a frame.
    pub(crate) fn declare(&mut self, name: &str, ty: CType) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name.to_string(), ty);
        }
    }

    /// Innermost-first lookup across all frames.
    pub(crate) fn lookup(&self, name: &str) -> Option<&CType> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    /// Whether a declaration statement was already emitted for this name in
    /// the frame currently being lowered. Names bound only in outer frames
    /// get a fresh local declaration, the way an assignment binds a new local
    /// in the source language.
    pub(crate) fn declared_here(&self, name: &str) -> bool {
        self.frames
            .last()
            .map(|frame| frame.contains_key(name))
            .unwrap_or(false)
    }
}
