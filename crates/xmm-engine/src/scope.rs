//! Scope stack: a stack of frames, each holding two independent
//! name-to-value namespaces.
//!
//! Lookup scans from the innermost frame outward to the base; add writes
//! into the topmost frame, overwriting an existing binding there.

use std::fmt::Write;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use xmm_sdk::{Namespace, NativeError, Value};

#[derive(Debug, Default)]
struct Frame {
    values: FxHashMap<Arc<str>, Value>,
    defs: FxHashMap<Arc<str>, Value>,
}

impl Frame {
    fn map(&self, ns: Namespace) -> &FxHashMap<Arc<str>, Value> {
        match ns {
            Namespace::Values => &self.values,
            Namespace::Definitions => &self.defs,
        }
    }

    fn map_mut(&mut self, ns: Namespace) -> &mut FxHashMap<Arc<str>, Value> {
        match ns {
            Namespace::Values => &mut self.values,
            Namespace::Definitions => &mut self.defs,
        }
    }
}

/// The engine's core state. Always holds at least the base frame.
#[derive(Debug)]
pub(crate) struct ScopeStack {
    frames: Vec<Frame>,
}

impl ScopeStack {
    pub(crate) fn new() -> Self {
        Self {
            frames: vec![Frame::default()],
        }
    }

    pub(crate) fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Open a new nested scope.
    pub(crate) fn push(&mut self) {
        self.frames.push(Frame::default());
    }

    /// Close the most recently opened scope. The base frame cannot be
    /// closed.
    pub(crate) fn pop(&mut self) -> Result<(), NativeError> {
        if self.frames.len() == 1 {
            return Err(NativeError::ScopeUnderflow);
        }
        self.frames.pop();
        Ok(())
    }

    /// Insert a binding into the topmost frame of the given namespace.
    pub(crate) fn add(&mut self, ns: Namespace, name: Arc<str>, value: Value) {
        let top = self.frames.last_mut().expect("scope stack has a base frame");
        top.map_mut(ns).insert(name, value);
    }

    /// Search the given namespace from the innermost frame outward.
    pub(crate) fn lookup(&self, ns: Namespace, name: &str) -> Result<Value, NativeError> {
        for frame in self.frames.iter().rev() {
            if let Some(value) = frame.map(ns).get(name) {
                return Ok(value.clone());
            }
        }
        Err(NativeError::NameNotFound {
            namespace: ns,
            name: name.to_string(),
        })
    }

    /// Render the full scope state, innermost frame first, with sorted
    /// keys so two equal states produce identical snapshots.
    pub(crate) fn snapshot(&self) -> String {
        let mut out = String::new();
        for (i, frame) in self.frames.iter().enumerate().rev() {
            if !out.is_empty() {
                out.push('\n');
            }
            let _ = write!(out, "frame {}", i);
            if i == 0 {
                out.push_str(" (base)");
            }
            out.push_str(": ");
            render_map(&mut out, Namespace::Values.short(), frame.map(Namespace::Values));
            out.push(' ');
            render_map(
                &mut out,
                Namespace::Definitions.short(),
                frame.map(Namespace::Definitions),
            );
        }
        out
    }
}

fn render_map(out: &mut String, tag: &str, map: &FxHashMap<Arc<str>, Value>) {
    let mut names: Vec<&Arc<str>> = map.keys().collect();
    names.sort();
    out.push_str(tag);
    out.push_str("={");
    for (i, name) in names.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{}: {}", name, map[*name]);
    }
    out.push('}');
}
