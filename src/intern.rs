//! Session interners: agent names and label strings to solver integer ids.
//!
//! An [`Interner`] is total, deterministic and grow-only: the same string
//! always yields the same id for the lifetime of the interner, distinct
//! strings never share an id, and entries are never removed. The map is a
//! `DashMap`, so interning only needs `&self`.

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use z3::Context;
use z3::ast::Int;

/// Interned id of a graph node (one per agent name).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct NodeId(i64);

/// Interned id of a label string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct LabelId(i64);

/// An id that can be issued by an [`Interner`] and lifted into the solver.
pub trait InternId: Copy + Eq + fmt::Debug {
    fn from_raw(raw: i64) -> Self;
    fn raw(self) -> i64;

    /// The integer term standing for this id.
    fn term<'ctx>(self, ctx: &'ctx Context) -> Int<'ctx> {
        Int::from_i64(ctx, self.raw())
    }
}

impl InternId for NodeId {
    fn from_raw(raw: i64) -> Self {
        NodeId(raw)
    }
    fn raw(self) -> i64 {
        self.0
    }
}

impl InternId for LabelId {
    fn from_raw(raw: i64) -> Self {
        LabelId(raw)
    }
    fn raw(self) -> i64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node:{}", self.0)
    }
}

impl fmt::Display for LabelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "label:{}", self.0)
    }
}

/// Memoizing string → id mapping.
pub struct Interner<I> {
    to_id: DashMap<String, I>,
    next: AtomicI64,
}

/// Maps agent names to graph nodes.
pub type NodeInterner = Interner<NodeId>;

/// Maps label strings to label ids.
pub type StringInterner = Interner<LabelId>;

impl<I: InternId> Interner<I> {
    /// Create an empty interner issuing ids from 0.
    pub fn new() -> Self {
        Self {
            to_id: DashMap::new(),
            next: AtomicI64::new(0),
        }
    }

    /// Return the id for `s`, allocating one on first sight.
    pub fn intern(&self, s: &str) -> I {
        if let Some(id) = self.to_id.get(s) {
            return *id.value();
        }
        // The entry guard holds the shard lock, so two racing callers
        // cannot both allocate for the same string.
        *self
            .to_id
            .entry(s.to_string())
            .or_insert_with(|| I::from_raw(self.next.fetch_add(1, Ordering::Relaxed)))
    }

    /// Look up an id without allocating.
    pub fn lookup(&self, s: &str) -> Option<I> {
        self.to_id.get(s).map(|r| *r.value())
    }

    /// Number of interned strings.
    pub fn len(&self) -> usize {
        self.to_id.len()
    }

    /// Whether nothing has been interned yet.
    pub fn is_empty(&self) -> bool {
        self.to_id.is_empty()
    }
}

impl Interner<NodeId> {
    /// Node for an agent name, allocated on first use.
    pub fn get_node(&self, name: &str) -> NodeId {
        self.intern(name)
    }
}

impl Interner<LabelId> {
    /// Id for a label string, allocated on first use.
    pub fn get_int_or_add(&self, label: &str) -> LabelId {
        self.intern(label)
    }
}

impl<I: InternId> Default for Interner<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> fmt::Debug for Interner<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interner")
            .field("count", &self.to_id.len())
            .finish()
    }
}
