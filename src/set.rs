//! Primitive sets: ordered batches of primitives sharing a grouping key

use std::fmt;

use crate::class::PrimitiveClass;
use crate::geometry::Bounds;
use crate::primitive::{Primitive, PrimitiveGeometry, RenderRule};

/// Opaque grouping key, typically one per figure or per rule group.
///
/// Keys are plain handles handed out by a [`KeyAllocator`], so two keys are
/// the same group exactly when they compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BatchKey(u32);

impl BatchKey {
    pub const fn from_raw(raw: u32) -> Self {
        BatchKey(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for BatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "k{}", self.0)
    }
}

/// Hands out fresh, never repeating [`BatchKey`]s
#[derive(Debug, Default)]
pub struct KeyAllocator {
    next: u32,
}

impl KeyAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> BatchKey {
        let key = BatchKey(self.next);
        self.next += 1;
        key
    }

    /// Number of keys handed out so far
    pub fn allocated(&self) -> usize {
        self.next as usize
    }
}

/// An ordered batch of primitives accepted under one key.
///
/// A set made with a parent also accepts primitives keyed for the parent or
/// any of the parent's own ancestors, so a nested group can absorb drawing
/// that falls back to an enclosing scope. Anything else is rejected and the
/// caller opens a new set.
///
/// Primitives keep the order they were accepted in; that order is the paint
/// order.
#[derive(Debug, Clone)]
pub struct PrimitiveSet<K = BatchKey> {
    key: K,
    /// Enclosing keys, nearest first
    ancestors: Vec<K>,
    primitives: Vec<Primitive>,
    bounds: Bounds,
}

impl<K: PartialEq + Clone> PrimitiveSet<K> {
    /// Root-level set accepting only `key`
    pub fn new(key: K) -> Self {
        Self::with_ancestors(key, Vec::new())
    }

    /// Set nested under `parent`, accepting `key` and every key the parent
    /// answers to
    pub fn with_parent(key: K, parent: &PrimitiveSet<K>) -> Self {
        let mut ancestors = Vec::with_capacity(parent.ancestors.len() + 1);
        ancestors.push(parent.key.clone());
        ancestors.extend(parent.ancestors.iter().cloned());
        Self::with_ancestors(key, ancestors)
    }

    /// Set nested under an explicit chain of enclosing keys, nearest first
    pub fn with_ancestors(key: K, ancestors: Vec<K>) -> Self {
        PrimitiveSet {
            key,
            ancestors,
            primitives: Vec::new(),
            bounds: Bounds::EMPTY,
        }
    }

    /// Whether a primitive keyed `key` belongs in this set
    pub fn accepts(&self, key: &K) -> bool {
        self.key == *key || self.ancestors.iter().any(|a| a == key)
    }

    /// Append `primitive` if `key` matches this set or one of its ancestors.
    ///
    /// Returns `false` and leaves the set untouched otherwise.
    pub fn add(&mut self, primitive: Primitive, key: &K) -> bool {
        if !self.accepts(key) {
            return false;
        }
        self.bounds = self.bounds.union(primitive.paint_bounds());
        self.primitives.push(primitive);
        true
    }
}

impl<K> PrimitiveSet<K> {
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Key of the directly enclosing set, if any
    pub fn parent_key(&self) -> Option<&K> {
        self.ancestors.first()
    }

    pub fn ancestors(&self) -> &[K] {
        &self.ancestors
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Primitive> {
        self.primitives.iter()
    }

    /// Union of the painted extents of all accepted primitives
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn into_primitives(self) -> Vec<Primitive> {
        self.primitives
    }
}

impl PrimitiveSet<PrimitiveClass> {
    /// Class shared by every primitive of a class-keyed batch
    pub fn class(&self) -> &PrimitiveClass {
        &self.key
    }

    pub fn render_rule(&self) -> &RenderRule {
        self.key.render_rule()
    }
}

impl<'a, K> IntoIterator for &'a PrimitiveSet<K> {
    type Item = &'a Primitive;
    type IntoIter = std::slice::Iter<'a, Primitive>;

    fn into_iter(self) -> Self::IntoIter {
        self.primitives.iter()
    }
}
