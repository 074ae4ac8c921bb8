//! Key-driven batch building
//!
//! Turns a stream of `(primitive, key)` pairs into an ordered list of
//! [`PrimitiveSet`]s. The builder keeps the set it is filling open until a
//! primitive arrives whose key that set rejects, then closes it and opens a
//! new one nested under the current scope stack.

use std::fmt;

use crate::errors::BatchError;
use crate::log::{debug, trace, warn};
use crate::primitive::Primitive;
use crate::set::{BatchKey, PrimitiveSet};

#[derive(Debug)]
pub struct BatchBuilder<K = BatchKey> {
    /// Enclosing scope keys, outermost first
    scopes: Vec<K>,
    open: Option<PrimitiveSet<K>>,
    closed: Vec<PrimitiveSet<K>>,
}

impl<K: PartialEq + Clone + fmt::Debug> Default for BatchBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: PartialEq + Clone + fmt::Debug> BatchBuilder<K> {
    pub fn new() -> Self {
        BatchBuilder {
            scopes: Vec::new(),
            open: None,
            closed: Vec::new(),
        }
    }

    /// Enter a nested scope (e.g. a child figure). Sets opened from now on
    /// also accept primitives keyed for `key` and every outer scope.
    pub fn push_scope(&mut self, key: K) {
        trace!(?key, depth = self.scopes.len() + 1, "push scope");
        self.scopes.push(key);
    }

    /// Leave the innermost scope and return its key
    pub fn pop_scope(&mut self) -> Result<K, BatchError> {
        match self.scopes.pop() {
            Some(key) => {
                trace!(?key, depth = self.scopes.len(), "pop scope");
                Ok(key)
            }
            None => {
                warn!("pop_scope without a matching push_scope");
                Err(BatchError::ScopeUnderflow)
            }
        }
    }

    /// Number of scopes currently entered
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Route `primitive` to a batch.
    ///
    /// Returns `true` if it joined the open batch and `false` if the open
    /// batch rejected `key` and a new one was started for it.
    pub fn add(&mut self, primitive: Primitive, key: K) -> bool {
        if let Some(open) = self.open.as_mut() {
            if open.accepts(&key) {
                open.add(primitive, &key);
                return true;
            }
        }
        self.close_open();
        let ancestors: Vec<K> = self.scopes.iter().rev().cloned().collect();
        debug!(?key, ?ancestors, "opening batch");
        let mut set = PrimitiveSet::with_ancestors(key.clone(), ancestors);
        let accepted = set.add(primitive, &key);
        debug_assert!(accepted, "a fresh set always accepts its own key");
        self.open = Some(set);
        false
    }

    /// Batches closed so far, not counting the open one
    pub fn closed(&self) -> &[PrimitiveSet<K>] {
        &self.closed
    }

    /// Close the open batch and return all batches in paint order
    pub fn finish(mut self) -> Vec<PrimitiveSet<K>> {
        self.close_open();
        if !self.scopes.is_empty() {
            warn!(depth = self.scopes.len(), "finished with scopes still open");
        }
        self.closed
    }

    fn close_open(&mut self) {
        if let Some(set) = self.open.take() {
            if !set.is_empty() {
                debug!(key = ?set.key(), len = set.len(), "closing batch");
                self.closed.push(set);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::{Color, LinePrimitive, LineStyle, PrimitiveGeometry, RenderRule};
    use glam::vec2;

    fn seg(x: f32) -> Primitive {
        LinePrimitive::new(
            vec2(x, 0.0),
            vec2(x, 1.0),
            RenderRule::outline(Color::BLACK, 1, LineStyle::Solid).unwrap(),
        )
        .unwrap()
        .into()
    }

    fn xs(set: &PrimitiveSet<&'static str>) -> Vec<f32> {
        set.iter().map(|p| p.vertices()[0].x).collect()
    }

    #[test]
    fn same_key_runs_share_a_batch() {
        let mut builder = BatchBuilder::new();
        assert!(!builder.add(seg(0.0), "a"));
        assert!(builder.add(seg(1.0), "a"));
        assert!(!builder.add(seg(2.0), "b"));
        assert!(!builder.add(seg(3.0), "a"));
        let sets = builder.finish();
        assert_eq!(sets.len(), 3);
        assert_eq!(xs(&sets[0]), vec![0.0, 1.0]);
        assert_eq!(sets[1].key(), &"b");
        assert_eq!(xs(&sets[2]), vec![3.0]);
    }

    #[test]
    fn nested_scope_absorbs_outer_key() {
        let mut builder = BatchBuilder::new();
        builder.push_scope("figure");
        builder.add(seg(0.0), "child");
        // falls back to the enclosing figure; the child batch takes it
        assert!(builder.add(seg(1.0), "figure"));
        assert_eq!(builder.pop_scope(), Ok("figure"));
        assert!(builder.add(seg(2.0), "figure"));
        let sets = builder.finish();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].ancestors(), &["figure"]);
        assert_eq!(xs(&sets[0]), vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn outer_batch_does_not_absorb_inner_key() {
        let mut builder = BatchBuilder::new();
        builder.add(seg(0.0), "figure");
        builder.push_scope("figure");
        assert!(!builder.add(seg(1.0), "child"));
        assert_eq!(builder.closed().len(), 1);
        let sets = builder.finish();
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[1].parent_key(), Some(&"figure"));
    }

    #[test]
    fn pop_without_push_fails() {
        let mut builder: BatchBuilder<&str> = BatchBuilder::new();
        assert_eq!(builder.pop_scope(), Err(BatchError::ScopeUnderflow));
        assert_eq!(builder.depth(), 0);
    }

    #[test]
    fn empty_builder_yields_nothing() {
        let builder: BatchBuilder = BatchBuilder::new();
        assert!(builder.finish().is_empty());
    }
}
