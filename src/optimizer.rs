//! Render-primitive optimizer
//!
//! Groups primitives recorded in paint order into class-keyed batches so a
//! renderer can issue one draw call per batch. A primitive may move into an
//! earlier batch of its class only if nothing painted in between overlaps
//! it; painting the batches in order then gives the same picture as
//! painting the input in order.

use crate::class::{PrimitiveClass, classify};
use crate::log::{debug, trace};
use crate::overlap::OverlapIndex;
use crate::primitive::{Primitive, PrimitiveGeometry};
use crate::set::PrimitiveSet;

/// Tuning knobs for [`Optimizer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptimizerOptions {
    /// Let a primitive join an earlier batch of its class
    pub reorder: bool,
    /// Batches searched backwards before opening a new one
    pub max_lookback: usize,
}

impl Default for OptimizerOptions {
    fn default() -> Self {
        OptimizerOptions {
            reorder: true,
            max_lookback: 16,
        }
    }
}

impl OptimizerOptions {
    pub fn reorder(mut self, reorder: bool) -> Self {
        self.reorder = reorder;
        self
    }

    /// Clamped to at least one, the open batch itself
    pub fn max_lookback(mut self, batches: usize) -> Self {
        self.max_lookback = batches.max(1);
        self
    }
}

/// Counters describing one optimizer run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptimizerStats {
    pub primitives: usize,
    pub batches: usize,
    /// Primitives placed in a batch other than the most recent one
    pub reordered: usize,
}

#[derive(Debug)]
struct Batch {
    set: PrimitiveSet<PrimitiveClass>,
    index: OverlapIndex,
}

#[derive(Debug, Default)]
pub struct Optimizer {
    options: OptimizerOptions,
    batches: Vec<Batch>,
    stats: OptimizerStats,
}

impl Optimizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: OptimizerOptions) -> Self {
        Optimizer {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &OptimizerOptions {
        &self.options
    }

    /// Add the next primitive in paint order
    pub fn push(&mut self, primitive: Primitive) {
        let class = classify(&primitive);
        // Stroke overhang counts: a wide outline covers pixels past its vertices
        let bounds = primitive.paint_bounds();
        let lookback = if self.options.reorder {
            self.options.max_lookback.max(1)
        } else {
            1
        };

        let mut target = None;
        for (i, batch) in self.batches.iter().enumerate().rev().take(lookback) {
            if *batch.set.class() == class {
                target = Some(i);
                break;
            }
            // Moving below an overlapping batch would change what is on top
            if batch.index.overlaps(bounds) {
                break;
            }
        }

        self.stats.primitives += 1;
        match target {
            Some(i) => {
                if i + 1 != self.batches.len() {
                    trace!(%class, batch = i, "reordered into earlier batch");
                    self.stats.reordered += 1;
                }
                let batch = &mut self.batches[i];
                batch.index.insert(bounds);
                let accepted = batch.set.add(primitive, &class);
                debug_assert!(accepted, "a batch always accepts its own class");
            }
            None => {
                debug!(%class, batch = self.batches.len(), "opening batch");
                let mut batch = Batch {
                    set: PrimitiveSet::new(class),
                    index: OverlapIndex::new(),
                };
                batch.index.insert(bounds);
                let accepted = batch.set.add(primitive, &class);
                debug_assert!(accepted, "a fresh batch always accepts its own class");
                self.batches.push(batch);
            }
        }
    }

    /// Batches opened so far
    pub fn len(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    pub fn stats(&self) -> OptimizerStats {
        OptimizerStats {
            batches: self.batches.len(),
            ..self.stats
        }
    }

    /// Batches in paint order
    pub fn finish(self) -> Vec<PrimitiveSet<PrimitiveClass>> {
        debug!(
            primitives = self.stats.primitives,
            batches = self.batches.len(),
            reordered = self.stats.reordered,
            "optimized"
        );
        self.batches.into_iter().map(|b| b.set).collect()
    }
}

impl Extend<Primitive> for Optimizer {
    fn extend<I: IntoIterator<Item = Primitive>>(&mut self, iter: I) {
        for primitive in iter {
            self.push(primitive);
        }
    }
}

/// Batch `primitives` with default options
pub fn optimize(primitives: impl IntoIterator<Item = Primitive>) -> Vec<PrimitiveSet<PrimitiveClass>> {
    let mut optimizer = Optimizer::new();
    optimizer.extend(primitives);
    optimizer.finish()
}
