//! Primitive batching for rendering 2D diagram graphics in 3D.
//!
//! Drawing calls from a 2D graphics layer are recorded as immutable
//! [`Primitive`]s. Each primitive is classified by kind and [`RenderRule`]
//! into a [`PrimitiveClass`], and primitives are grouped into ordered
//! [`PrimitiveSet`] batches that a GPU backend can draw with one call each.
//!
//! Two ways to batch are provided:
//!
//! - [`BatchBuilder`] groups by caller-supplied keys (one per figure, say),
//!   with nested scopes falling back to their enclosing keys.
//! - [`Optimizer`] groups by class and moves primitives into earlier batches
//!   of their class when nothing painted in between overlaps them. Overlap is
//!   answered by an [`OverlapIndex`] built on the crate's [`AvlTree`].
//!
//! ```
//! use draw3d_optimizer::{Color, Primitive, RectanglePrimitive, RenderRule, optimize};
//! use glam::vec2;
//!
//! let red = RenderRule::solid(Color::rgb(255, 0, 0));
//! let a = RectanglePrimitive::new(vec2(0.0, 0.0), vec2(1.0, 1.0), red)?;
//! let b = RectanglePrimitive::new(vec2(4.0, 0.0), vec2(1.0, 1.0), red)?;
//!
//! let batches = optimize([Primitive::from(a), Primitive::from(b)]);
//! assert_eq!(batches.len(), 1);
//! assert_eq!(batches[0].len(), 2);
//! # Ok::<(), draw3d_optimizer::PrimitiveError>(())
//! ```

pub mod batch;
pub mod class;
pub mod errors;
pub mod geometry;
pub mod log;
pub mod optimizer;
pub mod overlap;
pub mod primitive;
pub mod set;
pub mod tree;

pub use batch::BatchBuilder;
pub use class::{PrimitiveClass, classify};
pub use errors::{BatchError, GeometryError, PrimitiveError, RuleError};
pub use geometry::Bounds;
pub use optimizer::{Optimizer, OptimizerOptions, OptimizerStats, optimize};
pub use overlap::{OverlapId, OverlapIndex};
pub use primitive::{
    Color, FontId, ImageId, ImagePrimitive, LinePrimitive, LineStyle, PolygonPrimitive,
    PolylinePrimitive, Primitive, PrimitiveGeometry, PrimitiveKind, QuadPrimitive,
    RectanglePrimitive, RenderRule, RuleKind, TextPrimitive,
};
pub use set::{BatchKey, KeyAllocator, PrimitiveSet};
pub use tree::{AvlTree, Comparator, NaturalOrder};
