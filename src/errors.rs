//! Error types with diagnostic codes using miette
//!
//! Only construction of primitives and scope bookkeeping can fail. A batch
//! rejecting a primitive is a `false` from `add`, not an error.

use miette::Diagnostic;
use thiserror::Error;

use crate::primitive::{PrimitiveKind, RuleKind};

// ============================================================================
// Primitive Errors
// ============================================================================

/// Invalid vertex data handed to a primitive constructor
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("vertex {index} of {kind} is not finite")]
    #[diagnostic(code(draw3d::primitive::non_finite))]
    NonFinite { kind: PrimitiveKind, index: usize },

    #[error("{kind} needs at least {min} vertices, got {got}")]
    #[diagnostic(code(draw3d::primitive::too_few_vertices))]
    TooFewVertices {
        kind: PrimitiveKind,
        min: usize,
        got: usize,
    },

    #[error("{kind} needs exactly {expected} vertices, got {got}")]
    #[diagnostic(code(draw3d::primitive::vertex_count))]
    VertexCount {
        kind: PrimitiveKind,
        expected: usize,
        got: usize,
    },

    #[error("{kind} has a non-positive extent {width}x{height}")]
    #[diagnostic(
        code(draw3d::primitive::empty_extent),
        help("width and height must both be greater than zero")
    )]
    EmptyExtent {
        kind: PrimitiveKind,
        width: f32,
        height: f32,
    },
}

/// A render rule that cannot paint the primitive it is attached to
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum RuleError {
    #[error("{rule} rule cannot paint a {kind}")]
    #[diagnostic(code(draw3d::primitive::incompatible_rule))]
    Incompatible { kind: PrimitiveKind, rule: RuleKind },

    #[error("outline width must be at least 1")]
    #[diagnostic(code(draw3d::primitive::zero_width))]
    ZeroWidth,
}

/// Any failure while building a primitive
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum PrimitiveError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Rule(#[from] RuleError),
}

// ============================================================================
// Batch Errors
// ============================================================================

/// Errors from the scope stack of a batch builder
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum BatchError {
    #[error("no scope to pop")]
    #[diagnostic(
        code(draw3d::batch::scope_underflow),
        help("every pop_scope must follow a matching push_scope")
    )]
    ScopeUnderflow,
}
