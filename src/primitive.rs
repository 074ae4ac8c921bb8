//! Drawing primitives recorded from 2D graphics calls
//!
//! Each primitive is its own type that knows its kind, its vertices and the
//! render rule it is painted with. Primitives are validated once at
//! construction and never mutated afterwards.

use std::fmt;

use enum_dispatch::enum_dispatch;
use glam::{Vec2, vec2};

use crate::errors::{GeometryError, PrimitiveError, RuleError};
use crate::geometry::Bounds;

// ============================================================================
// Kinds
// ============================================================================

/// Concrete primitive kind.
///
/// Kinds form a small is-a hierarchy: a rectangle is a quad, a quad is a
/// polygon, and a line is a polyline. Classes built from a supertype accept
/// primitives of any of its subtypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveKind {
    Polygon,
    Quad,
    Rectangle,
    Polyline,
    Line,
    Text,
    Image,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 7] = [
        PrimitiveKind::Polygon,
        PrimitiveKind::Quad,
        PrimitiveKind::Rectangle,
        PrimitiveKind::Polyline,
        PrimitiveKind::Line,
        PrimitiveKind::Text,
        PrimitiveKind::Image,
    ];

    /// The direct supertype, if any
    pub fn supertype(self) -> Option<PrimitiveKind> {
        match self {
            PrimitiveKind::Quad => Some(PrimitiveKind::Polygon),
            PrimitiveKind::Rectangle => Some(PrimitiveKind::Quad),
            PrimitiveKind::Line => Some(PrimitiveKind::Polyline),
            PrimitiveKind::Polygon
            | PrimitiveKind::Polyline
            | PrimitiveKind::Text
            | PrimitiveKind::Image => None,
        }
    }

    /// Whether `self` is `other` or one of its subtypes
    pub fn is_a(self, other: PrimitiveKind) -> bool {
        let mut kind = Some(self);
        while let Some(k) = kind {
            if k == other {
                return true;
            }
            kind = k.supertype();
        }
        false
    }

    /// Whether a primitive of this kind can be painted with `rule`
    pub fn accepts(self, rule: RuleKind) -> bool {
        match self {
            PrimitiveKind::Polygon | PrimitiveKind::Quad | PrimitiveKind::Rectangle => matches!(
                rule,
                RuleKind::Solid | RuleKind::Gradient | RuleKind::Outline
            ),
            PrimitiveKind::Polyline | PrimitiveKind::Line => rule == RuleKind::Outline,
            PrimitiveKind::Text => rule == RuleKind::Text,
            PrimitiveKind::Image => rule == RuleKind::Image,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Polygon => "polygon",
            PrimitiveKind::Quad => "quad",
            PrimitiveKind::Rectangle => "rectangle",
            PrimitiveKind::Polyline => "polyline",
            PrimitiveKind::Line => "line",
            PrimitiveKind::Text => "text",
            PrimitiveKind::Image => "image",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Render Rules
// ============================================================================

/// RGBA color packed as 0xRRGGBBAA
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
        Color::rgba(r, g, b, 255)
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Color {
        Color(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | a as u32)
    }

    pub fn alpha(self) -> u8 {
        (self.0 & 0xff) as u8
    }

    pub fn is_opaque(self) -> bool {
        self.alpha() == 255
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08x}", self.0)
    }
}

/// Handle of a font owned by the text layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontId(pub u32);

/// Handle of an image owned by the texture layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageId(pub u32);

/// Dash pattern of an outline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LineStyle {
    #[default]
    Solid,
    Dash,
    Dot,
    DashDot,
    DashDotDot,
}

/// Discriminant of a [`RenderRule`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    Solid,
    Gradient,
    Outline,
    Text,
    Image,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RuleKind::Solid => "solid",
            RuleKind::Gradient => "gradient",
            RuleKind::Outline => "outline",
            RuleKind::Text => "text",
            RuleKind::Image => "image",
        })
    }
}

/// How a primitive is painted.
///
/// Two primitives can share a draw call only if their rules are equal, since
/// every field here maps to GPU state (colors, line width, bound texture).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderRule {
    Solid {
        color: Color,
    },
    Gradient {
        from: Color,
        to: Color,
        horizontal: bool,
    },
    Outline {
        color: Color,
        width: u32,
        style: LineStyle,
    },
    Text {
        font: FontId,
        color: Color,
    },
    Image {
        image: ImageId,
    },
}

impl RenderRule {
    pub fn solid(color: Color) -> Self {
        RenderRule::Solid { color }
    }

    pub fn gradient(from: Color, to: Color, horizontal: bool) -> Self {
        RenderRule::Gradient {
            from,
            to,
            horizontal,
        }
    }

    /// Outline rule; a zero width would draw nothing and is rejected
    pub fn outline(color: Color, width: u32, style: LineStyle) -> Result<Self, RuleError> {
        if width == 0 {
            return Err(RuleError::ZeroWidth);
        }
        Ok(RenderRule::Outline {
            color,
            width,
            style,
        })
    }

    pub fn text(font: FontId, color: Color) -> Self {
        RenderRule::Text { font, color }
    }

    pub fn image(image: ImageId) -> Self {
        RenderRule::Image { image }
    }

    pub fn kind(&self) -> RuleKind {
        match self {
            RenderRule::Solid { .. } => RuleKind::Solid,
            RenderRule::Gradient { .. } => RuleKind::Gradient,
            RenderRule::Outline { .. } => RuleKind::Outline,
            RenderRule::Text { .. } => RuleKind::Text,
            RenderRule::Image { .. } => RuleKind::Image,
        }
    }

    pub fn is_solid(&self) -> bool {
        matches!(self, RenderRule::Solid { .. })
    }

    pub fn is_gradient(&self) -> bool {
        matches!(self, RenderRule::Gradient { .. })
    }

    pub fn is_outline(&self) -> bool {
        matches!(self, RenderRule::Outline { .. })
    }

    pub fn is_text(&self) -> bool {
        matches!(self, RenderRule::Text { .. })
    }

    pub fn is_image(&self) -> bool {
        matches!(self, RenderRule::Image { .. })
    }

    /// Solid and gradient rules fill the interior
    pub fn is_fill(&self) -> bool {
        self.is_solid() || self.is_gradient()
    }

    /// How far paint reaches past the vertices: half the stroke of an outline
    pub fn overhang(&self) -> f32 {
        match self {
            RenderRule::Outline { width, .. } => *width as f32 / 2.0,
            _ => 0.0,
        }
    }
}

impl fmt::Display for RenderRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderRule::Solid { color } => write!(f, "solid({})", color),
            RenderRule::Gradient {
                from,
                to,
                horizontal,
            } => {
                let dir = if *horizontal { "h" } else { "v" };
                write!(f, "gradient({}->{},{})", from, to, dir)
            }
            RenderRule::Outline {
                color,
                width,
                style,
            } => write!(f, "outline({},{},{:?})", color, width, style),
            RenderRule::Text { font, color } => write!(f, "text(font{},{})", font.0, color),
            RenderRule::Image { image } => write!(f, "image({})", image.0),
        }
    }
}

// ============================================================================
// Primitive Types
// ============================================================================

/// Common behavior for all primitives
#[enum_dispatch]
pub trait PrimitiveGeometry {
    /// The concrete kind of this primitive
    fn kind(&self) -> PrimitiveKind;

    /// Vertices in drawing order
    fn vertices(&self) -> &[Vec2];

    /// The rule this primitive is painted with
    fn render_rule(&self) -> &RenderRule;

    /// Bounding box of the vertices
    fn bounds(&self) -> Bounds {
        Bounds::from_points(self.vertices())
    }

    /// Box of every pixel the primitive paints, outline stroke included
    fn paint_bounds(&self) -> Bounds {
        self.bounds().inflate(self.render_rule().overhang())
    }
}

fn check_finite(kind: PrimitiveKind, points: &[Vec2]) -> Result<(), GeometryError> {
    match points.iter().position(|p| !p.is_finite()) {
        Some(index) => Err(GeometryError::NonFinite { kind, index }),
        None => Ok(()),
    }
}

fn check_rule(kind: PrimitiveKind, rule: &RenderRule) -> Result<(), RuleError> {
    if kind.accepts(rule.kind()) {
        Ok(())
    } else {
        Err(RuleError::Incompatible {
            kind,
            rule: rule.kind(),
        })
    }
}

fn check_extent(kind: PrimitiveKind, size: Vec2) -> Result<(), GeometryError> {
    // NaN fails the comparison as well
    if size.x > 0.0 && size.y > 0.0 {
        Ok(())
    } else {
        Err(GeometryError::EmptyExtent {
            kind,
            width: size.x,
            height: size.y,
        })
    }
}

/// Corners of an axis-aligned box, counter-clockwise from `origin`
fn corners(origin: Vec2, size: Vec2) -> [Vec2; 4] {
    [
        origin,
        origin + vec2(size.x, 0.0),
        origin + size,
        origin + vec2(0.0, size.y),
    ]
}

/// A closed, filled or outlined polygon
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonPrimitive {
    vertices: Vec<Vec2>,
    rule: RenderRule,
}

impl PolygonPrimitive {
    pub const MIN_VERTICES: usize = 3;

    pub fn new(vertices: Vec<Vec2>, rule: RenderRule) -> Result<Self, PrimitiveError> {
        let kind = PrimitiveKind::Polygon;
        if vertices.len() < Self::MIN_VERTICES {
            return Err(GeometryError::TooFewVertices {
                kind,
                min: Self::MIN_VERTICES,
                got: vertices.len(),
            }
            .into());
        }
        check_finite(kind, &vertices)?;
        check_rule(kind, &rule)?;
        Ok(Self { vertices, rule })
    }
}

impl PrimitiveGeometry for PolygonPrimitive {
    fn kind(&self) -> PrimitiveKind {
        PrimitiveKind::Polygon
    }

    fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    fn render_rule(&self) -> &RenderRule {
        &self.rule
    }
}

/// A four-sided polygon
#[derive(Debug, Clone, PartialEq)]
pub struct QuadPrimitive {
    vertices: [Vec2; 4],
    rule: RenderRule,
}

impl QuadPrimitive {
    pub fn new(vertices: [Vec2; 4], rule: RenderRule) -> Result<Self, PrimitiveError> {
        let kind = PrimitiveKind::Quad;
        check_finite(kind, &vertices)?;
        check_rule(kind, &rule)?;
        Ok(Self { vertices, rule })
    }

    /// Build from a vertex list, which must hold exactly four points
    pub fn from_slice(vertices: &[Vec2], rule: RenderRule) -> Result<Self, PrimitiveError> {
        let quad: [Vec2; 4] = vertices.try_into().map_err(|_| GeometryError::VertexCount {
            kind: PrimitiveKind::Quad,
            expected: 4,
            got: vertices.len(),
        })?;
        Self::new(quad, rule)
    }
}

impl PrimitiveGeometry for QuadPrimitive {
    fn kind(&self) -> PrimitiveKind {
        PrimitiveKind::Quad
    }

    fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    fn render_rule(&self) -> &RenderRule {
        &self.rule
    }
}

/// An axis-aligned rectangle
#[derive(Debug, Clone, PartialEq)]
pub struct RectanglePrimitive {
    vertices: [Vec2; 4],
    rule: RenderRule,
}

impl RectanglePrimitive {
    pub fn new(origin: Vec2, size: Vec2, rule: RenderRule) -> Result<Self, PrimitiveError> {
        let kind = PrimitiveKind::Rectangle;
        check_finite(kind, &[origin, size])?;
        check_extent(kind, size)?;
        check_rule(kind, &rule)?;
        Ok(Self {
            vertices: corners(origin, size),
            rule,
        })
    }

    pub fn origin(&self) -> Vec2 {
        self.vertices[0]
    }

    pub fn size(&self) -> Vec2 {
        self.vertices[2] - self.vertices[0]
    }
}

impl PrimitiveGeometry for RectanglePrimitive {
    fn kind(&self) -> PrimitiveKind {
        PrimitiveKind::Rectangle
    }

    fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    fn render_rule(&self) -> &RenderRule {
        &self.rule
    }

    fn bounds(&self) -> Bounds {
        Bounds::new(self.vertices[0], self.vertices[2])
    }
}

/// An open sequence of connected segments
#[derive(Debug, Clone, PartialEq)]
pub struct PolylinePrimitive {
    vertices: Vec<Vec2>,
    rule: RenderRule,
}

impl PolylinePrimitive {
    pub const MIN_VERTICES: usize = 2;

    pub fn new(vertices: Vec<Vec2>, rule: RenderRule) -> Result<Self, PrimitiveError> {
        let kind = PrimitiveKind::Polyline;
        if vertices.len() < Self::MIN_VERTICES {
            return Err(GeometryError::TooFewVertices {
                kind,
                min: Self::MIN_VERTICES,
                got: vertices.len(),
            }
            .into());
        }
        check_finite(kind, &vertices)?;
        check_rule(kind, &rule)?;
        Ok(Self { vertices, rule })
    }
}

impl PrimitiveGeometry for PolylinePrimitive {
    fn kind(&self) -> PrimitiveKind {
        PrimitiveKind::Polyline
    }

    fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    fn render_rule(&self) -> &RenderRule {
        &self.rule
    }
}

/// A single segment
#[derive(Debug, Clone, PartialEq)]
pub struct LinePrimitive {
    vertices: [Vec2; 2],
    rule: RenderRule,
}

impl LinePrimitive {
    pub fn new(from: Vec2, to: Vec2, rule: RenderRule) -> Result<Self, PrimitiveError> {
        let kind = PrimitiveKind::Line;
        let vertices = [from, to];
        check_finite(kind, &vertices)?;
        check_rule(kind, &rule)?;
        Ok(Self { vertices, rule })
    }

    pub fn start(&self) -> Vec2 {
        self.vertices[0]
    }

    pub fn end(&self) -> Vec2 {
        self.vertices[1]
    }
}

impl PrimitiveGeometry for LinePrimitive {
    fn kind(&self) -> PrimitiveKind {
        PrimitiveKind::Line
    }

    fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    fn render_rule(&self) -> &RenderRule {
        &self.rule
    }
}

/// A run of text. The extent is measured by the font layer; the primitive
/// only carries the box the glyphs will cover.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPrimitive {
    text: String,
    vertices: [Vec2; 4],
    rule: RenderRule,
}

impl TextPrimitive {
    pub fn new(
        text: impl Into<String>,
        origin: Vec2,
        extent: Vec2,
        rule: RenderRule,
    ) -> Result<Self, PrimitiveError> {
        let kind = PrimitiveKind::Text;
        check_finite(kind, &[origin, extent])?;
        check_extent(kind, extent)?;
        check_rule(kind, &rule)?;
        Ok(Self {
            text: text.into(),
            vertices: corners(origin, extent),
            rule,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl PrimitiveGeometry for TextPrimitive {
    fn kind(&self) -> PrimitiveKind {
        PrimitiveKind::Text
    }

    fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    fn render_rule(&self) -> &RenderRule {
        &self.rule
    }

    fn bounds(&self) -> Bounds {
        Bounds::new(self.vertices[0], self.vertices[2])
    }
}

/// An image drawn into an axis-aligned box
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePrimitive {
    vertices: [Vec2; 4],
    rule: RenderRule,
}

impl ImagePrimitive {
    pub fn new(origin: Vec2, size: Vec2, rule: RenderRule) -> Result<Self, PrimitiveError> {
        let kind = PrimitiveKind::Image;
        check_finite(kind, &[origin, size])?;
        check_extent(kind, size)?;
        check_rule(kind, &rule)?;
        Ok(Self {
            vertices: corners(origin, size),
            rule,
        })
    }
}

impl PrimitiveGeometry for ImagePrimitive {
    fn kind(&self) -> PrimitiveKind {
        PrimitiveKind::Image
    }

    fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    fn render_rule(&self) -> &RenderRule {
        &self.rule
    }

    fn bounds(&self) -> Bounds {
        Bounds::new(self.vertices[0], self.vertices[2])
    }
}

/// Any drawing primitive
#[enum_dispatch(PrimitiveGeometry)]
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Polygon(PolygonPrimitive),
    Quad(QuadPrimitive),
    Rectangle(RectanglePrimitive),
    Polyline(PolylinePrimitive),
    Line(LinePrimitive),
    Text(TextPrimitive),
    Image(ImagePrimitive),
}

// ============================================================================
// Tests
// ============================================================================
