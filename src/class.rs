//! Primitive classification
//!
//! A [`PrimitiveClass`] is the equivalence class of primitives that can share
//! one draw call: same kind, same render rule.

use std::fmt;

use crate::primitive::{Primitive, PrimitiveGeometry, PrimitiveKind, RenderRule};

/// Kind plus render rule of a batch-compatible group of primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrimitiveClass {
    kind: PrimitiveKind,
    rule: RenderRule,
}

/// Class of a single primitive: its concrete kind and its rule
pub fn classify(primitive: &Primitive) -> PrimitiveClass {
    PrimitiveClass {
        kind: primitive.kind(),
        rule: *primitive.render_rule(),
    }
}

impl PrimitiveClass {
    /// Build a class directly, e.g. a polygon class that also takes quads
    /// and rectangles
    pub fn new(kind: PrimitiveKind, rule: RenderRule) -> Self {
        PrimitiveClass { kind, rule }
    }

    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    pub fn render_rule(&self) -> &RenderRule {
        &self.rule
    }

    /// A primitive belongs to this class if its kind is the class kind or a
    /// subtype of it, and its rule is exactly the class rule.
    pub fn contains(&self, primitive: &Primitive) -> bool {
        primitive.kind().is_a(self.kind) && *primitive.render_rule() == self.rule
    }

    pub fn is_polygon(&self) -> bool {
        self.kind.is_a(PrimitiveKind::Polygon)
    }

    pub fn is_quad(&self) -> bool {
        self.kind.is_a(PrimitiveKind::Quad)
    }

    pub fn is_rectangle(&self) -> bool {
        self.kind == PrimitiveKind::Rectangle
    }

    pub fn is_polyline(&self) -> bool {
        self.kind.is_a(PrimitiveKind::Polyline)
    }

    pub fn is_line(&self) -> bool {
        self.kind == PrimitiveKind::Line
    }

    pub fn is_text(&self) -> bool {
        self.kind == PrimitiveKind::Text
    }

    pub fn is_image(&self) -> bool {
        self.kind == PrimitiveKind::Image
    }

    pub fn is_solid(&self) -> bool {
        self.rule.is_solid()
    }

    pub fn is_gradient(&self) -> bool {
        self.rule.is_gradient()
    }

    pub fn is_outline(&self) -> bool {
        self.rule.is_outline()
    }
}

impl Primitive {
    /// Shorthand for [`classify`]
    pub fn class(&self) -> PrimitiveClass {
        classify(self)
    }
}

impl fmt::Display for PrimitiveClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::{
        Color, FontId, LinePrimitive, LineStyle, PolygonPrimitive, QuadPrimitive,
        RectanglePrimitive, TextPrimitive,
    };
    use glam::{Vec2, vec2};

    fn fill(r: u8) -> RenderRule {
        RenderRule::solid(Color::rgb(r, 0, 0))
    }

    fn stroke() -> RenderRule {
        RenderRule::outline(Color::BLACK, 1, LineStyle::Solid).unwrap()
    }

    fn rect(x: f32, rule: RenderRule) -> Primitive {
        RectanglePrimitive::new(vec2(x, 0.0), vec2(1.0, 1.0), rule)
            .unwrap()
            .into()
    }

    #[test]
    fn same_kind_and_rule_classify_equal() {
        let a = rect(0.0, fill(255));
        let b = rect(10.0, fill(255));
        assert_eq!(classify(&a), classify(&b));
    }

    #[test]
    fn different_rule_classifies_apart() {
        assert_ne!(classify(&rect(0.0, fill(255))), classify(&rect(0.0, fill(254))));
        assert_ne!(classify(&rect(0.0, fill(255))), classify(&rect(0.0, stroke())));
    }

    #[test]
    fn different_kind_classifies_apart() {
        let outlined = rect(0.0, stroke());
        let line: Primitive = LinePrimitive::new(Vec2::ZERO, Vec2::ONE, stroke())
            .unwrap()
            .into();
        assert_ne!(classify(&outlined), classify(&line));
    }

    #[test]
    fn classify_is_idempotent() {
        let p = rect(3.0, fill(1));
        assert_eq!(classify(&p), classify(&p));
        assert_eq!(p.class(), classify(&p));
    }

    #[test]
    fn supertype_class_contains_subtypes() {
        let polygons = PrimitiveClass::new(PrimitiveKind::Polygon, fill(255));
        let quad: Primitive =
            QuadPrimitive::new([Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y], fill(255))
                .unwrap()
                .into();
        assert!(polygons.contains(&rect(0.0, fill(255))));
        assert!(polygons.contains(&quad));
        assert!(!polygons.contains(&rect(0.0, fill(128))));
    }

    #[test]
    fn subtype_class_rejects_supertype() {
        let rects = classify(&rect(0.0, fill(255)));
        let poly: Primitive =
            PolygonPrimitive::new(vec![Vec2::ZERO, Vec2::X, Vec2::Y], fill(255))
                .unwrap()
                .into();
        assert!(rects.contains(&rect(5.0, fill(255))));
        assert!(!rects.contains(&poly));
    }

    #[test]
    fn queries_follow_kind_and_rule() {
        let rects = classify(&rect(0.0, fill(9)));
        assert!(rects.is_polygon() && rects.is_quad() && rects.is_rectangle());
        assert!(rects.is_solid() && !rects.is_gradient() && !rects.is_outline());
        assert!(!rects.is_polyline() && !rects.is_line());

        let lines = PrimitiveClass::new(PrimitiveKind::Line, stroke());
        assert!(lines.is_line() && lines.is_polyline() && lines.is_outline());
        assert!(!lines.is_polygon());

        let text: Primitive = TextPrimitive::new(
            "label",
            Vec2::ZERO,
            vec2(20.0, 6.0),
            RenderRule::text(FontId(2), Color::BLACK),
        )
        .unwrap()
        .into();
        let texts = classify(&text);
        assert!(texts.is_text() && !texts.is_image() && !texts.is_solid());
    }

    #[test]
    fn display() {
        assert_eq!(classify(&rect(0.0, fill(255))).to_string(), "rectangle/solid(#ff0000ff)");
    }
}
