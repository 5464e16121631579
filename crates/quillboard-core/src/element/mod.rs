//! Element definitions for the whiteboard document.

mod connector;
mod drawing;
mod image;
mod mindmap;
mod shape;
mod sticky;
mod table;
mod text;

pub use connector::{AnchorSide, Connector, Endpoint};
pub use drawing::{Drawing, PenKind};
pub use image::ImageElement;
pub use mindmap::{MindmapEdge, MindmapNode};
pub use shape::{ShapeKind, ShapePrimitive};
pub use sticky::Sticky;
pub use table::Table;
pub use text::TextBox;

use kurbo::{Point, Rect, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for elements.
pub type ElementId = Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }
}

impl From<Color> for Rgba {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<Rgba> for Color {
    fn from(color: Rgba) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Style properties shared by all element kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementStyle {
    /// Stroke color.
    pub stroke_color: Rgba,
    /// Stroke width in world units.
    pub stroke_width: f64,
    /// Fill color (None = no fill).
    pub fill_color: Option<Rgba>,
    /// Font size for text-bearing elements.
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    /// Overall opacity (0.0 = fully transparent, 1.0 = fully opaque).
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

fn default_font_size() -> f64 {
    16.0
}

fn default_opacity() -> f64 {
    1.0
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            stroke_color: Rgba::black(),
            stroke_width: 2.0,
            fill_color: None,
            font_size: default_font_size(),
            opacity: 1.0,
        }
    }
}

impl ElementStyle {
    /// Get the stroke color with opacity applied, as a peniko Color.
    pub fn stroke(&self) -> Color {
        let alpha = (self.stroke_color.a as f64 * self.opacity) as u8;
        Color::from_rgba8(
            self.stroke_color.r,
            self.stroke_color.g,
            self.stroke_color.b,
            alpha,
        )
    }

    /// Get the fill color with opacity applied, as a peniko Color.
    pub fn fill(&self) -> Option<Color> {
        self.fill_color.map(|c| {
            let alpha = (c.a as f64 * self.opacity) as u8;
            Color::from_rgba8(c.r, c.g, c.b, alpha)
        })
    }
}

/// Discriminant for element variants. Fixed at creation; the store rejects
/// any update that would change it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Sticky,
    Text,
    Image,
    Shape,
    Connector,
    Table,
    MindmapNode,
    MindmapEdge,
    Drawing,
}

/// A visual object on the canvas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Element {
    Sticky(Sticky),
    Text(TextBox),
    Image(ImageElement),
    Shape(ShapePrimitive),
    Connector(Connector),
    Table(Table),
    MindmapNode(MindmapNode),
    MindmapEdge(MindmapEdge),
    Drawing(Drawing),
}

impl Element {
    pub fn id(&self) -> ElementId {
        match self {
            Element::Sticky(e) => e.id,
            Element::Text(e) => e.id,
            Element::Image(e) => e.id,
            Element::Shape(e) => e.id,
            Element::Connector(e) => e.id,
            Element::Table(e) => e.id,
            Element::MindmapNode(e) => e.id,
            Element::MindmapEdge(e) => e.id,
            Element::Drawing(e) => e.id,
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Sticky(_) => ElementKind::Sticky,
            Element::Text(_) => ElementKind::Text,
            Element::Image(_) => ElementKind::Image,
            Element::Shape(_) => ElementKind::Shape,
            Element::Connector(_) => ElementKind::Connector,
            Element::Table(_) => ElementKind::Table,
            Element::MindmapNode(_) => ElementKind::MindmapNode,
            Element::MindmapEdge(_) => ElementKind::MindmapEdge,
            Element::Drawing(_) => ElementKind::Drawing,
        }
    }

    /// Bounding box computed from the element's own geometry.
    ///
    /// Connectors and mindmap edges only account for their free endpoints
    /// here; bound endpoints live on other elements and are resolved by the
    /// store (`Document::element_bounds`).
    pub fn bounds(&self) -> Rect {
        match self {
            Element::Sticky(e) => e.bounds(),
            Element::Text(e) => e.bounds(),
            Element::Image(e) => e.bounds(),
            Element::Shape(e) => e.bounds(),
            Element::Connector(e) => e.free_bounds(),
            Element::Table(e) => e.bounds(),
            Element::MindmapNode(e) => e.bounds(),
            Element::MindmapEdge(_) => Rect::ZERO,
            Element::Drawing(e) => e.bounds(),
        }
    }

    /// Top-left of the element's bounding box.
    pub fn position(&self) -> Point {
        let b = self.bounds();
        Point::new(b.x0, b.y0)
    }

    /// Width and height of the element's bounding box.
    pub fn size(&self) -> kurbo::Size {
        self.bounds().size()
    }

    /// Translate the element by a delta.
    ///
    /// For connectors only free endpoints move; bound endpoints follow the
    /// element they reference. Non-finite deltas are ignored.
    pub fn translate(&mut self, delta: Vec2) {
        if !delta.x.is_finite() || !delta.y.is_finite() {
            return;
        }
        match self {
            Element::Sticky(e) => e.position += delta,
            Element::Text(e) => e.position += delta,
            Element::Image(e) => e.position += delta,
            Element::Shape(e) => e.position += delta,
            Element::Connector(e) => e.translate_free(delta),
            Element::Table(e) => e.position += delta,
            Element::MindmapNode(e) => e.position += delta,
            Element::MindmapEdge(_) => {}
            Element::Drawing(e) => e.translate(delta),
        }
    }

    /// Resize the bounding box. Ignored for kinds with derived geometry
    /// (connectors, mindmap edges) and for non-finite or non-positive sizes.
    pub fn set_size(&mut self, width: f64, height: f64) {
        if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
            return;
        }
        match self {
            Element::Sticky(e) => {
                e.width = width;
                e.height = height;
            }
            Element::Text(e) => {
                e.width = width;
                e.height = height;
            }
            Element::Image(e) => {
                e.width = width;
                e.height = height;
            }
            Element::Shape(e) => {
                e.width = width;
                e.height = height;
            }
            Element::Table(e) => e.resize(width, height),
            Element::MindmapNode(e) => {
                e.width = width;
                e.height = height;
            }
            Element::Drawing(e) => e.resize(width, height),
            Element::Connector(_) | Element::MindmapEdge(_) => {}
        }
    }

    /// Check if a point (in world coordinates) hits this element's own
    /// geometry. Connector and edge hits are resolved at the store level.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        match self {
            Element::Sticky(e) => e.hit_test(point, tolerance),
            Element::Text(e) => e.hit_test(point, tolerance),
            Element::Image(e) => e.hit_test(point, tolerance),
            Element::Shape(e) => e.hit_test(point, tolerance),
            Element::Connector(_) | Element::MindmapEdge(_) => false,
            Element::Table(e) => e.hit_test(point, tolerance),
            Element::MindmapNode(e) => e.hit_test(point, tolerance),
            Element::Drawing(e) => e.hit_test(point, tolerance),
        }
    }

    pub fn style(&self) -> &ElementStyle {
        match self {
            Element::Sticky(e) => &e.style,
            Element::Text(e) => &e.style,
            Element::Image(e) => &e.style,
            Element::Shape(e) => &e.style,
            Element::Connector(e) => &e.style,
            Element::Table(e) => &e.style,
            Element::MindmapNode(e) => &e.style,
            Element::MindmapEdge(e) => &e.style,
            Element::Drawing(e) => &e.style,
        }
    }

    pub fn style_mut(&mut self) -> &mut ElementStyle {
        match self {
            Element::Sticky(e) => &mut e.style,
            Element::Text(e) => &mut e.style,
            Element::Image(e) => &mut e.style,
            Element::Shape(e) => &mut e.style,
            Element::Connector(e) => &mut e.style,
            Element::Table(e) => &mut e.style,
            Element::MindmapNode(e) => &mut e.style,
            Element::MindmapEdge(e) => &mut e.style,
            Element::Drawing(e) => &mut e.style,
        }
    }

    pub fn as_connector(&self) -> Option<&Connector> {
        match self {
            Element::Connector(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_connector_mut(&mut self) -> Option<&mut Connector> {
        match self {
            Element::Connector(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_mindmap_node(&self) -> Option<&MindmapNode> {
        match self {
            Element::MindmapNode(n) => Some(n),
            _ => None,
        }
    }

    /// Regenerate the id. Used when duplicating or pasting so copies stay
    /// unique; never called on elements already in a document.
    pub fn regenerate_id(&mut self) {
        let new_id = Uuid::new_v4();
        match self {
            Element::Sticky(e) => e.id = new_id,
            Element::Text(e) => e.id = new_id,
            Element::Image(e) => e.id = new_id,
            Element::Shape(e) => e.id = new_id,
            Element::Connector(e) => e.id = new_id,
            Element::Table(e) => e.id = new_id,
            Element::MindmapNode(e) => e.id = new_id,
            Element::MindmapEdge(e) => e.id = new_id,
            Element::Drawing(e) => e.id = new_id,
        }
    }
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = Vec2::new(b.x - a.x, b.y - a.y);
    let pv = Vec2::new(point.x - a.x, point.y - a.y);
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * seg.x, a.y + t * seg.y);
    ((point.x - proj.x).powi(2) + (point.y - proj.y).powi(2)).sqrt()
}

/// Minimum distance from a point to a polyline.
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|w| point_to_segment_dist(point, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}

/// Hit test against a rectangle, inflated by the tolerance and half the
/// stroke width. Interior points always hit, filled or not; selecting a
/// hollow shape from inside beats pixel-hunting its border.
pub(crate) fn hit_test_box(bounds: Rect, stroke_width: f64, point: Point, tolerance: f64) -> bool {
    let band = tolerance + stroke_width / 2.0;
    bounds.inflate(band, band).contains(point)
}
