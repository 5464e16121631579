//! Freehand drawing element (pen, marker, highlighter strokes).

use super::{ElementId, ElementStyle, point_to_polyline_dist};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which drawing tool produced a stroke. Affects default width/opacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PenKind {
    Pen,
    Marker,
    Highlighter,
}

impl PenKind {
    /// Default stroke width for this pen.
    pub fn stroke_width(self) -> f64 {
        match self {
            PenKind::Pen => 2.0,
            PenKind::Marker => 6.0,
            PenKind::Highlighter => 14.0,
        }
    }

    /// Default stroke opacity for this pen.
    pub fn opacity(self) -> f64 {
        match self {
            PenKind::Pen | PenKind::Marker => 1.0,
            PenKind::Highlighter => 0.45,
        }
    }
}

/// A freehand stroke: an ordered point polyline in world coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Drawing {
    pub id: ElementId,
    pub points: Vec<Point>,
    pub pen: PenKind,
    pub style: ElementStyle,
}

impl Drawing {
    pub fn new(pen: PenKind) -> Self {
        let style = ElementStyle {
            stroke_width: pen.stroke_width(),
            opacity: pen.opacity(),
            ..Default::default()
        };
        Self {
            id: Uuid::new_v4(),
            points: Vec::new(),
            pen,
            style,
        }
    }

    pub fn from_points(pen: PenKind, points: Vec<Point>) -> Self {
        let mut drawing = Self::new(pen);
        drawing.points = points;
        drawing
    }

    /// Append a point, dropping non-finite coordinates.
    pub fn push_point(&mut self, point: Point) {
        if point.x.is_finite() && point.y.is_finite() {
            self.points.push(point);
        }
    }

    pub fn bounds(&self) -> Rect {
        let mut iter = self.points.iter();
        let Some(first) = iter.next() else {
            return Rect::ZERO;
        };
        let mut rect = Rect::from_points(*first, *first);
        for p in iter {
            rect = rect.union_pt(*p);
        }
        let pad = self.style.stroke_width / 2.0;
        rect.inflate(pad, pad)
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        if self.points.len() < 2 {
            return self
                .points
                .first()
                .is_some_and(|p| p.distance(point) <= tolerance + self.style.stroke_width);
        }
        point_to_polyline_dist(point, &self.points) <= tolerance + self.style.stroke_width / 2.0
    }

    pub fn translate(&mut self, delta: Vec2) {
        for p in &mut self.points {
            *p += delta;
        }
    }

    /// Scale all points so the stroke's bounding box fits the new size.
    pub fn resize(&mut self, width: f64, height: f64) {
        let bounds = self.bounds();
        if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
            return;
        }
        let sx = width / bounds.width();
        let sy = height / bounds.height();
        for p in &mut self.points {
            p.x = bounds.x0 + (p.x - bounds.x0) * sx;
            p.y = bounds.y0 + (p.y - bounds.y0) * sy;
        }
    }
}
