//! Connector element joining two points or shapes.

use super::{ElementId, ElementStyle};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Anchor side on an element's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnchorSide {
    Top,
    Right,
    Bottom,
    Left,
    Center,
}

impl AnchorSide {
    /// All sides, in resolver candidate order.
    pub const ALL: [AnchorSide; 5] = [
        AnchorSide::Top,
        AnchorSide::Right,
        AnchorSide::Bottom,
        AnchorSide::Left,
        AnchorSide::Center,
    ];
}

/// One end of a connector: a free point or a binding to another element.
///
/// A bound endpoint never stores an absolute coordinate; its effective
/// position is recomputed from the referenced element's current geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Endpoint {
    Free { point: Point },
    Bound { element: ElementId, side: AnchorSide },
}

impl Endpoint {
    pub fn free(point: Point) -> Self {
        Endpoint::Free { point }
    }

    pub fn bound(element: ElementId, side: AnchorSide) -> Self {
        Endpoint::Bound { element, side }
    }

    /// The stored point of a free endpoint.
    pub fn free_point(&self) -> Option<Point> {
        match self {
            Endpoint::Free { point } => Some(*point),
            Endpoint::Bound { .. } => None,
        }
    }

    pub fn is_bound(&self) -> bool {
        matches!(self, Endpoint::Bound { .. })
    }

    /// The element this endpoint is bound to, if any.
    pub fn bound_element(&self) -> Option<ElementId> {
        match self {
            Endpoint::Bound { element, .. } => Some(*element),
            Endpoint::Free { .. } => None,
        }
    }
}

/// A line or arrow connector between two endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connector {
    pub id: ElementId,
    pub from: Endpoint,
    pub to: Endpoint,
    /// Draw an arrowhead at the `to` end.
    pub arrowhead: bool,
    pub style: ElementStyle,
}

impl Connector {
    pub fn new(from: Endpoint, to: Endpoint, arrowhead: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            from,
            to,
            arrowhead,
            style: ElementStyle::default(),
        }
    }

    /// True if neither endpoint is a free point, i.e. the connector has no
    /// directly movable geometry of its own.
    pub fn fully_bound(&self) -> bool {
        self.from.is_bound() && self.to.is_bound()
    }

    /// True if either endpoint is bound to the given element.
    pub fn attached_to(&self, id: ElementId) -> bool {
        self.from.bound_element() == Some(id) || self.to.bound_element() == Some(id)
    }

    /// Translate only the free endpoints. Bound endpoints follow the element
    /// they reference.
    pub fn translate_free(&mut self, delta: Vec2) {
        for endpoint in [&mut self.from, &mut self.to] {
            if let Endpoint::Free { point } = endpoint {
                *point += delta;
            }
        }
    }

    /// Bounding box of the free endpoints only. Empty when fully bound; the
    /// store computes full bounds with anchors resolved.
    pub fn free_bounds(&self) -> Rect {
        let pts: Vec<Point> = [self.from, self.to]
            .iter()
            .filter_map(|e| match e {
                Endpoint::Free { point } => Some(*point),
                Endpoint::Bound { .. } => None,
            })
            .collect();
        match pts.as_slice() {
            [] => Rect::ZERO,
            [p] => Rect::from_points(*p, *p),
            [a, b] => Rect::from_points(*a, *b),
            _ => unreachable!(),
        }
    }
}
