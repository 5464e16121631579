//! Connector anchor resolution: nearest-anchor snapping and read-time
//! endpoint recomputation.

use crate::element::{AnchorSide, Connector, Element, ElementId, Endpoint, MindmapEdge};
use crate::store::Document;
use kurbo::{Point, Rect};

/// Snap distance while a connector is being drawn (tight, in world units;
/// callers divide by the camera zoom to keep it screen-constant).
pub const LIVE_SNAP_THRESHOLD: f64 = 12.0;

/// Fallback snap distance applied at commit time. Deliberately much larger
/// than the live threshold so an imprecise release still binds to the shape
/// the user was aiming at instead of leaving a stray free point.
pub const COMMIT_SNAP_THRESHOLD: f64 = 40.0;

/// A resolved anchor candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorHit {
    pub element: ElementId,
    pub side: AnchorSide,
    /// World position of the anchor.
    pub point: Point,
    pub distance: f64,
}

/// Anchor position on a bounding box for a given side.
pub fn anchor_point(bounds: Rect, side: AnchorSide) -> Point {
    let center = bounds.center();
    match side {
        AnchorSide::Top => Point::new(center.x, bounds.y0),
        AnchorSide::Right => Point::new(bounds.x1, center.y),
        AnchorSide::Bottom => Point::new(center.x, bounds.y1),
        AnchorSide::Left => Point::new(bounds.x0, center.y),
        AnchorSide::Center => center,
    }
}

/// Find the nearest anchor among the candidates within `threshold`.
///
/// Returns `None` when nothing is close enough, meaning the raw point should
/// be used as a free endpoint.
pub fn resolve_anchor(
    point: Point,
    candidates: impl IntoIterator<Item = (ElementId, Rect)>,
    threshold: f64,
) -> Option<AnchorHit> {
    let mut best: Option<AnchorHit> = None;
    for (element, bounds) in candidates {
        for side in AnchorSide::ALL {
            let anchor = anchor_point(bounds, side);
            let distance = anchor.distance(point);
            if distance <= threshold && best.is_none_or(|b| distance < b.distance) {
                best = Some(AnchorHit {
                    element,
                    side,
                    point: anchor,
                    distance,
                });
            }
        }
    }
    best
}

/// Resolve an endpoint to a world position against the current document.
///
/// Bound endpoints referencing a missing element yield `None`; callers skip
/// them rather than erroring, since transient dangling references are
/// expected during rapid mutation.
pub fn endpoint_position(doc: &Document, endpoint: &Endpoint) -> Option<Point> {
    match endpoint {
        Endpoint::Free { point } => Some(*point),
        Endpoint::Bound { element, side } => {
            let bounds = doc.get(*element)?.bounds();
            Some(anchor_point(bounds, *side))
        }
    }
}

/// Resolve both connector endpoints. `None` if neither end is resolvable.
pub fn connector_points(doc: &Document, connector: &Connector) -> Option<(Point, Point)> {
    let from = endpoint_position(doc, &connector.from);
    let to = endpoint_position(doc, &connector.to);
    match (from, to) {
        (Some(a), Some(b)) => Some((a, b)),
        // One dangling end degenerates to a point at the live end.
        (Some(a), None) => Some((a, a)),
        (None, Some(b)) => Some((b, b)),
        (None, None) => None,
    }
}

/// Resolve a mindmap edge to the centers of its two nodes.
pub fn edge_points(doc: &Document, edge: &MindmapEdge) -> Option<(Point, Point)> {
    let from = doc.get(edge.from).map(Element::bounds)?.center();
    let to = doc.get(edge.to).map(Element::bounds)?.center();
    Some((from, to))
}
