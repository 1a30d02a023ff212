use super::{Area, Point, Rect};
use crate::schedule::Link;
use crate::task::TaskId;
use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

/// Horizontal run out of the parent's right edge before the first turn.
const LEAD_OUT: i32 = 4;
/// Where the path lands, measured from the child's left edge.
const LANDING_INSET: i32 = 6;
const ARROW_SIZE: i32 = 4;

/// Routed link between two areas. `parent_area` and `child_area` index the
/// area list the connection was computed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Connection {
    pub parent_area: usize,
    pub child_area: usize,
    pub parent_is_earlier_row: bool,
    /// Axis-aligned polyline from the parent to the arrow tip.
    pub path: Vec<Point>,
    /// Arrowhead triangle; the first point is the tip.
    pub arrow: [Point; 3],
}

/// Routes every link, in link order.
pub fn compute_connections(areas: &[Area], links: &[Link]) -> Vec<Connection> {
    let by_task: HashMap<TaskId, usize> = areas
        .iter()
        .enumerate()
        .map(|(idx, area)| (area.task, idx))
        .collect();

    links
        .iter()
        .filter_map(|link| {
            let (Some(&parent_area), Some(&child_area)) =
                (by_task.get(&link.parent), by_task.get(&link.child))
            else {
                warn!(parent = %link.parent, child = %link.child, "link endpoint has no area");
                return None;
            };
            Some(route(
                parent_area,
                &areas[parent_area].rect,
                child_area,
                &areas[child_area].rect,
            ))
        })
        .collect()
}

fn route(parent_area: usize, parent: &Rect, child_area: usize, child: &Rect) -> Connection {
    let parent_is_earlier_row = parent.y < child.y;

    let start = Point::new(parent.right() + 1, parent.y + parent.height / 2);
    let lead = Point::new(start.x + LEAD_OUT, start.y);
    let end = Point::new(
        child.x + LANDING_INSET,
        if parent_is_earlier_row {
            child.y - 1
        } else {
            child.bottom() + 1
        },
    );

    let mut path = vec![start, lead];
    if lead.x < end.x {
        path.push(Point::new(end.x, lead.y));
    } else {
        // The child starts at or before the parent's end: step out of the
        // parent's row first so the path does not cut through either bar.
        let y = if lead.y > end.y {
            parent.y - 2
        } else {
            parent.bottom() + 2
        };
        path.push(Point::new(lead.x, y));
        path.push(Point::new(end.x, y));
    }
    path.push(end);

    let arrow = if parent_is_earlier_row {
        [
            end,
            Point::new(end.x - ARROW_SIZE, end.y - ARROW_SIZE),
            Point::new(end.x + ARROW_SIZE, end.y - ARROW_SIZE),
        ]
    } else {
        [
            end,
            Point::new(end.x + ARROW_SIZE, end.y + ARROW_SIZE),
            Point::new(end.x - ARROW_SIZE, end.y + ARROW_SIZE),
        ]
    };

    Connection {
        parent_area,
        child_area,
        parent_is_earlier_row,
        path,
        arrow,
    }
}
