//! Table element: a grid of text cells.

use super::{ElementId, ElementStyle};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A table with per-axis track sizes and row-major cell contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub id: ElementId,
    /// Top-left corner position.
    pub position: Point,
    /// Column widths, left to right.
    pub col_widths: Vec<f64>,
    /// Row heights, top to bottom.
    pub row_heights: Vec<f64>,
    /// Cell contents, row-major (`rows * cols` entries).
    pub cells: Vec<String>,
    pub style: ElementStyle,
}

impl Table {
    pub const DEFAULT_COL_WIDTH: f64 = 120.0;
    pub const DEFAULT_ROW_HEIGHT: f64 = 36.0;

    pub fn new(position: Point, rows: usize, cols: usize) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        Self {
            id: Uuid::new_v4(),
            position,
            col_widths: vec![Self::DEFAULT_COL_WIDTH; cols],
            row_heights: vec![Self::DEFAULT_ROW_HEIGHT; rows],
            cells: vec![String::new(); rows * cols],
            style: ElementStyle::default(),
        }
    }

    pub fn rows(&self) -> usize {
        self.row_heights.len()
    }

    pub fn cols(&self) -> usize {
        self.col_widths.len()
    }

    pub fn width(&self) -> f64 {
        self.col_widths.iter().sum()
    }

    pub fn height(&self) -> f64 {
        self.row_heights.iter().sum()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        if row < self.rows() && col < self.cols() {
            self.cells.get(row * self.cols() + col).map(String::as_str)
        } else {
            None
        }
    }

    /// Set a cell's content; out-of-range coordinates are ignored.
    pub fn set_cell(&mut self, row: usize, col: usize, content: String) {
        let cols = self.cols();
        if row < self.rows() && col < cols {
            if let Some(cell) = self.cells.get_mut(row * cols + col) {
                *cell = content;
            }
        }
    }

    /// Scale all tracks so the table fits the new outer size.
    pub fn resize(&mut self, width: f64, height: f64) {
        let old_w = self.width();
        let old_h = self.height();
        if old_w <= 0.0 || old_h <= 0.0 {
            return;
        }
        let sx = width / old_w;
        let sy = height / old_h;
        for w in &mut self.col_widths {
            *w *= sx;
        }
        for h in &mut self.row_heights {
            *h *= sy;
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width(),
            self.position.y + self.height(),
        )
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.bounds().inflate(tolerance, tolerance).contains(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_access() {
        let mut table = Table::new(Point::new(0.0, 0.0), 2, 3);
        table.set_cell(1, 2, "x".into());
        assert_eq!(table.cell(1, 2), Some("x"));
        assert_eq!(table.cell(0, 0), Some(""));
        assert_eq!(table.cell(2, 0), None);
        // Out-of-range writes are ignored.
        table.set_cell(5, 5, "y".into());
        assert_eq!(table.cells.len(), 6);
    }

    #[test]
    fn test_resize_scales_tracks() {
        let mut table = Table::new(Point::new(0.0, 0.0), 2, 2);
        let (w, h) = (table.width(), table.height());
        table.resize(w * 2.0, h * 0.5);
        assert!((table.width() - w * 2.0).abs() < 1e-9);
        assert!((table.height() - h * 0.5).abs() < 1e-9);
    }
}
