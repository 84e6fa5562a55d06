//! Static pin lattice for a triangular board
//!
//! Rows alternate between a narrow width (P pins) and a wide width (P+1),
//! each centered on its own, so every pin sits above the gap of the next row.

use glam::Vec2;

use crate::tuning::Tuning;

/// Immutable pin layout, shared by the stepper and the render pass
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    pub width: f32,
    pub height: f32,
    rows: Vec<Vec<Vec2>>,
}

impl Board {
    /// Lay out the pin rows for the given tuning
    pub fn new(tuning: &Tuning) -> Self {
        let width = tuning.board_width;
        let height = tuning.board_height;
        let spacing_x = width / (tuning.pins_per_row + 1) as f32;
        let spacing_y = height * tuning.pin_field_ratio / (tuning.rows + 1) as f32;

        let rows = (0..tuning.rows)
            .map(|row| {
                let pins_in_row = pins_in_row(row, tuning.pins_per_row);
                let row_width = (pins_in_row - 1) as f32 * spacing_x;
                let start_x = (width - row_width) / 2.0;
                let y = spacing_y + row as f32 * spacing_y;
                (0..pins_in_row)
                    .map(|i| Vec2::new(start_x + i as f32 * spacing_x, y))
                    .collect()
            })
            .collect();

        Self {
            width,
            height,
            rows,
        }
    }

    pub fn rows(&self) -> &[Vec<Vec2>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[Vec2]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Height of every pin in a row
    pub fn row_y(&self, index: usize) -> Option<f32> {
        self.row(index).and_then(|pins| pins.first()).map(|pin| pin.y)
    }

    /// All pins, row by row
    pub fn pins(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.rows.iter().flatten().copied()
    }
}

/// Even rows are narrow, odd rows carry one extra pin
#[inline]
pub fn pins_in_row(row: usize, pins_per_row: usize) -> usize {
    if row % 2 == 0 {
        pins_per_row
    } else {
        pins_per_row + 1
    }
}

/// Whether a row is the wide (P+1) kind
#[inline]
pub fn is_wide_row(row: usize) -> bool {
    row % 2 == 1
}
