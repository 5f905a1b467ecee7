//! Picks the row count whose overall taskbar shape, width over height
//! of the occupied block, comes closest to a configured target ratio.

use crate::layout_engine::engine::TaskbarLayout;
use crate::layout_engine::strategies::{
    available_extents, cell_height_for, placeholder_plan, LayoutPlan, RowPacking,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ByShape {
    pub row_aspect_ratio: f64,
}

impl Default for ByShape {
    fn default() -> Self { Self { row_aspect_ratio: 1.5 } }
}

impl RowPacking for ByShape {
    fn plan(&self, layout: &TaskbarLayout) -> LayoutPlan {
        let n = layout.len();
        if n == 0 {
            return placeholder_plan(layout);
        }

        let (_, available_height) = available_extents(layout);
        let spacing = layout.spacing();
        let additional_width = layout.additional_width();

        let mut best_rows = layout.minimum_rows();
        let mut best_delta = f64::INFINITY;

        for rows in layout.minimum_rows()..=layout.maximum_rows() {
            let cell_height = cell_height_for(available_height, spacing, rows);
            if cell_height <= 0.0 {
                break;
            }
            let cell_width = cell_height * layout.aspect_ratio();
            let items_per_row = (n as f64 / rows as f64).ceil();

            let block_width = items_per_row * (cell_width + additional_width + spacing);
            let block_height = rows as f64 * (cell_height + spacing);
            let delta = (block_width / block_height - self.row_aspect_ratio).abs();

            if delta < best_delta {
                best_delta = delta;
                best_rows = rows;
            }
        }

        let rows = best_rows;
        let cell_height = cell_height_for(available_height, spacing, rows);
        let cell_width = cell_height * layout.aspect_ratio();
        let items_per_row = (n as f64 / rows as f64).ceil() as usize;

        let (row_infos, rows, max_preferred_row_width) =
            layout.build_rows(items_per_row, cell_width, rows);
        let cell_height = cell_height_for(available_height, spacing, rows);

        LayoutPlan::Rows { rows, cell_width, cell_height, max_preferred_row_width, row_infos }
    }

    fn optimum_capacity(&self, layout: &TaskbarLayout) -> isize {
        let (available_width, available_height) = available_extents(layout);
        let spacing = layout.spacing();
        let cell_height = cell_height_for(available_height, spacing, layout.rows());
        let cell_width = cell_height * layout.aspect_ratio();
        let additional_width = layout.additional_width();

        let items_per_row = ((available_width + spacing)
            / (cell_width + additional_width + spacing))
            .ceil() as isize;

        items_per_row * layout.maximum_rows() as isize
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::common::geometry::{Orientation, Rect};
    use crate::layout_engine::engine::EntryKind;

    fn by_shape_layout(n: usize, ratio: f64) -> TaskbarLayout {
        let mut layout = TaskbarLayout::new(Orientation::Horizontal);
        layout.set_strategy(ByShape { row_aspect_ratio: ratio }.into());
        layout.set_maximum_rows(4);
        for _ in 0..n {
            layout.push(EntryKind::Task, false);
        }
        layout.set_geometry(Rect::new(0.0, 0.0, 400.0, 200.0));
        layout
    }

    #[test]
    fn wide_target_keeps_few_rows() {
        // 1 row: 8 cells of 200 -> shape 8.0; 2 rows: 4 cells of 100
        // in 200 -> 2.0; 4 rows: 2 cells of 50 -> 0.5
        let layout = by_shape_layout(8, 8.0);
        assert_eq!(layout.rows(), 1);
    }

    #[test]
    fn square_target_stacks_rows() {
        let layout = by_shape_layout(8, 2.0);
        assert_eq!(layout.rows(), 2);
        assert_eq!(layout.row_of_index(3), Some(0));
        assert_eq!(layout.row_of_index(4), Some(1));

        let tall = by_shape_layout(8, 0.5);
        assert_eq!(tall.rows(), 4);
    }

    #[test]
    fn capacity_scales_with_the_chosen_rows() {
        let layout = by_shape_layout(8, 2.0);
        // rows = 2: cells 100 wide, 4 per row, times 4 allowed rows
        assert_eq!(layout.optimum_capacity(), 16);
    }
}
