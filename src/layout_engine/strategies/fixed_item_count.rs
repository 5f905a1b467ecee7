//! Rows hold a configured number of entries; the row count follows the
//! entry count up to the maximum, after which rows overfill.

use crate::layout_engine::engine::TaskbarLayout;
use crate::layout_engine::strategies::{
    available_extents, cell_height_for, placeholder_plan, LayoutPlan, RowPacking,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedItemCount {
    pub items_per_row: usize,
}

impl Default for FixedItemCount {
    fn default() -> Self { Self { items_per_row: 14 } }
}

impl RowPacking for FixedItemCount {
    fn plan(&self, layout: &TaskbarLayout) -> LayoutPlan {
        let n = layout.len();
        if n == 0 {
            return placeholder_plan(layout);
        }

        let (_, available_height) = available_extents(layout);
        let spacing = layout.spacing();

        let mut items_per_row = self.items_per_row;
        let mut rows = layout.maximum_rows();

        if items_per_row * rows < n {
            items_per_row = (n as f64 / rows as f64).ceil() as usize;
        } else {
            rows = (n as f64 / items_per_row as f64).ceil() as usize;
        }

        let cell_height = cell_height_for(available_height, spacing, rows);
        let cell_width = cell_height * layout.aspect_ratio();

        let (row_infos, rows, max_preferred_row_width) =
            layout.build_rows(items_per_row, cell_width, rows);
        let cell_height = cell_height_for(available_height, spacing, rows);

        LayoutPlan::Rows { rows, cell_width, cell_height, max_preferred_row_width, row_infos }
    }

    fn optimum_capacity(&self, layout: &TaskbarLayout) -> isize {
        (self.items_per_row * layout.maximum_rows()) as isize
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::common::geometry::{Orientation, Rect, Size};
    use crate::layout_engine::engine::EntryKind;

    fn fixed_count_layout(n: usize, items_per_row: usize) -> TaskbarLayout {
        let mut layout = TaskbarLayout::new(Orientation::Horizontal);
        layout.set_strategy(FixedItemCount { items_per_row }.into());
        layout.set_maximum_rows(2);
        for _ in 0..n {
            layout.push(EntryKind::Task, false);
        }
        layout.set_geometry(Rect::new(0.0, 0.0, 500.0, 100.0));
        layout
    }

    #[test]
    fn ten_entries_make_two_rows_of_five() {
        let layout = fixed_count_layout(10, 5);

        assert_eq!(layout.rows(), 2);
        assert_eq!(layout.cell_size(), Size::new(50.0, 50.0));
        for index in 0..10 {
            let entry = layout.entry_at(index).unwrap();
            assert_eq!(entry.row(), index / 5);
            assert_eq!(
                entry.geometry(),
                Rect::new((index % 5) as f64 * 50.0, (index / 5) as f64 * 50.0, 50.0, 50.0)
            );
        }
    }

    #[test]
    fn row_count_tracks_partial_fill() {
        let layout = fixed_count_layout(4, 5);
        assert_eq!(layout.rows(), 1);
        assert_eq!(layout.cell_height(), 100.0);
    }

    #[test]
    fn overflow_widens_rows_at_the_maximum() {
        let layout = fixed_count_layout(12, 5);
        assert_eq!(layout.rows(), 2);
        assert_eq!(layout.row_of_index(5), Some(0));
        assert_eq!(layout.row_of_index(6), Some(1));
    }

    #[test]
    fn capacity_is_exactly_the_grid() {
        let layout = fixed_count_layout(1, 5);
        assert_eq!(layout.optimum_capacity(), 10);
    }
}
