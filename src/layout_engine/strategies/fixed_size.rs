//! Cells never grow past a configured height; rows occupy a lane of
//! that thickness instead of stretching across the whole cross axis.

use crate::common::geometry::{Point, Size};
use crate::layout_engine::engine::TaskbarLayout;
use crate::layout_engine::strategies::{available_extents, cell_height_for, LayoutPlan, RowPacking};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedSize {
    pub fixed_cell_height: f64,
}

impl Default for FixedSize {
    fn default() -> Self { Self { fixed_cell_height: 40.0 } }
}

impl RowPacking for FixedSize {
    fn plan(&self, layout: &TaskbarLayout) -> LayoutPlan {
        let n = layout.len();
        let is_vertical = layout.orientation().is_vertical();

        if n == 0 {
            // the empty placeholder still reserves the configured lane
            // thickness in the cross axis
            let rect = layout.geometry();
            let margins = layout.contents_margins();
            let lane = margins.top + self.fixed_cell_height + margins.bottom;

            let preferred_size = if is_vertical {
                Size::new(lane, rect.height().min(10.0))
            } else {
                Size::new(rect.width().min(10.0), lane)
            };

            return LayoutPlan::Placeholder { cell_height: layout.cell_height(), preferred_size };
        }

        let (available_width, available_height) = available_extents(layout);
        let spacing = layout.spacing();
        let additional_width = layout.additional_width();

        let rows = layout.maximum_rows();
        let cell_width = self.fixed_cell_height * layout.aspect_ratio();

        let mut items_per_row = ((available_width + spacing)
            / (cell_width + additional_width + spacing))
            .ceil() as usize;

        if items_per_row * rows < n {
            items_per_row = (n as f64 / rows as f64).ceil() as usize;
        }

        let (row_infos, rows, max_preferred_row_width) =
            layout.build_rows(items_per_row, cell_width, rows);
        let cell_height = self.fixed_cell_height.min(cell_height_for(available_height, spacing, rows));

        LayoutPlan::Rows { rows, cell_width, cell_height, max_preferred_row_width, row_infos }
    }

    fn optimum_capacity(&self, layout: &TaskbarLayout) -> isize {
        let (available_width, _) = available_extents(layout);
        let spacing = layout.spacing();
        let additional_width = layout.additional_width();

        let items_per_row = ((available_width + spacing)
            / (layout.cell_width() + additional_width + spacing))
            .ceil() as isize;

        items_per_row * layout.maximum_rows() as isize
    }

    /// Rows live in a lane `fixed_cell_height` thick (plus spacing),
    /// clamped to the effective rect.
    fn row_at(&self, layout: &TaskbarLayout, pos: Point) -> usize {
        let rect = layout.effective_geometry();
        let spacing = layout.spacing();
        let rows = layout.rows();

        if layout.orientation().is_vertical() {
            let width =
                ((self.fixed_cell_height + spacing) * rows as f64 - spacing).min(rect.width());

            if pos.x <= rect.left() {
                0
            } else if pos.x >= rect.right() || width <= 0.0 {
                rows - 1
            } else {
                ((pos.x - rect.left()) * rows as f64 / width) as usize
            }
        } else {
            let height =
                ((self.fixed_cell_height + spacing) * rows as f64 - spacing).min(rect.height());

            if pos.y <= rect.top() {
                0
            } else if pos.y >= rect.bottom() || height <= 0.0 {
                rows - 1
            } else {
                ((pos.y - rect.top()) * rows as f64 / height) as usize
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::common::geometry::{Margins, Orientation, Rect};
    use crate::layout_engine::engine::EntryKind;

    fn fixed_size_layout(n: usize) -> TaskbarLayout {
        let mut layout = TaskbarLayout::new(Orientation::Horizontal);
        layout.set_strategy(FixedSize { fixed_cell_height: 40.0 }.into());
        layout.set_maximum_rows(4);
        for _ in 0..n {
            layout.push(EntryKind::Task, false);
        }
        layout.set_geometry(Rect::new(0.0, 0.0, 400.0, 400.0));
        layout
    }

    #[test]
    fn cell_height_is_capped_at_the_configured_value() {
        let layout = fixed_size_layout(3);
        // one row holds all three; 400 tall would be allowed but the
        // cap wins
        assert_eq!(layout.rows(), 1);
        assert_eq!(layout.cell_height(), 40.0);
        assert_eq!(layout.entry_at(0).unwrap().geometry(), Rect::new(0.0, 0.0, 40.0, 40.0));
    }

    #[test]
    fn tight_geometry_still_shrinks_cells() {
        let mut layout = fixed_size_layout(3);
        layout.set_geometry(Rect::new(0.0, 0.0, 400.0, 20.0));
        assert_eq!(layout.cell_height(), 20.0);
    }

    #[test]
    fn row_hit_test_uses_the_lane_extent() {
        let mut layout = fixed_size_layout(20);
        assert_eq!(layout.rows(), 2);

        // two 40-unit lanes at the top; the lane boundary, not the
        // geometric middle of the rect, splits the rows
        assert_eq!(layout.row_at_pos(Point::new(10.0, 10.0)), 0);
        assert_eq!(layout.row_at_pos(Point::new(10.0, 50.0)), 1);
        assert_eq!(layout.row_at_pos(Point::new(10.0, 500.0)), 1);

        layout.set_strategy(crate::layout_engine::strategies::MaxSqueeze.into());
        layout.relayout_if_needed();
        assert_eq!(layout.row_at_pos(Point::new(10.0, 300.0)), 3);
    }

    #[test]
    fn empty_placeholder_reserves_the_lane() {
        let mut layout = TaskbarLayout::new(Orientation::Horizontal);
        layout.set_strategy(FixedSize { fixed_cell_height: 40.0 }.into());
        layout.set_contents_margins(Margins { left: 0.0, top: 3.0, right: 0.0, bottom: 3.0 });
        layout.set_geometry(Rect::new(0.0, 0.0, 200.0, 100.0));

        assert_eq!(layout.preferred_size(), Size::new(10.0, 46.0));
    }

    #[test]
    fn capacity_follows_current_cell_width() {
        let layout = fixed_size_layout(3);
        // cell width 40 after layout: 10 per row, 4 rows
        assert_eq!(layout.optimum_capacity(), 40);
    }
}
