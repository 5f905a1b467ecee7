//! Always spreads entries over the maximum row count, squeezing cells
//! as much as the geometry demands.

use crate::layout_engine::engine::TaskbarLayout;
use crate::layout_engine::strategies::{
    available_extents, cell_height_for, placeholder_plan, LayoutPlan, RowPacking,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MaxSqueeze;

impl RowPacking for MaxSqueeze {
    fn plan(&self, layout: &TaskbarLayout) -> LayoutPlan {
        let n = layout.len();
        if n == 0 {
            return placeholder_plan(layout);
        }

        let (available_width, available_height) = available_extents(layout);
        let spacing = layout.spacing();
        let additional_width = layout.additional_width();

        let rows = layout.maximum_rows();
        let cell_height = cell_height_for(available_height, spacing, rows);
        let cell_width = cell_height * layout.aspect_ratio();

        let mut items_per_row = ((available_width + spacing)
            / (cell_width + additional_width + spacing))
            .ceil() as usize;

        if items_per_row * rows < n {
            items_per_row = (n as f64 / rows as f64).ceil() as usize;
        }

        let (row_infos, rows, max_preferred_row_width) =
            layout.build_rows(items_per_row, cell_width, rows);
        let cell_height = cell_height_for(available_height, spacing, rows);

        LayoutPlan::Rows { rows, cell_width, cell_height, max_preferred_row_width, row_infos }
    }

    fn optimum_capacity(&self, layout: &TaskbarLayout) -> isize {
        let (available_width, available_height) = available_extents(layout);
        let spacing = layout.spacing();
        let cell_height = cell_height_for(available_height, spacing, layout.maximum_rows());
        let cell_width = cell_height * layout.aspect_ratio();
        let additional_width = layout.additional_width();

        let items_per_row = ((available_width + spacing)
            / (cell_width + additional_width + spacing))
            .ceil() as isize;

        items_per_row * layout.maximum_rows() as isize
    }
}
