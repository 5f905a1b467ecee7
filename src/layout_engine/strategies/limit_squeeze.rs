//! The default strategy. Adds rows one at a time until squeezing the
//! current row count would compress cells past the configured ratio,
//! then fills rows greedily. Expansion caused by pointer hover is
//! discounted so a hovered entry cannot flip the row count.

use crate::layout_engine::engine::{RowInfo, TaskbarLayout};
use crate::layout_engine::strategies::{
    available_extents, cell_height_for, placeholder_plan, LayoutPlan, RowPacking,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LimitSqueeze {
    /// Compression bound in `(0, 1]`; smaller values tolerate more
    /// squeezing before a row is added.
    pub squeeze_ratio: f64,
    /// Hold the row count and ask the host for grouping instead.
    pub prefer_grouping: bool,
}

impl Default for LimitSqueeze {
    fn default() -> Self { Self { squeeze_ratio: 0.6, prefer_grouping: false } }
}

impl RowPacking for LimitSqueeze {
    fn plan(&self, layout: &TaskbarLayout) -> LayoutPlan {
        let n = layout.len();
        if n == 0 {
            return placeholder_plan(layout);
        }

        let (available_width, available_height) = available_extents(layout);
        let spacing = layout.spacing();
        let expanded_width = layout.expanded_width();

        let mut expanded_hover_count = 0;
        let mut expanded_count = 0;
        for index in 0..n {
            let entry = &layout.entries[layout.order[index]];
            if entry.is_expanded_by_hover() {
                expanded_hover_count += 1;
            }
            if entry.is_expanded() {
                expanded_count += 1;
            }
        }

        // add rows until the squeeze stays acceptable
        let mut rows = layout.minimum_rows() - 1;
        let mut cell_height = 0.0;
        let mut cell_width = 0.0;
        let mut compression = 1.0;

        while rows < layout.maximum_rows() {
            rows += 1;
            cell_height = cell_height_for(available_height, spacing, rows);
            cell_width = cell_height * layout.aspect_ratio();

            let full_width = n as f64 * (cell_width + spacing)
                + (expanded_count - expanded_hover_count) as f64 * expanded_width;
            compression = ((rows as f64 * available_width) / full_width).min(1.0);

            if rows as f64 * available_width
                > (full_width - n as f64 * cell_width) * self.squeeze_ratio
                    + n as f64 * cell_width / (rows + 1) as f64
            {
                break;
            }
        }

        // greedy fill: keep adding entries to a row while the squeezed
        // width stays short of the available width (biased by 0.9 to
        // prefer fuller rows)
        let mut row_infos = Vec::new();
        let mut max_preferred_row_width: f64 = 0.0;
        let mut end_index = 0;

        let mut row = 0;
        while row < rows && end_index < n {
            let start_index = end_index;

            let mut row_expanded_hover = 0;
            let mut row_expanded = 0;
            let mut index = start_index;
            while index < n {
                let entry = &layout.entries[layout.order[index]];
                if entry.is_expanded_by_hover() {
                    row_expanded_hover += 1;
                }
                if entry.is_expanded() {
                    row_expanded += 1;
                }

                let row_width = (index - start_index) as f64 * (cell_width + spacing)
                    + (row_expanded - row_expanded_hover) as f64 * expanded_width;
                if available_width < compression * row_width * 0.9 {
                    break;
                }
                index += 1;
            }

            if row + 1 == rows {
                end_index = n;
            } else {
                if start_index == index {
                    // prevents empty rows
                    index += 1;
                }
                end_index = index.min(n);
            }

            let row_spacing = spacing * (end_index - start_index) as f64;
            let mut preferred_width = 0.0;
            let mut minimum_width = 0.0;
            for index in start_index..end_index {
                let entry = &layout.entries[layout.order[index]];
                preferred_width += cell_width + entry.expansion();
                minimum_width += cell_width;
            }

            if preferred_width + row_spacing > max_preferred_row_width {
                max_preferred_row_width = preferred_width + row_spacing;
            }

            if start_index != end_index {
                row_infos.push(RowInfo::new(preferred_width, minimum_width, start_index, end_index));
            }
            row += 1;
        }

        let rows = layout.minimum_rows().max(row_infos.len());
        let cell_height = cell_height_for(available_height, spacing, rows);

        LayoutPlan::Rows { rows, cell_width, cell_height, max_preferred_row_width, row_infos }
    }

    /// Asymmetric by design: one short of the current count requests
    /// grouping, ten over allows ungrouping, anything else keeps the
    /// host from flapping between the two.
    fn optimum_capacity(&self, layout: &TaskbarLayout) -> isize {
        let (available_width, available_height) = available_extents(layout);
        let spacing = layout.spacing();
        let n = layout.len() as isize;
        let rows = layout.rows();

        let cell_height = cell_height_for(available_height, spacing, rows).trunc();
        let cell_width = (cell_height * layout.aspect_ratio()).trunc();

        let mut full_width = 0.0;
        let mut number_grouped = 0;
        for index in 0..layout.len() {
            let Some(entry) = layout.entry_at(index) else { continue };
            let expanded = if entry.is_expanded() { layout.expanded_width() } else { 0.0 };
            full_width += spacing + entry.kind().task_count() as f64 * (cell_width + expanded);

            if entry.kind().is_group() {
                number_grouped += 1;
            }
        }

        let compression = (rows as f64 * available_width) / full_width;
        let grouping_bias = if self.prefer_grouping { 0.1 } else { 0.0 };

        // group when there is not enough room
        let should_group = (compression < self.squeeze_ratio + grouping_bias
            && (rows == layout.maximum_rows() || self.prefer_grouping))
            // stay grouped while the row count grows
            || (rows > layout.minimum_rows() && self.prefer_grouping)
            // keep groups together across a row count change
            || (rows + 1 == layout.maximum_rows()
                && number_grouped > 0
                && !self.prefer_grouping
                && compression < self.squeeze_ratio);

        if should_group { n - 1 } else { n + 10 }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::common::geometry::{Orientation, Rect};
    use crate::layout_engine::engine::EntryKind;
    use crate::layout_engine::ExpansionDirection;

    fn squeeze_layout(n: usize, rect: Rect) -> TaskbarLayout {
        let mut layout = TaskbarLayout::new(Orientation::Horizontal);
        layout.set_maximum_rows(3);
        for _ in 0..n {
            layout.push(EntryKind::Task, false);
        }
        layout.set_geometry(rect);
        layout
    }

    #[test]
    fn few_entries_stay_on_one_comfortable_row() {
        let layout = squeeze_layout(3, Rect::new(0.0, 0.0, 300.0, 50.0));

        assert_eq!(layout.rows(), 1);
        for (index, x) in [0.0, 50.0, 100.0].into_iter().enumerate() {
            assert_eq!(layout.entry_at(index).unwrap().geometry(), Rect::new(x, 0.0, 50.0, 50.0));
        }
    }

    #[test]
    fn crowding_adds_a_row_instead_of_over_squeezing() {
        let one_row = squeeze_layout(6, Rect::new(0.0, 0.0, 300.0, 50.0));
        assert_eq!(one_row.rows(), 1);

        let two_rows = squeeze_layout(20, Rect::new(0.0, 0.0, 300.0, 50.0));
        assert_eq!(two_rows.rows(), 2);
        assert_eq!(two_rows.row_of_index(13), Some(0));
        assert_eq!(two_rows.row_of_index(14), Some(1));
    }

    #[test]
    fn hover_expansion_does_not_flip_the_row_count() {
        let mut layout = squeeze_layout(9, Rect::new(0.0, 0.0, 300.0, 50.0));
        assert_eq!(layout.rows(), 1);

        layout.set_hovered_at(2, true);
        layout.expand_at(2, ExpansionDirection::Expand);
        layout.skip_animation();
        assert_eq!(layout.rows(), 1);

        // the same expansion held without the pointer does count
        layout.set_hovered_at(2, false);
        layout.relayout_if_needed();
        assert_eq!(layout.rows(), 2);
    }

    #[test]
    fn capacity_answers_are_asymmetric() {
        let roomy = squeeze_layout(3, Rect::new(0.0, 0.0, 300.0, 50.0));
        assert_eq!(roomy.optimum_capacity(), 13);

        // a single allowed row, 11 cells of 50 into 300 units:
        // compression 0.545 under the 0.6 ratio asks for grouping
        let mut crowded = TaskbarLayout::new(Orientation::Horizontal);
        crowded.set_maximum_rows(1);
        for _ in 0..11 {
            crowded.push(EntryKind::Task, false);
        }
        crowded.set_geometry(Rect::new(0.0, 0.0, 300.0, 50.0));
        assert_eq!(crowded.optimum_capacity(), 10);

        // at exactly the ratio nothing changes in either direction
        crowded.remove_at(0);
        crowded.relayout_if_needed();
        assert_eq!(crowded.optimum_capacity(), 20);
    }

    #[test]
    fn prefer_grouping_holds_extra_rows_grouped() {
        let mut layout = squeeze_layout(20, Rect::new(0.0, 0.0, 300.0, 50.0));
        layout.set_strategy(LimitSqueeze { squeeze_ratio: 0.6, prefer_grouping: true }.into());
        layout.relayout_if_needed();

        assert_eq!(layout.rows(), 2);
        assert_eq!(layout.optimum_capacity(), 19);
    }

    #[test]
    fn groups_keep_the_capacity_low_near_a_row_change() {
        let mut grouped = TaskbarLayout::new(Orientation::Horizontal);
        grouped.set_maximum_rows(2);
        for _ in 0..4 {
            grouped.push(EntryKind::Group { members: 5 }, false);
        }
        grouped.set_geometry(Rect::new(0.0, 0.0, 300.0, 50.0));

        // 4 visible cells fit fine, but the 20 folded tasks would not;
        // ungrouping now would immediately regroup
        assert_eq!(grouped.rows(), 1);
        assert_eq!(grouped.optimum_capacity(), 3);

        let mut solo = TaskbarLayout::new(Orientation::Horizontal);
        solo.set_maximum_rows(2);
        for _ in 0..4 {
            solo.push(EntryKind::Task, false);
        }
        solo.set_geometry(Rect::new(0.0, 0.0, 300.0, 50.0));
        assert_eq!(solo.optimum_capacity(), 14);
    }
}
