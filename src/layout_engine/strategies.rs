//! Packing strategies. Each strategy is a pure planner: it reads the
//! layout state and produces a [`LayoutPlan`] describing the row
//! partition; the engine applies the plan, runs the animations and
//! owns all entry state. Switching strategies swaps the planner and
//! its parameters, nothing else.

pub mod by_shape;
pub mod fixed_item_count;
pub mod fixed_size;
pub mod limit_squeeze;
pub mod max_squeeze;

use enum_dispatch::enum_dispatch;

pub use by_shape::ByShape;
pub use fixed_item_count::FixedItemCount;
pub use fixed_size::FixedSize;
pub use limit_squeeze::LimitSqueeze;
pub use max_squeeze::MaxSqueeze;

use crate::common::config::{StrategyKind, StrategySettings};
use crate::common::geometry::{Point, Size};
use crate::layout_engine::engine::{RowInfo, TaskbarLayout};

/// Output of a planning pass.
#[derive(Clone, Debug, PartialEq)]
pub enum LayoutPlan {
    /// Nothing to lay out; collapse to a dummy single-row state.
    Placeholder { cell_height: f64, preferred_size: Size },
    Rows {
        rows: usize,
        cell_width: f64,
        cell_height: f64,
        max_preferred_row_width: f64,
        row_infos: Vec<RowInfo>,
    },
}

#[enum_dispatch]
pub trait RowPacking {
    /// Plans the row partition for the current entries and geometry.
    fn plan(&self, layout: &TaskbarLayout) -> LayoutPlan;

    /// Entry count the current geometry holds comfortably; the host
    /// compares it against the live task count to drive grouping.
    fn optimum_capacity(&self, layout: &TaskbarLayout) -> isize;

    /// Maps a position to a row index.
    fn row_at(&self, layout: &TaskbarLayout, pos: Point) -> usize {
        proportional_row_at(layout, pos)
    }
}

#[enum_dispatch(RowPacking)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PackingStrategy {
    ByShape,
    MaxSqueeze,
    FixedItemCount,
    FixedSize,
    LimitSqueeze,
}

impl Default for PackingStrategy {
    fn default() -> Self { LimitSqueeze::default().into() }
}

impl PackingStrategy {
    pub fn kind(&self) -> StrategyKind {
        match self {
            PackingStrategy::ByShape(_) => StrategyKind::ByShape,
            PackingStrategy::MaxSqueeze(_) => StrategyKind::MaxSqueeze,
            PackingStrategy::FixedItemCount(_) => StrategyKind::FixedItemCount,
            PackingStrategy::FixedSize(_) => StrategyKind::FixedSize,
            PackingStrategy::LimitSqueeze(_) => StrategyKind::LimitSqueeze,
        }
    }

    pub fn from_settings(settings: &StrategySettings) -> Self {
        match settings.kind {
            StrategyKind::ByShape => ByShape { row_aspect_ratio: settings.row_aspect_ratio }.into(),
            StrategyKind::MaxSqueeze => MaxSqueeze.into(),
            StrategyKind::FixedItemCount => {
                FixedItemCount { items_per_row: settings.items_per_row }.into()
            }
            StrategyKind::FixedSize => {
                FixedSize { fixed_cell_height: settings.fixed_cell_height }.into()
            }
            StrategyKind::LimitSqueeze => LimitSqueeze {
                squeeze_ratio: settings.squeeze_ratio,
                prefer_grouping: settings.prefer_grouping,
            }
            .into(),
        }
    }
}

/// Cell height that makes `rows` rows plus spacing fill the cross axis.
pub(crate) fn cell_height_for(available_height: f64, spacing: f64, rows: usize) -> f64 {
    (available_height + spacing) / rows as f64 - spacing
}

/// Main-axis and cross-axis extents of the effective geometry.
pub(crate) fn available_extents(layout: &TaskbarLayout) -> (f64, f64) {
    let rect = layout.effective_geometry();
    if layout.orientation().is_vertical() {
        (rect.height(), rect.width())
    } else {
        (rect.width(), rect.height())
    }
}

/// Empty-taskbar plan shared by the squeezing strategies: one row
/// spanning the cross axis, a preferred size of at most 10 units.
pub(crate) fn placeholder_plan(layout: &TaskbarLayout) -> LayoutPlan {
    let rect = layout.geometry();
    let cell_height = if layout.orientation().is_vertical() { rect.width() } else { rect.height() };

    LayoutPlan::Placeholder {
        cell_height,
        preferred_size: Size::new(rect.width().min(10.0), rect.height().min(10.0)),
    }
}

/// Default row hit test: rows share the cross axis evenly.
pub(crate) fn proportional_row_at(layout: &TaskbarLayout, pos: Point) -> usize {
    let rect = layout.effective_geometry();
    let rows = layout.rows();

    if layout.orientation().is_vertical() {
        if pos.x <= rect.left() {
            0
        } else if pos.x >= rect.right() || rect.width() == 0.0 {
            rows - 1
        } else {
            ((pos.x - rect.left()) * rows as f64 / rect.width()) as usize
        }
    } else if pos.y <= rect.top() {
        0
    } else if pos.y >= rect.bottom() || rect.height() == 0.0 {
        rows - 1
    } else {
        ((pos.y - rect.top()) * rows as f64 / rect.height()) as usize
    }
}
