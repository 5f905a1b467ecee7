//! Layout engine for a task manager widget: packs task buttons into
//! rows under several strategies, animates moves, expansion and
//! drag-and-drop reordering, and reports capacity so the host can
//! decide when to group windows.
//!
//! The crate is renderer-agnostic. The host owns the widgets, feeds in
//! geometry and pointer positions, drives [`TaskbarLayout::tick`] while
//! [`TaskbarLayout::is_animating`] holds, and reads entry geometry back
//! through queries.

pub mod common;
pub mod layout_engine;

pub use common::config::{Config, Settings, StrategyKind, StrategySettings};
pub use common::geometry::{LayoutDirection, Margins, Orientation, Point, Rect, Size};
pub use layout_engine::{
    AnimationFlags, EntryId, EntryKind, ExpansionDirection, LayoutError, LayoutEvent,
    PackingStrategy, TaskbarEntry, TaskbarLayout,
};
