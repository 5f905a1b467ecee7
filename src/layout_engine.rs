mod animation;
mod drag;
pub mod engine;
pub mod strategies;

pub use animation::{AnimationFlags, ExpansionDirection};
pub use engine::{EntryId, EntryKind, LayoutError, LayoutEvent, TaskbarEntry, TaskbarLayout};
pub use strategies::{
    ByShape, FixedItemCount, FixedSize, LayoutPlan, LimitSqueeze, MaxSqueeze, PackingStrategy,
    RowPacking,
};
