//! Drag-and-drop reordering. The host translates its pointer events
//! into `start_drag` / `drag_to` / `drag_leave` / `drop_drag`; while a
//! drag is live the dragged entry follows the pointer and the layout
//! reflows around it, with the tentative slot kept in `current_index`.

use tracing::warn;

use crate::common::geometry::Point;
use crate::layout_engine::animation::AnimationFlags;
use crate::layout_engine::engine::{EntryId, LayoutError, TaskbarLayout};
use crate::layout_engine::strategies::RowPacking;

impl TaskbarLayout {
    /// Begins dragging the entry at `index`, grabbed at `pos`.
    pub fn start_drag(&mut self, index: usize, pos: Point) -> Result<(), LayoutError> {
        if self.dragged.is_some() {
            warn!("start_drag: already dragging");
            return Err(LayoutError::AlreadyDragging);
        }

        let Some(&id) = self.order.get(index) else {
            warn!("start_drag: index {index} out of bounds");
            return Err(LayoutError::OutOfBounds(index));
        };

        self.mouse_in = true;
        self.dragged = Some(id);
        self.current_index = Some(index);
        self.grab_pos = pos - self.entries[id].rect.top_left();
        self.current_animation |= AnimationFlags::MOVE;

        Ok(())
    }

    /// Moves the dragged entry under the pointer, reorders it into the
    /// slot the pointer hovers over and reflows everything else.
    pub fn drag_to(&mut self, pos: Point) {
        let Some(id) = self.dragged else { return };
        // the order may have shifted under the drag; trust the handle,
        // not the remembered slot
        let Some(from) = self.index_of(id) else { return };

        self.mouse_in = true;

        let mut rect = self.entries[id].rect;
        let effective_rect = self.effective_geometry();

        if self.grab_pos.y > rect.height() {
            self.grab_pos.y = rect.height() * 0.5;
        }
        if self.grab_pos.x > rect.width() {
            self.grab_pos.x = rect.width() * 0.5;
        }

        let mut new_pos = pos - self.grab_pos;

        if new_pos.y < effective_rect.top() {
            new_pos.y = effective_rect.top();
        } else if new_pos.y + rect.height() > effective_rect.bottom() {
            new_pos.y = effective_rect.bottom() - rect.height();
        }

        if new_pos.x < effective_rect.left() {
            new_pos.x = effective_rect.left();
        } else if new_pos.x + rect.width() > effective_rect.right() {
            new_pos.x = effective_rect.right() - rect.width();
        }

        rect.move_to(new_pos);
        self.entries[id].rect = rect;

        let (mut index, row) = self.index_at_pos(pos);
        if index == self.order.len() {
            index -= 1;
        }

        let moved = self.order.remove(from);
        self.order.insert(index, moved);
        self.current_index = Some(index);
        self.entries[id].row = row;
        self.current_animation |= AnimationFlags::MOVE;
        self.relayout();
    }

    /// The pointer left the taskbar mid-drag; the dragged entry glides
    /// back to its slot while the drag itself stays live.
    pub fn drag_leave(&mut self) {
        if self.dragged.is_none() {
            return;
        }

        self.mouse_in = false;
        self.start_animation();
    }

    /// Ends the drag and returns the index the entry settled at.
    pub fn drop_drag(&mut self) -> Option<usize> {
        if self.dragged.take().is_none() {
            warn!("drop_drag: no drag in progress");
            return None;
        }

        let index = self.current_index.take();
        self.mouse_in = false;
        self.current_animation |= AnimationFlags::MOVE;
        self.start_animation();

        index
    }

    pub fn is_dragging(&self) -> bool { self.dragged.is_some() }

    pub fn dragged_entry(&self) -> Option<EntryId> { self.dragged }

    /// Tentative slot of the dragged entry, while a drag is live.
    pub fn current_drag_index(&self) -> Option<usize> { self.current_index }

    // --- positional hit testing ---------------------------------------------

    /// The entry whose hit box contains `pos`. Hit boxes are the
    /// current geometries grown by half the spacing on every side, so
    /// the gaps between entries still resolve.
    pub fn entry_at_pos(&self, pos: Point) -> Option<EntryId> {
        let half_spacing = self.spacing * 0.5;

        self.order.iter().copied().find(|&id| {
            let rect = self.entries[id].rect;
            pos.y >= rect.top() - half_spacing
                && pos.y < rect.bottom() + half_spacing
                && pos.x >= rect.left() - half_spacing
                && pos.x < rect.right() + half_spacing
        })
    }

    /// The row a position falls into. Delegates to the strategy;
    /// fixed-size lays rows in a lane of configured thickness instead
    /// of stretching them across the whole cross axis.
    pub fn row_at_pos(&self, pos: Point) -> usize {
        let strategy = self.strategy;
        strategy.row_at(self, pos)
    }

    /// The slot index a drop at `pos` would land in, plus the row it
    /// belongs to. Resolves against destinations rather than current
    /// geometries so in-flight moves do not wobble the answer.
    pub fn index_at_pos(&self, pos: Point) -> (usize, usize) {
        let effective_rect = self.effective_geometry();
        let row = self.row_at_pos(pos);
        let half_spacing = self.spacing * 0.5;
        let rtl = self.direction.is_rtl();
        let is_vertical = self.orientation.is_vertical();
        let n = self.order.len();

        // first entry of the row
        let Some(row_start) =
            (0..n).find(|&index| self.entries[self.order[index]].row == row)
        else {
            return (n, row);
        };

        let relevant_pos = if is_vertical { pos.y } else { pos.x };

        let before_row = if is_vertical {
            if rtl {
                relevant_pos > effective_rect.bottom()
            } else {
                relevant_pos < effective_rect.top()
            }
        } else if rtl {
            relevant_pos > effective_rect.right()
        } else {
            relevant_pos < effective_rect.left()
        };
        if before_row {
            return (row_start, row);
        }

        let mut row_end = n;
        for index in row_start..n {
            let entry = &self.entries[self.order[index]];

            if entry.row != row {
                row_end = index;
                break;
            }

            let (start, end) = if is_vertical {
                (
                    entry.dest.y - half_spacing,
                    entry.dest.y + entry.rect.height() + half_spacing,
                )
            } else {
                (
                    entry.dest.x - half_spacing,
                    entry.dest.x + entry.rect.width() + half_spacing,
                )
            };

            if relevant_pos >= start && relevant_pos < end {
                return (index, row);
            }
        }

        (row_end, row)
    }
}
