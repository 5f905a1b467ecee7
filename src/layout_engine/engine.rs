//! The taskbar layout engine proper: entry bookkeeping, validated
//! parameters, the shared row builder and the geometry application pass
//! that every packing strategy funnels into.

use slotmap::SlotMap;
use tracing::warn;

use crate::common::config::Config;
use crate::common::geometry::{LayoutDirection, Margins, Orientation, Point, Rect, Size};
use crate::layout_engine::animation::{AnimationFlags, ExpansionDirection};
use crate::layout_engine::strategies::{LayoutPlan, PackingStrategy, RowPacking};

slotmap::new_key_type! {
    /// Stable handle for a taskbar entry. Stays valid across reordering
    /// and relayouts until the entry is removed.
    pub struct EntryId;
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutError {
    #[error("index {0} is out of bounds")]
    OutOfBounds(usize),
    #[error("a drag is already in progress")]
    AlreadyDragging,
    #[error("entry does not belong to this layout")]
    UnknownEntry,
}

/// What an entry stands for. Groups report how many windows they fold
/// together, which feeds the capacity heuristics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    Task,
    Launcher,
    Group { members: usize },
}

impl EntryKind {
    pub fn task_count(self) -> usize {
        match self {
            EntryKind::Group { members } => members.max(1),
            _ => 1,
        }
    }

    pub fn is_group(self) -> bool { matches!(self, EntryKind::Group { .. }) }
}

/// One slot in the taskbar. `rect` is where the entry currently sits,
/// `dest` is where the last layout pass wants it to end up; the two
/// differ only while a move animation is in flight.
#[derive(Clone, Copy, Debug)]
pub struct TaskbarEntry {
    pub(crate) kind: EntryKind,
    pub(crate) rect: Rect,
    pub(crate) dest: Point,
    pub(crate) expansion: f64,
    pub(crate) direction: ExpansionDirection,
    pub(crate) row: usize,
    pub(crate) animation: AnimationFlags,
    pub(crate) is_new: bool,
    pub(crate) hovered: bool,
}

impl TaskbarEntry {
    fn new(kind: EntryKind, expansion: f64, direction: ExpansionDirection) -> Self {
        Self {
            kind,
            rect: Rect::default(),
            dest: Point::default(),
            expansion,
            direction,
            row: 0,
            animation: AnimationFlags::empty(),
            is_new: true,
            hovered: false,
        }
    }

    pub fn kind(&self) -> EntryKind { self.kind }

    /// Current geometry, including any in-flight animation offset.
    pub fn geometry(&self) -> Rect { self.rect }

    pub fn destination(&self) -> Point { self.dest }

    pub fn row(&self) -> usize { self.row }

    pub fn expansion(&self) -> f64 { self.expansion }

    pub fn direction(&self) -> ExpansionDirection { self.direction }

    pub fn is_expanded(&self) -> bool { self.direction == ExpansionDirection::Expand }

    pub fn is_expanded_by_hover(&self) -> bool { self.hovered && self.is_expanded() }
}

/// Item span and width demands of a single row, produced by planning.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RowInfo {
    pub(crate) preferred_width: f64,
    pub(crate) minimum_width: f64,
    pub(crate) start_index: usize,
    pub(crate) end_index: usize,
}

impl RowInfo {
    pub(crate) fn new(
        preferred_width: f64,
        minimum_width: f64,
        start_index: usize,
        end_index: usize,
    ) -> Self {
        Self { preferred_width, minimum_width, start_index, end_index }
    }
}

/// Notifications for the host, drained with [`TaskbarLayout::take_events`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LayoutEvent {
    /// The preferred size changed; the host should renegotiate its
    /// allocation with the container.
    SizeHintChanged(Size),
}

pub struct TaskbarLayout {
    pub(crate) entries: SlotMap<EntryId, TaskbarEntry>,
    pub(crate) order: Vec<EntryId>,
    pub(crate) strategy: PackingStrategy,

    pub(crate) geometry: Rect,
    pub(crate) margins: Margins,
    pub(crate) orientation: Orientation,
    pub(crate) direction: LayoutDirection,

    pub(crate) spacing: f64,
    pub(crate) fps: u32,
    pub(crate) animations_enabled: bool,
    pub(crate) minimum_rows: usize,
    pub(crate) maximum_rows: usize,
    pub(crate) expanded_width: f64,
    pub(crate) aspect_ratio: f64,
    pub(crate) expand_duration: u32,

    pub(crate) preferred_size: Size,
    pub(crate) cell_height: f64,
    pub(crate) rows: usize,

    pub(crate) current_animation: AnimationFlags,
    pub(crate) timer_running: bool,
    pub(crate) last_tick_ms: Option<u128>,

    pub(crate) dragged: Option<EntryId>,
    pub(crate) current_index: Option<usize>,
    pub(crate) grab_pos: Point,
    pub(crate) mouse_in: bool,

    needs_layout: bool,
    events: Vec<LayoutEvent>,
}

impl Default for TaskbarLayout {
    fn default() -> Self { Self::new(Orientation::Horizontal) }
}

impl TaskbarLayout {
    pub fn new(orientation: Orientation) -> Self {
        Self {
            entries: SlotMap::with_key(),
            order: Vec::new(),
            strategy: PackingStrategy::default(),
            geometry: Rect::default(),
            margins: Margins::default(),
            orientation,
            direction: LayoutDirection::LeftToRight,
            spacing: 0.0,
            fps: 35,
            animations_enabled: true,
            minimum_rows: 1,
            maximum_rows: 6,
            expanded_width: 175.0,
            aspect_ratio: 1.0,
            expand_duration: 160,
            preferred_size: Size::default(),
            cell_height: 1.0,
            rows: 1,
            current_animation: AnimationFlags::empty(),
            timer_running: false,
            last_tick_ms: None,
            dragged: None,
            current_index: None,
            grab_pos: Point::default(),
            mouse_in: false,
            needs_layout: false,
            events: Vec::new(),
        }
    }

    pub fn with_config(orientation: Orientation, config: &Config) -> Self {
        let mut layout = Self::new(orientation);
        layout.apply_config(config);
        layout
    }

    /// Pushes every configurable parameter through the validated
    /// setters, so invalid values are rejected the same way as direct
    /// calls and the last good value stays in effect.
    pub fn apply_config(&mut self, config: &Config) {
        let settings = &config.settings;
        self.set_spacing(settings.spacing);
        self.set_fps(settings.fps);
        self.set_row_bounds(settings.minimum_rows, settings.maximum_rows);
        self.set_expanded_width(settings.expanded_width);
        self.set_aspect_ratio(settings.aspect_ratio);
        self.set_expand_duration(settings.expand_duration);
        self.set_strategy(PackingStrategy::from_settings(&config.strategy));
        self.set_animations_enabled(settings.animations_enabled);
    }

    // --- entry management ---------------------------------------------------

    /// Inserts an entry at `index`, clamping past-the-end indices.
    pub fn insert(&mut self, index: usize, kind: EntryKind, expanded: bool) -> EntryId {
        let index = if index > self.order.len() {
            warn!("insert: index {index} out of bounds, clamping to {}", self.order.len());
            self.order.len()
        } else {
            index
        };

        let (expansion, direction) = if expanded {
            (self.expanded_width, ExpansionDirection::Expand)
        } else {
            (0.0, ExpansionDirection::Collapse)
        };

        let id = self.entries.insert(TaskbarEntry::new(kind, expansion, direction));
        self.order.insert(index, id);
        self.resync_drag_index();
        self.invalidate();
        id
    }

    pub fn push(&mut self, kind: EntryKind, expanded: bool) -> EntryId {
        self.insert(self.order.len(), kind, expanded)
    }

    pub fn remove_at(&mut self, index: usize) {
        if index >= self.order.len() {
            warn!("remove_at: invalid index {index}");
            return;
        }

        let id = self.order.remove(index);
        if self.dragged == Some(id) {
            self.dragged = None;
            self.current_index = None;
        }
        self.entries.remove(id);
        self.resync_drag_index();

        if self.order.is_empty() {
            self.stop_animation();
        }
        self.invalidate();
    }

    pub fn remove(&mut self, id: EntryId) {
        match self.index_of(id) {
            Some(index) => self.remove_at(index),
            None => warn!("remove: entry does not belong to this layout"),
        }
    }

    pub fn move_entry(&mut self, from: usize, to: usize) {
        if from >= self.order.len() {
            warn!("move_entry: invalid from index {from}");
            return;
        }
        if to >= self.order.len() {
            warn!("move_entry: invalid to index {to}");
            return;
        }

        let id = self.order.remove(from);
        self.order.insert(to, id);
        self.resync_drag_index();
        self.invalidate();
    }

    /// Keeps the tentative drag slot pointing at the dragged entry
    /// after the order shifts around it.
    fn resync_drag_index(&mut self) {
        if let Some(id) = self.dragged {
            self.current_index = self.index_of(id);
        }
    }

    pub fn clear(&mut self) {
        self.stop_animation();
        self.entries.clear();
        self.order.clear();
        self.dragged = None;
        self.current_index = None;
        self.invalidate();
    }

    /// Starts expanding or collapsing the entry at `index`. A repeated
    /// request in the already-active direction is a no-op; a reversal
    /// retargets the running animation from its current expansion.
    pub fn expand_at(&mut self, index: usize, direction: ExpansionDirection) {
        match self.order.get(index) {
            Some(&id) => self.expand(id, direction),
            None => warn!("expand_at: index {index} out of bounds"),
        }
    }

    pub fn expand(&mut self, id: EntryId, direction: ExpansionDirection) {
        let Some(entry) = self.entries.get_mut(id) else {
            warn!("expand: entry does not belong to this layout");
            return;
        };

        if entry.direction != direction {
            entry.direction = direction;
            let resize = match direction {
                ExpansionDirection::Collapse => AnimationFlags::RESIZE_COLLAPSE,
                ExpansionDirection::Expand => AnimationFlags::RESIZE_EXPAND,
            };
            entry.animation = (entry.animation - AnimationFlags::RESIZE) | resize;
            self.current_animation |= AnimationFlags::RESIZE;
            self.start_animation();
        }
    }

    /// Marks whether an entry's expansion was caused by pointer hover.
    /// Hover expansion is discounted when strategies plan row counts.
    pub fn set_hovered_at(&mut self, index: usize, hovered: bool) {
        let Some(&id) = self.order.get(index) else {
            warn!("set_hovered_at: index {index} out of bounds");
            return;
        };
        let entry = &mut self.entries[id];
        if entry.hovered != hovered {
            entry.hovered = hovered;
            self.invalidate();
        }
    }

    // --- queries ------------------------------------------------------------

    pub fn len(&self) -> usize { self.order.len() }

    pub fn is_empty(&self) -> bool { self.order.is_empty() }

    pub fn id_at(&self, index: usize) -> Option<EntryId> { self.order.get(index).copied() }

    pub fn index_of(&self, id: EntryId) -> Option<usize> {
        self.order.iter().position(|&other| other == id)
    }

    pub fn entry(&self, id: EntryId) -> Option<&TaskbarEntry> { self.entries.get(id) }

    pub fn entry_at(&self, index: usize) -> Option<&TaskbarEntry> {
        self.order.get(index).map(|&id| &self.entries[id])
    }

    pub fn geometry_of(&self, id: EntryId) -> Option<Rect> {
        self.entries.get(id).map(|entry| entry.rect)
    }

    pub fn row_of(&self, id: EntryId) -> Option<usize> {
        self.entries.get(id).map(|entry| entry.row)
    }

    pub fn row_of_index(&self, index: usize) -> Option<usize> {
        self.entry_at(index).map(|entry| entry.row)
    }

    pub fn ids(&self) -> impl Iterator<Item = EntryId> + '_ { self.order.iter().copied() }

    pub fn geometry(&self) -> Rect { self.geometry }

    pub fn contents_margins(&self) -> Margins { self.margins }

    pub fn orientation(&self) -> Orientation { self.orientation }

    pub fn layout_direction(&self) -> LayoutDirection { self.direction }

    pub fn spacing(&self) -> f64 { self.spacing }

    pub fn fps(&self) -> u32 { self.fps }

    pub fn animations_enabled(&self) -> bool { self.animations_enabled }

    pub fn minimum_rows(&self) -> usize { self.minimum_rows }

    pub fn maximum_rows(&self) -> usize { self.maximum_rows }

    pub fn expanded_width(&self) -> f64 { self.expanded_width }

    pub fn aspect_ratio(&self) -> f64 { self.aspect_ratio }

    pub fn expand_duration(&self) -> u32 { self.expand_duration }

    pub fn rows(&self) -> usize { self.rows }

    pub fn cell_height(&self) -> f64 { self.cell_height }

    pub fn cell_width(&self) -> f64 { self.cell_height * self.aspect_ratio }

    pub fn cell_size(&self) -> Size { Size::new(self.cell_width(), self.cell_height) }

    pub fn preferred_size(&self) -> Size { self.preferred_size }

    pub fn strategy(&self) -> &PackingStrategy { &self.strategy }

    /// How many entries the current geometry can comfortably hold. The
    /// host compares this against the live task count to decide when to
    /// start or stop grouping. Limit-squeeze answers asymmetrically:
    /// slightly below the current count to request grouping, well above
    /// it to allow ungrouping without flapping.
    pub fn optimum_capacity(&self) -> isize { self.strategy.optimum_capacity(self) }

    /// Host geometry minus contents margins. Right-to-left mode swaps
    /// the margins of the traversal axis.
    pub fn effective_geometry(&self) -> Rect {
        let Margins { mut left, mut top, mut right, mut bottom } = self.margins;

        if self.direction.is_rtl() {
            if self.orientation.is_vertical() {
                std::mem::swap(&mut top, &mut bottom);
            } else {
                std::mem::swap(&mut left, &mut right);
            }
        }

        self.geometry.adjusted(left, top, right, bottom)
    }

    /// Extra width per cell granted when expanded entries dominate.
    /// All cells are assumed equally sized; which size wins depends on
    /// whether more entries are expanded or collapsed.
    pub(crate) fn additional_width(&self) -> f64 {
        let expanded = self
            .order
            .iter()
            .filter(|&&id| self.entries[id].is_expanded())
            .count() as isize;

        if expanded - 2 >= self.order.len() as isize - expanded { self.expanded_width } else { 0.0 }
    }

    // --- host geometry and parameters ---------------------------------------

    /// Unlike the lazy parameter setters this relayouts immediately;
    /// the host hands us our allocation and expects geometry queries to
    /// be current afterwards.
    pub fn set_geometry(&mut self, rect: Rect) {
        self.geometry = rect;
        self.relayout();
    }

    pub fn set_contents_margins(&mut self, margins: Margins) {
        if self.margins != margins {
            self.margins = margins;
            self.invalidate();
        }
    }

    pub fn set_layout_direction(&mut self, direction: LayoutDirection) {
        if self.direction != direction {
            self.direction = direction;
            self.invalidate();
        }
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        if self.orientation != orientation {
            self.orientation = orientation;
            self.stop_animation();
            self.invalidate();
        }
    }

    pub fn set_spacing(&mut self, spacing: f64) {
        if spacing < 0.0 {
            warn!("set_spacing: invalid spacing {spacing}");
            return;
        }

        if self.spacing != spacing {
            self.spacing = spacing;
            self.invalidate();
        }
    }

    pub fn set_fps(&mut self, fps: u32) {
        if fps == 0 {
            warn!("set_fps: invalid fps {fps}");
            return;
        }

        self.fps = fps;
    }

    pub fn set_animations_enabled(&mut self, animations_enabled: bool) {
        self.animations_enabled = animations_enabled;

        if !animations_enabled {
            self.skip_animation();
        }
    }

    pub fn set_maximum_rows(&mut self, maximum_rows: usize) {
        if maximum_rows < 1 {
            warn!("set_maximum_rows: invalid maximum_rows {maximum_rows}");
            return;
        }

        if self.maximum_rows != maximum_rows {
            self.maximum_rows = maximum_rows;
            if self.minimum_rows > maximum_rows {
                self.minimum_rows = maximum_rows;
            }
            if self.rows > maximum_rows {
                self.invalidate();
            }
        }
    }

    pub fn set_minimum_rows(&mut self, minimum_rows: usize) {
        if minimum_rows < 1 {
            warn!("set_minimum_rows: invalid minimum_rows {minimum_rows}");
            return;
        }

        if self.minimum_rows != minimum_rows {
            self.minimum_rows = minimum_rows;
            if self.maximum_rows < minimum_rows {
                self.maximum_rows = minimum_rows;
            }
            if self.rows < minimum_rows {
                self.invalidate();
            }
        }
    }

    pub fn set_row_bounds(&mut self, minimum_rows: usize, maximum_rows: usize) {
        if minimum_rows < 1 {
            warn!("set_row_bounds: invalid minimum_rows {minimum_rows}");
            return;
        }
        if minimum_rows > maximum_rows {
            warn!("set_row_bounds: invalid row bounds {minimum_rows}..{maximum_rows}");
            return;
        }

        if self.minimum_rows != minimum_rows || self.maximum_rows != maximum_rows {
            self.minimum_rows = minimum_rows;
            self.maximum_rows = maximum_rows;
            if self.rows < minimum_rows || self.rows > maximum_rows {
                self.invalidate();
            }
        }
    }

    pub fn set_expanded_width(&mut self, expanded_width: f64) {
        if expanded_width < 0.0 {
            warn!("set_expanded_width: invalid expanded_width {expanded_width}");
            return;
        }

        if self.expanded_width != expanded_width {
            self.expanded_width = expanded_width;
            self.invalidate();
        }
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f64) {
        if aspect_ratio < 0.0 {
            warn!("set_aspect_ratio: invalid aspect_ratio {aspect_ratio}");
            return;
        }

        if self.aspect_ratio != aspect_ratio {
            self.aspect_ratio = aspect_ratio;
            self.invalidate();
        }
    }

    pub fn set_expand_duration(&mut self, expand_duration: u32) {
        self.expand_duration = expand_duration;
    }

    /// Swaps the packing strategy in place. Entries, their expansion
    /// state and any running animation carry over untouched; only the
    /// planning rules change at the next relayout.
    pub fn set_strategy(&mut self, strategy: PackingStrategy) {
        if self.strategy != strategy {
            self.strategy = strategy;
            self.invalidate();
        }
    }

    // --- relayout driver ----------------------------------------------------

    pub fn invalidate(&mut self) {
        self.needs_layout = true;
    }

    pub fn needs_layout(&self) -> bool { self.needs_layout }

    pub fn relayout_if_needed(&mut self) {
        if self.needs_layout {
            self.relayout();
        }
    }

    pub fn relayout(&mut self) {
        let strategy = self.strategy;
        let plan = strategy.plan(self);
        self.apply_plan(plan);
        self.needs_layout = false;
    }

    fn apply_plan(&mut self, plan: LayoutPlan) {
        match plan {
            LayoutPlan::Placeholder { cell_height, preferred_size } => {
                self.stop_animation();
                self.rows = 1;
                self.cell_height = cell_height;

                if self.preferred_size != preferred_size {
                    self.preferred_size = preferred_size;
                    self.events.push(LayoutEvent::SizeHintChanged(preferred_size));
                }
            }
            LayoutPlan::Rows { rows, cell_width, cell_height, max_preferred_row_width, row_infos } => {
                let effective_rect = self.effective_geometry();
                let available_width = if self.orientation.is_vertical() {
                    effective_rect.height()
                } else {
                    effective_rect.width()
                };

                self.update_layout(
                    rows,
                    cell_width,
                    cell_height,
                    available_width,
                    max_preferred_row_width,
                    &row_infos,
                    effective_rect,
                );
            }
        }
    }

    /// Splits the ordered entries into contiguous rows of at most
    /// `items_per_row` (the final row takes everything left over) and
    /// sums up each row's width demands. Returns the row infos, the row
    /// count clamped to the minimum, and the widest preferred row.
    pub(crate) fn build_rows(
        &self,
        items_per_row: usize,
        cell_width: f64,
        rows: usize,
    ) -> (Vec<RowInfo>, usize, f64) {
        let n = self.order.len();
        let spacing = self.spacing;

        let mut row_infos = Vec::new();
        let mut max_preferred_row_width: f64 = 0.0;
        let mut end_index = 0;

        let mut row = 0;
        while row < rows && end_index < n {
            let start_index = end_index;

            end_index = if row + 1 == rows {
                n
            } else {
                (start_index + items_per_row).min(n)
            };

            let row_spacing = spacing * (end_index - start_index).saturating_sub(1) as f64;
            let mut preferred_width = 0.0;
            let mut minimum_width = 0.0;

            for index in start_index..end_index {
                preferred_width += cell_width + self.entries[self.order[index]].expansion;
                minimum_width += cell_width;
            }

            if preferred_width + row_spacing > max_preferred_row_width {
                max_preferred_row_width = preferred_width + row_spacing;
            }
            row_infos.push(RowInfo::new(preferred_width, minimum_width, start_index, end_index));
            row += 1;
        }

        // Assuming everything expanded may still leave empty rows;
        // scale the layout up instead of keeping them around.
        let rows = self.minimum_rows.max(row_infos.len());

        (row_infos, rows, max_preferred_row_width)
    }

    /// Applies a planned row partition: computes destinations for every
    /// entry, squeezing expansions (then base widths) when a row does
    /// not fit, and either snaps entries there or flags them for the
    /// move animation.
    pub(crate) fn update_layout(
        &mut self,
        rows: usize,
        cell_width: f64,
        cell_height: f64,
        available_width: f64,
        max_preferred_row_width: f64,
        row_infos: &[RowInfo],
        effective_rect: Rect,
    ) {
        let is_vertical = self.orientation.is_vertical();
        let rtl = self.direction.is_rtl();
        let spacing = self.spacing;
        let animate_move = self.current_animation.intersects(AnimationFlags::MOVE);
        let old_preferred_size = self.preferred_size;

        self.rows = rows;
        self.cell_height = cell_height;

        let Margins { left, top, right, bottom } = self.margins;
        self.preferred_size = if is_vertical {
            Size::new(self.geometry.width(), top + max_preferred_row_width + bottom)
        } else {
            Size::new(left + max_preferred_row_width + right, self.geometry.height())
        };

        let mut row_offset = if is_vertical { effective_rect.left() } else { effective_rect.top() };
        let dragged = self.dragged;

        for (row, info) in row_infos.iter().enumerate() {
            let mut pos = if is_vertical { effective_rect.top() } else { effective_rect.left() };

            let row_spacings = (info.end_index - info.start_index) as f64 * spacing;
            let mut scale = 1.0;
            let mut scale_exp = 0.0;

            // scale entry widths down if necessary
            if info.preferred_width + row_spacings <= available_width {
                scale_exp = 1.0;
            } else {
                let available_exp_width = available_width - row_spacings - info.minimum_width;
                let preferred_exp_width = info.preferred_width - info.minimum_width;

                if info.minimum_width + row_spacings <= available_width
                    && preferred_exp_width > 0.0
                    && available_exp_width > 0.0
                {
                    scale_exp = available_exp_width / preferred_exp_width;
                } else if available_width > row_spacings && info.minimum_width > 0.0 {
                    scale = (available_width - row_spacings) / info.minimum_width;
                } else {
                    scale = 0.0;
                }
            }

            for index in info.start_index..info.end_index {
                let id = self.order[index];
                let entry = &mut self.entries[id];
                let width = (cell_width + entry.expansion * scale_exp) * scale;

                entry.row = row;
                if is_vertical {
                    entry.rect.size = Size::new(cell_height, width);
                    entry.dest = Point::new(
                        row_offset,
                        if rtl {
                            effective_rect.bottom() - (pos - effective_rect.top()) - width
                        } else {
                            pos
                        },
                    );
                } else {
                    entry.rect.size = Size::new(width, cell_height);
                    entry.dest = Point::new(
                        if rtl {
                            effective_rect.right() - (pos - effective_rect.left()) - width
                        } else {
                            pos
                        },
                        row_offset,
                    );
                }

                if (!animate_move || entry.is_new) && Some(id) != dragged {
                    entry.is_new = false;
                    entry.rect.move_to(entry.dest);
                } else {
                    entry.animation |= AnimationFlags::MOVE;
                }

                pos += width + spacing;
            }

            row_offset += cell_height + spacing;
        }

        if !self.current_animation.is_empty() {
            self.start_animation();
        }

        if old_preferred_size != self.preferred_size {
            self.events.push(LayoutEvent::SizeHintChanged(self.preferred_size));
        }
    }

    // --- events -------------------------------------------------------------

    pub fn take_events(&mut self) -> Vec<LayoutEvent> { std::mem::take(&mut self.events) }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_log::test;

    use super::*;
    use crate::layout_engine::strategies::{FixedItemCount, LimitSqueeze};

    fn layout_with(n: usize, rect: Rect) -> TaskbarLayout {
        let mut layout = TaskbarLayout::new(Orientation::Horizontal);
        layout.set_spacing(0.0);
        for _ in 0..n {
            layout.push(EntryKind::Task, false);
        }
        layout.set_geometry(rect);
        layout
    }

    #[test]
    fn entries_fill_a_single_row() {
        let layout = layout_with(3, Rect::new(0.0, 0.0, 300.0, 50.0));

        assert_eq!(layout.rows(), 1);
        assert_eq!(layout.cell_height(), 50.0);
        for (index, x) in [0.0, 50.0, 100.0].into_iter().enumerate() {
            let entry = layout.entry_at(index).unwrap();
            assert_eq!(entry.geometry(), Rect::new(x, 0.0, 50.0, 50.0));
            assert_eq!(entry.row(), 0);
        }
    }

    #[test]
    fn rows_partition_order_contiguously() {
        let mut layout = TaskbarLayout::new(Orientation::Horizontal);
        layout.set_strategy(FixedItemCount { items_per_row: 5 }.into());
        layout.set_maximum_rows(2);
        for _ in 0..10 {
            layout.push(EntryKind::Task, false);
        }
        layout.set_geometry(Rect::new(0.0, 0.0, 500.0, 100.0));

        assert_eq!(layout.rows(), 2);
        for index in 0..10 {
            assert_eq!(layout.row_of_index(index), Some(index / 5));
        }
        assert_eq!(layout.optimum_capacity(), 10);
    }

    #[test]
    fn relayout_is_idempotent() {
        let mut layout = layout_with(4, Rect::new(0.0, 0.0, 400.0, 40.0));
        let before: Vec<Rect> =
            (0..4).map(|index| layout.entry_at(index).unwrap().geometry()).collect();

        layout.invalidate();
        layout.relayout_if_needed();
        layout.relayout();

        let after: Vec<Rect> =
            (0..4).map(|index| layout.entry_at(index).unwrap().geometry()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn removing_last_entry_yields_placeholder() {
        let mut layout = layout_with(1, Rect::new(0.0, 0.0, 200.0, 40.0));
        layout.take_events();

        layout.remove_at(0);
        layout.relayout_if_needed();

        assert_eq!(layout.rows(), 1);
        assert_eq!(layout.preferred_size(), Size::new(10.0, 10.0));
        assert!(!layout.is_animating());
        assert_eq!(
            layout.take_events(),
            vec![LayoutEvent::SizeHintChanged(Size::new(10.0, 10.0))]
        );
    }

    #[test]
    fn invalid_setters_keep_last_good_value() {
        let mut layout = TaskbarLayout::new(Orientation::Horizontal);
        layout.set_spacing(4.0);
        layout.set_spacing(-1.0);
        assert_eq!(layout.spacing(), 4.0);

        layout.set_fps(60);
        layout.set_fps(0);
        assert_eq!(layout.fps(), 60);

        layout.set_row_bounds(2, 4);
        layout.set_row_bounds(5, 3);
        assert_eq!((layout.minimum_rows(), layout.maximum_rows()), (2, 4));

        layout.set_expanded_width(-3.0);
        assert_eq!(layout.expanded_width(), 175.0);
    }

    #[test]
    fn row_bound_setters_keep_bounds_consistent() {
        let mut layout = TaskbarLayout::new(Orientation::Horizontal);

        layout.set_minimum_rows(8);
        assert_eq!((layout.minimum_rows(), layout.maximum_rows()), (8, 8));

        layout.set_maximum_rows(3);
        assert_eq!((layout.minimum_rows(), layout.maximum_rows()), (3, 3));
    }

    #[test]
    fn move_entry_reorders_and_ids_stay_stable() {
        let mut layout = TaskbarLayout::new(Orientation::Horizontal);
        let a = layout.push(EntryKind::Task, false);
        let b = layout.push(EntryKind::Launcher, false);
        let c = layout.push(EntryKind::Group { members: 3 }, false);

        layout.move_entry(0, 2);

        assert_eq!(layout.id_at(0), Some(b));
        assert_eq!(layout.id_at(1), Some(c));
        assert_eq!(layout.id_at(2), Some(a));
        assert_eq!(layout.index_of(a), Some(2));
        assert_eq!(layout.entry(c).unwrap().kind(), EntryKind::Group { members: 3 });
    }

    #[test]
    fn insert_clamps_out_of_bounds_index() {
        let mut layout = TaskbarLayout::new(Orientation::Horizontal);
        layout.push(EntryKind::Task, false);
        let id = layout.insert(17, EntryKind::Launcher, false);

        assert_eq!(layout.index_of(id), Some(1));
    }

    #[test]
    fn expanded_insert_starts_at_full_expansion() {
        let mut layout = TaskbarLayout::new(Orientation::Horizontal);
        let id = layout.push(EntryKind::Task, true);

        let entry = layout.entry(id).unwrap();
        assert_eq!(entry.expansion(), 175.0);
        assert!(entry.is_expanded());
    }

    #[test]
    fn size_hint_event_fires_once_per_change() {
        let mut layout = layout_with(2, Rect::new(0.0, 0.0, 100.0, 20.0));
        layout.take_events();

        layout.relayout();
        assert!(layout.take_events().is_empty());

        layout.push(EntryKind::Task, false);
        layout.relayout_if_needed();
        assert_eq!(layout.take_events().len(), 1);
    }

    #[test]
    fn rtl_mirrors_destinations() {
        let mut layout = TaskbarLayout::new(Orientation::Horizontal);
        layout.set_layout_direction(LayoutDirection::RightToLeft);
        for _ in 0..2 {
            layout.push(EntryKind::Task, false);
        }
        layout.set_geometry(Rect::new(0.0, 0.0, 300.0, 50.0));

        assert_eq!(layout.entry_at(0).unwrap().geometry(), Rect::new(250.0, 0.0, 50.0, 50.0));
        assert_eq!(layout.entry_at(1).unwrap().geometry(), Rect::new(200.0, 0.0, 50.0, 50.0));
    }

    #[test]
    fn effective_geometry_swaps_margins_in_rtl() {
        let mut layout = TaskbarLayout::new(Orientation::Horizontal);
        layout.set_geometry(Rect::new(0.0, 0.0, 100.0, 50.0));
        layout.set_contents_margins(Margins { left: 10.0, top: 2.0, right: 4.0, bottom: 2.0 });

        assert_eq!(layout.effective_geometry().left(), 10.0);

        layout.set_layout_direction(LayoutDirection::RightToLeft);
        assert_eq!(layout.effective_geometry().left(), 4.0);
        assert_eq!(layout.effective_geometry().width(), 86.0);
    }

    #[test]
    fn vertical_orientation_turns_rows_into_columns() {
        let mut layout = TaskbarLayout::new(Orientation::Vertical);
        layout.set_strategy(FixedItemCount { items_per_row: 3 }.into());
        layout.set_maximum_rows(2);
        for _ in 0..6 {
            layout.push(EntryKind::Task, false);
        }
        layout.set_geometry(Rect::new(0.0, 0.0, 200.0, 300.0));

        assert_eq!(layout.rows(), 2);
        // the first column runs down the left edge
        assert_eq!(layout.entry_at(0).unwrap().geometry(), Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(layout.entry_at(2).unwrap().geometry(), Rect::new(0.0, 200.0, 100.0, 100.0));
        // the second starts one cell to the right
        assert_eq!(layout.entry_at(4).unwrap().geometry(), Rect::new(100.0, 100.0, 100.0, 100.0));
        assert_eq!(layout.preferred_size(), Size::new(200.0, 300.0));
    }

    #[test]
    fn vertical_rtl_mirrors_destinations_along_the_column() {
        let mut layout = TaskbarLayout::new(Orientation::Vertical);
        layout.set_layout_direction(LayoutDirection::RightToLeft);
        layout.set_strategy(FixedItemCount { items_per_row: 3 }.into());
        layout.set_maximum_rows(1);
        for _ in 0..3 {
            layout.push(EntryKind::Task, false);
        }
        layout.set_geometry(Rect::new(0.0, 0.0, 100.0, 300.0));

        // mirrored along the main axis, column position untouched
        assert_eq!(layout.entry_at(0).unwrap().geometry(), Rect::new(0.0, 200.0, 100.0, 100.0));
        assert_eq!(layout.entry_at(1).unwrap().geometry(), Rect::new(0.0, 100.0, 100.0, 100.0));
        assert_eq!(layout.entry_at(2).unwrap().geometry(), Rect::new(0.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn squeeze_scales_expansions_before_base_widths() {
        // 4 cells of 50 fit exactly into 200; the expansion of the
        // middle entry has no room and must be scaled away entirely.
        let mut layout = TaskbarLayout::new(Orientation::Horizontal);
        layout.set_strategy(FixedItemCount { items_per_row: 4 }.into());
        for _ in 0..4 {
            layout.push(EntryKind::Task, false);
        }
        layout.set_geometry(Rect::new(0.0, 0.0, 200.0, 50.0));
        layout.expand_at(1, ExpansionDirection::Expand);
        layout.skip_animation();

        let total: f64 =
            (0..4).map(|index| layout.entry_at(index).unwrap().geometry().width()).sum();
        assert!((total - 200.0).abs() < 1e-9);
        assert!(layout.entry_at(1).unwrap().geometry().width() - 50.0 < 1e-9);
    }

    #[test]
    fn apply_config_reaches_every_knob() {
        let mut config = Config::default();
        config.settings.spacing = 2.0;
        config.settings.minimum_rows = 2;
        config.settings.maximum_rows = 3;
        config.strategy.kind = crate::common::config::StrategyKind::LimitSqueeze;
        config.strategy.squeeze_ratio = 0.5;
        config.strategy.prefer_grouping = true;

        let layout = TaskbarLayout::with_config(Orientation::Horizontal, &config);

        assert_eq!(layout.spacing(), 2.0);
        assert_eq!((layout.minimum_rows(), layout.maximum_rows()), (2, 3));
        assert_eq!(
            *layout.strategy(),
            LimitSqueeze { squeeze_ratio: 0.5, prefer_grouping: true }.into()
        );
    }
}
