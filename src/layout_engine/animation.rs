//! Frame-stepped animation of entry positions and expansion widths.
//!
//! The engine never owns a timer. The host drives `tick(now)` at
//! roughly `tick_interval()` while `is_animating()` reports true; the
//! engine derives the elapsed delta itself and falls back to one
//! nominal frame when the clock jumps backwards.

use std::time::Duration;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::layout_engine::engine::{TaskbarEntry, TaskbarLayout};

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct AnimationFlags: u8 {
        const MOVE_X          = 1 << 0;
        const MOVE_Y          = 1 << 1;
        const MOVE            = Self::MOVE_X.bits() | Self::MOVE_Y.bits();
        const RESIZE_COLLAPSE = 1 << 2;
        const RESIZE_EXPAND   = 1 << 3;
        const RESIZE          = Self::RESIZE_COLLAPSE.bits() | Self::RESIZE_EXPAND.bits();
    }
}

/// Which way an entry's expansion is heading. An entry is considered
/// expanded as soon as the direction flips, even mid-animation.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExpansionDirection {
    #[default]
    Collapse,
    Expand,
}

/// Movement speed of entries gliding to their destination.
const PIXELS_PER_SECOND: f64 = 500.0;

impl TaskbarEntry {
    /// Advances this entry by one frame. Position converges toward
    /// `dest` on each axis and snaps on sign crossing; expansion ramps
    /// linearly and clamps at its bound. Cleared flags mark finished
    /// sub-animations.
    fn advance(&mut self, move_step: f64, expand_step: f64, expanded_width: f64, freeze_position: bool) {
        if !freeze_position {
            if self.animation.contains(AnimationFlags::MOVE_Y) {
                let mut y = self.rect.top();
                if y < self.dest.y {
                    y += move_step;
                    if y >= self.dest.y {
                        y = self.dest.y;
                        self.animation -= AnimationFlags::MOVE_Y;
                    }
                } else {
                    y -= move_step;
                    if y <= self.dest.y {
                        y = self.dest.y;
                        self.animation -= AnimationFlags::MOVE_Y;
                    }
                }
                self.rect.move_top(y);
            }

            if self.animation.contains(AnimationFlags::MOVE_X) {
                let mut x = self.rect.left();
                if x < self.dest.x {
                    x += move_step;
                    if x >= self.dest.x {
                        x = self.dest.x;
                        self.animation -= AnimationFlags::MOVE_X;
                    }
                } else {
                    x -= move_step;
                    if x <= self.dest.x {
                        x = self.dest.x;
                        self.animation -= AnimationFlags::MOVE_X;
                    }
                }
                self.rect.move_left(x);
            }
        }

        if self.animation.contains(AnimationFlags::RESIZE_COLLAPSE) {
            self.expansion -= expand_step;
            if self.expansion <= 0.0 {
                self.expansion = 0.0;
                self.animation -= AnimationFlags::RESIZE_COLLAPSE;
            }
        } else if self.animation.contains(AnimationFlags::RESIZE_EXPAND) {
            self.expansion += expand_step;
            if self.expansion >= expanded_width {
                self.expansion = expanded_width;
                self.animation -= AnimationFlags::RESIZE_EXPAND;
            }
        }
    }
}

impl TaskbarLayout {
    /// Whether the host should keep its tick timer running.
    pub fn is_animating(&self) -> bool { self.timer_running }

    /// Suggested delay between `tick` calls.
    pub fn tick_interval(&self) -> Duration { Duration::from_millis(1000 / u64::from(self.fps)) }

    /// Advances all running animations. `now` is any monotonic-ish
    /// wall clock reading; a reading behind the previous one counts as
    /// a single nominal frame.
    pub fn tick(&mut self, now: Duration) {
        if !self.timer_running {
            return;
        }

        let now_ms = now.as_millis();
        let msecs = match self.last_tick_ms {
            Some(last) if now_ms >= last => (now_ms - last) as f64,
            _ => 1000.0 / f64::from(self.fps),
        };
        self.last_tick_ms = Some(now_ms);

        let move_step = msecs * PIXELS_PER_SECOND / 1000.0;
        let expand_step = msecs * self.expanded_width / f64::from(self.expand_duration);
        let expanded_width = self.expanded_width;
        let dragged = self.dragged;
        let mouse_in = self.mouse_in;

        let mut did_animate = AnimationFlags::empty();
        let mut will_animate = AnimationFlags::empty();

        for index in 0..self.order.len() {
            let id = self.order[index];
            let entry = &mut self.entries[id];
            if !entry.animation.is_empty() {
                did_animate |= entry.animation;
                let freeze_position = dragged == Some(id) && mouse_in;
                entry.advance(move_step, expand_step, expanded_width, freeze_position);
                will_animate |= entry.animation;
            }
        }

        if will_animate.is_empty() {
            self.stop_animation();
        }
        self.current_animation = will_animate;

        // widths depend on expansion, so a resize step dirties the layout
        if did_animate.intersects(AnimationFlags::RESIZE) {
            self.invalidate();
            self.relayout_if_needed();
        }
    }

    /// Finishes every running animation in one step: entries jump to
    /// their destinations, expansions to their target widths, and the
    /// layout is recomputed from the settled state.
    pub fn skip_animation(&mut self) {
        self.stop_animation();

        let dragged = self.dragged;
        let mouse_in = self.mouse_in;

        for index in 0..self.order.len() {
            let id = self.order[index];
            let entry = &mut self.entries[id];

            if dragged != Some(id) || !mouse_in {
                let dest = entry.dest;
                entry.rect.move_to(dest);
            }

            entry.expansion = match entry.direction {
                ExpansionDirection::Collapse => 0.0,
                ExpansionDirection::Expand => self.expanded_width,
            };
            entry.animation = AnimationFlags::empty();
        }

        self.relayout();
    }

    pub(crate) fn start_animation(&mut self) {
        if self.animations_enabled && !self.timer_running {
            self.timer_running = true;
            self.last_tick_ms = None;
        }
    }

    pub(crate) fn stop_animation(&mut self) {
        self.timer_running = false;
        self.current_animation = AnimationFlags::empty();
    }
}
