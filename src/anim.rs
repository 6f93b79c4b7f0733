// SPDX: CC0-1.0

//! Animation plumbing: phases, a ticker handing out cancellable timers, and
//! double buffered surfaces.

use core::time::Duration;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Nothing is running and the pointer is ignored.
    #[default]
    Idle,
    /// Frames are drawn on every tick.
    Animating,
    /// The animation is over; hovering or clicking redraws the overlay.
    Interactive,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// Repeating timer source. At most one timer is active at a time, starting
/// a new one cancels the previous.
#[derive(Debug, Default)]
pub struct Ticker {
    generation: u64,
    active: Option<(TimerHandle, Duration)>,
}

impl Ticker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, period: Duration) -> TimerHandle {
        self.generation += 1;
        let handle = TimerHandle(self.generation);
        self.active = Some((handle, period));
        handle
    }

    /// Returns whether `handle` was the active timer.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        if self.is_active(handle) {
            self.active = None;
            true
        } else {
            false
        }
    }

    pub fn cancel_all(&mut self) {
        self.active = None;
    }

    pub fn is_active(&self, handle: TimerHandle) -> bool {
        self.active.is_some_and(|(active, _)| active == handle)
    }

    pub fn period(&self) -> Option<Duration> {
        self.active.map(|(_, period)| period)
    }
}

/// Two surfaces, one shown and one drawn on. Frames are drawn on the back
/// surface and shown by swapping, so a half drawn frame is never visible.
#[derive(Debug)]
pub struct DoubleBuffer<S> {
    surfaces: [S; 2],
    front: usize,
}

impl<S> DoubleBuffer<S> {
    pub fn new(front: S, back: S) -> Self {
        Self {
            surfaces: [front, back],
            front: 0,
        }
    }

    pub fn front(&self) -> &S {
        &self.surfaces[self.front]
    }

    pub fn front_mut(&mut self) -> &mut S {
        &mut self.surfaces[self.front]
    }

    pub fn back_mut(&mut self) -> &mut S {
        &mut self.surfaces[1 - self.front]
    }

    pub fn swap(&mut self) {
        self.front = 1 - self.front;
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut S> {
        self.surfaces.iter_mut()
    }
}
