//! Per-surface animation loop.
//!
//! A [`FrameScheduler`] re-arms itself through a [`FrameClock`] once per
//! display refresh until it is stopped. Stopping is synchronous: a callback
//! already queued on the clock when `stop` runs finds its generation stale
//! and returns without ticking.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use crate::math::MAX_STEP_SECONDS;

/// Source of display-refresh callbacks.
///
/// Dropping the returned handle cancels the request.
pub trait FrameClock {
    type Handle;

    /// Call `callback` once with a millisecond timestamp at the next refresh.
    fn request_frame(&self, callback: Box<dyn FnOnce(f64)>) -> Self::Handle;
}

/// Timing passed to each tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTime {
    /// Clock timestamp of this frame, milliseconds.
    pub timestamp_ms: f64,
    /// Seconds since the previous tick, clamped to `[0, MAX_STEP_SECONDS]`;
    /// a nominal 1/60 s on the first tick after `start`.
    pub dt: f32,
    /// Seconds since the first tick after `start`.
    pub elapsed: f32,
    /// Zero-based tick counter since `start`.
    pub frame: u64,
}

type Tick = Box<dyn FnMut(FrameTime)>;

struct State<H> {
    running: bool,
    /// Bumped on every stop/start so queued callbacks can tell they are stale.
    generation: u64,
    pending: Option<H>,
    tick: Option<Tick>,
    started_at: Option<f64>,
    last_timestamp: Option<f64>,
    frame: u64,
}

/// Drives one tick per refresh between `start` and `stop`.
pub struct FrameScheduler<C: FrameClock + 'static> {
    clock: Rc<C>,
    state: Rc<RefCell<State<C::Handle>>>,
}

impl<C: FrameClock + 'static> FrameScheduler<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock: Rc::new(clock),
            state: Rc::new(RefCell::new(State {
                running: false,
                generation: 0,
                pending: None,
                tick: None,
                started_at: None,
                last_timestamp: None,
                frame: 0,
            })),
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn is_running(&self) -> bool {
        self.state.borrow().running
    }

    /// Begin ticking. A running scheduler is restarted with the new tick.
    pub fn start<F>(&self, tick: F)
    where
        F: FnMut(FrameTime) + 'static,
    {
        self.stop();
        let generation = {
            let mut state = self.state.borrow_mut();
            state.running = true;
            state.generation += 1;
            state.tick = Some(Box::new(tick));
            state.started_at = None;
            state.last_timestamp = None;
            state.frame = 0;
            state.generation
        };
        log::debug!("frame scheduler started (generation {generation})");
        arm(&self.clock, &self.state, generation);
    }

    /// Stop ticking. No tick runs after this returns; safe to call from
    /// inside a tick and safe to call repeatedly.
    pub fn stop(&self) {
        stop_state(&self.state);
    }

    /// Weak handle a tick can use to stop its own scheduler.
    pub fn stopper(&self) -> Stopper<C::Handle> {
        Stopper {
            state: Rc::downgrade(&self.state),
        }
    }
}

/// Stops a [`FrameScheduler`] without keeping it alive.
pub struct Stopper<H> {
    state: Weak<RefCell<State<H>>>,
}

impl<H> Clone for Stopper<H> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<H> Stopper<H> {
    /// Same as [`FrameScheduler::stop`]; a no-op once the scheduler is gone.
    pub fn stop(&self) {
        if let Some(state) = self.state.upgrade() {
            stop_state(&state);
        }
    }
}

fn stop_state<H>(state: &Rc<RefCell<State<H>>>) {
    let (pending, tick) = {
        let mut state = state.borrow_mut();
        if !state.running && state.pending.is_none() && state.tick.is_none() {
            return;
        }
        state.running = false;
        state.generation += 1;
        (state.pending.take(), state.tick.take())
    };
    // Dropped outside the borrow: the tick may own things that call back
    // into the scheduler when dropped.
    drop(pending);
    drop(tick);
    log::debug!("frame scheduler stopped");
}

impl<C: FrameClock + 'static> Drop for FrameScheduler<C> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn arm<C: FrameClock + 'static>(clock: &Rc<C>, state: &Rc<RefCell<State<C::Handle>>>, generation: u64) {
    let weak_state = Rc::downgrade(state);
    let weak_clock = Rc::downgrade(clock);
    let handle = clock.request_frame(Box::new(move |timestamp| {
        on_frame(weak_state, weak_clock, generation, timestamp);
    }));
    let mut state = state.borrow_mut();
    if state.running && state.generation == generation {
        state.pending = Some(handle);
    }
}

fn on_frame<C: FrameClock + 'static>(
    state: Weak<RefCell<State<C::Handle>>>,
    clock: Weak<C>,
    generation: u64,
    timestamp: f64,
) {
    let (Some(state), Some(clock)) = (state.upgrade(), clock.upgrade()) else {
        return;
    };

    // ==== 1. CHECK + TAKE TICK ====
    let (mut tick, time) = {
        let mut s = state.borrow_mut();
        if !s.running || s.generation != generation {
            return;
        }
        s.pending = None;
        let Some(tick) = s.tick.take() else {
            return;
        };
        let dt = match s.last_timestamp {
            Some(last) => ((timestamp - last) / 1000.0).clamp(0.0, MAX_STEP_SECONDS as f64) as f32,
            None => 1.0 / 60.0,
        };
        let started_at = *s.started_at.get_or_insert(timestamp);
        let time = FrameTime {
            timestamp_ms: timestamp,
            dt,
            elapsed: ((timestamp - started_at) / 1000.0).max(0.0) as f32,
            frame: s.frame,
        };
        s.last_timestamp = Some(timestamp);
        s.frame += 1;
        (tick, time)
    };

    // ==== 2. TICK (no borrow held) ====
    tick(time);

    // ==== 3. RESTORE + RE-ARM ====
    let still_current = {
        let mut s = state.borrow_mut();
        let current = s.running && s.generation == generation;
        if current {
            s.tick = Some(tick);
        }
        current
    };
    if still_current {
        arm(&clock, &state, generation);
    }
    // Otherwise the tick stopped (or restarted) the scheduler and is dropped
    // here, outside the borrow.
}

/// Clock driven by hand, for headless runs and tests.
///
/// Clones share one queue, like surfaces sharing a page's refresh.
#[derive(Clone, Default)]
pub struct ManualClock {
    queue: Rc<RefCell<VecDeque<(u64, Box<dyn FnOnce(f64)>)>>>,
    next_id: Rc<Cell<u64>>,
}

/// Cancels its queued callback when dropped.
pub struct ManualHandle {
    queue: Weak<RefCell<VecDeque<(u64, Box<dyn FnOnce(f64)>)>>>,
    id: u64,
}

impl Drop for ManualHandle {
    fn drop(&mut self) {
        if let Some(queue) = self.queue.upgrade() {
            // Firing swaps the queue out, so this never contends with `fire`.
            if let Ok(mut queue) = queue.try_borrow_mut() {
                queue.retain(|(id, _)| *id != self.id);
            }
        }
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Callbacks waiting for the next `fire`.
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Run every callback queued before this call with `timestamp_ms`.
    /// Returns how many ran.
    pub fn fire(&self, timestamp_ms: f64) -> usize {
        let due = std::mem::take(&mut *self.queue.borrow_mut());
        let count = due.len();
        for (_, callback) in due {
            callback(timestamp_ms);
        }
        count
    }
}

impl FrameClock for ManualClock {
    type Handle = ManualHandle;

    fn request_frame(&self, callback: Box<dyn FnOnce(f64)>) -> ManualHandle {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.queue.borrow_mut().push_back((id, callback));
        ManualHandle {
            queue: Rc::downgrade(&self.queue),
            id,
        }
    }
}
