use std::rc::Rc;

use gloo::events::EventListener;
use sumi_core::scheduler::FrameScheduler;

use crate::clock::AnimationFrameClock;
use crate::mount::PixelRatioWatch;

pub type Scheduler = FrameScheduler<AnimationFrameClock>;

/// Everything a mounted surface registered with the page.
///
/// Teardown is the single exit path: it stops the frame loop and removes
/// every listener, and runs again harmlessly from `Drop`.
pub struct Mounted {
    name: &'static str,
    scheduler: Option<Rc<Scheduler>>,
    listeners: Vec<EventListener>,
    density: Option<PixelRatioWatch>,
    destroyed: bool,
}

impl Mounted {
    /// A surface driven by a frame loop.
    pub fn animated(name: &'static str) -> Self {
        Self {
            name,
            scheduler: Some(Rc::new(FrameScheduler::new(AnimationFrameClock))),
            listeners: Vec::new(),
            density: None,
            destroyed: false,
        }
    }

    /// A surface that only reacts to events.
    pub fn passive(name: &'static str) -> Self {
        Self {
            name,
            scheduler: None,
            listeners: Vec::new(),
            density: None,
            destroyed: false,
        }
    }

    /// Shared so event handlers can restart an idle loop.
    pub fn scheduler(&self) -> Option<&Rc<Scheduler>> {
        self.scheduler.as_ref()
    }

    pub fn listen(&mut self, listener: EventListener) {
        self.listeners.push(listener);
    }

    /// Reallocate on density changes that arrive without a resize.
    pub fn watch_density(&mut self, watch: PixelRatioWatch) {
        self.density = Some(watch);
    }

    /// Stop the loop and drop all listeners. Returns false if already torn
    /// down.
    pub fn teardown(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        self.destroyed = true;
        if let Some(scheduler) = &self.scheduler {
            scheduler.stop();
        }
        let count = self.listeners.len();
        self.listeners.clear();
        self.density = None;
        log::debug!("{} torn down ({count} listeners removed)", self.name);
        true
    }
}

impl Drop for Mounted {
    fn drop(&mut self) {
        self.teardown();
    }
}
