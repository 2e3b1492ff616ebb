use gloo::render::{request_animation_frame, AnimationFrame};
use sumi_core::scheduler::FrameClock;

/// `requestAnimationFrame`-backed clock. Dropping the returned
/// [`AnimationFrame`] cancels the request.
#[derive(Clone, Copy, Debug, Default)]
pub struct AnimationFrameClock;

impl FrameClock for AnimationFrameClock {
    type Handle = AnimationFrame;

    fn request_frame(&self, callback: Box<dyn FnOnce(f64)>) -> AnimationFrame {
        request_animation_frame(callback)
    }
}
