use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::render::AnimationFrame;
use sumi_core::config::TiltConfig;
use sumi_core::input::PointerSample;
use sumi_core::scheduler::{FrameTime, Stopper};
use sumi_core::tilt::TiltResponder;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlElement, MouseEvent};

use crate::error::MountError;
use crate::lifecycle::{Mounted, Scheduler};
use crate::mount;

struct TiltState {
    responder: TiltResponder,
    card: HtmlElement,
}

impl TiltState {
    fn apply(&self) {
        mount::set_style(&self.card, "transform", &self.responder.css_transform());
        mount::set_style(&self.card, "box-shadow", &self.responder.box_shadow());
    }
}

/// Card that tilts toward the pointer. The frame loop only runs while the
/// springs are moving.
#[wasm_bindgen]
pub struct TiltCard {
    state: Rc<RefCell<TiltState>>,
    mounted: Mounted,
}

#[wasm_bindgen]
impl TiltCard {
    #[wasm_bindgen(constructor)]
    pub fn new(element_id: &str) -> Result<TiltCard, JsValue> {
        let window = mount::window()?;
        let card = mount::element_by_id(&window, element_id)?;
        let config = TiltConfig::default();
        config.validate().map_err(MountError::from)?;

        let state = Rc::new(RefCell::new(TiltState {
            responder: TiltResponder::new(config),
            card: card.clone(),
        }));
        state.borrow().apply();

        let mut mounted = Mounted::animated("tilt card");
        let scheduler = mounted
            .scheduler()
            .cloned()
            .ok_or_else(|| JsValue::from_str("tilt card has no frame loop"))?;

        let s = state.clone();
        let sched = scheduler.clone();
        mounted.listen(EventListener::new(&card, "mousemove", move |event: &Event| {
            let Some(event) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            if let Ok(mut state) = s.try_borrow_mut() {
                let bounds = mount::bounds_of(&state.card);
                let sample = PointerSample::from_client(mount::client_point(event), bounds);
                state.responder.pointer_move(sample.normalized);
            }
            wake(&sched, &s);
        }));

        let s = state.clone();
        mounted.listen(EventListener::new(&card, "mouseleave", move |_event: &Event| {
            if let Ok(mut state) = s.try_borrow_mut() {
                state.responder.leave();
            }
            wake(&scheduler, &s);
        }));

        log::info!("tilt card mounted on #{element_id}");
        Ok(TiltCard { state, mounted })
    }

    pub fn is_settled(&self) -> bool {
        self.state.borrow().responder.is_settled()
    }

    pub fn destroy(&mut self) {
        self.mounted.teardown();
    }
}

/// Start the loop if it went idle after settling.
fn wake(scheduler: &Scheduler, state: &Rc<RefCell<TiltState>>) {
    if scheduler.is_running() {
        return;
    }
    scheduler.start(tick(state.clone(), scheduler.stopper()));
}

fn tick(
    state: Rc<RefCell<TiltState>>,
    stopper: Stopper<AnimationFrame>,
) -> impl FnMut(FrameTime) + 'static {
    move |time: FrameTime| {
        let settled = {
            let Ok(mut state) = state.try_borrow_mut() else {
                return;
            };
            state.responder.step(time.dt);
            state.apply();
            state.responder.is_settled()
        };
        if settled {
            stopper.stop();
        }
    }
}
