use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::render::AnimationFrame;
use sumi_core::config::HighlightConfig;
use sumi_core::highlight::RadialHighlight;
use sumi_core::input::{Bounds, PointerSample};
use sumi_core::scheduler::{FrameTime, Stopper};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlElement, MouseEvent};

use crate::error::MountError;
use crate::lifecycle::{Mounted, Scheduler};
use crate::mount;

struct SpotlightState {
    highlight: RadialHighlight,
    /// Element the `--mx` / `--my` properties are written to.
    element: HtmlElement,
}

impl SpotlightState {
    fn apply(&self) {
        let props = self.highlight.props();
        mount::set_style(&self.element, "--mx", &props.mx);
        mount::set_style(&self.element, "--my", &props.my);
    }
}

/// Radial highlight centre that follows the pointer.
#[wasm_bindgen]
pub struct Spotlight {
    state: Rc<RefCell<SpotlightState>>,
    mounted: Mounted,
}

#[wasm_bindgen]
impl Spotlight {
    /// Percent-positioned highlight inside the element with id `element_id`.
    #[wasm_bindgen(constructor)]
    pub fn new(element_id: &str) -> Result<Spotlight, JsValue> {
        let window = mount::window()?;
        let element = mount::element_by_id(&window, element_id)?;
        let state = Self::state(HighlightConfig::default(), element.clone())?;
        let mut mounted = Mounted::passive("spotlight");

        let s = state.clone();
        let reference = element.clone();
        mounted.listen(EventListener::new(&element, "mousemove", move |event: &Event| {
            let Some(event) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            if let Ok(mut state) = s.try_borrow_mut() {
                let sample = PointerSample::from_client(mount::client_point(event), mount::bounds_of(&reference));
                state.highlight.update(sample);
                state.apply();
            }
        }));

        log::info!("spotlight mounted on #{element_id}");
        Ok(Spotlight { state, mounted })
    }

    /// Page-wide cursor follower: eased viewport pixels on the root element.
    pub fn cursor() -> Result<Spotlight, JsValue> {
        let window = mount::window()?;
        let root = mount::root_element(&window)?;
        let state = Self::state(HighlightConfig::cursor(), root)?;
        let mut mounted = Mounted::animated("cursor follower");
        let scheduler = mounted
            .scheduler()
            .cloned()
            .ok_or_else(|| JsValue::from_str("cursor follower has no frame loop"))?;

        let s = state.clone();
        let win = window.clone();
        mounted.listen(EventListener::new(&window, "mousemove", move |event: &Event| {
            let Some(event) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            if let Ok(mut state) = s.try_borrow_mut() {
                let bounds: Bounds = mount::viewport_bounds(&win);
                state
                    .highlight
                    .update(PointerSample::from_client(mount::client_point(event), bounds));
            }
            wake(&scheduler, &s);
        }));

        log::info!("cursor follower mounted");
        Ok(Spotlight { state, mounted })
    }

    /// Current centre as `[x, y]` in the highlight's unit.
    pub fn position(&self) -> Vec<f32> {
        let p = self.state.borrow().highlight.position();
        vec![p.x, p.y]
    }

    pub fn destroy(&mut self) {
        self.mounted.teardown();
    }
}

impl Spotlight {
    fn state(config: HighlightConfig, element: HtmlElement) -> Result<Rc<RefCell<SpotlightState>>, MountError> {
        config.validate()?;
        let state = SpotlightState {
            highlight: RadialHighlight::new(config),
            element,
        };
        state.apply();
        Ok(Rc::new(RefCell::new(state)))
    }
}

fn wake(scheduler: &Scheduler, state: &Rc<RefCell<SpotlightState>>) {
    if scheduler.is_running() {
        return;
    }
    scheduler.start(tick(state.clone(), scheduler.stopper()));
}

/// Eases toward the pointer and goes idle once it arrives.
fn tick(
    state: Rc<RefCell<SpotlightState>>,
    stopper: Stopper<AnimationFrame>,
) -> impl FnMut(FrameTime) + 'static {
    move |time: FrameTime| {
        let moved = {
            let Ok(mut state) = state.try_borrow_mut() else {
                return;
            };
            let moved = state.highlight.step(time.dt);
            if moved {
                state.apply();
            }
            moved
        };
        if !moved {
            stopper.stop();
        }
    }
}
