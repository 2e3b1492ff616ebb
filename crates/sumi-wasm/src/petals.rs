use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use sumi_core::config::PetalConfig;
use sumi_core::input::{PointerCell, PointerTracker};
use sumi_core::scheduler::FrameTime;
use sumi_core::surface::SurfaceController;
use sumi_core::system::ParticleSystem;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlCanvasElement, MouseEvent, Window};

use crate::context::CanvasTarget;
use crate::error::MountError;
use crate::lifecycle::Mounted;
use crate::mount::{self, PixelRatioWatch};

struct PetalState {
    system: ParticleSystem,
    surface: SurfaceController,
    target: CanvasTarget,
}

/// Wind-blown petal field behind the hero section.
#[wasm_bindgen]
pub struct PetalField {
    state: Rc<RefCell<PetalState>>,
    mounted: Mounted,
}

#[wasm_bindgen]
impl PetalField {
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<PetalField, JsValue> {
        let window = mount::window()?;
        let canvas = mount::canvas_by_id(&window, canvas_id)?;
        let config = PetalConfig::default();
        config.validate().map_err(MountError::from)?;

        let mut target = CanvasTarget::new(canvas.clone(), canvas_id)?;
        let mut surface = SurfaceController::new();
        surface
            .initialize(mount::layout_of(&window, &canvas), &mut target)
            .map_err(MountError::from)?;

        let mut system = ParticleSystem::petals(config, mount::random_seed());
        system.set_extent(surface.css_size());

        let state = Rc::new(RefCell::new(PetalState {
            system,
            surface,
            target,
        }));
        let mut mounted = Mounted::animated("petal field");
        let tracker = PointerTracker::new();
        let cell = tracker.cell();

        mounted.listen(move_listener(&window, &canvas, tracker));
        mounted.listen(resize_listener(&window, &canvas, state.clone()));
        mounted.watch_density(density_watch(&window, &canvas, state.clone()));
        if let Some(scheduler) = mounted.scheduler() {
            scheduler.start(tick(state.clone(), cell));
        }

        log::info!("petal field mounted on #{canvas_id}");
        Ok(PetalField { state, mounted })
    }

    pub fn particle_count(&self) -> usize {
        self.state.borrow().system.len()
    }

    pub fn buffer_ptr(&self) -> *const f32 {
        self.state.borrow().system.as_floats().as_ptr()
    }

    pub fn buffer_byte_length(&self) -> usize {
        std::mem::size_of_val(self.state.borrow().system.as_floats())
    }

    /// Scatter a fresh field.
    pub fn reset(&mut self) {
        self.state.borrow_mut().system.reset();
    }

    pub fn destroy(&mut self) {
        if self.mounted.teardown() {
            self.state.borrow_mut().surface.release();
        }
    }
}

/// Tracks the pointer across the whole window so petals react as it
/// approaches the canvas from outside.
fn move_listener(window: &Window, canvas: &HtmlCanvasElement, mut tracker: PointerTracker) -> EventListener {
    let canvas = canvas.clone();
    EventListener::new(window, "mousemove", move |event: &Event| {
        if let Some(event) = event.dyn_ref::<MouseEvent>() {
            tracker.on_pointer_move(mount::client_point(event), mount::bounds_of(&canvas));
        }
    })
}

fn resize_listener(
    window: &Window,
    canvas: &HtmlCanvasElement,
    state: Rc<RefCell<PetalState>>,
) -> EventListener {
    let canvas = canvas.clone();
    let win = window.clone();
    EventListener::new(window, "resize", move |_event: &Event| refit(&win, &canvas, &state))
}

fn density_watch(
    window: &Window,
    canvas: &HtmlCanvasElement,
    state: Rc<RefCell<PetalState>>,
) -> PixelRatioWatch {
    let canvas = canvas.clone();
    let win = window.clone();
    PixelRatioWatch::new(window, move || refit(&win, &canvas, &state))
}

fn refit(window: &Window, canvas: &HtmlCanvasElement, state: &RefCell<PetalState>) {
    let Ok(mut state) = state.try_borrow_mut() else {
        return;
    };
    let state = &mut *state;
    match state
        .surface
        .on_resize(mount::layout_of(window, canvas), &mut state.target)
    {
        Ok(change) if change.is_fresh() => state.system.set_extent(state.surface.css_size()),
        Ok(_) => {}
        Err(err) => log::warn!("petal field resize skipped: {err}"),
    }
}

fn tick(state: Rc<RefCell<PetalState>>, pointer: PointerCell) -> impl FnMut(FrameTime) + 'static {
    move |time: FrameTime| {
        let Ok(mut state) = state.try_borrow_mut() else {
            return;
        };
        let state = &mut *state;
        // Normalised so the pre-move default sits at the centre.
        let at = pointer.latest().normalized * state.surface.css_size();
        state.system.frame(&mut state.target, at, time.dt);
    }
}
