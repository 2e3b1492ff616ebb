use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use sumi_core::config::TrailConfig;
use sumi_core::input::{PointerCell, PointerTracker};
use sumi_core::quality::AdaptiveBudget;
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

struct TrailState {
    system: ParticleSystem,
    surface: SurfaceController,
    target: CanvasTarget,
    budget: AdaptiveBudget,
    burst: usize,
}

/// Full-page ink trail that follows the cursor.
#[wasm_bindgen]
pub struct ParticleTrail {
    state: Rc<RefCell<TrailState>>,
    mounted: Mounted,
}

#[wasm_bindgen]
impl ParticleTrail {
    /// Mount on the `<canvas>` with id `canvas_id` and start animating.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<ParticleTrail, JsValue> {
        let window = mount::window()?;
        let canvas = mount::canvas_by_id(&window, canvas_id)?;
        let config = TrailConfig::default();
        config.validate().map_err(MountError::from)?;

        let mut target = CanvasTarget::new(canvas.clone(), canvas_id)?;
        let mut surface = SurfaceController::new();
        surface
            .initialize(mount::layout_of(&window, &canvas), &mut target)
            .map_err(MountError::from)?;

        let burst = config.burst;
        let budget = AdaptiveBudget::new(config.physics.max_particles);
        let mut system = ParticleSystem::trail(config, mount::random_seed());
        system.set_extent(surface.css_size());

        let state = Rc::new(RefCell::new(TrailState {
            system,
            surface,
            target,
            budget,
            burst,
        }));
        let mut mounted = Mounted::animated("particle trail");
        let tracker = PointerTracker::new();
        let cell = tracker.cell();

        mounted.listen(move_listener(&window, &canvas, tracker, state.clone()));
        mounted.listen(resize_listener(&window, &canvas, state.clone()));
        mounted.watch_density(density_watch(&window, &canvas, state.clone()));
        if let Some(scheduler) = mounted.scheduler() {
            scheduler.start(tick(state.clone(), cell));
        }

        log::info!("particle trail mounted on #{canvas_id}");
        Ok(ParticleTrail { state, mounted })
    }

    pub fn particle_count(&self) -> usize {
        self.state.borrow().system.len()
    }

    pub fn capacity(&self) -> usize {
        self.state.borrow().system.capacity()
    }

    /// Pointer to the live particles as packed `f32`s (9 per particle).
    /// Valid until the next frame.
    pub fn buffer_ptr(&self) -> *const f32 {
        self.state.borrow().system.as_floats().as_ptr()
    }

    pub fn buffer_byte_length(&self) -> usize {
        std::mem::size_of_val(self.state.borrow().system.as_floats())
    }

    /// Let frame time drive the particle cap.
    pub fn set_adaptive(&mut self, enabled: bool) {
        let mut state = self.state.borrow_mut();
        state.budget.enabled = enabled;
        let cap = state.budget.capacity();
        state.system.set_capacity(cap);
    }

    pub fn set_budget_ms(&mut self, budget_ms: f32) {
        if budget_ms.is_finite() && budget_ms > 0.0 {
            self.state.borrow_mut().budget.budget_ms = budget_ms;
        }
    }

    /// Particles spawned per pointer move.
    pub fn set_burst(&mut self, burst: usize) {
        self.state.borrow_mut().burst = burst;
    }

    /// Stop animating and remove all listeners. Safe to call twice.
    pub fn destroy(&mut self) {
        if self.mounted.teardown() {
            self.state.borrow_mut().surface.release();
        }
    }
}

fn move_listener(
    window: &Window,
    canvas: &HtmlCanvasElement,
    mut tracker: PointerTracker,
    state: Rc<RefCell<TrailState>>,
) -> EventListener {
    let canvas = canvas.clone();
    EventListener::new(window, "mousemove", move |event: &Event| {
        let Some(event) = event.dyn_ref::<MouseEvent>() else {
            return;
        };
        let sample = tracker.on_pointer_move(mount::client_point(event), mount::bounds_of(&canvas));
        let Ok(mut state) = state.try_borrow_mut() else {
            return;
        };
        let burst = state.burst;
        state.system.spawn(sample.local.x, sample.local.y, burst);
    })
}

fn resize_listener(
    window: &Window,
    canvas: &HtmlCanvasElement,
    state: Rc<RefCell<TrailState>>,
) -> EventListener {
    let canvas = canvas.clone();
    let win = window.clone();
    EventListener::new(window, "resize", move |_event: &Event| refit(&win, &canvas, &state))
}

fn density_watch(
    window: &Window,
    canvas: &HtmlCanvasElement,
    state: Rc<RefCell<TrailState>>,
) -> PixelRatioWatch {
    let canvas = canvas.clone();
    let win = window.clone();
    PixelRatioWatch::new(window, move || refit(&win, &canvas, &state))
}

/// Resize the backing buffer to the canvas's current layout and density.
fn refit(window: &Window, canvas: &HtmlCanvasElement, state: &RefCell<TrailState>) {
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
        Err(err) => log::warn!("particle trail resize skipped: {err}"),
    }
}

fn tick(state: Rc<RefCell<TrailState>>, pointer: PointerCell) -> impl FnMut(FrameTime) + 'static {
    move |time: FrameTime| {
        let Ok(mut state) = state.try_borrow_mut() else {
            return;
        };
        let state = &mut *state;
        let started = js_sys::Date::now();

        // Particles only exist after a move, so the latest sample is real.
        state.system.frame(&mut state.target, pointer.latest().local, time.dt);

        let elapsed = (js_sys::Date::now() - started) as f32;
        if let Some(cap) = state.budget.update(elapsed) {
            state.system.set_capacity(cap);
        }
    }
}
