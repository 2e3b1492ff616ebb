use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use sumi_core::config::RakeConfig;
use sumi_core::ink::InkCanvas;
use sumi_core::input::PointerSample;
use sumi_core::surface::SurfaceController;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlCanvasElement, MouseEvent, Window};

use crate::context::CanvasTarget;
use crate::error::MountError;
use crate::lifecycle::Mounted;
use crate::mount::{self, PixelRatioWatch};

struct GardenState {
    ink: InkCanvas,
    surface: SurfaceController,
    target: CanvasTarget,
    canvas: HtmlCanvasElement,
}

impl GardenState {
    fn local(&self, event: &MouseEvent) -> PointerSample {
        PointerSample::from_client(mount::client_point(event), mount::bounds_of(&self.canvas))
    }
}

/// Persistent rake canvas. Strokes are drawn inside the move handler, one
/// segment per event.
#[wasm_bindgen]
pub struct ZenGarden {
    state: Rc<RefCell<GardenState>>,
    mounted: Mounted,
}

#[wasm_bindgen]
impl ZenGarden {
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<ZenGarden, JsValue> {
        let window = mount::window()?;
        let canvas = mount::canvas_by_id(&window, canvas_id)?;
        let config = RakeConfig::default();
        config.validate().map_err(MountError::from)?;

        let mut target = CanvasTarget::new(canvas.clone(), canvas_id)?;
        let mut surface = SurfaceController::new();
        surface
            .initialize(mount::layout_of(&window, &canvas), &mut target)
            .map_err(MountError::from)?;
        let mut ink = InkCanvas::new(config, mount::random_seed());
        ink.initialize(surface.css_size(), &mut target);

        let state = Rc::new(RefCell::new(GardenState {
            ink,
            surface,
            target,
            canvas: canvas.clone(),
        }));
        let mut mounted = Mounted::passive("zen garden");

        let s = state.clone();
        mounted.listen(EventListener::new(&canvas, "mousedown", move |event: &Event| {
            let (Some(event), Ok(mut state)) = (event.dyn_ref::<MouseEvent>(), s.try_borrow_mut()) else {
                return;
            };
            let at = state.local(event).local;
            state.ink.pointer_down(at);
        }));

        let s = state.clone();
        mounted.listen(EventListener::new(&canvas, "mousemove", move |event: &Event| {
            let (Some(event), Ok(mut state)) = (event.dyn_ref::<MouseEvent>(), s.try_borrow_mut()) else {
                return;
            };
            let at = state.local(event).local;
            let state = &mut *state;
            state.ink.pointer_move(at, &mut state.target);
        }));

        let s = state.clone();
        mounted.listen(EventListener::new(&canvas, "mouseup", move |_event: &Event| {
            if let Ok(mut state) = s.try_borrow_mut() {
                state.ink.pointer_up();
            }
        }));

        let s = state.clone();
        mounted.listen(EventListener::new(&canvas, "mouseleave", move |_event: &Event| {
            if let Ok(mut state) = s.try_borrow_mut() {
                state.ink.pointer_leave();
            }
        }));

        mounted.listen(resize_listener(&window, state.clone()));
        let (win, s) = (window.clone(), state.clone());
        mounted.watch_density(PixelRatioWatch::new(&window, move || refit(&win, &s)));

        log::info!("zen garden mounted on #{canvas_id}");
        Ok(ZenGarden { state, mounted })
    }

    pub fn is_drawing(&self) -> bool {
        self.state.borrow().ink.is_active()
    }

    /// Segments raked since the canvas was last (re)initialised.
    pub fn stroke_count(&self) -> f64 {
        self.state.borrow().ink.stroke_count() as f64
    }

    pub fn destroy(&mut self) {
        if self.mounted.teardown() {
            self.state.borrow_mut().surface.release();
        }
    }
}

fn resize_listener(window: &Window, state: Rc<RefCell<GardenState>>) -> EventListener {
    let win = window.clone();
    EventListener::new(window, "resize", move |_event: &Event| refit(&win, &state))
}

/// Reallocation wipes the canvas, so the paper is repainted and the drawing
/// is lost.
fn refit(window: &Window, state: &RefCell<GardenState>) {
    let Ok(mut state) = state.try_borrow_mut() else {
        return;
    };
    let state = &mut *state;
    let layout = mount::layout_of(window, &state.canvas);
    match state.surface.on_resize(layout, &mut state.target) {
        Ok(change) if change.is_fresh() => {
            let extent = state.surface.css_size();
            state.ink.initialize(extent, &mut state.target);
        }
        Ok(_) => {}
        Err(err) => log::warn!("zen garden resize skipped: {err}"),
    }
}
