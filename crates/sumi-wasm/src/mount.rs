//! DOM lookups and conversions shared by every mounted surface.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo::events::EventListener;
use glam::Vec2;
use sumi_core::input::Bounds;
use sumi_core::surface::Layout;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlCanvasElement, HtmlElement, MouseEvent, Window};

use crate::error::MountError;

pub fn window() -> Result<Window, MountError> {
    web_sys::window().ok_or(MountError::NoWindow)
}

pub fn element_by_id(window: &Window, id: &str) -> Result<HtmlElement, MountError> {
    let document = window.document().ok_or(MountError::NoDocument)?;
    document
        .get_element_by_id(id)
        .ok_or_else(|| MountError::ElementNotFound(id.to_owned()))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| MountError::NotAnHtmlElement(id.to_owned()))
}

pub fn canvas_by_id(window: &Window, id: &str) -> Result<HtmlCanvasElement, MountError> {
    element_by_id(window, id)?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| MountError::NotACanvas(id.to_owned()))
}

/// `document.documentElement`, where page-wide custom properties live.
pub fn root_element(window: &Window) -> Result<HtmlElement, MountError> {
    window
        .document()
        .ok_or(MountError::NoDocument)?
        .document_element()
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        .ok_or(MountError::NoDocument)
}

/// Display density, falling back to 1 when the browser reports nonsense.
pub fn device_pixel_ratio(window: &Window) -> f32 {
    let dpr = window.device_pixel_ratio() as f32;
    if dpr.is_finite() && dpr > 0.0 {
        dpr
    } else {
        1.0
    }
}

pub fn bounds_of(element: &Element) -> Bounds {
    let rect = element.get_bounding_client_rect();
    Bounds::new(
        rect.left() as f32,
        rect.top() as f32,
        rect.width() as f32,
        rect.height() as f32,
    )
}

/// Current layout box of `element` plus the window's density.
pub fn layout_of(window: &Window, element: &Element) -> Layout {
    let bounds = bounds_of(element);
    Layout::new(bounds.width, bounds.height, device_pixel_ratio(window))
}

pub fn viewport_bounds(window: &Window) -> Bounds {
    let size = |v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32
    };
    Bounds::viewport(size(window.inner_width()), size(window.inner_height()))
}

pub fn client_point(event: &MouseEvent) -> Vec2 {
    Vec2::new(event.client_x() as f32, event.client_y() as f32)
}

/// Write one inline style property, logging instead of failing.
pub fn set_style(element: &HtmlElement, name: &str, value: &str) {
    if let Err(err) = element.style().set_property(name, value) {
        log::warn!("could not set {name}: {err:?}");
    }
}

type ListenerSlot = RefCell<Option<EventListener>>;

/// Calls back whenever the display density changes, including moves between
/// monitors that fire no window `resize`.
///
/// A `(resolution: Ndppx)` query only reports leaving its own density, so
/// the listener re-registers for the new ratio after every change. Dropping
/// the watch removes the listener.
pub struct PixelRatioWatch {
    _slot: Rc<ListenerSlot>,
}

impl PixelRatioWatch {
    pub fn new(window: &Window, on_change: impl Fn() + 'static) -> Self {
        let slot = Rc::new(RefCell::new(None));
        watch_pixel_ratio(window, Rc::downgrade(&slot), Rc::new(on_change));
        Self { _slot: slot }
    }
}

fn watch_pixel_ratio(window: &Window, slot: Weak<ListenerSlot>, on_change: Rc<dyn Fn()>) {
    let Some(current) = slot.upgrade() else {
        return;
    };
    let query = format!("(resolution: {}dppx)", window.device_pixel_ratio());
    let list = match window.match_media(&query) {
        Ok(Some(list)) => list,
        Ok(None) => {
            log::warn!("matchMedia unavailable; density changes wait for a resize");
            return;
        }
        Err(err) => {
            log::warn!("matchMedia {query} failed: {err:?}");
            return;
        }
    };
    let win = window.clone();
    let listener = EventListener::once(&list, "change", move |_event: &Event| {
        log::debug!("device pixel ratio changed");
        on_change();
        watch_pixel_ratio(&win, slot, on_change);
    });
    *current.borrow_mut() = Some(listener);
}

/// Fresh seed for a surface's random stream.
pub fn random_seed() -> u64 {
    let mut bytes = [0u8; 8];
    match getrandom::getrandom(&mut bytes) {
        Ok(()) => u64::from_le_bytes(bytes),
        Err(err) => {
            web_sys::console::warn_1(&format!("getrandom failed ({err}); seeding from the clock").into());
            js_sys::Date::now().to_bits()
        }
    }
}
