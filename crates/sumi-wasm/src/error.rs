use sumi_core::error::{ConfigError, SurfaceError};
use thiserror::Error;
use wasm_bindgen::JsValue;

/// Why a surface could not be mounted.
#[derive(Debug, Error)]
pub enum MountError {
    #[error("no global window")]
    NoWindow,
    #[error("no document on window")]
    NoDocument,
    #[error("no element with id `{0}`")]
    ElementNotFound(String),
    #[error("element `{0}` is not a <canvas>")]
    NotACanvas(String),
    #[error("element `{0}` is not an HTML element")]
    NotAnHtmlElement(String),
    #[error("2d context unavailable on `{0}`")]
    NoContext(String),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<MountError> for JsValue {
    fn from(err: MountError) -> Self {
        log::error!("mount failed: {err}");
        js_sys::Error::new(&err.to_string()).into()
    }
}
