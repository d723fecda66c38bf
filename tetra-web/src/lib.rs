/// Tetra Web - WASM/WebGL2 renderer for the rotating tetrahedron
///
/// The page must provide a `#canvas`, four `#label-N` elements, a
/// `#dark-mode-toggle` control and a stylesheet with a `dark-mode` body
/// class. Call `start()` (or `start_with_config(json)`) once the DOM is ready.
use std::cell::RefCell;
use std::rc::Rc;

use tetra_core::{AppState, SceneConfig, Viewport};
use wasm_bindgen::prelude::*;
use web_sys::WebGl2RenderingContext;

pub mod dom;
pub mod error;
pub mod events;
pub mod gl;
pub mod shaders;
pub mod viewer;

pub use error::WebError;
pub use viewer::{Viewer, WebView};

use dom::Dom;
use gl::GlRenderer;

/// Runs when the module is instantiated
#[wasm_bindgen(start)]
pub fn main() {
    // Setup panic hook for better error messages in browser console
    console_error_panic_hook::set_once();
    // Fails only if a logger is already installed
    console_log::init_with_level(log::Level::Info).ok();
}

/// Launch the viewer with the default scene configuration
#[wasm_bindgen]
pub fn start() -> Result<(), JsValue> {
    launch(SceneConfig::default()).map_err(JsValue::from)
}

/// Launch the viewer with a JSON scene configuration
#[wasm_bindgen]
pub fn start_with_config(json: &str) -> Result<(), JsValue> {
    let config = SceneConfig::from_json(json).map_err(WebError::from)?;
    launch(config).map_err(JsValue::from)
}

fn launch(config: SceneConfig) -> error::Result<()> {
    let dom = Dom::locate()?;
    let (width, height, pixel_ratio) = dom.window_size()?;
    let viewport = Viewport::with_pixel_ratio(width.max(1), height.max(1), pixel_ratio)?;
    let app = AppState::new(config, viewport)?;

    let gl = dom
        .canvas
        .get_context("webgl2")?
        .ok_or(WebError::NoWebGl2)?
        .dyn_into::<WebGl2RenderingContext>()
        .map_err(|_| WebError::NoWebGl2)?;
    let renderer = GlRenderer::new(gl, app.scene())?;

    let viewer = Rc::new(RefCell::new(Viewer::new(app, WebView { dom, renderer })?));
    events::install(&viewer)?;
    events::start_animation_loop(viewer)?;

    log::info!("tetra viewer started");
    Ok(())
}
