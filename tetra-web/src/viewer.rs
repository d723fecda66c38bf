/// The running viewer: application state plus its browser outputs
use tetra_core::{AppState, Camera, FrameRenderer, LabelPlacement, Scene, TetraError, Viewport};

use crate::dom::Dom;
use crate::error::{Result, WebError};
use crate::gl::GlRenderer;

/// Browser side of a frame: label elements and the WebGL canvas
pub struct WebView {
    pub dom: Dom,
    pub renderer: GlRenderer,
}

impl FrameRenderer for WebView {
    type Error = WebError;

    fn place_labels(&mut self, labels: &[LabelPlacement; 4]) -> Result<()> {
        self.dom.place_labels(labels)
    }

    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<()> {
        self.renderer.render(scene, camera);
        Ok(())
    }
}

pub struct Viewer {
    pub app: AppState,
    pub view: WebView,
}

impl Viewer {
    pub fn new(app: AppState, view: WebView) -> Result<Self> {
        let viewer = Self { app, view };
        viewer.apply_viewport(viewer.app.viewport())?;
        viewer.view.dom.set_dark_mode(viewer.app.display_mode().is_dark())?;
        Ok(viewer)
    }

    pub fn frame(&mut self) -> Result<()> {
        self.app.frame(&mut self.view)
    }

    /// Follow the window size. Zero-sized windows are skipped.
    pub fn resize(&mut self) -> Result<()> {
        let (width, height, pixel_ratio) = self.view.dom.window_size()?;
        match self.app.resize(width, height, pixel_ratio) {
            Ok(viewport) => self.apply_viewport(viewport),
            Err(err @ TetraError::EmptyViewport { .. }) => {
                log::warn!("keeping previous size: {err}");
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn toggle_display_mode(&mut self) -> Result<()> {
        let mode = self.app.toggle_display_mode();
        self.view.dom.set_dark_mode(mode.is_dark())
    }

    /// Resize the canvas backing store and its CSS box
    fn apply_viewport(&self, viewport: Viewport) -> Result<()> {
        let canvas = &self.view.dom.canvas;
        let (physical_width, physical_height) = viewport.physical_size();
        canvas.set_width(physical_width);
        canvas.set_height(physical_height);

        let style = canvas.style();
        style.set_property("width", &format!("{}px", viewport.width))?;
        style.set_property("height", &format!("{}px", viewport.height))?;

        self.view.renderer.resize(&viewport);
        Ok(())
    }
}
