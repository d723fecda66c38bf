/// Page elements the viewer depends on.
///
/// All of them are looked up once at startup. A missing element is a fatal
/// startup error naming the id.
use tetra_core::{LabelPlacement, DARK_MODE_CLASS};
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlCanvasElement, HtmlElement, Window};

use crate::error::{Result, WebError};

pub const CANVAS_ID: &str = "canvas";
pub const TOGGLE_ID: &str = "dark-mode-toggle";

pub fn label_id(index: usize) -> String {
    format!("label-{index}")
}

pub struct Dom {
    pub window: Window,
    pub document: Document,
    pub body: HtmlElement,
    pub canvas: HtmlCanvasElement,
    pub toggle: HtmlElement,
    pub labels: [HtmlElement; 4],
}

impl Dom {
    pub fn locate() -> Result<Self> {
        let window = web_sys::window().ok_or(WebError::NoWindow)?;
        let document = window.document().ok_or(WebError::NoDocument)?;
        let body = document.body().ok_or(WebError::NoBody)?;

        let canvas = element_by_id::<HtmlCanvasElement>(&document, CANVAS_ID, "canvas")?;
        let toggle = element_by_id::<HtmlElement>(&document, TOGGLE_ID, "HTML element")?;
        let labels = [
            element_by_id::<HtmlElement>(&document, &label_id(0), "HTML element")?,
            element_by_id::<HtmlElement>(&document, &label_id(1), "HTML element")?,
            element_by_id::<HtmlElement>(&document, &label_id(2), "HTML element")?,
            element_by_id::<HtmlElement>(&document, &label_id(3), "HTML element")?,
        ];

        Ok(Self {
            window,
            document,
            body,
            canvas,
            toggle,
            labels,
        })
    }

    /// Logical window size in CSS pixels and the device pixel ratio
    pub fn window_size(&self) -> Result<(u32, u32, f32)> {
        let width = self.window.inner_width()?.as_f64().unwrap_or(0.0);
        let height = self.window.inner_height()?.as_f64().unwrap_or(0.0);
        let ratio = self.window.device_pixel_ratio();
        Ok((width.max(0.0) as u32, height.max(0.0) as u32, ratio as f32))
    }

    /// Sync the `dark-mode` body class with the flag
    pub fn set_dark_mode(&self, dark: bool) -> Result<()> {
        self.body
            .class_list()
            .toggle_with_force(DARK_MODE_CLASS, dark)?;
        Ok(())
    }

    /// Move each label element to its placement and show or hide it
    pub fn place_labels(&self, placements: &[LabelPlacement; 4]) -> Result<()> {
        for (element, placement) in self.labels.iter().zip(placements) {
            let style = element.style();
            style.set_property("left", &format!("{:.1}px", placement.x))?;
            style.set_property("top", &format!("{:.1}px", placement.y))?;
            style.set_property("opacity", &placement.opacity().to_string())?;
        }
        Ok(())
    }
}

fn element_by_id<T: JsCast>(document: &Document, id: &str, expected: &'static str) -> Result<T> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| WebError::MissingElement(id.to_string()))?
        .dyn_into::<T>()
        .map_err(|_| WebError::WrongElementType {
            id: id.to_string(),
            expected,
        })
}
