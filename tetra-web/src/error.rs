use thiserror::Error;
use wasm_bindgen::JsValue;

/// Everything that can go wrong while wiring the viewer into a page
#[derive(Debug, Error)]
pub enum WebError {
    #[error("no global window")]
    NoWindow,

    #[error("window has no document")]
    NoDocument,

    #[error("document has no body")]
    NoBody,

    #[error("missing element #{0}")]
    MissingElement(String),

    #[error("element #{id} is not a {expected}")]
    WrongElementType { id: String, expected: &'static str },

    #[error("WebGL2 is not available")]
    NoWebGl2,

    #[error("failed to compile {stage} shader: {log}")]
    ShaderCompile { stage: &'static str, log: String },

    #[error("failed to link program: {0}")]
    ProgramLink(String),

    #[error("failed to allocate {0}")]
    Allocation(&'static str),

    #[error("JavaScript error: {0}")]
    Js(String),

    #[error(transparent)]
    Scene(#[from] tetra_core::TetraError),
}

impl From<JsValue> for WebError {
    fn from(value: JsValue) -> Self {
        WebError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<WebError> for JsValue {
    fn from(err: WebError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, WebError>;
