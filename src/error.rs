use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("no global `{0}` exists")]
    MissingGlobal(&'static str),
    #[error("element {0} has an unexpected type")]
    WrongType(String),
    #[error("javascript error: {0}")]
    Js(String),
    #[error("server answered with status {0}")]
    Status(u16),
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BoardError>;

impl From<JsValue> for BoardError {
    fn from(value: JsValue) -> Self {
        let message = value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value));
        BoardError::Js(message)
    }
}

impl From<BoardError> for JsValue {
    fn from(err: BoardError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
