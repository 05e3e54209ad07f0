//! JSON calls to the game server's turn status and pause endpoints.
//!
//! Non-2xx answers surface as [`BoardError::Status`]; nothing is retried.

use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

use crate::dom;
use crate::error::{BoardError, Result};

pub async fn get_json<T: DeserializeOwned>(url: &str) -> Result<T> {
    let window = dom::window()?;
    let response = JsFuture::from(window.fetch_with_str(url)).await?;
    read_json(response).await
}

pub async fn post_json<T: DeserializeOwned>(url: &str) -> Result<T> {
    let window = dom::window()?;
    let opts = RequestInit::new();
    opts.set_method("POST");
    let request = Request::new_with_str_and_init(url, &opts)?;
    let response = JsFuture::from(window.fetch_with_request(&request)).await?;
    read_json(response).await
}

async fn read_json<T: DeserializeOwned>(response: JsValue) -> Result<T> {
    let response: Response = response
        .dyn_into()
        .map_err(|_| BoardError::WrongType("fetch response".to_string()))?;
    if !response.ok() {
        return Err(BoardError::Status(response.status()));
    }
    let body = JsFuture::from(response.text()?).await?;
    let body = body
        .as_string()
        .ok_or_else(|| BoardError::WrongType("response body".to_string()))?;
    Ok(serde_json::from_str(&body)?)
}
