//! Page configuration handed to the board by the server-rendered template.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

use crate::error::{BoardError, Result};

pub const DEFAULT_TICK_MS: i32 = 1000;
pub const DEFAULT_POLL_MS: i32 = 5000;

/// Vitality recovered -> resources spent.
pub const DEFAULT_RECOVERY_COST: [u32; 7] = [0, 1, 2, 4, 5, 6, 7];

// Page globals read when no explicit config object is passed.
const PAGE_GLOBALS: &[&str] = &[
    "turn",
    "roundEnd",
    "secondsLeft",
    "waitingForMove",
    "victor",
    "isOwner",
    "isPaused",
    "turnStartUrl",
    "pauseUrl",
    "vitality_recovery_cost",
];

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardConfig {
    #[serde(deserialize_with = "turn_number")]
    pub turn: u32,
    /// Round end as milliseconds since the epoch.
    #[serde(default)]
    pub round_end: Option<f64>,
    #[serde(default)]
    pub seconds_left: Option<f64>,
    #[serde(default, deserialize_with = "truthy")]
    pub waiting_for_move: bool,
    #[serde(default, deserialize_with = "truthy")]
    pub victor: bool,
    #[serde(default, alias = "owner", deserialize_with = "truthy")]
    pub is_owner: bool,
    #[serde(default, deserialize_with = "truthy")]
    pub is_paused: bool,
    #[serde(default)]
    pub turn_start_url: Option<String>,
    #[serde(default, alias = "pauseToggleUrl")]
    pub pause_url: Option<String>,
    #[serde(default = "default_recovery_cost", alias = "vitality_recovery_cost")]
    pub vitality_recovery_cost: Vec<u32>,
    #[serde(default = "default_tick_ms")]
    pub tick_ms: i32,
    #[serde(default = "default_poll_ms")]
    pub poll_ms: i32,
}

fn default_recovery_cost() -> Vec<u32> {
    DEFAULT_RECOVERY_COST.to_vec()
}

fn default_tick_ms() -> i32 {
    DEFAULT_TICK_MS
}

fn default_poll_ms() -> i32 {
    DEFAULT_POLL_MS
}

/// JavaScript truthiness, so template flags like `"True"`, `1` or a team
/// object all count as set.
fn truthy<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<bool, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => false,
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

fn turn_number<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u32, D::Error> {
    use serde::de::Error;

    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .and_then(|t| u32::try_from(t).ok())
            .ok_or_else(|| D::Error::custom(format!("turn {} out of range", n))),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("turn {:?} is not a number", s))),
        other => Err(D::Error::custom(format!("unexpected turn value {}", other))),
    }
}

impl BoardConfig {
    pub fn from_json(text: &str) -> Result<BoardConfig> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_js(value: &JsValue) -> Result<BoardConfig> {
        let text: String = js_sys::JSON::stringify(value)?.into();
        BoardConfig::from_json(&text)
    }

    /// Builds the config from the globals the board template assigns to
    /// `window`.
    pub fn from_window(window: &Window) -> Result<BoardConfig> {
        let mut fields = Map::new();
        for key in PAGE_GLOBALS {
            let value = js_sys::Reflect::get(window, &JsValue::from_str(key))?;
            if value.is_undefined() || value.is_function() {
                continue;
            }
            let value = match value.dyn_ref::<js_sys::Date>() {
                Some(date) => JsValue::from_f64(date.get_time()),
                None => value,
            };
            let text: String = js_sys::JSON::stringify(&value)?.into();
            fields.insert(key.to_string(), serde_json::from_str(&text)?);
        }
        if !fields.contains_key("turn") {
            return Err(BoardError::MissingGlobal("turn"));
        }
        Ok(serde_json::from_value(Value::Object(fields))?)
    }
}

/// Looks up the cost of recovering `amount` vitality. Amounts that are not
/// whole, negative or past the table have no cost.
pub fn recovery_cost(table: &[u32], amount: f64) -> Option<u32> {
    if !amount.is_finite() || amount < 0.0 || amount.fract() != 0.0 {
        return None;
    }
    table.get(amount as usize).copied()
}
