//! Browser side of the war game board, compiled to WebAssembly.
//!
//! The server renders the board; this crate attaches the interactive bits
//! once the page has loaded. `run_board` wires the board page and
//! `run_new_game` the game creation form.

use wasm_bindgen::prelude::*;
use web_sys::Document;

pub mod actions;
pub mod arrows;
pub mod config;
pub mod countdown;
pub mod dialogs;
pub mod dom;
pub mod error;
pub mod net;
pub mod teams;
pub mod transfer;

pub use config::BoardConfig;
pub use error::BoardError;

// --- IMPORTS & LOGGING ---
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    pub(crate) fn log(s: &str);
    #[wasm_bindgen(js_namespace = console)]
    pub(crate) fn warn(s: &str);
    #[wasm_bindgen(js_namespace = console, js_name = error)]
    pub(crate) fn log_error(s: &str);
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

// --- ENTRY POINTS ---

/// Wires the board page. Pass the page configuration object, or nothing to
/// read it from the globals the board template sets on `window`.
#[wasm_bindgen]
pub fn run_board(config: JsValue) -> std::result::Result<(), JsValue> {
    let window = dom::window()?;
    let document = dom::document()?;
    let config = if config.is_undefined() || config.is_null() {
        BoardConfig::from_window(&window)?
    } else {
        BoardConfig::from_js(&config)?
    };
    install_board(&document, &config)?;
    Ok(())
}

#[wasm_bindgen]
pub fn run_new_game() -> std::result::Result<(), JsValue> {
    let document = dom::document()?;
    teams::ensure_player_on_one_team(&document)?;
    Ok(())
}

pub fn install_board(document: &Document, config: &BoardConfig) -> error::Result<()> {
    actions::highlight_on_hover(document, ".attack", "attack-target")?;
    actions::highlight_on_hover(document, ".transfer", "transfer-target")?;
    actions::show_only_selected_action(document)?;
    actions::display_revitalize_cost(document, &config.vitality_recovery_cost)?;
    transfer::limit_transfer_amounts(document)?;
    if config.victor {
        log(&format!("Game over at turn {}, countdown disabled", config.turn));
    } else {
        countdown::install(document, config)?;
    }
    dialogs::handle_assets(document)?;
    dialogs::handle_black_market(document)?;
    arrows::install(document)?;
    log(&format!("Board ready for turn {}", config.turn));
    Ok(())
}
