//! Assets and black market dialogs.

use web_sys::{Document, HtmlButtonElement, HtmlDialogElement, HtmlElement, HtmlInputElement};

use crate::dom;
use crate::error::Result;

const ASSETS_DIALOG: &str = "assets";
const OPEN_ASSETS: &str = "open-assets";
const CLOSE_ASSETS: &str = "close-assets";
const USE_ASSET_BUTTONS: &str = ".use-asset-btn";
const ACTIVATED_ASSETS: &str = "activated-assets";
const ACTIVATED_CLASS: &str = "activated-asset";

const MARKET_DIALOG: &str = "black-market";
const MARKET_OPENERS: [&str; 2] = ["scs__black_market", "gchq__black_market"];
const CANCEL_MARKET: &str = "cancel-bm";
const CONFIRM_MARKET: &str = "confirm-bm";
const ACTIVE_CLASS: &str = "active";

// opener radio -> label -> option list -> action panel
const ACTION_PANEL_DEPTH: usize = 3;

/// Appends an asset id to the comma separated list sent with the move.
pub fn append_activated(current: &str, asset_id: &str) -> String {
    let current = current.trim();
    if current.split(',').any(|id| id.trim() == asset_id) {
        return current.to_string();
    }
    if current.is_empty() {
        asset_id.to_string()
    } else {
        format!("{}, {}", current, asset_id)
    }
}

fn close_on_click(button: &HtmlElement, dialog: &HtmlDialogElement) -> Result<()> {
    let dialog = dialog.clone();
    dom::listen(button, "click", move |event| {
        dialog.close();
        event.prevent_default();
        Ok(())
    })
}

pub fn handle_assets(document: &Document) -> Result<()> {
    let Some(dialog) = dom::optional_by_id::<HtmlDialogElement>(document, ASSETS_DIALOG)? else {
        return Ok(());
    };

    if let Some(open) = dom::optional_by_id::<HtmlElement>(document, OPEN_ASSETS)? {
        let dialog = dialog.clone();
        dom::listen(&open, "click", move |_| Ok(dialog.show_modal()?))?;
    }
    if let Some(close) = dom::optional_by_id::<HtmlElement>(document, CLOSE_ASSETS)? {
        close_on_click(&close, &dialog)?;
    }

    let activated: Option<HtmlInputElement> = dom::optional_by_id(document, ACTIVATED_ASSETS)?;
    for button in dom::query_all::<HtmlButtonElement>(document, USE_ASSET_BUTTONS)? {
        let activated = activated.clone();
        let source = button.clone();
        dom::listen(&button, "click", move |_| {
            let asset_id = source.dataset().get("id").unwrap_or_default();
            if let Some(parent) = source.parent_element() {
                parent.class_list().add_1(ACTIVATED_CLASS)?;
            }
            if let Some(activated) = &activated {
                activated.set_value(&append_activated(&activated.value(), &asset_id));
            }
            source.set_disabled(true);
            Ok(())
        })?;
    }
    Ok(())
}

pub fn handle_black_market(document: &Document) -> Result<()> {
    let Some(dialog) = dom::optional_by_id::<HtmlDialogElement>(document, MARKET_DIALOG)? else {
        return Ok(());
    };

    let mut openers: Vec<HtmlElement> = Vec::new();
    for id in MARKET_OPENERS {
        if let Some(opener) = dom::optional_by_id::<HtmlElement>(document, id)? {
            let dialog = dialog.clone();
            dom::listen(&opener, "change", move |_| Ok(dialog.show_modal()?))?;
            openers.push(opener);
        }
    }

    if let Some(cancel) = dom::optional_by_id::<HtmlElement>(document, CANCEL_MARKET)? {
        close_on_click(&cancel, &dialog)?;
    }
    if let Some(confirm) = dom::optional_by_id::<HtmlElement>(document, CONFIRM_MARKET)? {
        let dialog = dialog.clone();
        dom::listen(&confirm, "click", move |event| {
            dialog.close();
            for opener in &openers {
                if let Some(panel) = dom::ancestor(opener, ACTION_PANEL_DEPTH) {
                    panel.class_list().remove_1(ACTIVE_CLASS)?;
                }
            }
            event.prevent_default();
            Ok(())
        })?;
    }
    Ok(())
}
