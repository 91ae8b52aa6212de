//! Global embedding surface.
//!
//! This is the API arbitrary host pages see: `init`/`update`/`destroy` on
//! the script's namespace object, auto-initialization from a pre-set
//! global configuration object, frame auto-connect, and the async
//! `syncUser`/`convertPreviewSession` entry points for the console.
//!
//! Nothing here throws into host-page code: every failure is converted to
//! a console diagnostic plus a no-op at this boundary.

use std::cell::RefCell;

use serde::de::DeserializeOwned;
use shared::{EmbedConfig, EmbedUpdate};
use wasm_bindgen::prelude::*;

use crate::channel;
use crate::convert::{self, ConversionOutcome};
use crate::diag;
use crate::loader::{WidgetLoader, YewSurface};
use crate::sync;

/// Well-known global the host page may pre-set to have the widget mount
/// itself at script load, without any script-based call.
pub const GLOBAL_CONFIG_KEY: &str = "ChatWidgetSettings";

thread_local! {
    static LOADER: RefCell<WidgetLoader<YewSurface>> =
        RefCell::new(WidgetLoader::new(YewSurface));
}

pub(crate) fn with_loader<R>(f: impl FnOnce(&mut WidgetLoader<YewSurface>) -> R) -> R {
    LOADER.with(|loader| f(&mut loader.borrow_mut()))
}

fn parse_js<T: DeserializeOwned>(value: &JsValue) -> Result<T, String> {
    let json = js_sys::JSON::stringify(value)
        .map_err(|_| "configuration is not representable as JSON".to_string())?;
    serde_json::from_str(&String::from(json)).map_err(|err| err.to_string())
}

/// Mount a widget into the host page.
#[wasm_bindgen]
pub fn init(config: &JsValue) {
    match parse_js::<EmbedConfig>(config) {
        Ok(config) => with_loader(|loader| {
            if let Err(err) = loader.init(config) {
                diag::error(&format!("widget init failed: {err}"));
            }
        }),
        Err(err) => diag::error(&format!("widget init failed: {err}")),
    }
}

/// Merge a partial configuration into the mounted widget.
#[wasm_bindgen]
pub fn update(patch: &JsValue) {
    match parse_js::<EmbedUpdate>(patch) {
        Ok(patch) => with_loader(|loader| {
            if let Err(err) = loader.update(&patch) {
                diag::error(&format!("widget update failed: {err}"));
            }
        }),
        Err(err) => diag::error(&format!("widget update failed: {err}")),
    }
}

/// Unmount the widget. Safe to call repeatedly.
#[wasm_bindgen]
pub fn destroy() {
    with_loader(WidgetLoader::destroy);
}

/// Ensure the signed-in identity has an application user record. Resolves
/// to the user id string, or `null` once retries are exhausted or a sync
/// already ran.
#[wasm_bindgen(js_name = syncUser)]
pub async fn sync_user() -> JsValue {
    match sync::sync_current_user().await {
        Some(user_id) => JsValue::from_str(&user_id.to_string()),
        None => JsValue::NULL,
    }
}

/// Promote the current preview session into the signed-in user's
/// configuration. Resolves to a short outcome string for diagnostics.
#[wasm_bindgen(js_name = convertPreviewSession)]
pub async fn convert_preview_session() -> JsValue {
    let outcome = convert::convert_current_session().await;
    let label = match outcome {
        ConversionOutcome::AlreadyAttempted => "already_attempted",
        ConversionOutcome::NoSession => "no_session",
        ConversionOutcome::CleanedUp => "cleaned_up",
        ConversionOutcome::Converted => "converted",
        ConversionOutcome::AlreadyDone => "already_converted",
        ConversionOutcome::Failed => "failed",
    };
    JsValue::from_str(label)
}

#[wasm_bindgen(start)]
pub fn start() {
    diag::info("chatembed widget runtime loaded");
    auto_init();
    auto_connect_frame();
}

// Static embed snippet support: the host page sets the configuration
// object before the script tag, and the widget mounts itself on load.
fn auto_init() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Ok(value) = js_sys::Reflect::get(window.as_ref(), &JsValue::from_str(GLOBAL_CONFIG_KEY))
    else {
        return;
    };
    if value.is_undefined() || value.is_null() {
        return;
    }
    diag::info("auto-initializing widget from global configuration");
    init(&value);
}

fn auto_connect_frame() {
    let in_frame = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id(channel::FRAME_CONTAINER_ID))
        .is_some();
    if in_frame
        && let Err(err) = channel::connect_frame()
    {
        diag::warn(&format!("frame connect skipped: {err}"));
    }
}
