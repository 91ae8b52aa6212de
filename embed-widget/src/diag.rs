//! Diagnostics sink that works across execution environments.
//!
//! The runtime runs inside arbitrary host pages where the browser console
//! is the only observable channel; native builds (tests) route through
//! `log` instead.

#[cfg(target_arch = "wasm32")]
pub(crate) fn info(message: &str) {
    web_sys::console::log_1(&message.into());
}

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn info(message: &str) {
    log::info!("{message}");
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn warn(message: &str) {
    web_sys::console::warn_1(&message.into());
}

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn warn(message: &str) {
    log::warn!("{message}");
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn error(message: &str) {
    web_sys::console::error_1(&message.into());
}

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn error(message: &str) {
    log::error!("{message}");
}
