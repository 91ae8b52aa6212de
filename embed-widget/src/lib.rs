#![cfg_attr(not(test), forbid(unsafe_code))]

//! Embeddable chat widget runtime.
//!
//! This crate compiles to the standalone script a publisher drops onto an
//! arbitrary third-party page. It owns the widget mount/reconfigure/unmount
//! lifecycle, the anonymous preview session, the preview-store client, the
//! preview-to-account conversion and user-sync orchestrations, and the
//! cross-frame configuration channel used by isolation-frame embeds.

pub mod api;
pub mod channel;
pub mod components;
pub mod config;
pub mod convert;
pub(crate) mod diag;
pub mod loader;
#[cfg(target_arch = "wasm32")]
pub mod runtime;
pub mod session;
pub mod sync;

pub use loader::{RenderSurface, WidgetLoader};
