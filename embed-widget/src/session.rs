//! Session Identity Provider.
//!
//! An anonymous visitor gets an opaque session id persisted in local
//! storage; every preview-related call carries it until conversion or an
//! explicit reset. The id is a correlation key, not a credential.
//!
//! All persisted client-local state (the session id and the preview-mode
//! marker) is funneled through this module; no other call site touches the
//! underlying storage. When storage is unavailable (privacy mode), the
//! module degrades to an in-memory identifier for the duration of the page
//! view instead of failing.

use std::cell::RefCell;
use std::collections::HashMap;
use std::str::FromStr;

use uuid::Uuid;

#[cfg(target_arch = "wasm32")]
use crate::diag;

/// Storage key holding the anonymous session identifier.
pub const SESSION_KEY: &str = "chatembed_session_id";

/// Storage key holding the preview-mode marker.
pub const PREVIEW_MODE_KEY: &str = "chatembed_preview_mode";

/// How the current preview session came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewMode {
    /// The session was created by an already-authenticated user testing a
    /// preview; conversion is skipped for these, only cleanup happens.
    AuthenticatedPreview,
}

impl PreviewMode {
    /// Canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AuthenticatedPreview => "authenticated_preview",
        }
    }
}

impl FromStr for PreviewMode {
    type Err = &'static str;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "authenticated_preview" => Ok(Self::AuthenticatedPreview),
            _ => Err("unknown preview mode"),
        }
    }
}

thread_local! {
    // Page-view-scoped fallback when local storage is unavailable; also
    // the backing store on native builds.
    static MEMORY: RefCell<HashMap<String, String>> = RefCell::new(HashMap::new());
}

#[cfg(target_arch = "wasm32")]
fn store_read(key: &str) -> Option<String> {
    use gloo_storage::{LocalStorage, Storage};
    match LocalStorage::get::<String>(key) {
        Ok(value) => Some(value),
        Err(_) => MEMORY.with(|memory| memory.borrow().get(key).cloned()),
    }
}

#[cfg(target_arch = "wasm32")]
fn store_write(key: &str, value: &str) {
    use gloo_storage::{LocalStorage, Storage};
    if let Err(err) = LocalStorage::set(key, value) {
        diag::warn(&format!(
            "local storage unavailable, keeping {key} in memory: {err}"
        ));
        MEMORY.with(|memory| {
            memory.borrow_mut().insert(key.to_string(), value.to_string());
        });
    }
}

#[cfg(target_arch = "wasm32")]
fn store_remove(key: &str) {
    use gloo_storage::{LocalStorage, Storage};
    LocalStorage::delete(key);
    MEMORY.with(|memory| {
        memory.borrow_mut().remove(key);
    });
}

#[cfg(not(target_arch = "wasm32"))]
fn store_read(key: &str) -> Option<String> {
    MEMORY.with(|memory| memory.borrow().get(key).cloned())
}

#[cfg(not(target_arch = "wasm32"))]
fn store_write(key: &str, value: &str) {
    MEMORY.with(|memory| {
        memory.borrow_mut().insert(key.to_string(), value.to_string());
    });
}

#[cfg(not(target_arch = "wasm32"))]
fn store_remove(key: &str) {
    MEMORY.with(|memory| {
        memory.borrow_mut().remove(key);
    });
}

/// Read the persisted session id, creating and persisting a fresh one if
/// absent. Repeated calls within the same browsing context return the same
/// value.
pub fn get_or_create_session_id() -> String {
    if let Some(id) = store_read(SESSION_KEY) {
        return id;
    }
    let id = Uuid::new_v4().to_string();
    store_write(SESSION_KEY, &id);
    id
}

/// Read the persisted session id without creating one.
#[must_use]
pub fn current_session_id() -> Option<String> {
    store_read(SESSION_KEY)
}

/// Unconditionally replace the current identifier with a fresh one. Used
/// when the session is known to be stale, e.g. after conversion.
pub fn refresh_session() -> String {
    let id = Uuid::new_v4().to_string();
    store_write(SESSION_KEY, &id);
    id
}

/// Remove the persisted identifier; the next `get_or_create_session_id`
/// produces a fresh one.
pub fn clear_session() {
    store_remove(SESSION_KEY);
}

/// Read the preview-mode marker, if one is set and recognized.
#[must_use]
pub fn preview_marker() -> Option<PreviewMode> {
    store_read(PREVIEW_MODE_KEY).and_then(|value| value.parse().ok())
}

/// Mark the current session as an authenticated user's test preview.
pub fn mark_authenticated_preview() {
    store_write(PREVIEW_MODE_KEY, PreviewMode::AuthenticatedPreview.as_str());
}

/// Remove the preview-mode marker.
pub fn clear_preview_marker() {
    store_remove(PREVIEW_MODE_KEY);
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests that repeated calls return the same identifier.
    #[test]
    fn get_or_create_is_stable() {
        let first = get_or_create_session_id();
        let second = get_or_create_session_id();
        assert_eq!(first, second);
        assert_eq!(current_session_id(), Some(first));
    }

    /// Tests that refresh always yields a different identifier.
    #[test]
    fn refresh_replaces_the_identifier() {
        let original = get_or_create_session_id();
        let refreshed = refresh_session();
        assert_ne!(original, refreshed);
        assert_eq!(current_session_id(), Some(refreshed));
    }

    #[test]
    fn clear_then_create_yields_a_fresh_identifier() {
        let original = get_or_create_session_id();
        clear_session();
        assert_eq!(current_session_id(), None);
        let fresh = get_or_create_session_id();
        assert_ne!(original, fresh);
    }

    #[test]
    fn session_ids_parse_as_uuids() {
        clear_session();
        let id = get_or_create_session_id();
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn preview_marker_roundtrip() {
        assert_eq!(preview_marker(), None);
        mark_authenticated_preview();
        assert_eq!(preview_marker(), Some(PreviewMode::AuthenticatedPreview));
        clear_preview_marker();
        assert_eq!(preview_marker(), None);
    }

    #[test]
    fn unknown_marker_values_are_ignored() {
        store_write(PREVIEW_MODE_KEY, "somebody_elses_marker");
        assert_eq!(preview_marker(), None);
        clear_preview_marker();
    }

    #[test]
    fn preview_mode_string_form() {
        assert_eq!(
            PreviewMode::AuthenticatedPreview.as_str(),
            "authenticated_preview"
        );
        assert!("guest".parse::<PreviewMode>().is_err());
    }
}
