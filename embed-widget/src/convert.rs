//! Preview-to-account conversion orchestration.
//!
//! Runs when a visitor who drafted a widget configuration signs in: the
//! session's preview record is promoted into the user's permanent
//! configuration, then the local session state is cleared. The flow is
//! deliberately non-blocking — when promotion fails the experience
//! degrades to "configuration not carried over", which the user can redo
//! manually, and the page renders regardless.

use std::cell::Cell;
use std::future::Future;

use shared::WidgetResult;

use crate::api::PreviewClient;
use crate::diag;
use crate::session::{self, PreviewMode};

/// Which path the conversion orchestration took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionOutcome {
    /// A conversion was already attempted in this browsing context.
    AlreadyAttempted,
    /// No session id was stored; nothing to convert.
    NoSession,
    /// The session was an authenticated user's test preview; local state
    /// was cleared without promotion.
    CleanedUp,
    /// The preview configuration was promoted.
    Converted,
    /// The record was already converted or never existed; treated as a
    /// benign no-op.
    AlreadyDone,
    /// The remote call failed; local state was cleared anyway and the
    /// failure was logged.
    Failed,
}

thread_local! {
    static ATTEMPTED: Cell<bool> = const { Cell::new(false) };
}

/// Run the conversion flow at most once per browsing context.
///
/// The attempted-flag flips synchronously before the remote call begins,
/// so duplicate triggers from re-evaluating conditions (re-renders) observe
/// it immediately and no-op instead of racing a second conversion.
pub async fn run_conversion<F, Fut>(convert: F) -> ConversionOutcome
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = WidgetResult<()>>,
{
    if ATTEMPTED.with(|flag| flag.replace(true)) {
        return ConversionOutcome::AlreadyAttempted;
    }

    let Some(session_id) = session::current_session_id() else {
        return ConversionOutcome::NoSession;
    };

    // Re-check the marker right before acting: storage can be mutated by
    // other tabs between the trigger and this point.
    if session::preview_marker() == Some(PreviewMode::AuthenticatedPreview) {
        session::clear_session();
        session::clear_preview_marker();
        return ConversionOutcome::CleanedUp;
    }

    let outcome = match convert(session_id).await {
        Ok(()) => ConversionOutcome::Converted,
        Err(err) if err.is_benign_conversion() => ConversionOutcome::AlreadyDone,
        Err(err) => {
            diag::warn(&format!("preview conversion failed: {err}"));
            ConversionOutcome::Failed
        }
    };

    // Local state clears on every path so a broken record cannot trigger
    // a retry storm on the next sign-in.
    session::clear_session();
    session::clear_preview_marker();
    outcome
}

/// Convert the current session through the shared [`PreviewClient`].
pub async fn convert_current_session() -> ConversionOutcome {
    let client = PreviewClient::shared();
    run_conversion(move |session_id| async move { client.convert_preview(&session_id).await }).await
}
