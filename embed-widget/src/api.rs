use once_cell::unsync::OnceCell;
use reqwest::{Client, Response, StatusCode};
use shared::{
    ConvertPreviewRequest, CreatePreviewRequest, CreatePreviewResponse, ErrorResponse,
    PreviewConfig, SyncUserResponse, UpdateWidgetTypeRequest, WidgetError, WidgetResult,
    WidgetType,
};
use uuid::Uuid;

use crate::config::RuntimeConfig;

thread_local! {
    static SHARED_CLIENT: OnceCell<PreviewClient> = OnceCell::new();
}

/// Client for the preview-configuration store and the user sync endpoint.
#[derive(Clone, Debug)]
pub struct PreviewClient {
    base_url: String,
    client: Client,
}

impl PreviewClient {
    /// Create a new API client with the provided base URL.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// The client shared by the whole page view.
    pub fn shared() -> Self {
        SHARED_CLIENT.with(|cell| {
            cell.get_or_init(|| Self::new(RuntimeConfig::default().api_base_url()))
                .clone()
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Create a preview configuration for an anonymous session.
    ///
    /// Not idempotent on the wire: callers must disable the submit action
    /// while a request is in flight.
    ///
    /// # Errors
    /// [`WidgetError::Validation`] for a blank api key (checked before any
    /// network call), [`WidgetError::Transport`] for HTTP-level failures.
    pub async fn create_preview_config(
        &self,
        session_id: &str,
        api_key: &str,
    ) -> WidgetResult<Uuid> {
        if api_key.trim().is_empty() {
            return Err(WidgetError::Validation("an api key is required".into()));
        }

        let url = self.api_url("preview-configs");
        let payload = CreatePreviewRequest {
            session_id: session_id.to_string(),
            api_key: api_key.to_string(),
        };
        let response = self
            .client
            .post(url)
            .json(&payload)
            .send()
            .await
            .map_err(transport)?;
        if !response.status().is_success() {
            return Err(fail_from(response, "failed to create preview configuration").await);
        }
        let body: CreatePreviewResponse = response.json().await.map_err(transport)?;
        Ok(body.config_id)
    }

    /// Set the widget type on the session's preview configuration.
    ///
    /// # Errors
    /// [`WidgetError::NotFound`] when no preview configuration exists yet
    /// for the session.
    pub async fn update_widget_type(
        &self,
        session_id: &str,
        widget_type: WidgetType,
    ) -> WidgetResult<()> {
        let url = self.api_url(&format!("preview-configs/{session_id}/widget-type"));
        let payload = UpdateWidgetTypeRequest {
            session_id: session_id.to_string(),
            widget_type,
        };
        let response = self
            .client
            .put(url)
            .json(&payload)
            .send()
            .await
            .map_err(transport)?;
        if !response.status().is_success() {
            return Err(fail_from(response, "failed to update widget type").await);
        }
        Ok(())
    }

    /// Fetch the session's preview configuration.
    ///
    /// A missing record is an expected state for a fresh session, so it
    /// comes back as `Ok(None)` — "not yet configured" — and callers route
    /// the user to an earlier step rather than treating it as a fault.
    ///
    /// # Errors
    /// [`WidgetError::Transport`] for HTTP-level failures.
    pub async fn get_preview_config(
        &self,
        session_id: &str,
    ) -> WidgetResult<Option<PreviewConfig>> {
        let url = self.api_url(&format!("preview-configs/{session_id}"));
        let response = self.client.get(url).send().await.map_err(transport)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(fail_from(response, "failed to fetch preview configuration").await);
        }
        // The store returns a JSON null body for sessions it has never
        // seen; both spellings of "no record" map to None.
        response.json::<Option<PreviewConfig>>().await.map_err(transport)
    }

    /// Promote the session's preview configuration into the signed-in
    /// user's permanent configuration.
    ///
    /// # Errors
    /// [`WidgetError::NotFound`] when the session has no preview record,
    /// [`WidgetError::AlreadyConverted`] when it was promoted before; both
    /// are benign for the conversion flow.
    pub async fn convert_preview(&self, session_id: &str) -> WidgetResult<()> {
        let url = self.api_url(&format!("preview-configs/{session_id}/convert"));
        let payload = ConvertPreviewRequest {
            session_id: session_id.to_string(),
        };
        let response = self
            .client
            .post(url)
            .json(&payload)
            .send()
            .await
            .map_err(transport)?;
        if !response.status().is_success() {
            return Err(fail_from(response, "failed to convert preview session").await);
        }
        Ok(())
    }

    /// Idempotent get-or-create for the signed-in identity's application
    /// user record. `Ok(None)` means the backend cannot attribute the
    /// request to the identity yet and the call should be retried.
    ///
    /// # Errors
    /// [`WidgetError::Transport`] for HTTP-level failures.
    pub async fn sync_user(&self) -> WidgetResult<Option<Uuid>> {
        let url = self.api_url("users/sync");
        let response = self.client.post(url).send().await.map_err(transport)?;
        if !response.status().is_success() {
            return Err(fail_from(response, "failed to sync user").await);
        }
        let body: SyncUserResponse = response.json().await.map_err(transport)?;
        Ok(body.user_id)
    }
}

fn transport(err: reqwest::Error) -> WidgetError {
    WidgetError::Transport(err.to_string())
}

async fn fail_from(response: Response, context: &str) -> WidgetError {
    let status = response.status();
    let detail = response
        .json::<ErrorResponse>()
        .await
        .map_or_else(|_| context.to_string(), |body| body.to_string());
    classify_status(status, &detail)
}

/// Map an HTTP status to the error taxonomy.
fn classify_status(status: StatusCode, detail: &str) -> WidgetError {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            WidgetError::Validation(detail.to_string())
        }
        StatusCode::NOT_FOUND => WidgetError::NotFound(detail.to_string()),
        StatusCode::CONFLICT => WidgetError::AlreadyConverted,
        _ => WidgetError::Transport(format!("{status}: {detail}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn test_api_url_building() {
        let client = PreviewClient::new("https://api.chatembed.dev/api/");
        assert_eq!(
            client.api_url("/preview-configs"),
            "https://api.chatembed.dev/api/preview-configs"
        );
        assert_eq!(
            client.api_url("preview-configs/abc/convert"),
            "https://api.chatembed.dev/api/preview-configs/abc/convert"
        );
    }

    /// Tests that an empty api key is rejected inline before any network
    /// activity.
    #[test]
    fn test_create_rejects_blank_api_key() {
        let client = PreviewClient::new("http://127.0.0.1:1/api");
        for api_key in ["", "   "] {
            let err = block_on(client.create_preview_config("session", api_key)).unwrap_err();
            assert!(matches!(err, WidgetError::Validation(_)));
        }
    }

    #[test]
    fn test_classify_status() {
        assert!(matches!(
            classify_status(StatusCode::BAD_REQUEST, "bad"),
            WidgetError::Validation(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::UNPROCESSABLE_ENTITY, "bad"),
            WidgetError::Validation(_)
        ));
        assert_eq!(
            classify_status(StatusCode::NOT_FOUND, "no preview configuration"),
            WidgetError::NotFound("no preview configuration".to_string())
        );
        assert_eq!(
            classify_status(StatusCode::CONFLICT, "already converted"),
            WidgetError::AlreadyConverted
        );
        assert!(matches!(
            classify_status(StatusCode::INTERNAL_SERVER_ERROR, "boom"),
            WidgetError::Transport(_)
        ));
    }

    #[test]
    fn test_conversion_error_benignity_by_status() {
        assert!(classify_status(StatusCode::NOT_FOUND, "gone").is_benign_conversion());
        assert!(classify_status(StatusCode::CONFLICT, "done").is_benign_conversion());
        assert!(!classify_status(StatusCode::BAD_GATEWAY, "down").is_benign_conversion());
    }
}
