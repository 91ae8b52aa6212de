use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::widget::{WidgetOptions, WidgetType};

/// Request to create a preview configuration for an anonymous session.
///
/// The api key is write-only: it is passed through to downstream services
/// and never echoed back in full. Creation is not idempotent on the wire,
/// so callers must guard against duplicate submission (disable the submit
/// action while a request is in flight).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreatePreviewRequest {
    /// The anonymous session the draft belongs to.
    pub session_id: String,

    /// Publisher api credential, passed through downstream.
    pub api_key: String,
}

/// Response to a successful preview-configuration creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreatePreviewResponse {
    /// Id of the created preview record.
    pub config_id: Uuid,
}

/// Request to set the widget type on an existing preview configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWidgetTypeRequest {
    /// The owning session.
    pub session_id: String,

    /// The selected presentation variant.
    pub widget_type: WidgetType,
}

/// A session's in-progress widget configuration, as returned by the
/// preview store. Every field may be absent on a partially completed
/// draft; a missing record altogether is represented by the store
/// returning no body at all, which the client maps to `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PreviewConfig {
    /// Selected presentation variant, once chosen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget_type: Option<WidgetType>,

    /// Draft widget configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<WidgetOptions>,

    /// Publisher-facing description of the draft.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Where the configuration flow should resume.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigation: Option<String>,
}

impl PreviewConfig {
    /// A draft is complete once a widget type has been chosen; an
    /// incomplete draft routes the user back to an earlier step.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.widget_type.is_some()
    }
}

/// Request to promote a session's preview configuration into the signed-in
/// user's permanent configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConvertPreviewRequest {
    /// The session whose draft is being promoted.
    pub session_id: String,
}

/// Response to the idempotent user get-or-create operation. A `null` user
/// id is the retry-able "auth context not yet attached" sentinel, not an
/// error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SyncUserResponse {
    /// The application-level user id, once attributable.
    pub user_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_request_wire_shape() {
        let request = CreatePreviewRequest {
            session_id: "abc".to_string(),
            api_key: "pk_live_123".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"sessionId": "abc", "apiKey": "pk_live_123"})
        );
    }

    #[test]
    fn preview_config_all_fields_optional() {
        let config: PreviewConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(config, PreviewConfig::default());
        assert!(!config.is_complete());
    }

    #[test]
    fn preview_config_completeness() {
        let config: PreviewConfig = serde_json::from_value(json!({
            "widgetType": "floating",
            "configuration": {"title": "Chat with us"}
        }))
        .unwrap();
        assert!(config.is_complete());
        assert_eq!(
            config.configuration.unwrap().text("title"),
            Some("Chat with us")
        );
    }

    #[test]
    fn sync_response_sentinel() {
        let not_ready: SyncUserResponse = serde_json::from_str(r#"{"userId":null}"#).unwrap();
        assert_eq!(not_ready.user_id, None);

        let ready: SyncUserResponse =
            serde_json::from_str(r#"{"userId":"f47ac10b-58cc-4372-a567-0e02b2c3d479"}"#).unwrap();
        assert!(ready.user_id.is_some());
    }
}
