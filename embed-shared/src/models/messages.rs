use serde::{Deserialize, Serialize};

use super::widget::{WidgetOptions, WidgetType};

/// The cross-frame configuration protocol.
///
/// When a widget runs inside an isolation frame, configuration travels as
/// cross-document messages instead of direct calls. The frame announces
/// readiness to its parent; the parent sends configuration to the frame.
/// Delivery is fire-and-forget: there is no acknowledgment and no replay,
/// so hosts should wait for `WIDGET_READY` before sending configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum FrameMessage {
    /// Frame → parent: the frame's document finished loading and the
    /// runtime is listening for configuration.
    #[serde(rename = "WIDGET_READY")]
    Ready,

    /// Parent → frame: mount (or remount) the widget with this
    /// configuration.
    #[serde(rename = "WIDGET_CONFIG")]
    #[serde(rename_all = "camelCase")]
    Config {
        /// Presentation variant to render inside the frame.
        widget_type: WidgetType,
        /// Variant-specific configuration fields.
        configuration: WidgetOptions,
    },
}
