use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum_macros::{Display, EnumString};

/// The closed set of widget presentation variants.
///
/// `Floating` and `Inline` are rendered today; `Modal` and `Sidebar` are
/// reserved and rejected at mount time until their render variants land.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum WidgetType {
    /// Overlay launcher pinned to a page corner; starts collapsed.
    #[default]
    Floating,
    /// Rendered in place inside the host layout; starts expanded.
    Inline,
    /// Reserved: centered modal dialog variant.
    Modal,
    /// Reserved: slide-in sidebar variant.
    Sidebar,
}

impl WidgetType {
    /// Whether this variant has a render implementation.
    #[must_use]
    pub const fn is_available(self) -> bool {
        matches!(self, Self::Floating | Self::Inline)
    }
}

/// Open-shaped widget configuration (colors, copy, seed questions, feature
/// toggles). The concrete keys depend on the widget type, so this stays an
/// untyped JSON object with typed accessors for the keys the render
/// variants read.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct WidgetOptions(pub Map<String, Value>);

impl WidgetOptions {
    /// Shallow merge: keys present in `patch` replace the current value,
    /// keys absent from `patch` are retained.
    pub fn merge_from(&mut self, patch: &Self) {
        for (key, value) in &patch.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// Read a string-valued option.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Read a boolean feature toggle, defaulting to `false` when absent.
    #[must_use]
    pub fn flag(&self, key: &str) -> bool {
        self.0.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Read a list of strings (e.g. seed questions), skipping non-string
    /// entries.
    #[must_use]
    pub fn texts(&self, key: &str) -> Vec<String> {
        self.0
            .get(key)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether any option is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Full configuration for mounting a widget instance, as provided by the
/// host page. Unknown fields are collected into [`WidgetOptions`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmbedConfig {
    /// Id of the host element the widget mounts into.
    pub container_id: String,

    /// Presentation variant to render.
    #[serde(default)]
    pub widget_type: WidgetType,

    /// Variant-specific configuration fields.
    #[serde(flatten)]
    pub options: WidgetOptions,
}

impl EmbedConfig {
    /// Build a configuration with empty options.
    #[must_use]
    pub fn new(container_id: impl Into<String>, widget_type: WidgetType) -> Self {
        Self {
            container_id: container_id.into(),
            widget_type,
            options: WidgetOptions::default(),
        }
    }

    /// Apply a partial reconfiguration. The container is fixed at mount
    /// time and cannot be changed by an update.
    pub fn apply(&mut self, patch: &EmbedUpdate) {
        if let Some(widget_type) = patch.widget_type {
            self.widget_type = widget_type;
        }
        self.options.merge_from(&patch.options);
    }
}

/// Partial counterpart of [`EmbedConfig`]: fields present here replace the
/// corresponding current field, absent fields are retained.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmbedUpdate {
    /// Replacement presentation variant, if changing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget_type: Option<WidgetType>,

    /// Variant-specific fields to overwrite.
    #[serde(flatten)]
    pub options: WidgetOptions,
}
