#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod models;

pub use models::errors::{ErrorResponse, WidgetError, WidgetResult};
pub use models::messages::FrameMessage;
pub use models::preview::{
    ConvertPreviewRequest, CreatePreviewRequest, CreatePreviewResponse, PreviewConfig,
    SyncUserResponse, UpdateWidgetTypeRequest,
};
pub use models::widget::{EmbedConfig, EmbedUpdate, WidgetOptions, WidgetType};
