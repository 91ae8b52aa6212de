pub mod errors;
pub mod messages;
pub mod preview;
pub mod widget;

pub use errors::{ErrorResponse, WidgetError, WidgetResult};
pub use messages::FrameMessage;
pub use preview::{
    ConvertPreviewRequest, CreatePreviewRequest, CreatePreviewResponse, PreviewConfig,
    SyncUserResponse, UpdateWidgetTypeRequest,
};
pub use widget::{EmbedConfig, EmbedUpdate, WidgetOptions, WidgetType};
