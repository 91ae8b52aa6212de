pub(crate) mod floating;
pub(crate) mod inline;
pub(crate) mod root;

// Re-export components for convenience
pub use floating::FloatingPanel;
pub use inline::InlinePanel;
pub use root::WidgetRoot;
