//! Cross-frame configuration channel.
//!
//! When the widget runs inside an isolation frame, configuration is
//! transmitted as cross-document messages instead of direct calls. The
//! frame announces `WIDGET_READY` to its parent once loaded; the parent
//! sends `WIDGET_CONFIG` after readiness or whenever configuration
//! changes. Delivery is fire-and-forget with no acknowledgment or replay:
//! a config message that cannot be delivered is logged and dropped, and
//! hosts are expected to wait for readiness before sending.
//!
//! Messages are exchanged with no origin restriction; the embedding host
//! is arbitrary and untrusted by design, and nothing in the protocol is
//! sensitive.

use shared::{EmbedConfig, FrameMessage, WidgetError, WidgetResult};

use crate::loader::{RenderSurface, WidgetLoader};

/// Well-known element id the widget mounts into inside an isolation
/// frame.
pub const FRAME_CONTAINER_ID: &str = "chatembed-frame-root";

/// Turn a parent-sent config message into a mountable configuration with
/// the container fixed to the in-frame element.
#[must_use]
pub fn config_from_message(message: FrameMessage) -> Option<EmbedConfig> {
    match message {
        FrameMessage::Config {
            widget_type,
            configuration,
        } => Some(EmbedConfig {
            container_id: FRAME_CONTAINER_ID.to_string(),
            widget_type,
            options: configuration,
        }),
        FrameMessage::Ready => None,
    }
}

/// Handle one raw cross-document message inside the frame.
///
/// Returns `Ok(true)` when a widget was mounted from the message and
/// `Ok(false)` for anything that is not a config message for us — host
/// pages broadcast plenty of unrelated messages, so those are ignored
/// without logging.
///
/// # Errors
/// Returns [`WidgetError::Delivery`] when the message was a config message
/// but could not be delivered to the loader; the caller logs and drops it.
pub fn dispatch_frame_message<S: RenderSurface>(
    loader: &mut WidgetLoader<S>,
    raw: &str,
) -> WidgetResult<bool> {
    let Ok(message) = serde_json::from_str::<FrameMessage>(raw) else {
        return Ok(false);
    };
    let Some(config) = config_from_message(message) else {
        return Ok(false);
    };

    loader
        .init(config)
        .map_err(|err| WidgetError::Delivery(format!("widget config dropped: {err}")))?;
    Ok(true)
}

#[cfg(target_arch = "wasm32")]
pub use browser::{connect_frame, post_widget_config};

#[cfg(target_arch = "wasm32")]
mod browser {
    use std::cell::RefCell;

    use shared::{FrameMessage, WidgetError, WidgetOptions, WidgetResult, WidgetType};
    use wasm_bindgen::{JsCast, JsValue, closure::Closure};
    use web_sys::{HtmlIFrameElement, MessageEvent};

    use super::dispatch_frame_message;
    use crate::diag;

    thread_local! {
        // Keeps listener closures alive for the page view.
        static LISTENERS: RefCell<Vec<Closure<dyn FnMut(MessageEvent)>>> =
            RefCell::new(Vec::new());
    }

    fn message_payload(message: &FrameMessage) -> WidgetResult<JsValue> {
        let json = serde_json::to_string(message)
            .map_err(|err| WidgetError::Delivery(err.to_string()))?;
        js_sys::JSON::parse(&json)
            .map_err(|_| WidgetError::Delivery("message not representable as JSON".into()))
    }

    fn raw_event_data(event: &MessageEvent) -> Option<String> {
        let data = event.data();
        // Hosts may post either an object or a pre-serialized string.
        data.as_string()
            .or_else(|| js_sys::JSON::stringify(&data).ok().map(String::from))
    }

    /// Register the in-frame message listener and announce readiness to
    /// the parent document.
    ///
    /// # Errors
    /// Returns [`WidgetError::Environment`] outside a browser window or
    /// when the document is not actually framed.
    pub fn connect_frame() -> WidgetResult<()> {
        let window = web_sys::window()
            .ok_or_else(|| WidgetError::Environment("no browser window".into()))?;

        let listener =
            Closure::<dyn FnMut(MessageEvent)>::wrap(Box::new(move |event: MessageEvent| {
                let Some(raw) = raw_event_data(&event) else {
                    return;
                };
                crate::runtime::with_loader(|loader| {
                    match dispatch_frame_message(loader, &raw) {
                        Ok(true) => diag::info("widget configured from parent frame"),
                        Ok(false) => {}
                        Err(err) => diag::error(&err.to_string()),
                    }
                });
            }));
        window
            .add_event_listener_with_callback("message", listener.as_ref().unchecked_ref())
            .map_err(|_| WidgetError::Environment("could not attach message listener".into()))?;
        LISTENERS.with(|listeners| listeners.borrow_mut().push(listener));

        let parent = window
            .parent()
            .ok()
            .flatten()
            .ok_or_else(|| WidgetError::Environment("document is not framed".into()))?;
        parent
            .post_message(&message_payload(&FrameMessage::Ready)?, "*")
            .map_err(|_| WidgetError::Delivery("could not post readiness to parent".into()))?;
        diag::info("frame ready, waiting for widget configuration");
        Ok(())
    }

    /// Parent-side helper: send a `WIDGET_CONFIG` message into an
    /// isolation frame by iframe element id.
    ///
    /// # Errors
    /// Returns [`WidgetError::Environment`] when the element is missing or
    /// not an iframe, and [`WidgetError::Delivery`] when the frame's
    /// window is not reachable yet.
    pub fn post_widget_config(
        frame_element_id: &str,
        widget_type: WidgetType,
        configuration: &WidgetOptions,
    ) -> WidgetResult<()> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| WidgetError::Environment("no browser document".into()))?;
        let frame: HtmlIFrameElement = document
            .get_element_by_id(frame_element_id)
            .ok_or_else(|| {
                WidgetError::Environment(format!("iframe #{frame_element_id} not found"))
            })?
            .dyn_into()
            .map_err(|_| {
                WidgetError::Environment(format!("#{frame_element_id} is not an iframe"))
            })?;
        let target = frame.content_window().ok_or_else(|| {
            WidgetError::Delivery("frame window not reachable yet".into())
        })?;

        let message = FrameMessage::Config {
            widget_type,
            configuration: configuration.clone(),
        };
        target
            .post_message(&message_payload(&message)?, "*")
            .map_err(|_| WidgetError::Delivery("could not post config to frame".into()))?;
        Ok(())
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared::{WidgetType, WidgetResult};

    /// Minimal surface: mounts succeed unless marked unavailable,
    /// counting mounts.
    struct StubSurface {
        available: bool,
        mounts: u32,
    }

    impl RenderSurface for StubSurface {
        type Handle = ();

        fn mount(&mut self, _config: &EmbedConfig) -> WidgetResult<()> {
            if !self.available {
                return Err(WidgetError::Environment(
                    "container #chatembed-frame-root not found in the document".into(),
                ));
            }
            self.mounts += 1;
            Ok(())
        }

        fn apply(&mut self, _handle: &mut (), _config: &EmbedConfig) {}

        fn unmount(&mut self, _handle: (), _container_id: &str) {}
    }

    fn loader(available: bool) -> WidgetLoader<StubSurface> {
        WidgetLoader::new(StubSurface {
            available,
            mounts: 0,
        })
    }

    fn config_message() -> String {
        json!({
            "type": "WIDGET_CONFIG",
            "widgetType": "floating",
            "configuration": {"title": "Need a hand?"}
        })
        .to_string()
    }

    #[test]
    fn config_message_mounts_in_the_frame_container() {
        let message: FrameMessage = serde_json::from_str(&config_message()).unwrap();
        let config = config_from_message(message).unwrap();
        assert_eq!(config.container_id, FRAME_CONTAINER_ID);
        assert_eq!(config.widget_type, WidgetType::Floating);
        assert_eq!(config.options.text("title"), Some("Need a hand?"));
    }

    #[test]
    fn ready_message_carries_no_config() {
        assert_eq!(config_from_message(FrameMessage::Ready), None);
    }

    /// Tests that a valid config message results in exactly one mount with
    /// the transmitted configuration.
    #[test]
    fn dispatch_mounts_exactly_once() {
        let mut loader = loader(true);
        assert_eq!(dispatch_frame_message(&mut loader, &config_message()), Ok(true));
        assert!(loader.is_mounted());
        assert_eq!(
            loader.current_config().unwrap().options.text("title"),
            Some("Need a hand?")
        );
    }

    /// Tests that a later config message replaces the earlier instance
    /// rather than stacking a second one.
    #[test]
    fn repeated_config_replaces_the_instance() {
        let mut loader = loader(true);
        dispatch_frame_message(&mut loader, &config_message()).unwrap();
        dispatch_frame_message(&mut loader, &config_message()).unwrap();
        assert!(loader.is_mounted());
    }

    #[test]
    fn foreign_messages_are_ignored() {
        let mut loader = loader(true);
        for raw in [
            "not json at all",
            r#"{"type":"ANALYTICS_PING"}"#,
            r#"{"type":"WIDGET_READY"}"#,
        ] {
            assert_eq!(dispatch_frame_message(&mut loader, raw), Ok(false));
        }
        assert!(!loader.is_mounted());
    }

    /// Tests that an undeliverable config message is dropped with a
    /// delivery error instead of mounting anything.
    #[test]
    fn undeliverable_config_is_dropped() {
        let mut loader = loader(false);
        let err = dispatch_frame_message(&mut loader, &config_message()).unwrap_err();
        assert!(matches!(err, WidgetError::Delivery(_)));
        assert!(!loader.is_mounted());
    }
}
