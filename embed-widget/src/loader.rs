//! Widget Runtime Loader.
//!
//! One loader owns at most one mounted widget instance and walks it
//! through `unmounted -> mounted -> (reconfigured)* -> unmounted`. Mounting
//! and unmounting go through a [`RenderSurface`] so the state machine is
//! independent of the DOM; the embeddable build plugs in the Yew surface,
//! tests plug in a recording one.
//!
//! Calls are expected to arrive from a single caller context; the loader
//! does not queue or serialize concurrent callers. What it does guarantee
//! is that `init` fully tears down a previous instance before mounting a
//! new one, so a container never holds two live render trees.

use shared::{EmbedConfig, EmbedUpdate, WidgetError, WidgetResult};

use crate::diag;

/// Where widget instances are mounted.
pub trait RenderSurface {
    /// Opaque handle to a live render tree, used to reconfigure and
    /// release it.
    type Handle;

    /// Attach a new render tree for `config` into its container.
    ///
    /// # Errors
    /// Returns [`WidgetError::Environment`] when the container cannot be
    /// located in the document or there is no document at all.
    fn mount(&mut self, config: &EmbedConfig) -> WidgetResult<Self::Handle>;

    /// Re-render the live tree in place with an updated configuration.
    /// The same render tree is reused; no teardown happens here.
    fn apply(&mut self, handle: &mut Self::Handle, config: &EmbedConfig);

    /// Release the render tree and clear the container's contents.
    fn unmount(&mut self, handle: Self::Handle, container_id: &str);
}

struct ActiveWidget<H> {
    handle: H,
    config: EmbedConfig,
}

/// State machine for a single embedded widget instance.
pub struct WidgetLoader<S: RenderSurface> {
    surface: S,
    active: Option<ActiveWidget<S::Handle>>,
}

impl<S: RenderSurface> WidgetLoader<S> {
    /// Create an unmounted loader over the given surface.
    pub const fn new(surface: S) -> Self {
        Self {
            surface,
            active: None,
        }
    }

    /// Mount a widget with the given configuration, tearing down any
    /// previously mounted instance first.
    ///
    /// # Errors
    /// Returns [`WidgetError::Validation`] for a blank container id or a
    /// reserved widget type, and propagates surface mount failures. On any
    /// error the loader ends up unmounted.
    pub fn init(&mut self, config: EmbedConfig) -> WidgetResult<()> {
        if config.container_id.trim().is_empty() {
            return Err(WidgetError::Validation("a containerId is required".into()));
        }
        if !config.widget_type.is_available() {
            return Err(WidgetError::Validation(format!(
                "widget type {} is not available yet",
                config.widget_type
            )));
        }

        self.destroy();

        let handle = self.surface.mount(&config)?;
        diag::info(&format!("widget mounted in #{}", config.container_id));
        self.active = Some(ActiveWidget { handle, config });
        Ok(())
    }

    /// Shallow-merge a partial configuration into the mounted widget and
    /// re-render in place.
    ///
    /// # Errors
    /// Returns [`WidgetError::Environment`] when no widget is mounted and
    /// [`WidgetError::Validation`] when the patch switches to a reserved
    /// widget type; the current configuration is untouched in both cases.
    pub fn update(&mut self, patch: &EmbedUpdate) -> WidgetResult<()> {
        let Some(active) = self.active.as_mut() else {
            return Err(WidgetError::Environment("update called before init".into()));
        };
        if let Some(widget_type) = patch.widget_type
            && !widget_type.is_available()
        {
            return Err(WidgetError::Validation(format!(
                "widget type {widget_type} is not available yet"
            )));
        }

        active.config.apply(patch);
        self.surface.apply(&mut active.handle, &active.config);
        Ok(())
    }

    /// Release the mounted widget, if any. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        if let Some(active) = self.active.take() {
            self.surface
                .unmount(active.handle, &active.config.container_id);
            diag::info(&format!("widget unmounted from #{}", active.config.container_id));
        }
    }

    /// Whether a widget is currently mounted.
    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        self.active.is_some()
    }

    /// The configuration currently applied to the mounted widget.
    #[must_use]
    pub fn current_config(&self) -> Option<&EmbedConfig> {
        self.active.as_ref().map(|active| &active.config)
    }
}

#[cfg(target_arch = "wasm32")]
pub use dom::YewSurface;

#[cfg(target_arch = "wasm32")]
mod dom {
    use shared::{EmbedConfig, WidgetError, WidgetResult};
    use web_sys::Element;
    use yew::AppHandle;

    use super::RenderSurface;
    use crate::components::root::{WidgetRoot, WidgetRootMsg, WidgetRootProps};

    /// Live Yew application mounted into a host container.
    pub struct MountedApp {
        app: AppHandle<WidgetRoot>,
        container: Element,
    }

    /// [`RenderSurface`] backed by the host document and a Yew render tree.
    #[derive(Debug, Default)]
    pub struct YewSurface;

    impl RenderSurface for YewSurface {
        type Handle = MountedApp;

        fn mount(&mut self, config: &EmbedConfig) -> WidgetResult<Self::Handle> {
            let document = web_sys::window()
                .and_then(|window| window.document())
                .ok_or_else(|| WidgetError::Environment("no browser document".into()))?;
            let container = document
                .get_element_by_id(&config.container_id)
                .ok_or_else(|| {
                    WidgetError::Environment(format!(
                        "container #{} not found in the document",
                        config.container_id
                    ))
                })?;

            // Discard stale markup left by a previous script load.
            container.set_inner_html("");

            let app = yew::Renderer::<WidgetRoot>::with_root_and_props(
                container.clone(),
                WidgetRootProps {
                    config: config.clone(),
                },
            )
            .render();

            Ok(MountedApp { app, container })
        }

        fn apply(&mut self, handle: &mut Self::Handle, config: &EmbedConfig) {
            handle
                .app
                .send_message(WidgetRootMsg::Apply(config.clone()));
        }

        fn unmount(&mut self, handle: Self::Handle, _container_id: &str) {
            let MountedApp { app, container } = handle;
            app.destroy();
            container.set_inner_html("");
        }
    }
}
