use shared::{EmbedConfig, WidgetType};
use yew::{Component, Context, Html, Properties, html};

use super::floating::FloatingPanel;
use super::inline::InlinePanel;

#[derive(Properties, PartialEq)]
pub struct WidgetRootProps {
    pub config: EmbedConfig,
}

pub enum WidgetRootMsg {
    /// Replace the effective configuration and re-render in place.
    Apply(EmbedConfig),
}

/// Root of the mounted render tree.
///
/// A struct component rather than a function component so the loader can
/// push reconfigurations through the app handle without tearing the tree
/// down: `update` keeps internal panel state (open/closed, composer text)
/// alive across configuration changes.
pub struct WidgetRoot {
    config: EmbedConfig,
}

impl Component for WidgetRoot {
    type Message = WidgetRootMsg;
    type Properties = WidgetRootProps;

    fn create(ctx: &Context<Self>) -> Self {
        Self {
            config: ctx.props().config.clone(),
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            WidgetRootMsg::Apply(config) => {
                self.config = config;
                true
            }
        }
    }

    fn view(&self, _ctx: &Context<Self>) -> Html {
        match self.config.widget_type {
            WidgetType::Floating => html! {
                <FloatingPanel options={self.config.options.clone()} />
            },
            WidgetType::Inline => html! {
                <InlinePanel options={self.config.options.clone()} />
            },
            // Reserved variants never reach here: the loader rejects them
            // before mounting.
            WidgetType::Modal | WidgetType::Sidebar => html! {},
        }
    }
}
