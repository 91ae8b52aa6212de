use shared::WidgetOptions;
use yew::{Callback, Html, Properties, function_component, html, use_state};

#[derive(Properties, PartialEq)]
pub struct FloatingPanelProps {
    pub options: WidgetOptions,
}

/// Overlay widget pinned to a page corner.
///
/// Starts collapsed as a launcher bubble; clicking the launcher expands
/// the chat panel over the host page.
#[function_component(FloatingPanel)]
pub fn floating_panel(props: &FloatingPanelProps) -> Html {
    let open = use_state(|| false);

    let toggle = {
        let open = open.clone();
        Callback::from(move |_| open.set(!*open))
    };

    let title = props.options.text("title").unwrap_or("Chat with us");
    let greeting = props
        .options
        .text("greeting")
        .unwrap_or("Hi! How can we help you today?");
    let seed_questions = props.options.texts("seedQuestions");
    let theme = if props.options.flag("darkMode") {
        "chatembed-dark"
    } else {
        "chatembed-light"
    };

    html! {
        <div class={format!("chatembed-floating {theme}")}>
            if *open {
                <div class="chatembed-panel" data-testid="floating-panel">
                    <div class="chatembed-header">
                        <span class="chatembed-title">{ title }</span>
                        <button class="chatembed-close" onclick={toggle.clone()}>{ "×" }</button>
                    </div>
                    <div class="chatembed-body">
                        <p class="chatembed-greeting">{ greeting }</p>
                        if !seed_questions.is_empty() {
                            <ul class="chatembed-seed-questions">
                                { for seed_questions.iter().map(|question| html! {
                                    <li class="chatembed-seed-question">{ question }</li>
                                }) }
                            </ul>
                        }
                    </div>
                </div>
            }
            <button
                class="chatembed-launcher"
                onclick={toggle}
                data-testid="floating-launcher"
            >
                { if *open { "–" } else { "💬" } }
            </button>
        </div>
    }
}
