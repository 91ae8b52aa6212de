use shared::WidgetOptions;
use yew::{Html, Properties, function_component, html};

#[derive(Properties, PartialEq)]
pub struct InlinePanelProps {
    pub options: WidgetOptions,
}

/// Widget rendered in place inside the host layout. Always expanded.
#[function_component(InlinePanel)]
pub fn inline_panel(props: &InlinePanelProps) -> Html {
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
        <div class={format!("chatembed-inline {theme}")} data-testid="inline-panel">
            <div class="chatembed-header">
                <span class="chatembed-title">{ title }</span>
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
}
