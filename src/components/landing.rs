use crate::utils::catalog;
use dioxus::prelude::*;

#[component]
pub fn Landing(on_start: EventHandler<()>) -> Element {
    rsx! {
        div {
            class: "landing",

            h1 { class: "landing-title", "Fiesta" }
            p {
                class: "landing-tagline",
                "Ask once. Compare answers from up to five models side by side."
            }

            div {
                class: "landing-models",
                for model in catalog().iter() {
                    span {
                        key: "{model.id}",
                        class: "model-chip",
                        span { class: "model-badge", "{model.badge()}" }
                        "{model.label}"
                    }
                }
            }

            button {
                class: "primary-button large",
                onclick: move |_| on_start.call(()),
                "Get started"
            }

            p {
                class: "muted small",
                "Bring your own Gemini or OpenRouter key from Settings for higher limits."
            }
        }
    }
}
