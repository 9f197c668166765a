use super::common::Modal;
use crate::utils::{catalog, Selection, MAX_SELECTED};
use dioxus::prelude::*;

#[component]
pub fn ModelPicker(
    mut open: Signal<bool>,
    selection: Signal<Selection>,
    on_toggle: EventHandler<String>,
) -> Element {
    let current = selection.read();

    rsx! {
        Modal {
            title: "Select AI Models".to_string(),
            open,
            on_close: move |_| open.set(false),

            p {
                class: "muted centered",
                "Choose up to {MAX_SELECTED} models to compare responses. Selected: {current.len()}/{MAX_SELECTED}"
            }

            div {
                class: "model-list",

                for model in catalog().iter() {
                    {
                        let selected = current.contains(model.id);
                        let disabled = !selected && current.is_full();
                        let model_id = model.id.to_string();

                        rsx! {
                            button {
                                key: "{model.id}",
                                class: if selected {
                                    "model-option selected"
                                } else if disabled {
                                    "model-option disabled"
                                } else {
                                    "model-option"
                                },
                                title: if selected {
                                    "Click to unselect"
                                } else if disabled {
                                    "Limit reached ({MAX_SELECTED} max)"
                                } else {
                                    "Click to select"
                                },
                                onclick: move |_| {
                                    if !disabled {
                                        on_toggle.call(model_id.clone());
                                    }
                                },

                                span { class: "model-badge", "{model.badge()}" }
                                div {
                                    class: "model-option-text",
                                    span { class: "model-label", "{model.label}" }
                                    span { class: "muted small", "{model.provider_name()}" }
                                }
                                span {
                                    class: "checkbox",
                                    if selected { "✓" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
