use super::common::Modal;
use crate::utils::{ApiKeys, InputSettings, Provider};
use dioxus::prelude::*;

#[component]
pub fn KeySettings(
    mut open: Signal<bool>,
    api_keys: Signal<ApiKeys>,
    input_settings: Signal<InputSettings>,
    on_save: EventHandler<ApiKeys>,
    on_input_settings_change: EventHandler<InputSettings>,
) -> Element {
    let mut gemini = use_signal(String::new);
    let mut openrouter = use_signal(String::new);

    // Re-seed the fields from the stored keys each time the modal opens
    use_effect(move || {
        if open() {
            let keys = api_keys.peek();
            gemini.set(keys.gemini.clone().unwrap_or_default());
            openrouter.set(keys.openrouter.clone().unwrap_or_default());
        }
    });

    let save = move |_| {
        on_save.call(ApiKeys::new(&gemini.read(), &openrouter.read()));
        open.set(false);
    };

    let ctrl_enter_submit = input_settings.read().ctrl_enter_submit;
    let saved = |provider: Provider| {
        if api_keys.read().has_key(provider) {
            "Saved"
        } else {
            "Not set"
        }
    };
    let gemini_status = saved(Provider::Gemini);
    let openrouter_status = saved(Provider::OpenRouter);

    rsx! {
        Modal {
            title: "API Keys".to_string(),
            open,
            on_close: move |_| open.set(false),

            div {
                class: "settings-body",

                p {
                    class: "muted small",
                    "Keys are stored locally on this machine and sent only with your requests. Leave a field blank to use the shared key, if one is configured."
                }

                div {
                    class: "field",
                    div {
                        class: "field-header",
                        label { "Gemini API Key" }
                        span { class: "muted small", "{gemini_status}" }
                        a {
                            href: "https://aistudio.google.com/app/apikey",
                            target: "_blank",
                            class: "link small",
                            "Get Key ↗"
                        }
                    }
                    input {
                        r#type: "password",
                        value: "{gemini}",
                        oninput: move |evt| gemini.set(evt.value()),
                        placeholder: "AIza...",
                    }
                }

                div {
                    class: "field",
                    div {
                        class: "field-header",
                        label { "OpenRouter API Key" }
                        span { class: "muted small", "{openrouter_status}" }
                        a {
                            href: "https://openrouter.ai/settings/keys",
                            target: "_blank",
                            class: "link small",
                            "Get Key ↗"
                        }
                    }
                    input {
                        r#type: "password",
                        value: "{openrouter}",
                        oninput: move |evt| openrouter.set(evt.value()),
                        placeholder: "sk-or-...",
                    }
                }

                label {
                    class: "checkbox-row",
                    input {
                        r#type: "checkbox",
                        checked: ctrl_enter_submit,
                        onchange: move |evt| {
                            on_input_settings_change.call(InputSettings {
                                ctrl_enter_submit: evt.checked(),
                            });
                        },
                    }
                    span {
                        if ctrl_enter_submit {
                            "Ctrl+Enter sends, Enter adds a new line"
                        } else {
                            "Enter sends, Shift+Enter adds a new line"
                        }
                    }
                }

                div {
                    class: "modal-actions",
                    button {
                        class: "secondary-button",
                        onclick: move |_| open.set(false),
                        "Cancel"
                    }
                    button {
                        class: "primary-button",
                        onclick: save,
                        "Save Keys"
                    }
                }
            }
        }
    }
}
