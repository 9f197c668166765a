use crate::utils::{ImageAttachment, InputSettings, IMAGE_EXTENSIONS};
use dioxus::prelude::*;

/// Prompt text plus an optional picked image
pub type Submission = (String, Option<ImageAttachment>);

#[component]
pub fn ChatInput(
    input_settings: Signal<InputSettings>,
    loading: bool,
    on_send: EventHandler<Submission>,
) -> Element {
    let mut input_text = use_signal(String::new);
    let mut image = use_signal(|| None::<ImageAttachment>);
    let mut image_error = use_signal(|| None::<String>);

    let mut submit = move || {
        let text = input_text.read().clone();
        if text.trim().is_empty() {
            return;
        }
        let attachment = image.write().take();
        on_send.call((text, attachment));
        input_text.set(String::new());
        image_error.set(None);
    };

    let pick_image = move |_| {
        spawn(async move {
            let Some(file) = rfd::AsyncFileDialog::new()
                .set_title("Attach image")
                .add_filter("Images", IMAGE_EXTENSIONS)
                .pick_file()
                .await
            else {
                return;
            };

            let file_name = file.file_name();
            let bytes = file.read().await;
            match ImageAttachment::from_bytes(&file_name, &bytes) {
                Some(attachment) => {
                    tracing::debug!(file = %file_name, size = bytes.len(), "Image attached");
                    image.set(Some(attachment));
                    image_error.set(None);
                }
                None => {
                    tracing::warn!(file = %file_name, "Unsupported image file");
                    image_error.set(Some(format!("Cannot attach {}", file_name)));
                }
            }
        });
    };

    let handle_keydown = move |evt: KeyboardEvent| {
        let ctrl_enter_submit = input_settings.read().ctrl_enter_submit;
        let ctrl = evt.modifiers().contains(Modifiers::CONTROL);

        // Shift+Enter always inserts a newline
        if evt.key() == Key::Enter && !evt.modifiers().contains(Modifiers::SHIFT) && ctrl == ctrl_enter_submit {
            evt.prevent_default();
            submit();
        }
    };

    let has_content = !input_text.read().trim().is_empty();
    let has_image = image.read().is_some();

    rsx! {
        div {
            class: "chat-input",

            if let Some(attachment) = image() {
                div {
                    class: "attachment-chip",
                    span { "🖼 {attachment.file_name}" }
                    span { class: "muted small", "sent to Gemini models only" }
                    button {
                        class: "icon-button",
                        title: "Remove image",
                        onclick: move |_| image.set(None),
                        "✕"
                    }
                }
            }

            if let Some(message) = image_error() {
                div { class: "attachment-error small", "{message}" }
            }

            div {
                class: "chat-input-row",

                button {
                    class: if has_image { "icon-button active" } else { "icon-button" },
                    title: "Attach image",
                    onclick: pick_image,
                    "📎"
                }

                textarea {
                    value: "{input_text}",
                    oninput: move |evt| input_text.set(evt.value()),
                    onkeydown: handle_keydown,
                    placeholder: if input_settings.read().ctrl_enter_submit {
                        "Ask all selected models... (Ctrl+Enter to send)"
                    } else {
                        "Ask all selected models... (Enter to send)"
                    },
                    autofocus: true,
                }

                button {
                    class: "send-button",
                    disabled: !has_content,
                    onclick: move |_| submit(),
                    if loading { "…" } else { "➤" }
                }
            }
        }
    }
}
