use dioxus::prelude::*;

#[component]
pub fn Modal(title: String, open: Signal<bool>, on_close: EventHandler<()>, children: Element) -> Element {
    if !open() {
        return rsx! {};
    }

    rsx! {
        // Backdrop
        div {
            class: "modal-backdrop",
            onclick: move |_| on_close.call(()),

            // Clicking inside the panel must not close it
            div {
                class: "modal-panel",
                onclick: move |e| e.stop_propagation(),

                div {
                    class: "modal-header",
                    h3 { class: "modal-title", "{title}" }
                    button {
                        class: "icon-button",
                        title: "Close",
                        onclick: move |_| on_close.call(()),
                        "✕"
                    }
                }

                {children}
            }
        }
    }
}
