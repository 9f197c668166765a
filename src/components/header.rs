use crate::utils::Theme;
use dioxus::prelude::*;

#[component]
pub fn Header(
    theme: Signal<Theme>,
    sidebar_open: Signal<bool>,
    selected_count: usize,
    on_toggle_sidebar: EventHandler<()>,
    on_toggle_theme: EventHandler<()>,
    on_models: EventHandler<()>,
) -> Element {
    let theme_val = *theme.read();

    rsx! {
        header {
            class: "app-header",

            div {
                class: "header-left",
                button {
                    class: "icon-button",
                    title: if sidebar_open() { "Hide chats" } else { "Show chats" },
                    onclick: move |_| on_toggle_sidebar.call(()),
                    if sidebar_open() { "◀" } else { "▶" }
                }
                h1 { class: "app-title", "Fiesta" }
            }

            div {
                class: "header-right",
                button {
                    class: "secondary-button",
                    onclick: move |_| on_models.call(()),
                    "🤖 Models ({selected_count})"
                }
                button {
                    class: "icon-button",
                    title: "Toggle theme",
                    onclick: move |_| on_toggle_theme.call(()),
                    "{theme_val.toggle_icon()}"
                }
            }
        }
    }
}
