use crate::utils::{format_age, ThreadStore};
use dioxus::prelude::*;

#[component]
pub fn Sidebar(
    threads: Signal<ThreadStore>,
    open: Signal<bool>,
    on_new_chat: EventHandler<()>,
    on_select_thread: EventHandler<String>,
    on_delete_thread: EventHandler<String>,
    on_home: EventHandler<()>,
    on_settings: EventHandler<()>,
) -> Element {
    if !open() {
        return rsx! {};
    }

    let store = threads.read();
    let active_id = store.active_id().map(str::to_string);

    rsx! {
        aside {
            class: "sidebar",

            div {
                class: "sidebar-top",
                button {
                    class: "primary-button wide",
                    onclick: move |_| on_new_chat.call(()),
                    "💬 New Chat"
                }
            }

            div {
                class: "sidebar-threads",

                h3 { class: "section-label", "Recent Chats" }

                if store.threads().is_empty() {
                    div { class: "muted centered", "No chats yet" }
                } else {
                    for thread in store.threads().iter() {
                        {
                            let is_active = active_id.as_deref() == Some(thread.id.as_str());
                            let select_id = thread.id.clone();
                            let delete_id = thread.id.clone();
                            let title = if thread.title.is_empty() { "Untitled".to_string() } else { thread.title.clone() };

                            rsx! {
                                div {
                                    key: "{thread.id}",
                                    class: if is_active { "thread-row active" } else { "thread-row" },

                                    button {
                                        class: "thread-select",
                                        title: "{title}",
                                        onclick: move |_| on_select_thread.call(select_id.clone()),
                                        div { class: "thread-title", "{title}" }
                                        div { class: "thread-meta", "{thread.messages.len()} messages • {format_age(thread.created_at)}" }
                                    }
                                    button {
                                        class: "icon-button thread-delete",
                                        title: "Delete chat",
                                        onclick: move |evt| {
                                            evt.stop_propagation();
                                            on_delete_thread.call(delete_id.clone());
                                        },
                                        "✕"
                                    }
                                }
                            }
                        }
                    }
                }
            }

            div {
                class: "sidebar-bottom",
                button {
                    class: "ghost-button wide",
                    onclick: move |_| on_home.call(()),
                    "⌂ Back to Home"
                }
                button {
                    class: "ghost-button wide",
                    onclick: move |_| on_settings.call(()),
                    "⚙ Settings"
                }
            }
        }
    }
}
