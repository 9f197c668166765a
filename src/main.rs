use dioxus::prelude::*;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

mod components;
mod utils;

use components::{
    ChatInput, CompareGrid, Header, KeySettings, Landing, ModelPicker, Sidebar, Submission,
};
use utils::{
    ApiKeys, AppStore, AppView, DispatchEvent, Dispatcher, InputSettings, ProviderRouter,
    Settings, SharedThreads, Theme, ThreadStore, ToggleOutcome, ACTIVE_THREAD_KEY, API_KEYS_KEY,
    MAX_SELECTED, SELECTED_MODELS_KEY, SHOW_LANDING_KEY, SIDEBAR_OPEN_KEY, THEME_KEY, THREADS_KEY,
};

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    dioxus::launch(App);
}

/// Copy the shared thread state into the view and persist it.
async fn sync_threads(shared: &SharedThreads, store: &AppStore, mut view: Signal<ThreadStore>) {
    let snapshot = shared.lock().await.clone();
    store.persist(THREADS_KEY, snapshot.threads());
    store.persist(ACTIVE_THREAD_KEY, &snapshot.active_id());
    view.set(snapshot);
}

#[component]
fn App() -> Element {
    let settings = use_hook(|| {
        Settings::load().unwrap_or_else(|e| {
            tracing::error!("Failed to load settings: {}", e);
            Settings::default()
        })
    });
    let store = use_hook(AppStore::open_default);
    let initial_threads = use_hook(|| ThreadStore::new(store.threads(), store.active_thread()));

    let thread_view = use_signal(|| initial_threads.clone());
    let mut pending = use_signal(Vec::<String>::new);
    let mut selection = use_signal(|| store.selection());
    let mut api_keys = use_signal(|| store.api_keys());
    let mut theme = use_signal(|| store.load::<Theme>(THEME_KEY));
    let mut sidebar_open = use_signal(|| store.sidebar_open());
    let mut show_landing = use_signal(|| store.show_landing());
    let mut input_settings = use_signal(|| InputSettings {
        ctrl_enter_submit: settings.ctrl_enter_submit,
    });
    let mut models_open = use_signal(|| false);
    let mut keys_open = use_signal(|| false);
    let mut notice = use_signal(|| None::<String>);

    let dispatcher = use_hook(|| {
        let router = ProviderRouter::new(settings.clone()).unwrap_or_else(|e| {
            tracing::error!("Failed to build HTTP clients: {}", e);
            ProviderRouter::empty(settings.clone())
        });
        let (tx, mut rx) = mpsc::unbounded_channel();
        let dispatcher =
            Dispatcher::new(router, initial_threads.clone().into_shared()).with_events(tx);

        let watcher = dispatcher.clone();
        let shared = dispatcher.threads();
        let store = store.clone();
        spawn(async move {
            pending.set(watcher.pending().await);
            while let Some(event) = rx.recv().await {
                match event {
                    DispatchEvent::ThreadUpdated(_) => {
                        sync_threads(&shared, &store, thread_view).await
                    }
                    DispatchEvent::PendingChanged(ids) => pending.set(ids),
                }
            }
        });

        dispatcher
    });

    let send = {
        let dispatcher = dispatcher.clone();
        move |(text, image): Submission| {
            let dispatcher = dispatcher.clone();
            let current_selection = selection.read().clone();
            let keys = api_keys.read().clone();
            notice.set(None);
            show_landing.set(false);

            spawn(async move {
                if let Err(e) = dispatcher.send(&text, image, &current_selection, &keys).await {
                    notice.set(Some(e.to_string()));
                }
            });
        }
    };

    let new_chat = {
        let shared = dispatcher.threads();
        let store = store.clone();
        move |_| {
            let shared = shared.clone();
            let store = store.clone();
            show_landing.set(false);
            spawn(async move {
                shared.lock().await.create_thread();
                sync_threads(&shared, &store, thread_view).await;
            });
        }
    };

    let select_thread = {
        let shared = dispatcher.threads();
        let store = store.clone();
        move |id: String| {
            let shared = shared.clone();
            let store = store.clone();
            show_landing.set(false);
            spawn(async move {
                if shared.lock().await.set_active(&id) {
                    sync_threads(&shared, &store, thread_view).await;
                }
            });
        }
    };

    let delete_thread = {
        let shared = dispatcher.threads();
        let store = store.clone();
        move |id: String| {
            let shared = shared.clone();
            let store = store.clone();
            spawn(async move {
                if shared.lock().await.delete_thread(&id) {
                    sync_threads(&shared, &store, thread_view).await;
                }
            });
        }
    };

    let toggle_model = {
        let store = store.clone();
        move |id: String| {
            let outcome = selection.write().toggle(&id);
            match outcome {
                ToggleOutcome::LimitReached => notice.set(Some(format!(
                    "You can compare at most {} models.",
                    MAX_SELECTED
                ))),
                _ => {
                    let current = selection.read();
                    tracing::debug!(selected = ?current.ids(), "Selection changed");
                    store.persist(SELECTED_MODELS_KEY, &*current);
                }
            }
        }
    };

    let save_keys = {
        let store = store.clone();
        move |keys: ApiKeys| {
            store.persist(API_KEYS_KEY, &keys);
            api_keys.set(keys);
        }
    };

    let toggle_theme = {
        let store = store.clone();
        move |_| {
            let next = theme.read().toggled();
            store.persist(THEME_KEY, &next);
            theme.set(next);
        }
    };

    let toggle_sidebar = {
        let store = store.clone();
        move |_| {
            let next = !sidebar_open();
            store.persist(SIDEBAR_OPEN_KEY, &next);
            sidebar_open.set(next);
        }
    };

    let go_home = {
        let store = store.clone();
        move |_| {
            store.persist(SHOW_LANDING_KEY, &true);
            show_landing.set(true);
        }
    };

    let get_started = {
        let store = store.clone();
        move |_| {
            store.persist(SHOW_LANDING_KEY, &false);
            show_landing.set(false);
        }
    };

    let view = if show_landing() {
        AppView::Landing
    } else {
        AppView::Compare
    };
    let selected_count = selection.read().len();
    let loading = !pending.read().is_empty();
    let data_theme = theme.read().data_theme();

    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        div {
            "data-theme": "{data_theme}",
            class: "app",

            Sidebar {
                threads: thread_view,
                open: sidebar_open,
                on_new_chat: new_chat,
                on_select_thread: select_thread,
                on_delete_thread: delete_thread,
                on_home: go_home,
                on_settings: move |_| keys_open.set(true),
            }

            div {
                class: "main-column",

                Header {
                    theme,
                    sidebar_open,
                    selected_count,
                    on_toggle_sidebar: toggle_sidebar,
                    on_toggle_theme: toggle_theme,
                    on_models: move |_| models_open.set(true),
                }

                if let Some(text) = notice() {
                    div {
                        class: "notice",
                        span { "{text}" }
                        button {
                            class: "icon-button",
                            onclick: move |_| notice.set(None),
                            "✕"
                        }
                    }
                }

                main {
                    class: "content",
                    match view {
                        AppView::Landing => rsx! {
                            Landing { on_start: get_started }
                        },
                        AppView::Compare => rsx! {
                            CompareGrid {
                                threads: thread_view,
                                selection,
                                pending,
                                on_open_models: move |_| models_open.set(true),
                                on_open_keys: move |_| keys_open.set(true),
                            }
                        },
                    }
                }

                ChatInput {
                    input_settings,
                    loading,
                    on_send: send,
                }
            }

            ModelPicker {
                open: models_open,
                selection,
                on_toggle: toggle_model,
            }

            KeySettings {
                open: keys_open,
                api_keys,
                input_settings,
                on_save: save_keys,
                on_input_settings_change: move |value| input_settings.set(value),
            }
        }
    }
}
