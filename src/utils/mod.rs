mod catalog;
mod dispatcher;
mod error;
mod formatting;
mod gemini;
mod openrouter;
mod provider;
mod selection;
mod settings;
mod store;
mod theme;
mod threads;
mod turns;
mod types;

pub use catalog::{catalog, Model, Provider};
pub use dispatcher::{DispatchEvent, Dispatcher};
pub use formatting::{segments, Segment};
pub use provider::ProviderRouter;
pub use selection::{Selection, ToggleOutcome, MAX_SELECTED};
pub use settings::{ApiKeys, Settings};
pub use store::{
    AppStore, ACTIVE_THREAD_KEY, API_KEYS_KEY, SELECTED_MODELS_KEY, SHOW_LANDING_KEY,
    SIDEBAR_OPEN_KEY, THEME_KEY, THREADS_KEY,
};
pub use theme::Theme;
pub use threads::{SharedThreads, ThreadStore};
pub use turns::{group_turns, needs_key_hint, CellState, Turn};
pub use types::{format_age, AppView, ImageAttachment, InputSettings, Message, IMAGE_EXTENSIONS};
