mod common;
mod compare;
mod header;
mod key_settings;
mod landing;
mod model_picker;
mod sidebar;

pub use common::{ChatInput, Submission};
pub use compare::CompareGrid;
pub use header::Header;
pub use key_settings::KeySettings;
pub use landing::Landing;
pub use model_picker::ModelPicker;
pub use sidebar::Sidebar;
