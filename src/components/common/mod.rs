mod input;
mod modal;

pub use input::{ChatInput, Submission};
pub use modal::Modal;
