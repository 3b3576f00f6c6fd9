//! Terminal output helpers: styled renderer, spinner and confirmation prompt

pub mod ansi;
pub mod spinner;
pub mod user_confirmation;

pub use ansi::{AnsiRenderer, MessageStyle};
pub use spinner::Spinner;
pub use user_confirmation::UserConfirmation;
