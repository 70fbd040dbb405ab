//! Localized message plumbing.

mod dictionary;
mod locale;

pub use dictionary::{translate, MessageKey};
pub use locale::Locale;
