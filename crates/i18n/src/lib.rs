mod en;
mod locale;

pub use locale::{Locale, Translator};
