pub mod content;
pub mod error;
pub mod locale;
pub mod model;
pub mod setting;

pub use error::{DecodeError, LocaleError};
pub use locale::{localize_href, LocaleEntry, LocaleResolution, Locales, PathLocale};
