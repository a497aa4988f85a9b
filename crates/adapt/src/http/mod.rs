pub mod app;
pub mod cookie;
pub mod draft;
pub mod error;
pub mod pages;
pub mod views;

pub use app::{build_app, build_service, AppState, DraftConfig};
pub use cookie::CrossSiteCookieLayer;
pub use draft::DraftMode;
pub use error::HttpError;
