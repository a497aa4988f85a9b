pub mod cli;
pub mod server;
pub mod site;

mod error;

pub use error::EdgeError;
