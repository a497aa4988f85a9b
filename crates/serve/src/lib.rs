pub mod blog;
pub mod delivery;
pub mod memory;
pub mod preview;
pub mod repository;
pub mod resolver;
pub mod site;

pub use repository::{ContentClients, ContentRepository, ReadMode, RepositoryError};
pub use resolver::{ResolveError, Resolver};
