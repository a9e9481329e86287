pub mod db;
pub mod memory;
pub mod mongo;
pub mod repository;

pub use db::connect_to_mongo;
pub use memory::InMemoryRepository;
pub use mongo::MongoRepository;
pub use repository::{ContentRepository, RepositoryError, RepositoryState};
