pub mod memory;
pub mod postgres;
pub mod store;

pub use memory::InMemoryStore;
pub use postgres::{create_pool, PgBookStore};
pub use store::BookStore;

#[cfg(test)]
pub use store::MockBookStore;
