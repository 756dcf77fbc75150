pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

pub use manager::open_store;
pub use memory::MemoryDrinkStore;
pub use postgres::PgDrinkStore;
pub use store::{DrinkStore, StoreError, StoreResult};
