pub mod store;
pub use store::{ItemStore, OrderStore};
pub mod inventory_repo;
pub use inventory_repo::InventoryRepository;
pub mod orders_repo;
pub use orders_repo::OrdersRepository;
pub mod memory;
pub use memory::MemoryStore;
