pub mod error;
pub mod query;
pub mod store;
pub mod types;

pub use error::OrderError;
pub use query::QueryHandler;
pub use store::{InMemoryOrderStore, OrderStore};
pub use types::{NewOrder, Order, Side, TraderId};
