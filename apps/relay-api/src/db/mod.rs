pub mod pool;
pub mod schema;
pub mod sink;
pub mod store;
