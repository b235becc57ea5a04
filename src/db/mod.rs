pub mod pool;
pub mod postgres;

pub use pool::create_pool;
pub use postgres::PgStore;
