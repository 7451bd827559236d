use diesel_async::pooled_connection::deadpool::Pool;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::AsyncPgConnection;

use crate::error::StoreError;

pub type DbPool = Pool<AsyncPgConnection>;

/// Create a Diesel async connection pool. Connections are opened lazily, so an
/// unreachable database only surfaces on first use.
pub fn connect(database_url: &str) -> Result<DbPool, StoreError> {
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
    let pool = Pool::builder(manager)
        .max_size(8)
        .build()
        .map_err(|err| StoreError::PoolBuild(err.to_string()))?;

    tracing::info!("database pool created");

    Ok(pool)
}
