/// Database layer for TaskGate
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool with startup retries and health checks
/// - `migrations`: embedded migration runner
/// - Models and their queries are in the `models` module at crate root level
///
/// # Example
///
/// ```no_run
/// use taskgate_shared::db::pool::{create_pool, DatabaseConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig {
///         url: std::env::var("DATABASE_URL")?,
///         ..Default::default()
///     };
///
///     let pool = create_pool(config).await?;
///     Ok(())
/// }
/// ```

pub mod migrations;
pub mod pool;
