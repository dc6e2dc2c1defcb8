use crate::config::BootstrapSettings;
use crate::config::database::{connect_database, migrate_database};

/// Run database migrations
///
/// Connects to the configured database and runs all pending migrations.
/// It does not initialize the full AppData structure.
pub async fn run_migrations(settings: &BootstrapSettings) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Running database migrations...");

    let db = connect_database(settings).await?;
    migrate_database(&db).await?;

    tracing::info!("All migrations completed successfully");
    println!("✅ Database migrated: {}", settings.database_url());

    Ok(())
}
