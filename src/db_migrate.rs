use color_eyre::eyre::{Result, WrapErr};
use dotenv::dotenv;
use salonbook_db::schema::initialize_database;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;
    tracing_subscriber::fmt().init();

    // Load environment variables
    dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").wrap_err("DATABASE_URL environment variable must be set")?;

    info!("Connecting to database...");
    let db_pool = salonbook_db::create_pool(&database_url, 1).await?;

    info!("Initializing database schema...");
    initialize_database(&db_pool).await?;
    info!("Database schema initialized successfully.");

    Ok(())
}
