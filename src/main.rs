//! Smart Kitchen Manager (SKM)
//!
//! An MCP server for kitchen unit conversion.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use skm::db;
use skm::mcp::SkmService;
use skm::tools::custom_units::load_registry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Log to stderr; stdout is the MCP transport
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("skm=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    skm::build_info::print_startup_banner();

    let db_path = db::database_path();
    tracing::info!("Database path: {}", db_path.display());

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = db::Database::new(&db_path)?;

    database.with_conn(|conn| {
        if db::migrations::needs_migration(conn)? {
            db::migrations::run_migrations(conn)?;
        }
        let version = db::migrations::get_schema_version(conn)?;
        tracing::info!("Database schema version: {}", version);
        Ok(())
    })?;

    let registry = load_registry(&database)?;
    tracing::info!("Loaded {} units", registry.all().len());

    let service = SkmService::new(db_path, database, registry);

    tracing::info!("Starting MCP server on stdio...");
    let server = service.serve((stdin(), stdout())).await?;
    server.waiting().await?;

    Ok(())
}
