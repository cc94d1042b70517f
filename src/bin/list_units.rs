//! Utility to print the effective unit table (built-in plus custom units)

use skm::conversion::Category;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let db_path = skm::db::database_path();
    println!("Database path: {}", db_path.display());

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = skm::db::Database::new(&db_path)?;

    database.with_conn(|conn| {
        skm::db::migrations::run_migrations(conn)?;
        Ok(())
    })?;

    let registry = skm::tools::custom_units::load_registry(&database)?;

    for category in Category::ALL {
        let base = category.base_unit().unwrap_or("-");
        println!();
        println!("{} (base: {})", category, base);
        for unit in registry.units(category) {
            if category.is_linear() {
                println!(
                    "  {:<14} {:<14} {:>12}  {:?}",
                    unit.id, unit.symbol, unit.to_base, unit.source
                );
            } else {
                println!("  {:<14} {:<14} {:>12}  {:?}", unit.id, unit.symbol, "-", unit.source);
            }
        }
    }

    Ok(())
}
