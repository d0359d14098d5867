//! Schema creation command

use crate::core::Settings;

use super::open_database;

/// Create the schema. Without `strict`, existing tables are left alone.
pub fn handle_init(settings: &Settings, strict: bool) -> anyhow::Result<()> {
    let mut db = open_database(settings)?;

    if !db.create_schema(!strict)? {
        anyhow::bail!(
            "schema creation in {} failed and was rolled back{}",
            settings.db_path.display(),
            if strict {
                " (tables may already exist, retry without --strict)"
            } else {
                ""
            }
        );
    }

    println!("✓ Schema ready in {}", settings.db_path.display());
    Ok(())
}
