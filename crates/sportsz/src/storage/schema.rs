//! `SQLite` schema definitions for the collection store.

/// SQL statement to create the collections table.
///
/// Each row holds one whole collection, serialized as JSON.
pub const CREATE_COLLECTIONS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS collections (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// Replace a collection value in a single statement.
pub const UPSERT_COLLECTION: &str = r"
INSERT INTO collections (key, value, updated_at) VALUES (?1, ?2, ?3)
ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
";

/// Layout version stamped into `metadata` when a database is created.
pub const LAYOUT_VERSION: u32 = 1;

/// Metadata key holding [`LAYOUT_VERSION`].
pub const LAYOUT_VERSION_KEY: &str = "schema_version";

/// Read one metadata value.
pub const SELECT_METADATA: &str = "SELECT value FROM metadata WHERE key = ?1";

/// Write one metadata value.
pub const UPSERT_METADATA: &str = r"
INSERT INTO metadata (key, value) VALUES (?1, ?2)
ON CONFLICT(key) DO UPDATE SET value = excluded.value
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[CREATE_COLLECTIONS_TABLE, CREATE_METADATA_TABLE];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_statements_not_empty() {
        assert!(!SCHEMA_STATEMENTS.is_empty());
        for stmt in SCHEMA_STATEMENTS {
            assert!(!stmt.is_empty());
        }
    }

    #[test]
    fn test_create_collections_table_contains_required_columns() {
        assert!(CREATE_COLLECTIONS_TABLE.contains("key TEXT PRIMARY KEY"));
        assert!(CREATE_COLLECTIONS_TABLE.contains("value TEXT NOT NULL"));
        assert!(CREATE_COLLECTIONS_TABLE.contains("updated_at TEXT NOT NULL"));
    }

    #[test]
    fn test_upserts_target_key_conflict() {
        assert!(UPSERT_COLLECTION.contains("ON CONFLICT(key)"));
        assert!(UPSERT_METADATA.contains("ON CONFLICT(key)"));
    }
}
