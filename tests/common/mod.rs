//! Shared integration-test fixtures.

use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use inkpost::db::{DbConnection, DbPool, establish_connection_pool};
use tempfile::NamedTempFile;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// SQLite database backed by a temp file, migrated on creation and removed
/// when the fixture drops.
pub struct TestDb {
    _tempfile: NamedTempFile,
    pool: DbPool,
}

impl TestDb {
    pub fn new() -> Self {
        let tempfile = NamedTempFile::new().expect("should create a temp database file");
        let path = tempfile.path().to_str().expect("temp path should be UTF-8");
        let pool = establish_connection_pool(path).expect("should open the test database");

        let mut conn = pool.get().expect("should acquire a pooled connection");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("migrations should apply cleanly");

        TestDb {
            _tempfile: tempfile,
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn conn(&self) -> DbConnection {
        self.pool.get().expect("should acquire a pooled connection")
    }
}
