//! Embedded schema migrations.

use tracing::info;

use natsinternal_core::error::{AppError, ErrorKind};
use natsinternal_core::result::AppResult;

use crate::connection::DatabasePool;

impl DatabasePool {
    /// Applies every migration under `/migrations` not yet recorded in
    /// `_sqlx_migrations`.
    pub async fn migrate(&self) -> AppResult<()> {
        let migrator = sqlx::migrate!("../../migrations");
        migrator.run(self.pool()).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, format!("Migration failed: {e}"), e)
        })?;

        info!(count = migrator.iter().count(), "Schema up to date");
        Ok(())
    }
}
