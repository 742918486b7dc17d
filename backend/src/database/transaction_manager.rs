use futures_util::future::BoxFuture;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct TransactionConfig {
    pub timeout: Duration,
    pub slow_transaction_threshold: Duration,
}

impl Default for TransactionConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            slow_transaction_threshold: Duration::from_secs(2),
        }
    }
}

/// Runs a unit of work inside one database transaction.
///
/// The closure's result decides the outcome: `Ok` commits, `Err` rolls back
/// and is returned unchanged. Work that outlives the configured timeout is
/// rolled back and reported as [`AppError::Timeout`].
#[derive(Clone)]
pub struct TransactionManager {
    pool: PgPool,
    config: TransactionConfig,
}

impl TransactionManager {
    pub fn new(pool: PgPool, config: TransactionConfig) -> Self {
        Self { pool, config }
    }

    pub async fn run<F, R>(&self, description: &str, f: F) -> Result<R, AppError>
    where
        F: for<'c> FnOnce(&'c mut Transaction<'static, Postgres>) -> BoxFuture<'c, Result<R, AppError>>,
        R: Send,
    {
        let started_at = Instant::now();
        let mut tx = self.pool.begin().await?;

        let outcome = tokio::time::timeout(self.config.timeout, f(&mut tx)).await;
        let elapsed = started_at.elapsed();

        match outcome {
            Ok(Ok(value)) => {
                tx.commit().await?;
                if elapsed > self.config.slow_transaction_threshold {
                    warn!("Slow transaction '{}' committed after {:?}", description, elapsed);
                } else {
                    debug!("Committed transaction '{}' after {:?}", description, elapsed);
                }
                Ok(value)
            }
            Ok(Err(e)) => {
                Self::rollback(tx, description).await;
                debug!("Rolled back transaction '{}': {}", description, e);
                Err(e)
            }
            Err(_) => {
                Self::rollback(tx, description).await;
                error!("Transaction '{}' timed out after {:?}", description, elapsed);
                Err(AppError::Timeout(format!(
                    "transaction '{}' exceeded {:?}",
                    description, self.config.timeout
                )))
            }
        }
    }

    async fn rollback(tx: Transaction<'static, Postgres>, description: &str) {
        if let Err(e) = tx.rollback().await {
            // The connection is discarded by the pool; the original error wins.
            error!("Failed to roll back transaction '{}': {}", description, e);
        }
    }
}
