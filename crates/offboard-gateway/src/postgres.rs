//! PostgreSQL asset gateway.
//!
//! The pipeline is synchronous, so the gateway owns a current-thread tokio
//! runtime and blocks on each query. One pool connection is opened at
//! construction and reused for the whole run.

use offboard_core::config::DatabaseConfig;
use offboard_core::types::AssetTable;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Column, Executor, Row, Statement};
use tokio::runtime::{Builder, Runtime};

use crate::error::{Error, Result};
use crate::AssetGateway;

pub struct PgAssetGateway {
    runtime: Runtime,
    pool: PgPool,
    sql: String,
    columns: Vec<String>,
    closed: bool,
}

impl std::fmt::Debug for PgAssetGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgAssetGateway")
            .field("columns", &self.columns)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

impl PgAssetGateway {
    /// Connect and prepare the asset query.
    ///
    /// The prepared statement's description supplies the column names, so an
    /// employee with no assets still gets a header.
    pub fn connect(cfg: &DatabaseConfig) -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Connection(format!("runtime: {e}")))?;

        let (pool, columns) = runtime.block_on(async {
            let pool = PgPoolOptions::new()
                .max_connections(1)
                .connect(&cfg.url)
                .await
                .map_err(|e| Error::Connection(e.to_string()))?;

            let statement = pool
                .prepare(cfg.asset_query.as_str())
                .await
                .map_err(|e| Error::Query(format!("prepare: {e}")))?;
            let columns: Vec<String> = statement
                .columns()
                .iter()
                .map(|c| c.name().to_string())
                .collect();

            Ok::<_, Error>((pool, columns))
        })?;

        tracing::info!(columns = columns.len(), "connected to asset database");

        Ok(Self {
            runtime,
            pool,
            sql: cfg.asset_query.clone(),
            columns,
            closed: false,
        })
    }
}

impl AssetGateway for PgAssetGateway {
    fn fetch_assets(&mut self, given_name: &str, surname: &str) -> Result<AssetTable> {
        if self.closed {
            return Err(Error::Connection("gateway already closed".into()));
        }

        let rows = self.runtime.block_on(
            sqlx::query(&self.sql)
                .bind(given_name)
                .bind(surname)
                .fetch_all(&self.pool),
        )
        .map_err(|e| Error::Query(e.to_string()))?;

        let mut values = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut record = Vec::with_capacity(self.columns.len());
            for idx in 0..self.columns.len() {
                let v: Option<String> = row
                    .try_get(idx)
                    .map_err(|e| Error::Shape(format!("column {idx}: {e}")))?;
                record.push(v);
            }
            values.push(record);
        }

        Ok(AssetTable::from_values(self.columns.clone(), values)?)
    }

    fn close(&mut self) {
        if !self.closed {
            self.runtime.block_on(self.pool.close());
            self.closed = true;
            tracing::debug!("asset database connection closed");
        }
    }
}

impl Drop for PgAssetGateway {
    fn drop(&mut self) {
        self.close();
    }
}
