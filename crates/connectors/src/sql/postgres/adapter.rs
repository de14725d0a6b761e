use crate::{
    error::{ConnectorError, DbError},
    sql::{
        executor::SqlExecutor,
        postgres::{params::PgParamStore, row::to_row_data, utils::connect_client},
    },
};
use async_trait::async_trait;
use model::{core::value::Value, records::row::RowData};
use planner::query::dialect::{self, Dialect};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_postgres::Client;
use tracing::{debug, info};

#[derive(Clone)]
pub struct PgAdapter {
    client: Arc<RwLock<Client>>,
    dialect: dialect::Postgres,
}

impl PgAdapter {
    pub async fn connect(url: &str) -> Result<Self, ConnectorError> {
        let client = Arc::new(RwLock::new(connect_client(url).await?));
        info!("Connected to Postgres");
        Ok(PgAdapter {
            client,
            dialect: dialect::Postgres,
        })
    }

    /// Runs one or more statements without parameters or results.
    pub async fn exec(&self, query: &str) -> Result<(), DbError> {
        let client = self.client.read().await;
        client.batch_execute(query).await?;
        Ok(())
    }
}

#[async_trait]
impl SqlExecutor for PgAdapter {
    fn dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    async fn query_params(
        &self,
        sql: &str,
        params: Vec<Value>,
    ) -> Result<Vec<RowData>, DbError> {
        let client = self.client.read().await;
        let statement = client.prepare(sql).await?;
        let bindings = PgParamStore::coerce(params, statement.params())?;

        let rows = client.query(&statement, &bindings.as_refs()).await?;
        debug!(rows = rows.len(), "Postgres query returned");

        Ok(rows.iter().map(|row| to_row_data(row, "")).collect())
    }
}
