//! PostgreSQL product repository

use super::traits::ProductStore;
use crate::{
    models::{Partition, Product},
    Result,
};
use async_trait::async_trait;
use sqlx::PgPool;

const COPY_PRODUCTS_SQL: &str = r#"
    COPY product(product_id, name, people, category, price, stock_quantity,
                 manufacturer, description)
    FROM STDIN WITH (FORMAT csv, HEADER true)
"#;

/// Bytes handed to the server per CopyData message.
const COPY_CHUNK_SIZE: usize = 256 * 1024;

#[derive(Clone)]
pub struct PostgresProductStore {
    pool: PgPool,
}

impl PostgresProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ProductStore for PostgresProductStore {
    async fn find_by_partition(&self, partition: &Partition) -> Result<Vec<Product>> {
        let rows = sqlx::query_as::<_, Product>(
            r#"
            SELECT product_id, name, people, category, price, stock_quantity,
                   manufacturer, description
            FROM product
            WHERE category ILIKE $1
              AND ($2::text IS NULL OR people ILIKE $2)
            "#,
        )
        .bind(partition.category_pattern())
        .bind(partition.people_pattern())
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(%partition, rows = rows.len(), "Loaded partition rows");
        Ok(rows)
    }

    async fn bulk_copy_csv(&self, csv: Vec<u8>) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let mut copy = tx.copy_in_raw(COPY_PRODUCTS_SQL).await?;

        for chunk in csv.chunks(COPY_CHUNK_SIZE) {
            if let Err(e) = copy.send(chunk).await {
                let _ = copy.abort(e.to_string()).await;
                tx.rollback().await?;
                return Err(e.into());
            }
        }

        let rows = match copy.finish().await {
            Ok(rows) => rows,
            Err(e) => {
                tx.rollback().await?;
                return Err(e.into());
            }
        };

        tx.commit().await?;
        Ok(rows)
    }
}
