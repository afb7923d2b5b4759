// src/db/sales_repo.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::sales::Quote;

#[derive(Clone)]
pub struct SalesRepository {
    pool: PgPool,
}

impl SalesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert_quote(
        &self,
        quote_number: &str,
        customer_name: &str,
        total_amount: Decimal,
        notes: Option<&str>,
        created_by: Uuid,
    ) -> Result<Quote, AppError> {
        let quote = sqlx::query_as::<_, Quote>(
            r#"
            INSERT INTO quotes (quote_number, customer_name, total_amount, status, notes, created_by)
            VALUES ($1, $2, $3, 'draft', $4, $5)
            RETURNING *
            "#,
        )
        .bind(quote_number)
        .bind(customer_name)
        .bind(total_amount)
        .bind(notes)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(quote)
    }

    pub async fn list_quotes(&self, status: Option<&str>) -> Result<Vec<Quote>, AppError> {
        let quotes = sqlx::query_as::<_, Quote>(
            r#"
            SELECT * FROM quotes
            WHERE ($1::text IS NULL OR status = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(quotes)
    }

    pub async fn find_quote(&self, id: Uuid) -> Result<Option<Quote>, AppError> {
        let quote = sqlx::query_as::<_, Quote>("SELECT * FROM quotes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(quote)
    }
}
