// src/db/production_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::production::{Formula, FormulaIngredient, ProductionOrder};

#[derive(Clone)]
pub struct ProductionRepository {
    pool: PgPool,
}

impl ProductionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // --- Ordens de produção ---

    pub async fn insert_order(
        &self,
        order_number: &str,
        product_name: &str,
        quantity_planned: Decimal,
        scheduled_date: Option<NaiveDate>,
        created_by: Uuid,
    ) -> Result<ProductionOrder, AppError> {
        let order = sqlx::query_as::<_, ProductionOrder>(
            r#"
            INSERT INTO production_orders
                (order_number, product_name, quantity_planned, scheduled_date, status, created_by)
            VALUES ($1, $2, $3, $4, 'planned', $5)
            RETURNING *
            "#,
        )
        .bind(order_number)
        .bind(product_name)
        .bind(quantity_planned)
        .bind(scheduled_date)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(order)
    }

    pub async fn list_orders(
        &self,
        status: Option<&str>,
    ) -> Result<Vec<ProductionOrder>, AppError> {
        let orders = sqlx::query_as::<_, ProductionOrder>(
            r#"
            SELECT * FROM production_orders
            WHERE ($1::text IS NULL OR status = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    pub async fn find_order(&self, id: Uuid) -> Result<Option<ProductionOrder>, AppError> {
        let order =
            sqlx::query_as::<_, ProductionOrder>("SELECT * FROM production_orders WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(order)
    }

    // --- Fórmulas (os métodos recebem o executor para rodarem na mesma
    // transação: fórmula e ingredientes entram juntos ou não entram) ---

    pub async fn insert_formula<'e, E>(
        &self,
        executor: E,
        product_name: &str,
        name: &str,
        version: &str,
        is_active: bool,
        created_by: Uuid,
    ) -> Result<Formula, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let formula = sqlx::query_as::<_, Formula>(
            r#"
            INSERT INTO production_formulas (product_name, name, version, is_active, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(product_name)
        .bind(name)
        .bind(version)
        .bind(is_active)
        .bind(created_by)
        .fetch_one(executor)
        .await?;

        Ok(formula)
    }

    pub async fn insert_ingredient<'e, E>(
        &self,
        executor: E,
        formula_id: Uuid,
        raw_material: &str,
        percentage: Decimal,
        quantity_kg: Decimal,
    ) -> Result<FormulaIngredient, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ingredient = sqlx::query_as::<_, FormulaIngredient>(
            r#"
            INSERT INTO production_formula_ingredients
                (formula_id, raw_material, percentage, quantity_kg)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(formula_id)
        .bind(raw_material)
        .bind(percentage)
        .bind(quantity_kg)
        .fetch_one(executor)
        .await?;

        Ok(ingredient)
    }

    pub async fn list_formulas(&self) -> Result<Vec<Formula>, AppError> {
        let formulas = sqlx::query_as::<_, Formula>(
            "SELECT * FROM production_formulas ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(formulas)
    }

    pub async fn list_ingredients(
        &self,
        formula_id: Uuid,
    ) -> Result<Vec<FormulaIngredient>, AppError> {
        let ingredients = sqlx::query_as::<_, FormulaIngredient>(
            r#"
            SELECT * FROM production_formula_ingredients
            WHERE formula_id = $1
            ORDER BY percentage DESC
            "#,
        )
        .bind(formula_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ingredients)
    }
}
