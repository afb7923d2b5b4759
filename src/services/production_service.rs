// src/services/production_service.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ProductionRepository,
    models::production::{CreateFormulaIngredient, FormulaDetail, ProductionOrder},
};

// Sufixo curto de UUID basta para o número legível; a unicidade real
// vem da constraint no banco
fn next_order_number() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("OP-{}", id[..8].to_uppercase())
}

#[derive(Clone)]
pub struct ProductionService {
    repo: ProductionRepository,
    pool: PgPool,
}

impl ProductionService {
    pub fn new(repo: ProductionRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    // --- Ordens de produção ---

    pub async fn create_order(
        &self,
        product_name: &str,
        quantity_planned: Decimal,
        scheduled_date: Option<NaiveDate>,
        created_by: Uuid,
    ) -> Result<ProductionOrder, AppError> {
        self.repo
            .insert_order(
                &next_order_number(),
                product_name,
                quantity_planned,
                scheduled_date,
                created_by,
            )
            .await
    }

    pub async fn list_orders(
        &self,
        status: Option<&str>,
    ) -> Result<Vec<ProductionOrder>, AppError> {
        self.repo.list_orders(status).await
    }

    pub async fn get_order(&self, id: Uuid) -> Result<ProductionOrder, AppError> {
        self.repo
            .find_order(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Ordem de produção não encontrada.".into()))
    }

    // --- Fórmulas ---

    // Criação transacional: fórmula e ingredientes entram juntos ou
    // nenhum entra. Se uma inserção falhar, o tx sofre rollback ao sair
    // do escopo (drop).
    pub async fn create_formula(
        &self,
        product_name: &str,
        name: &str,
        version: &str,
        is_active: bool,
        ingredients: &[CreateFormulaIngredient],
        created_by: Uuid,
    ) -> Result<FormulaDetail, AppError> {
        // 1. Inicia Transação
        let mut tx = self.pool.begin().await?;

        // 2. Cria a fórmula
        let formula = self
            .repo
            .insert_formula(&mut *tx, product_name, name, version, is_active, created_by)
            .await?;

        // 3. Insere cada ingrediente na mesma transação
        let mut saved = Vec::with_capacity(ingredients.len());
        for ingredient in ingredients {
            let row = self
                .repo
                .insert_ingredient(
                    &mut *tx,
                    formula.id,
                    &ingredient.raw_material,
                    ingredient.percentage,
                    ingredient.quantity_kg,
                )
                .await?;
            saved.push(row);
        }

        // 4. Commit
        tx.commit().await?;

        Ok(FormulaDetail { formula, ingredients: saved })
    }

    pub async fn list_formulas(&self) -> Result<Vec<FormulaDetail>, AppError> {
        let formulas = self.repo.list_formulas().await?;

        let mut detailed = Vec::with_capacity(formulas.len());
        for formula in formulas {
            let ingredients = self.repo.list_ingredients(formula.id).await?;
            detailed.push(FormulaDetail { formula, ingredients });
        }

        Ok(detailed)
    }
}
