// src/db/inventory_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::ItemStore,
    models::inventory::{Item, ItemPatch, NewItem},
};

const ITEM_COLUMNS: &str = "id, code, description, pieces_per_box, on_hand, committed, incoming, \
                            minimum, target, unit_cost, visible, created_at";

// O repositório de itens, responsável por todas as interações com a tabela 'items'
#[derive(Clone)]
pub struct InventoryRepository {
    pool: PgPool,
}

impl InventoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemStore for InventoryRepository {
    async fn fetch_items(&self) -> Result<Vec<Item>, AppError> {
        let items = sqlx::query_as::<_, Item>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items ORDER BY description ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    async fn fetch_item(&self, id: Uuid) -> Result<Option<Item>, AppError> {
        let item = sqlx::query_as::<_, Item>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }

    async fn insert_item(&self, new_item: &NewItem) -> Result<Item, AppError> {
        let item = sqlx::query_as::<_, Item>(&format!(
            r#"
            INSERT INTO items (code, description, pieces_per_box, on_hand, committed, incoming,
                               minimum, target, unit_cost, visible)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(&new_item.code)
        .bind(&new_item.description)
        .bind(new_item.pieces_per_box)
        .bind(new_item.on_hand)
        .bind(new_item.committed)
        .bind(new_item.incoming)
        .bind(new_item.minimum)
        .bind(new_item.target)
        .bind(new_item.unit_cost)
        .bind(new_item.visible)
        .fetch_one(&self.pool)
        .await?;
        Ok(item)
    }

    async fn update_item(&self, id: Uuid, patch: &ItemPatch) -> Result<Item, AppError> {
        // COALESCE mantém o valor atual quando o campo não veio no patch
        sqlx::query_as::<_, Item>(&format!(
            r#"
            UPDATE items SET
                code           = COALESCE($2, code),
                description    = COALESCE($3, description),
                pieces_per_box = COALESCE($4, pieces_per_box),
                on_hand        = COALESCE($5, on_hand),
                committed      = COALESCE($6, committed),
                incoming       = COALESCE($7, incoming),
                minimum        = COALESCE($8, minimum),
                target         = COALESCE($9, target),
                unit_cost      = COALESCE($10, unit_cost),
                visible        = COALESCE($11, visible)
            WHERE id = $1
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.code.as_deref())
        .bind(patch.description.as_deref())
        .bind(patch.pieces_per_box)
        .bind(patch.on_hand)
        .bind(patch.committed)
        .bind(patch.incoming)
        .bind(patch.minimum)
        .bind(patch.target)
        .bind(patch.unit_cost)
        .bind(patch.visible)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::ItemNotFound)
    }

    async fn delete_item(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ItemNotFound);
        }
        Ok(())
    }
}
