// src/db/orders_repo.rs

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::OrderStore,
    models::orders::{NewOrder, NewOrderLine, Order, OrderLine, OrderStatus},
};

const ORDER_COLUMNS: &str = "id, status, total, below_minimum, notes, created_at, received_at";
const LINE_COLUMNS: &str = "id, order_id, item_id, code, description, pieces_per_box, unit_cost, \
                            quantity, arrived, arrived_at, created_at";

#[derive(Clone)]
pub struct OrdersRepository {
    pool: PgPool,
}

impl OrdersRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStore for OrdersRepository {
    async fn fetch_orders(&self) -> Result<Vec<Order>, AppError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(orders)
    }

    async fn fetch_order_lines(&self) -> Result<Vec<OrderLine>, AppError> {
        let lines = sqlx::query_as::<_, OrderLine>(&format!(
            "SELECT {LINE_COLUMNS} FROM order_lines ORDER BY created_at ASC, description ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(lines)
    }

    async fn insert_order(
        &self,
        order: &NewOrder,
        lines: &[NewOrderLine],
    ) -> Result<(Order, Vec<OrderLine>), AppError> {
        // Pedido + linhas na mesma transação: ou grava tudo ou nada
        let mut tx = self.pool.begin().await?;

        let header = sqlx::query_as::<_, Order>(&format!(
            r#"
            INSERT INTO orders (status, total, below_minimum, notes)
            VALUES ($1, $2, $3, $4)
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(OrderStatus::Open)
        .bind(order.total)
        .bind(order.below_minimum)
        .bind(order.notes.as_deref())
        .fetch_one(&mut *tx)
        .await?;

        let mut saved_lines = Vec::with_capacity(lines.len());
        for line in lines {
            let saved = sqlx::query_as::<_, OrderLine>(&format!(
                r#"
                INSERT INTO order_lines (order_id, item_id, code, description, pieces_per_box,
                                         unit_cost, quantity)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING {LINE_COLUMNS}
                "#
            ))
            .bind(header.id)
            .bind(line.item_id)
            .bind(&line.code)
            .bind(&line.description)
            .bind(line.pieces_per_box)
            .bind(line.unit_cost)
            .bind(line.quantity)
            .fetch_one(&mut *tx)
            .await?;
            saved_lines.push(saved);
        }

        tx.commit().await?;
        Ok((header, saved_lines))
    }

    async fn mark_line_arrived(&self, line_id: Uuid) -> Result<OrderLine, AppError> {
        sqlx::query_as::<_, OrderLine>(&format!(
            r#"
            UPDATE order_lines SET arrived = TRUE, arrived_at = $2
            WHERE id = $1
            RETURNING {LINE_COLUMNS}
            "#
        ))
        .bind(line_id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::LineNotFound)
    }

    async fn set_order_status(&self, order_id: Uuid, status: OrderStatus) -> Result<Order, AppError> {
        let received_at = match status {
            OrderStatus::Received => Some(Utc::now()),
            OrderStatus::Open => None,
        };

        sqlx::query_as::<_, Order>(&format!(
            r#"
            UPDATE orders SET status = $2, received_at = $3
            WHERE id = $1
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(order_id)
        .bind(status)
        .bind(received_at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::OrderNotFound)
    }
}
