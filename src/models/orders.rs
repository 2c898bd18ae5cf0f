// src/models/orders.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Enums ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "order_status", rename_all = "SCREAMING_SNAKE_CASE")] // Banco
#[serde(rename_all = "SCREAMING_SNAKE_CASE")] // JSON
pub enum OrderStatus {
    Open,     // Vira "OPEN"
    Received, // Vira "RECEIVED"
}

// --- Pedido ao fornecedor ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub status: OrderStatus,
    #[schema(example = "412.50")]
    pub total: Decimal,
    pub below_minimum: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub received_at: Option<DateTime<Utc>>,
}

// --- Linha do pedido ---
// Código, descrição e custo são cópias congeladas no momento do pedido.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub id: Uuid,
    pub order_id: Uuid,
    pub item_id: Option<Uuid>,
    pub code: String,
    pub description: String,
    pub pieces_per_box: i32,
    pub unit_cost: Decimal,
    #[schema(example = 5)]
    pub quantity: i32,
    pub arrived: bool,
    pub arrived_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub total: Decimal,
    pub below_minimum: bool,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderLine {
    pub item_id: Uuid,
    pub code: String,
    pub description: String,
    pub pieces_per_box: i32,
    pub unit_cost: Decimal,
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(flatten)]
    pub header: Order,
    pub lines: Vec<OrderLine>,
}

impl OrderDetail {
    pub fn open_lines(&self) -> impl Iterator<Item = &OrderLine> {
        self.lines.iter().filter(|l| !l.arrived)
    }
}

// --- Carrinho: orçamento ---
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteLine {
    pub item_id: Uuid,
    pub code: String,
    pub description: String,
    pub boxes: i32,
    pub unit_cost: Decimal,
    pub line_total: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartQuote {
    pub lines: Vec<QuoteLine>,
    pub total: Decimal,
    pub minimum_total: Decimal,
    pub below_minimum: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmedOrder {
    pub order: OrderDetail,
    pub quote: CartQuote,
}

// --- Resultado da conciliação de chegadas ---
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArrivalReport {
    pub arrived_lines: Vec<OrderLine>,
    pub received_orders: Vec<Order>,
}
