// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

// Os cards do topo
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub item_count: usize,
    pub visible_count: usize,
    pub critical_count: usize,
    pub low_count: usize,
    pub ok_count: usize,
    pub on_hand_boxes: i64,
    pub available_boxes: i64,
    pub committed_boxes: i64,
    pub incoming_boxes: i64,
    pub pieces_on_hand: i64,
    pub stock_value: Decimal, // Σ on_hand × custo
    pub open_orders: usize,
    pub open_order_value: Decimal,
    pub suggestion_count: usize,
    pub suggested_boxes: i64,
    pub suggested_value: Decimal,
}
