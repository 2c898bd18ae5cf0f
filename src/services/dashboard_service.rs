// src/services/dashboard_service.rs

use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    models::{
        dashboard::DashboardSummary,
        inventory::StockLevel,
        orders::{OrderDetail, OrderStatus},
    },
    services::{
        inventory_service::InventoryService, ledger::Ledger, order_service::OrderService,
        stock_calculator as calc,
    },
};

#[derive(Clone)]
pub struct DashboardService {
    inventory_service: InventoryService,
    order_service: OrderService,
}

impl DashboardService {
    pub fn new(inventory_service: InventoryService, order_service: OrderService) -> Self {
        Self {
            inventory_service,
            order_service,
        }
    }

    pub async fn get_summary(&self) -> Result<DashboardSummary, AppError> {
        let ledger = self.inventory_service.snapshot().await?;
        let open_orders = self.order_service.list_orders(Some(OrderStatus::Open)).await?;
        Ok(summarize(&ledger, &open_orders))
    }
}

// Valores de linhas antigas do store podem ser enormes; o painel satura em vez de abortar
fn saturating_sum(values: impl Iterator<Item = Decimal>) -> Decimal {
    values.fold(Decimal::ZERO, |acc, v| acc.saturating_add(v))
}

pub fn summarize(ledger: &Ledger, open_orders: &[OrderDetail]) -> DashboardSummary {
    let items = ledger.items();
    let suggestions = ledger.suggestions();

    DashboardSummary {
        item_count: items.len(),
        visible_count: items.iter().filter(|i| i.visible).count(),
        critical_count: ledger.count_by_level(StockLevel::Critical),
        low_count: ledger.count_by_level(StockLevel::Low),
        ok_count: ledger.count_by_level(StockLevel::Ok),
        on_hand_boxes: items.iter().map(|i| i64::from(i.on_hand.max(0))).sum(),
        available_boxes: items.iter().map(calc::available).sum(),
        committed_boxes: items.iter().map(|i| i64::from(i.committed.max(0))).sum(),
        incoming_boxes: items.iter().map(|i| i64::from(i.incoming.max(0))).sum(),
        pieces_on_hand: items.iter().map(calc::pieces).sum(),
        stock_value: saturating_sum(items.iter().map(InventoryService::stock_value)),
        open_orders: open_orders.len(),
        // Valor ainda a receber: só as linhas abertas
        open_order_value: saturating_sum(
            open_orders
                .iter()
                .flat_map(|o| o.open_lines())
                .map(|l| Decimal::from(l.quantity).saturating_mul(l.unit_cost)),
        ),
        suggestion_count: suggestions.len(),
        suggested_boxes: suggestions.iter().map(|s| s.suggested_boxes).sum(),
        suggested_value: saturating_sum(suggestions.iter().map(|s| s.estimated_cost)),
    }
}
