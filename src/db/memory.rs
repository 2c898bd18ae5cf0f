// src/db/memory.rs

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::{ItemStore, OrderStore},
    models::{
        inventory::{Item, ItemPatch, NewItem},
        orders::{NewOrder, NewOrderLine, Order, OrderLine, OrderStatus},
    },
    services::stock_calculator::compare_by_description,
};

#[derive(Default)]
struct Tables {
    items: Vec<Item>,
    orders: Vec<Order>,
    lines: Vec<OrderLine>,
    // Itens cujas atualizações falham (simula erro do store)
    failing_items: HashSet<Uuid>,
}

/// Store em memória: usado quando não há DATABASE_URL e nos testes.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Faz toda atualização futura do item falhar com uma mensagem do store.
    pub async fn fail_updates_for(&self, item_id: Uuid) {
        self.tables.write().await.failing_items.insert(item_id);
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn fetch_items(&self) -> Result<Vec<Item>, AppError> {
        let mut items = self.tables.read().await.items.clone();
        items.sort_by(compare_by_description);
        Ok(items)
    }

    async fn fetch_item(&self, id: Uuid) -> Result<Option<Item>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.items.iter().find(|i| i.id == id).cloned())
    }

    async fn insert_item(&self, new_item: &NewItem) -> Result<Item, AppError> {
        let item = Item {
            id: Uuid::new_v4(),
            code: new_item.code.clone(),
            description: new_item.description.clone(),
            pieces_per_box: new_item.pieces_per_box,
            on_hand: new_item.on_hand,
            committed: new_item.committed,
            incoming: new_item.incoming,
            minimum: new_item.minimum,
            target: new_item.target,
            unit_cost: new_item.unit_cost,
            visible: new_item.visible,
            created_at: Utc::now(),
        };
        self.tables.write().await.items.push(item.clone());
        Ok(item)
    }

    async fn update_item(&self, id: Uuid, patch: &ItemPatch) -> Result<Item, AppError> {
        let mut tables = self.tables.write().await;
        if tables.failing_items.contains(&id) {
            return Err(AppError::StoreError(format!("update on items failed for id {}", id)));
        }

        let item = tables
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(AppError::ItemNotFound)?;

        // Mesma regra da constraint CHECK do Postgres
        let mut updated = item.clone();
        patch.apply_to(&mut updated);
        if [updated.on_hand, updated.committed, updated.incoming, updated.minimum, updated.target]
            .iter()
            .any(|v| *v < 0)
        {
            return Err(AppError::StoreError("check constraint violated on items".into()));
        }

        *item = updated.clone();
        Ok(updated)
    }

    async fn delete_item(&self, id: Uuid) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        let before = tables.items.len();
        tables.items.retain(|i| i.id != id);
        if tables.items.len() == before {
            return Err(AppError::ItemNotFound);
        }

        // ON DELETE SET NULL
        for line in tables.lines.iter_mut().filter(|l| l.item_id == Some(id)) {
            line.item_id = None;
        }
        Ok(())
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn fetch_orders(&self) -> Result<Vec<Order>, AppError> {
        let mut orders = self.tables.read().await.orders.clone();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn fetch_order_lines(&self) -> Result<Vec<OrderLine>, AppError> {
        Ok(self.tables.read().await.lines.clone())
    }

    async fn insert_order(
        &self,
        order: &NewOrder,
        lines: &[NewOrderLine],
    ) -> Result<(Order, Vec<OrderLine>), AppError> {
        let now = Utc::now();
        let header = Order {
            id: Uuid::new_v4(),
            status: OrderStatus::Open,
            total: order.total,
            below_minimum: order.below_minimum,
            notes: order.notes.clone(),
            created_at: now,
            received_at: None,
        };

        let saved_lines: Vec<OrderLine> = lines
            .iter()
            .map(|line| OrderLine {
                id: Uuid::new_v4(),
                order_id: header.id,
                item_id: Some(line.item_id),
                code: line.code.clone(),
                description: line.description.clone(),
                pieces_per_box: line.pieces_per_box,
                unit_cost: line.unit_cost,
                quantity: line.quantity,
                arrived: false,
                arrived_at: None,
                created_at: now,
            })
            .collect();

        let mut tables = self.tables.write().await;
        tables.orders.push(header.clone());
        tables.lines.extend(saved_lines.iter().cloned());
        Ok((header, saved_lines))
    }

    async fn mark_line_arrived(&self, line_id: Uuid) -> Result<OrderLine, AppError> {
        let mut tables = self.tables.write().await;
        let line = tables
            .lines
            .iter_mut()
            .find(|l| l.id == line_id)
            .ok_or(AppError::LineNotFound)?;
        line.arrived = true;
        line.arrived_at = Some(Utc::now());
        Ok(line.clone())
    }

    async fn set_order_status(&self, order_id: Uuid, status: OrderStatus) -> Result<Order, AppError> {
        let mut tables = self.tables.write().await;
        let order = tables
            .orders
            .iter_mut()
            .find(|o| o.id == order_id)
            .ok_or(AppError::OrderNotFound)?;
        order.status = status;
        order.received_at = match status {
            OrderStatus::Received => Some(Utc::now()),
            OrderStatus::Open => None,
        };
        Ok(order.clone())
    }
}
