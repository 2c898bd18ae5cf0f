// src/services/order_service.rs

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::OrderStore,
    models::{
        inventory::QuantityField,
        orders::{
            ArrivalReport, CartQuote, ConfirmedOrder, NewOrder, NewOrderLine, Order, OrderDetail,
            OrderLine, OrderStatus,
        },
    },
    services::{
        cart::{self, Cart},
        inventory_service::InventoryService,
    },
};

#[derive(Clone)]
pub struct OrderService {
    orders: Arc<dyn OrderStore>,
    inventory_service: InventoryService,
    minimum_total: Decimal,
}

impl OrderService {
    pub fn new(
        orders: Arc<dyn OrderStore>,
        inventory_service: InventoryService,
        minimum_total: Decimal,
    ) -> Self {
        Self {
            orders,
            inventory_service,
            minimum_total,
        }
    }

    pub async fn quote(&self, cart: &Cart) -> Result<CartQuote, AppError> {
        let ledger = self.inventory_service.snapshot().await?;
        cart::quote(cart, &ledger, self.minimum_total)
    }

    // --- CONFERMA ORDINE ---
    pub async fn confirm(&self, cart: &Cart, notes: Option<&str>) -> Result<ConfirmedOrder, AppError> {
        // 1. Orçamento com os custos atuais (valida carrinho e itens)
        let ledger = self.inventory_service.snapshot().await?;
        let quote = cart::quote(cart, &ledger, self.minimum_total)?;

        // 2. Linhas congelam código, descrição e custo
        let mut new_lines = Vec::with_capacity(quote.lines.len());
        for line in &quote.lines {
            let item = ledger.find(line.item_id).ok_or(AppError::ItemNotFound)?;
            new_lines.push(NewOrderLine {
                item_id: item.id,
                code: item.code.clone(),
                description: item.description.clone(),
                pieces_per_box: item.pieces_per_box,
                unit_cost: item.unit_cost,
                quantity: line.boxes,
            });
        }

        let new_order = NewOrder {
            total: quote.total,
            below_minimum: quote.below_minimum,
            notes: notes.map(str::trim).filter(|n| !n.is_empty()).map(String::from),
        };

        // 3. Grava pedido + linhas
        let (header, lines) = self.orders.insert_order(&new_order, &new_lines).await?;

        // 4. Soma em "in arrivo", item por item; para no primeiro erro
        for line in &lines {
            if let Some(item_id) = line.item_id {
                self.inventory_service
                    .adjust(item_id, QuantityField::Incoming, i64::from(line.quantity))
                    .await?;
            }
        }

        tracing::info!(order_id = %header.id, lines = lines.len(), total = %header.total, "Ordine confermato");

        Ok(ConfirmedOrder {
            order: OrderDetail { header, lines },
            quote,
        })
    }

    // Junta pedidos e linhas (mais recentes primeiro)
    async fn load_details(&self) -> Result<Vec<OrderDetail>, AppError> {
        let orders = self.orders.fetch_orders().await?;
        let mut lines_by_order: HashMap<Uuid, Vec<OrderLine>> = HashMap::new();
        for line in self.orders.fetch_order_lines().await? {
            lines_by_order.entry(line.order_id).or_default().push(line);
        }

        Ok(orders
            .into_iter()
            .map(|header| {
                let lines = lines_by_order.remove(&header.id).unwrap_or_default();
                OrderDetail { header, lines }
            })
            .collect())
    }

    pub async fn list_orders(&self, status: Option<OrderStatus>) -> Result<Vec<OrderDetail>, AppError> {
        let details = self.load_details().await?;
        Ok(details
            .into_iter()
            .filter(|d| status.is_none_or(|s| d.header.status == s))
            .collect())
    }

    pub async fn get_order(&self, order_id: Uuid) -> Result<OrderDetail, AppError> {
        self.load_details()
            .await?
            .into_iter()
            .find(|d| d.header.id == order_id)
            .ok_or(AppError::OrderNotFound)
    }

    // --- ARRIVI ---
    /// Move as quantidades das linhas escolhidas de "in arrivo" para o estoque,
    /// marca as linhas e fecha os pedidos sem linhas abertas.
    pub async fn receive(&self, line_ids: &[Uuid]) -> Result<ArrivalReport, AppError> {
        // Mantém a ordem pedida, sem repetir
        let mut seen = HashSet::new();
        let line_ids: Vec<Uuid> = line_ids.iter().copied().filter(|id| seen.insert(*id)).collect();
        if line_ids.is_empty() {
            return Err(AppError::NoLinesSelected);
        }

        // 1. Valida tudo antes da primeira escrita
        let all_lines = self.orders.fetch_order_lines().await?;
        let ledger = self.inventory_service.snapshot().await?;

        let mut selected: Vec<(OrderLine, Uuid)> = Vec::with_capacity(line_ids.len());
        let mut arriving: HashMap<Uuid, i64> = HashMap::new();
        for id in &line_ids {
            let line = all_lines
                .iter()
                .find(|l| l.id == *id)
                .ok_or(AppError::LineNotFound)?;
            if line.arrived {
                return Err(AppError::LineAlreadyArrived);
            }
            let item_id = line.item_id.ok_or(AppError::ItemNotFound)?;
            *arriving.entry(item_id).or_default() += i64::from(line.quantity);
            selected.push((line.clone(), item_id));
        }

        for (item_id, boxes) in &arriving {
            let item = ledger.find(*item_id).ok_or(AppError::ItemNotFound)?;
            if i64::from(item.incoming) < *boxes {
                return Err(AppError::NegativeQuantity(QuantityField::Incoming.name()));
            }
        }

        // 2. Aplica linha a linha; para no primeiro erro do store
        let mut arrived_lines = Vec::with_capacity(selected.len());
        for (line, item_id) in &selected {
            let item = self.inventory_service.get_item(*item_id).await?;
            self.inventory_service.receive_incoming(&item, line.quantity).await?;
            let updated = self.orders.mark_line_arrived(line.id).await?;
            tracing::info!(line_id = %line.id, item_id = %item_id, boxes = line.quantity, "Riga arrivata");
            arrived_lines.push(updated);
        }

        // 3. Pedidos sem linhas abertas passam a RECEIVED
        let touched: HashSet<Uuid> = selected.iter().map(|(l, _)| l.order_id).collect();
        let fresh_lines = self.orders.fetch_order_lines().await?;
        let mut received_orders: Vec<Order> = Vec::new();
        for order_id in touched {
            let still_open = fresh_lines
                .iter()
                .any(|l| l.order_id == order_id && !l.arrived);
            if !still_open {
                let order = self.orders.set_order_status(order_id, OrderStatus::Received).await?;
                tracing::info!(order_id = %order.id, "Ordine ricevuto");
                received_orders.push(order);
            }
        }

        Ok(ArrivalReport {
            arrived_lines,
            received_orders,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::MemoryStore,
        services::{inventory_service::tests::new_item, stock_calculator::LowBandPolicy},
    };

    fn services() -> (Arc<MemoryStore>, InventoryService, OrderService) {
        let store = Arc::new(MemoryStore::new());
        let inventory = InventoryService::new(store.clone(), LowBandPolicy::default());
        let orders = OrderService::new(store.clone(), inventory.clone(), Decimal::new(300, 0));
        (store, inventory, orders)
    }

    #[tokio::test]
    async fn confirming_a_cart_creates_order_lines_and_incoming() {
        let (_, inventory, orders) = services();
        let mut a = new_item("A", 0);
        a.unit_cost = Decimal::new(1850, 2);
        let mut b = new_item("B", 0);
        b.unit_cost = Decimal::new(4000, 2);
        let a = inventory.create_item(a).await.unwrap();
        let b = inventory.create_item(b).await.unwrap();

        let mut cart = Cart::new();
        cart.set(a.id, 5).unwrap();
        cart.set(b.id, 3).unwrap();

        let confirmed = orders.confirm(&cart, Some("  ")).await.unwrap();
        let expected = Decimal::from(5) * a.unit_cost + Decimal::from(3) * b.unit_cost;
        assert_eq!(confirmed.order.header.total, expected);
        assert_eq!(confirmed.order.header.status, OrderStatus::Open);
        assert_eq!(confirmed.order.header.notes, None);
        assert_eq!(confirmed.order.lines.len(), 2);
        assert!(confirmed.quote.below_minimum);

        assert_eq!(inventory.get_item(a.id).await.unwrap().incoming, 5);
        assert_eq!(inventory.get_item(b.id).await.unwrap().incoming, 3);
    }

    #[tokio::test]
    async fn order_lines_freeze_item_data() {
        let (_, inventory, orders) = services();
        let a = inventory.create_item(new_item("A", 0)).await.unwrap();
        let mut cart = Cart::new();
        cart.set(a.id, 2).unwrap();
        let confirmed = orders.confirm(&cart, None).await.unwrap();

        let patch = crate::models::inventory::ItemPatch {
            code: Some("A-NEW".into()),
            unit_cost: Some(Decimal::new(99, 0)),
            ..Default::default()
        };
        inventory.update_item(a.id, patch).await.unwrap();

        let detail = orders.get_order(confirmed.order.header.id).await.unwrap();
        assert_eq!(detail.lines[0].code, "A");
        assert_eq!(detail.lines[0].unit_cost, Decimal::new(1850, 2));
    }

    #[tokio::test]
    async fn empty_cart_is_rejected() {
        let (_, _, orders) = services();
        assert!(matches!(orders.confirm(&Cart::new(), None).await, Err(AppError::EmptyCart)));
        assert!(orders.list_orders(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn receiving_the_only_line_moves_stock_and_closes_the_order() {
        let (_, inventory, orders) = services();
        let a = inventory.create_item(new_item("A", 1)).await.unwrap();
        let mut cart = Cart::new();
        cart.set(a.id, 5).unwrap();
        let confirmed = orders.confirm(&cart, None).await.unwrap();
        let line_id = confirmed.order.lines[0].id;

        let report = orders.receive(&[line_id]).await.unwrap();
        assert_eq!(report.arrived_lines.len(), 1);
        assert!(report.arrived_lines[0].arrived);
        assert_eq!(report.received_orders.len(), 1);
        assert_eq!(report.received_orders[0].status, OrderStatus::Received);
        assert!(report.received_orders[0].received_at.is_some());

        let item = inventory.get_item(a.id).await.unwrap();
        assert_eq!(item.on_hand, 6);
        assert_eq!(item.incoming, 0);

        assert!(matches!(orders.receive(&[line_id]).await, Err(AppError::LineAlreadyArrived)));
    }

    #[tokio::test]
    async fn partial_arrival_keeps_the_order_open() {
        let (_, inventory, orders) = services();
        let a = inventory.create_item(new_item("A", 0)).await.unwrap();
        let b = inventory.create_item(new_item("B", 0)).await.unwrap();
        let mut cart = Cart::new();
        cart.set(a.id, 4).unwrap();
        cart.set(b.id, 6).unwrap();
        let confirmed = orders.confirm(&cart, None).await.unwrap();

        let first = confirmed.order.lines.iter().find(|l| l.item_id == Some(a.id)).unwrap();
        let report = orders.receive(&[first.id]).await.unwrap();
        assert!(report.received_orders.is_empty());

        let open = orders.list_orders(Some(OrderStatus::Open)).await.unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].open_lines().count(), 1);
    }

    #[tokio::test]
    async fn arrival_is_rejected_when_incoming_was_lowered_by_hand() {
        let (_, inventory, orders) = services();
        let a = inventory.create_item(new_item("A", 0)).await.unwrap();
        let mut cart = Cart::new();
        cart.set(a.id, 5).unwrap();
        let confirmed = orders.confirm(&cart, None).await.unwrap();
        inventory.adjust(a.id, QuantityField::Incoming, -3).await.unwrap();

        let err = orders.receive(&[confirmed.order.lines[0].id]).await.unwrap_err();
        assert!(matches!(err, AppError::NegativeQuantity("incoming")));
        let item = inventory.get_item(a.id).await.unwrap();
        assert_eq!((item.on_hand, item.incoming), (0, 2));
    }

    #[tokio::test]
    async fn arrival_stops_at_the_first_store_error() {
        let (store, inventory, orders) = services();
        let a = inventory.create_item(new_item("A", 0)).await.unwrap();
        let b = inventory.create_item(new_item("B", 0)).await.unwrap();
        let mut cart = Cart::new();
        cart.set(a.id, 2).unwrap();
        cart.set(b.id, 3).unwrap();
        let confirmed = orders.confirm(&cart, None).await.unwrap();
        store.fail_updates_for(b.id).await;

        let ids: Vec<Uuid> = confirmed.order.lines.iter().map(|l| l.id).collect();
        let err = orders.receive(&ids).await.unwrap_err();
        assert!(matches!(err, AppError::StoreError(_)));

        // A primeira linha já foi aplicada; a segunda não
        let detail = orders.get_order(confirmed.order.header.id).await.unwrap();
        assert_eq!(detail.open_lines().count(), 1);
        assert_eq!(detail.header.status, OrderStatus::Open);
        assert_eq!(inventory.get_item(a.id).await.unwrap().on_hand, 2);
        assert_eq!(inventory.get_item(b.id).await.unwrap().incoming, 3);
    }

    #[tokio::test]
    async fn no_lines_is_an_error() {
        let (_, _, orders) = services();
        assert!(matches!(orders.receive(&[]).await, Err(AppError::NoLinesSelected)));
        assert!(matches!(
            orders.receive(&[Uuid::new_v4()]).await,
            Err(AppError::LineNotFound)
        ));
    }
}
