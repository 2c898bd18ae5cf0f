// src/db/store.rs

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        inventory::{Item, ItemPatch, NewItem},
        orders::{NewOrder, NewOrderLine, Order, OrderLine, OrderStatus},
    },
};

// O contrato do store remoto. Os serviços recebem estes traits já montados
// (Postgres em produção, memória em testes / modo demo).

#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Todos os itens, ordenados por descrição.
    async fn fetch_items(&self) -> Result<Vec<Item>, AppError>;

    async fn fetch_item(&self, id: Uuid) -> Result<Option<Item>, AppError>;

    async fn insert_item(&self, new_item: &NewItem) -> Result<Item, AppError>;

    /// Atualiza só os campos presentes no patch. Item inexistente -> `ItemNotFound`.
    async fn update_item(&self, id: Uuid, patch: &ItemPatch) -> Result<Item, AppError>;

    async fn delete_item(&self, id: Uuid) -> Result<(), AppError>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Pedidos, do mais recente para o mais antigo.
    async fn fetch_orders(&self) -> Result<Vec<Order>, AppError>;

    async fn fetch_order_lines(&self) -> Result<Vec<OrderLine>, AppError>;

    /// Grava o pedido e as suas linhas de uma vez.
    async fn insert_order(
        &self,
        order: &NewOrder,
        lines: &[NewOrderLine],
    ) -> Result<(Order, Vec<OrderLine>), AppError>;

    async fn mark_line_arrived(&self, line_id: Uuid) -> Result<OrderLine, AppError>;

    async fn set_order_status(&self, order_id: Uuid, status: OrderStatus) -> Result<Order, AppError>;
}
