// src/services/ledger.rs

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    models::inventory::{Item, ItemView, ReorderSuggestion, StockLevel, ViewScope},
    services::stock_calculator::{self as calc, LowBandPolicy},
};

/// Fotografia em memória da tabela de itens, com as visões derivadas.
///
/// É reconstruída a cada leitura do store; nunca é alterada no lugar.
#[derive(Debug, Clone)]
pub struct Ledger {
    items: Vec<Item>,
    policy: LowBandPolicy,
}

impl Ledger {
    pub fn new(items: Vec<Item>, policy: LowBandPolicy) -> Self {
        Self { items, policy }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn find(&self, id: Uuid) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn view(&self, item: &Item) -> ItemView {
        ItemView {
            item: item.clone(),
            available: calc::available(item),
            coverage: calc::coverage(item),
            pieces: calc::pieces(item),
            level: calc::classify(item, self.policy),
            suggested_reorder: calc::suggested_reorder(item),
        }
    }

    fn in_scope(item: &Item, scope: ViewScope) -> bool {
        match scope {
            ViewScope::Operational => item.visible,
            ViewScope::Planning => true,
        }
    }

    /// Lista filtrada pela busca, em ordem alfabética de descrição.
    pub fn list(&self, query: &str, scope: ViewScope) -> Vec<ItemView> {
        let mut items: Vec<&Item> = self
            .items
            .iter()
            .filter(|i| Self::in_scope(i, scope))
            .filter(|i| calc::matches_query(i, query))
            .collect();
        items.sort_by(|a, b| calc::compare_by_description(a, b));
        items.into_iter().map(|i| self.view(i)).collect()
    }

    /// Lista por urgência: críticos, baixos e depois ok.
    pub fn ranked(&self, scope: ViewScope) -> Vec<ItemView> {
        let mut items: Vec<&Item> = self
            .items
            .iter()
            .filter(|i| Self::in_scope(i, scope))
            .collect();
        items.sort_by(|a, b| calc::compare_by_urgency(a, b, self.policy));
        items.into_iter().map(|i| self.view(i)).collect()
    }

    /// Itens com alvo definido e algo a pedir, por urgência.
    ///
    /// Considera também os itens ocultos: a visibilidade só afeta a lista operacional.
    pub fn suggestions(&self) -> Vec<ReorderSuggestion> {
        let mut items: Vec<(&Item, i64)> = self
            .items
            .iter()
            .filter_map(|i| match calc::suggested_reorder(i) {
                Some(boxes) if boxes > 0 => Some((i, boxes)),
                _ => None,
            })
            .collect();
        items.sort_by(|(a, _), (b, _)| calc::compare_by_urgency(a, b, self.policy));

        items
            .into_iter()
            .map(|(item, boxes)| ReorderSuggestion {
                item_id: item.id,
                code: item.code.clone(),
                description: item.description.clone(),
                level: calc::classify(item, self.policy),
                available: calc::available(item),
                incoming: i64::from(item.incoming.max(0)),
                target: i64::from(item.target.max(0)),
                suggested_boxes: boxes,
                suggested_pieces: boxes * i64::from(item.pieces_per_box.max(0)),
                estimated_cost: Decimal::from(boxes).saturating_mul(item.unit_cost),
            })
            .collect()
    }

    pub fn count_by_level(&self, level: StockLevel) -> usize {
        self.items
            .iter()
            .filter(|i| calc::classify(i, self.policy) == level)
            .count()
    }
}
