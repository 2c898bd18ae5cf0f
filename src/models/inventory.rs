// src/models/inventory.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- 1. Articolo (uma linha por SKU) ---
// Todas as quantidades são em caixas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: Uuid,
    #[schema(example = "AC221029")]
    pub code: String,
    #[schema(example = "Avana cordino 22+10x29")]
    pub description: String,
    #[schema(example = 250)]
    pub pieces_per_box: i32,
    pub on_hand: i32,
    pub committed: i32,
    pub incoming: i32,
    pub minimum: i32,
    pub target: i32,
    #[schema(example = "18.50")]
    pub unit_cost: Decimal,
    pub visible: bool,
    pub created_at: DateTime<Utc>,
}

// --- 2. Dados de criação (já validados pelo serviço) ---
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub code: String,
    pub description: String,
    pub pieces_per_box: i32,
    pub on_hand: i32,
    pub committed: i32,
    pub incoming: i32,
    pub minimum: i32,
    pub target: i32,
    pub unit_cost: Decimal,
    pub visible: bool,
}

// --- 3. Atualização parcial ---
// `None` = mantém o valor atual.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPatch {
    pub code: Option<String>,
    pub description: Option<String>,
    pub pieces_per_box: Option<i32>,
    pub on_hand: Option<i32>,
    pub committed: Option<i32>,
    pub incoming: Option<i32>,
    pub minimum: Option<i32>,
    pub target: Option<i32>,
    pub unit_cost: Option<Decimal>,
    pub visible: Option<bool>,
}

impl ItemPatch {
    pub fn is_empty(&self) -> bool {
        *self == ItemPatch::default()
    }

    /// Aplica o patch numa cópia do item (usado pelo store em memória).
    pub fn apply_to(&self, item: &mut Item) {
        if let Some(code) = &self.code {
            item.code = code.clone();
        }
        if let Some(description) = &self.description {
            item.description = description.clone();
        }
        if let Some(v) = self.pieces_per_box {
            item.pieces_per_box = v;
        }
        if let Some(v) = self.on_hand {
            item.on_hand = v;
        }
        if let Some(v) = self.committed {
            item.committed = v;
        }
        if let Some(v) = self.incoming {
            item.incoming = v;
        }
        if let Some(v) = self.minimum {
            item.minimum = v;
        }
        if let Some(v) = self.target {
            item.target = v;
        }
        if let Some(v) = self.unit_cost {
            item.unit_cost = v;
        }
        if let Some(v) = self.visible {
            item.visible = v;
        }
    }
}

// --- 4. Classificação de urgência ---
// A ordem das variantes é a ordem de urgência (Critical primeiro).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockLevel {
    Critical,
    Low,
    Ok,
}

// Campo de quantidade que aceita ajuste incremental
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum QuantityField {
    OnHand,
    Committed,
    Incoming,
}

impl QuantityField {
    pub fn name(&self) -> &'static str {
        match self {
            QuantityField::OnHand => "onHand",
            QuantityField::Committed => "committed",
            QuantityField::Incoming => "incoming",
        }
    }

    pub fn read(&self, item: &Item) -> i32 {
        match self {
            QuantityField::OnHand => item.on_hand,
            QuantityField::Committed => item.committed,
            QuantityField::Incoming => item.incoming,
        }
    }

    pub fn patch(&self, value: i32) -> ItemPatch {
        match self {
            QuantityField::OnHand => ItemPatch { on_hand: Some(value), ..Default::default() },
            QuantityField::Committed => ItemPatch { committed: Some(value), ..Default::default() },
            QuantityField::Incoming => ItemPatch { incoming: Some(value), ..Default::default() },
        }
    }
}

// Lista operacional (só visíveis) vs. planejamento (todos)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ViewScope {
    #[default]
    Operational,
    Planning,
}

// --- 5. Visão derivada (o que o frontend mostra) ---
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemView {
    #[serde(flatten)]
    pub item: Item,
    pub available: i64,
    pub coverage: i64,
    pub pieces: i64,
    pub level: StockLevel,
    pub suggested_reorder: Option<i64>,
}

// --- 6. Sugestão de reposição ---
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReorderSuggestion {
    pub item_id: Uuid,
    pub code: String,
    pub description: String,
    pub level: StockLevel,
    pub available: i64,
    pub incoming: i64,
    pub target: i64,
    pub suggested_boxes: i64,
    pub suggested_pieces: i64,
    pub estimated_cost: Decimal,
}
