// src/services/inventory_service.rs

use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        validation::{validate_not_blank, validate_unit_cost, FieldErrors, MAX_BOXES},
    },
    db::ItemStore,
    models::inventory::{Item, ItemPatch, ItemView, NewItem, QuantityField},
    services::{ledger::Ledger, stock_calculator::LowBandPolicy},
};

#[derive(Clone)]
pub struct InventoryService {
    store: Arc<dyn ItemStore>,
    policy: LowBandPolicy,
}

fn check_new_item(new_item: &NewItem) -> Result<(), AppError> {
    let mut errors = FieldErrors::new();
    errors.check("code", validate_not_blank(&new_item.code));
    errors.check("description", validate_not_blank(&new_item.description));
    errors.require_positive("piecesPerBox", new_item.pieces_per_box.into());
    errors.require_non_negative("onHand", new_item.on_hand.into());
    errors.require_non_negative("committed", new_item.committed.into());
    errors.require_non_negative("incoming", new_item.incoming.into());
    errors.require_non_negative("minimum", new_item.minimum.into());
    errors.require_non_negative("target", new_item.target.into());
    errors.check("unitCost", validate_unit_cost(&new_item.unit_cost));
    errors.finish()
}

fn check_patch(patch: &ItemPatch) -> Result<(), AppError> {
    let mut errors = FieldErrors::new();
    if let Some(code) = &patch.code {
        errors.check("code", validate_not_blank(code));
    }
    if let Some(description) = &patch.description {
        errors.check("description", validate_not_blank(description));
    }
    if let Some(v) = patch.pieces_per_box {
        errors.require_positive("piecesPerBox", v.into());
    }
    let counts = [
        ("onHand", patch.on_hand),
        ("committed", patch.committed),
        ("incoming", patch.incoming),
        ("minimum", patch.minimum),
        ("target", patch.target),
    ];
    for (field, value) in counts {
        if let Some(v) = value {
            errors.require_non_negative(field, v.into());
        }
    }
    if let Some(cost) = &patch.unit_cost {
        errors.check("unitCost", validate_unit_cost(cost));
    }
    errors.finish()
}

// Nova quantidade após o delta; rejeita antes de tocar no store
fn apply_delta(current: i32, delta: i64, field: QuantityField) -> Result<i32, AppError> {
    let next = i64::from(current) + delta;
    if next < 0 {
        return Err(AppError::NegativeQuantity(field.name()));
    }
    if next > MAX_BOXES {
        return Err(AppError::InvalidQuantity);
    }
    i32::try_from(next).map_err(|_| AppError::InvalidQuantity)
}

impl InventoryService {
    pub fn new(store: Arc<dyn ItemStore>, policy: LowBandPolicy) -> Self {
        Self { store, policy }
    }

    /// Relê a tabela inteira e recalcula as visões derivadas.
    pub async fn snapshot(&self) -> Result<Ledger, AppError> {
        let items = self.store.fetch_items().await?;
        Ok(Ledger::new(items, self.policy))
    }

    pub async fn get_item(&self, id: Uuid) -> Result<Item, AppError> {
        self.store.fetch_item(id).await?.ok_or(AppError::ItemNotFound)
    }

    pub async fn view_item(&self, id: Uuid) -> Result<ItemView, AppError> {
        let item = self.get_item(id).await?;
        Ok(self.view(&item))
    }

    pub fn view(&self, item: &Item) -> ItemView {
        Ledger::new(Vec::new(), self.policy).view(item)
    }

    // --- CREATE ITEM ---
    pub async fn create_item(&self, mut new_item: NewItem) -> Result<Item, AppError> {
        new_item.code = new_item.code.trim().to_string();
        new_item.description = new_item.description.trim().to_string();
        check_new_item(&new_item)?;

        let item = self.store.insert_item(&new_item).await?;
        tracing::info!(item_id = %item.id, code = %item.code, "Articolo creato");
        Ok(item)
    }

    // --- EDIT ITEM (campos diretos) ---
    pub async fn update_item(&self, id: Uuid, mut patch: ItemPatch) -> Result<Item, AppError> {
        patch.code = patch.code.map(|c| c.trim().to_string());
        patch.description = patch.description.map(|d| d.trim().to_string());
        check_patch(&patch)?;

        if patch.is_empty() {
            return self.get_item(id).await;
        }

        let item = self.store.update_item(id, &patch).await?;
        tracing::info!(item_id = %id, "Articolo modificato");
        Ok(item)
    }

    // --- CARICO (entrada de caixas) ---
    pub async fn load(&self, id: Uuid, boxes: i64) -> Result<Item, AppError> {
        if boxes <= 0 {
            return Err(AppError::InvalidQuantity);
        }
        self.adjust(id, QuantityField::OnHand, boxes).await
    }

    // --- SCARICO (saída de caixas) ---
    pub async fn unload(&self, id: Uuid, boxes: i64) -> Result<Item, AppError> {
        if boxes <= 0 {
            return Err(AppError::InvalidQuantity);
        }
        self.adjust(id, QuantityField::OnHand, -boxes).await
    }

    /// Ajuste incremental de um campo de quantidade.
    pub async fn adjust(&self, id: Uuid, field: QuantityField, delta: i64) -> Result<Item, AppError> {
        if delta == 0 {
            return Err(AppError::InvalidQuantity);
        }

        let current = self.get_item(id).await?;
        let next = apply_delta(field.read(&current), delta, field)?;

        let item = self.store.update_item(id, &field.patch(next)).await?;
        tracing::info!(item_id = %id, field = field.name(), delta, value = next, "Quantità aggiornata");
        Ok(item)
    }

    /// Passa `boxes` de "in arrivo" para o estoque físico numa única escrita.
    pub async fn receive_incoming(&self, item: &Item, boxes: i32) -> Result<Item, AppError> {
        if boxes <= 0 {
            return Err(AppError::InvalidQuantity);
        }
        let incoming = apply_delta(item.incoming, -i64::from(boxes), QuantityField::Incoming)?;
        let on_hand = apply_delta(item.on_hand, i64::from(boxes), QuantityField::OnHand)?;

        let patch = ItemPatch {
            on_hand: Some(on_hand),
            incoming: Some(incoming),
            ..Default::default()
        };
        self.store.update_item(item.id, &patch).await
    }

    pub async fn set_visibility(&self, id: Uuid, visible: bool) -> Result<Item, AppError> {
        let patch = ItemPatch { visible: Some(visible), ..Default::default() };
        let item = self.store.update_item(id, &patch).await?;
        tracing::info!(item_id = %id, visible, "Visibilità aggiornata");
        Ok(item)
    }

    pub async fn delete_item(&self, id: Uuid) -> Result<(), AppError> {
        self.store.delete_item(id).await?;
        tracing::info!(item_id = %id, "Articolo eliminato");
        Ok(())
    }

    pub fn stock_value(item: &Item) -> Decimal {
        Decimal::from(item.on_hand.max(0)).saturating_mul(item.unit_cost)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::inventory::ViewScope;

    pub(crate) fn new_item(code: &str, on_hand: i32) -> NewItem {
        NewItem {
            code: code.into(),
            description: format!("Busta {}", code),
            pieces_per_box: 250,
            on_hand,
            committed: 0,
            incoming: 0,
            minimum: 2,
            target: 15,
            unit_cost: Decimal::new(1850, 2),
            visible: true,
        }
    }

    fn service() -> (Arc<MemoryStore>, InventoryService) {
        let store = Arc::new(MemoryStore::new());
        let service = InventoryService::new(store.clone(), LowBandPolicy::default());
        (store, service)
    }

    #[tokio::test]
    async fn load_then_unload_restores_on_hand() {
        let (_, service) = service();
        let item = service.create_item(new_item("AC01", 7)).await.unwrap();

        service.load(item.id, 12).await.unwrap();
        let after = service.unload(item.id, 12).await.unwrap();
        assert_eq!(after.on_hand, 7);
    }

    #[tokio::test]
    async fn load_past_the_box_limit_is_rejected() {
        let (_, service) = service();
        let item = service.create_item(new_item("AC01", 999_990)).await.unwrap();

        assert!(matches!(service.load(item.id, 11).await, Err(AppError::InvalidQuantity)));
        assert!(matches!(
            service.adjust(item.id, QuantityField::Incoming, MAX_BOXES + 1).await,
            Err(AppError::InvalidQuantity)
        ));
        let after = service.load(item.id, 10).await.unwrap();
        assert_eq!(i64::from(after.on_hand), MAX_BOXES);
    }

    #[tokio::test]
    async fn oversized_unit_cost_is_rejected() {
        let (_, service) = service();
        let mut new = new_item("AC01", 1);
        new.unit_cost = Decimal::from_i128_with_scale(7 * 10i128.pow(28), 0);
        assert!(matches!(service.create_item(new).await, Err(AppError::ValidationError(_))));

        let item = service.create_item(new_item("AC02", 1)).await.unwrap();
        let patch = ItemPatch { unit_cost: Some(Decimal::new(100_000_000, 0)), ..Default::default() };
        assert!(matches!(service.update_item(item.id, patch).await, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn unload_below_zero_is_rejected_and_nothing_changes() {
        let (_, service) = service();
        let item = service.create_item(new_item("AC01", 3)).await.unwrap();

        let err = service.unload(item.id, 4).await.unwrap_err();
        assert!(matches!(err, AppError::NegativeQuantity("onHand")));
        assert_eq!(service.get_item(item.id).await.unwrap().on_hand, 3);
    }

    #[tokio::test]
    async fn committed_and_incoming_cannot_go_negative() {
        let (_, service) = service();
        let item = service.create_item(new_item("AC01", 3)).await.unwrap();

        let err = service.adjust(item.id, QuantityField::Committed, -1).await.unwrap_err();
        assert!(matches!(err, AppError::NegativeQuantity("committed")));
        let err = service.adjust(item.id, QuantityField::Incoming, -1).await.unwrap_err();
        assert!(matches!(err, AppError::NegativeQuantity("incoming")));

        let updated = service.adjust(item.id, QuantityField::Committed, 2).await.unwrap();
        assert_eq!(updated.committed, 2);
        assert_eq!(service.view(&updated).available, 1);
    }

    #[tokio::test]
    async fn zero_or_negative_deltas_are_invalid() {
        let (_, service) = service();
        let item = service.create_item(new_item("AC01", 3)).await.unwrap();

        assert!(matches!(service.load(item.id, 0).await, Err(AppError::InvalidQuantity)));
        assert!(matches!(service.unload(item.id, -2).await, Err(AppError::InvalidQuantity)));
        assert!(matches!(
            service.adjust(item.id, QuantityField::Incoming, 0).await,
            Err(AppError::InvalidQuantity)
        ));
    }

    #[tokio::test]
    async fn create_rejects_blank_code_and_bad_box_size() {
        let (_, service) = service();
        let mut bad = new_item("  ", 0);
        bad.pieces_per_box = 0;

        let err = service.create_item(bad).await.unwrap_err();
        match err {
            AppError::ValidationError(e) => {
                assert!(e.field_errors().contains_key("code"));
                assert!(e.field_errors().contains_key("piecesPerBox"));
            }
            other => panic!("esperava erro de validação, veio {:?}", other),
        }
        assert!(service.snapshot().await.unwrap().items().is_empty());
    }

    #[tokio::test]
    async fn create_trims_text_fields() {
        let (_, service) = service();
        let mut raw = new_item("AC01", 0);
        raw.code = "  AC01 ".into();
        let item = service.create_item(raw).await.unwrap();
        assert_eq!(item.code, "AC01");
    }

    #[tokio::test]
    async fn patch_with_negative_threshold_is_rejected() {
        let (_, service) = service();
        let item = service.create_item(new_item("AC01", 3)).await.unwrap();

        let patch = ItemPatch { minimum: Some(-1), ..Default::default() };
        assert!(matches!(
            service.update_item(item.id, patch).await,
            Err(AppError::ValidationError(_))
        ));

        let patch = ItemPatch { target: Some(30), description: Some("Avana".into()), ..Default::default() };
        let updated = service.update_item(item.id, patch).await.unwrap();
        assert_eq!(updated.target, 30);
        assert_eq!(updated.description, "Avana");
        assert_eq!(updated.on_hand, 3);
    }

    #[tokio::test]
    async fn store_failures_leave_the_item_untouched() {
        let (store, service) = service();
        let item = service.create_item(new_item("AC01", 3)).await.unwrap();
        store.fail_updates_for(item.id).await;

        let err = service.load(item.id, 5).await.unwrap_err();
        assert!(matches!(err, AppError::StoreError(_)));
        assert_eq!(service.get_item(item.id).await.unwrap().on_hand, 3);
    }

    #[tokio::test]
    async fn hidden_items_stay_in_the_planning_view() {
        let (_, service) = service();
        let item = service.create_item(new_item("AC01", 3)).await.unwrap();
        service.set_visibility(item.id, false).await.unwrap();

        let ledger = service.snapshot().await.unwrap();
        assert!(ledger.list("", ViewScope::Operational).is_empty());
        assert_eq!(ledger.list("", ViewScope::Planning).len(), 1);
    }

    #[tokio::test]
    async fn delete_of_missing_item_is_not_found() {
        let (_, service) = service();
        assert!(matches!(
            service.delete_item(Uuid::new_v4()).await,
            Err(AppError::ItemNotFound)
        ));
    }
}
