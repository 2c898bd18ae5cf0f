//! Testes de propriedade sobre a calculadora de estoque e os movimentos de caixa.

use std::sync::Arc;

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use scatole::{
    db::{ItemStore, MemoryStore},
    models::inventory::{Item, NewItem, StockLevel},
    services::{
        inventory_service::InventoryService,
        stock_calculator::{self, LowBandPolicy},
    },
};

fn quantity_strategy() -> impl Strategy<Value = i32> {
    0i32..100_000
}

fn policy_strategy() -> impl Strategy<Value = LowBandPolicy> {
    prop_oneof![Just(LowBandPolicy::HalfOfMinimum), (0u32..20).prop_map(LowBandPolicy::Fixed)]
}

fn item(on_hand: i32, committed: i32, incoming: i32, minimum: i32, target: i32) -> Item {
    Item {
        id: Uuid::new_v4(),
        code: "P1".into(),
        description: "prova".into(),
        pieces_per_box: 100,
        on_hand,
        committed,
        incoming,
        minimum,
        target,
        unit_cost: Decimal::ONE,
        visible: true,
        created_at: Utc::now(),
    }
}

// Propriedade: as quantidades derivadas nunca são negativas
proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn available_is_never_negative(
        on_hand in -10i32..100_000,
        committed in -10i32..100_000,
        incoming in -10i32..100_000,
    ) {
        let it = item(on_hand, committed, incoming, 2, 10);
        prop_assert!(stock_calculator::available(&it) >= 0);
        prop_assert!(stock_calculator::coverage(&it) >= stock_calculator::available(&it));
    }

    #[test]
    fn no_target_means_no_suggestion(
        on_hand in quantity_strategy(),
        committed in quantity_strategy(),
        incoming in quantity_strategy(),
    ) {
        let it = item(on_hand, committed, incoming, 2, 0);
        prop_assert_eq!(stock_calculator::suggested_reorder(&it), None);
    }

    #[test]
    fn suggestion_closes_the_gap_to_target(
        on_hand in quantity_strategy(),
        committed in quantity_strategy(),
        incoming in quantity_strategy(),
        target in 1i32..100_000,
    ) {
        let it = item(on_hand, committed, incoming, 0, target);
        let suggested = stock_calculator::suggested_reorder(&it).unwrap();
        let coverage = stock_calculator::coverage(&it);
        prop_assert!(suggested >= 0);
        prop_assert_eq!(suggested, (i64::from(target) - coverage).max(0));
        if suggested > 0 {
            prop_assert_eq!(coverage + suggested, i64::from(target));
        }
    }

    #[test]
    fn at_or_below_minimum_is_always_critical(
        minimum in 1i32..1_000,
        below in 0i32..1_000,
        policy in policy_strategy(),
    ) {
        let on_hand = (minimum - below).max(0);
        let it = item(on_hand, 0, 0, minimum, 0);
        prop_assert_eq!(stock_calculator::classify(&it, policy), StockLevel::Critical);
    }

    #[test]
    fn zero_minimum_is_never_urgent(on_hand in quantity_strategy(), policy in policy_strategy()) {
        let it = item(on_hand, 0, 0, 0, 0);
        prop_assert_eq!(stock_calculator::classify(&it, policy), StockLevel::Ok);
    }
}

// Propriedade: carico seguido de scarico devolve o saldo original
proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn load_then_unload_restores_on_hand(start in 0i32..10_000, boxes in 1i64..10_000) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let (loaded, restored) = runtime.block_on(async {
            let store = Arc::new(MemoryStore::new());
            let created = store
                .insert_item(&NewItem {
                    code: "P1".into(),
                    description: "prova".into(),
                    pieces_per_box: 100,
                    on_hand: start,
                    committed: 0,
                    incoming: 0,
                    minimum: 0,
                    target: 0,
                    unit_cost: Decimal::ONE,
                    visible: true,
                })
                .await
                .unwrap();

            let service = InventoryService::new(store, LowBandPolicy::default());
            let loaded = service.load(created.id, boxes).await.unwrap();
            let restored = service.unload(created.id, boxes).await.unwrap();
            (loaded.on_hand, restored.on_hand)
        });

        prop_assert_eq!(i64::from(loaded), i64::from(start) + boxes);
        prop_assert_eq!(restored, start);
    }
}
