// src/services/stock_calculator.rs
//
// Funções puras sobre as quantidades de um item. Nada aqui acessa o store.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::models::inventory::{Item, StockLevel};

/// Faixa de "estoque baixo" acima do mínimo.
///
/// `HalfOfMinimum`: baixo quando `minimo < disponivel < minimo + ceil(minimo / 2)`.
/// `Fixed(n)`: baixo quando `minimo < disponivel <= minimo + n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LowBandPolicy {
    #[default]
    HalfOfMinimum,
    Fixed(u32),
}

impl FromStr for LowBandPolicy {
    type Err = String;

    // Aceita "half" ou "fixed:<n>"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        if s == "half" {
            return Ok(LowBandPolicy::HalfOfMinimum);
        }
        match s.strip_prefix("fixed:") {
            Some(n) => n
                .trim()
                .parse::<u32>()
                .map(LowBandPolicy::Fixed)
                .map_err(|_| format!("faixa inválida: '{}'", s)),
            None => Err(format!("política desconhecida: '{}' (use 'half' ou 'fixed:<n>')", s)),
        }
    }
}

impl fmt::Display for LowBandPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LowBandPolicy::HalfOfMinimum => write!(f, "half"),
            LowBandPolicy::Fixed(n) => write!(f, "fixed:{}", n),
        }
    }
}

// Valores negativos vindos do store contam como zero
fn non_negative(v: i32) -> i64 {
    i64::from(v.max(0))
}

pub fn available(item: &Item) -> i64 {
    (non_negative(item.on_hand) - non_negative(item.committed)).max(0)
}

pub fn coverage(item: &Item) -> i64 {
    available(item) + non_negative(item.incoming)
}

pub fn pieces(item: &Item) -> i64 {
    non_negative(item.on_hand) * non_negative(item.pieces_per_box)
}

pub fn classify(item: &Item, policy: LowBandPolicy) -> StockLevel {
    let minimum = non_negative(item.minimum);
    if minimum == 0 {
        return StockLevel::Ok;
    }

    let avail = available(item);
    if avail <= minimum {
        return StockLevel::Critical;
    }

    let is_low = match policy {
        LowBandPolicy::HalfOfMinimum => avail < minimum + (minimum + 1) / 2,
        LowBandPolicy::Fixed(band) => avail <= minimum + i64::from(band),
    };

    if is_low { StockLevel::Low } else { StockLevel::Ok }
}

/// Caixas a pedir para chegar ao alvo. `None` quando o item não tem alvo.
pub fn suggested_reorder(item: &Item) -> Option<i64> {
    let target = non_negative(item.target);
    if target == 0 {
        return None;
    }
    Some((target - coverage(item)).max(0))
}

/// Busca por substring no código ou na descrição, com a mesma dobra de acentos da ordenação.
pub fn matches_query(item: &Item, query: &str) -> bool {
    let q = collation_key(query);
    if q.is_empty() {
        return true;
    }
    collation_key(&item.code).contains(&q) || collation_key(&item.description).contains(&q)
}

// Dobra acentos italianos para comparar "à" == "a"
fn fold_char(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ä' => 'a',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ò' | 'ó' | 'ô' | 'ö' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        other => other,
    }
}

fn collation_key(s: &str) -> String {
    s.trim().to_lowercase().chars().map(fold_char).collect()
}

/// Comparação por descrição sem diferenciar maiúsculas nem acentos; desempate pelo código.
pub fn compare_by_description(a: &Item, b: &Item) -> Ordering {
    collation_key(&a.description)
        .cmp(&collation_key(&b.description))
        .then_with(|| collation_key(&a.code).cmp(&collation_key(&b.code)))
}

/// Ordem de urgência: Critical, Low, Ok; depois pela descrição.
pub fn compare_by_urgency(a: &Item, b: &Item, policy: LowBandPolicy) -> Ordering {
    classify(a, policy)
        .cmp(&classify(b, policy))
        .then_with(|| compare_by_description(a, b))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    pub(crate) fn item(on_hand: i32, committed: i32, incoming: i32, minimum: i32, target: i32) -> Item {
        Item {
            id: Uuid::new_v4(),
            code: "AC221029".into(),
            description: "Avana cordino 22+10x29".into(),
            pieces_per_box: 250,
            on_hand,
            committed,
            incoming,
            minimum,
            target,
            unit_cost: Decimal::new(1850, 2),
            visible: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn available_is_floored_at_zero() {
        assert_eq!(available(&item(3, 5, 0, 0, 0)), 0);
        assert_eq!(available(&item(10, 3, 0, 0, 0)), 7);
    }

    #[test]
    fn negative_stored_values_degrade_to_zero() {
        let it = item(-4, -2, -1, 0, 5);
        assert_eq!(available(&it), 0);
        assert_eq!(coverage(&it), 0);
        assert_eq!(suggested_reorder(&it), Some(5));
    }

    #[test]
    fn reference_scenario_is_ok_with_eight_to_order() {
        let it = item(10, 3, 0, 2, 15);
        assert_eq!(available(&it), 7);
        assert_eq!(coverage(&it), 7);
        assert_eq!(suggested_reorder(&it), Some(8));
        assert_eq!(classify(&it, LowBandPolicy::HalfOfMinimum), StockLevel::Ok);
        assert_eq!(classify(&it, LowBandPolicy::Fixed(3)), StockLevel::Ok);
    }

    #[test]
    fn at_minimum_is_critical() {
        let it = item(2, 0, 0, 2, 0);
        assert_eq!(classify(&it, LowBandPolicy::HalfOfMinimum), StockLevel::Critical);
        assert_eq!(classify(&it, LowBandPolicy::Fixed(3)), StockLevel::Critical);
    }

    #[test]
    fn zero_minimum_is_always_ok() {
        assert_eq!(classify(&item(0, 0, 0, 0, 10), LowBandPolicy::HalfOfMinimum), StockLevel::Ok);
    }

    #[test]
    fn half_band_uses_ceiling_of_half_minimum() {
        // minimo 5 -> faixa baixa: 5 < disp < 8
        let policy = LowBandPolicy::HalfOfMinimum;
        assert_eq!(classify(&item(6, 0, 0, 5, 0), policy), StockLevel::Low);
        assert_eq!(classify(&item(7, 0, 0, 5, 0), policy), StockLevel::Low);
        assert_eq!(classify(&item(8, 0, 0, 5, 0), policy), StockLevel::Ok);
    }

    #[test]
    fn fixed_band_is_inclusive() {
        let policy = LowBandPolicy::Fixed(3);
        assert_eq!(classify(&item(5, 0, 0, 2, 0), policy), StockLevel::Low);
        assert_eq!(classify(&item(6, 0, 0, 2, 0), policy), StockLevel::Ok);
    }

    #[test]
    fn committed_boxes_count_against_the_minimum() {
        let it = item(10, 8, 0, 2, 0);
        assert_eq!(classify(&it, LowBandPolicy::HalfOfMinimum), StockLevel::Critical);
    }

    #[test]
    fn no_target_means_no_suggestion() {
        assert_eq!(suggested_reorder(&item(0, 0, 0, 5, 0)), None);
    }

    #[test]
    fn incoming_reduces_the_suggestion() {
        assert_eq!(suggested_reorder(&item(2, 0, 10, 0, 15)), Some(3));
        assert_eq!(suggested_reorder(&item(20, 0, 10, 0, 15)), Some(0));
    }

    #[test]
    fn search_ignores_case_and_accents() {
        let mut it = item(0, 0, 0, 0, 0);
        it.description = "Àvana Perù".into();
        assert!(matches_query(&it, "  avana "));
        assert!(matches_query(&it, "PERU"));
        assert!(matches_query(&it, "ac221"));
        assert!(matches_query(&it, ""));
        assert!(!matches_query(&it, "bianca"));
    }

    #[test]
    fn pieces_multiplies_boxes_by_box_size() {
        assert_eq!(pieces(&item(4, 0, 0, 0, 0)), 1000);
    }

    #[test]
    fn query_matches_code_or_description_ignoring_case() {
        let it = item(0, 0, 0, 0, 0);
        assert!(matches_query(&it, "  ac2210 "));
        assert!(matches_query(&it, "CORDINO"));
        assert!(matches_query(&it, ""));
        assert!(!matches_query(&it, "bianca"));
    }

    #[test]
    fn urgency_sorts_critical_first_then_by_description() {
        let mut ok = item(50, 0, 0, 2, 0);
        ok.description = "Alfa".into();
        let mut critical = item(1, 0, 0, 2, 0);
        critical.description = "zeta".into();
        let mut critical_b = item(0, 0, 0, 2, 0);
        critical_b.description = "Èlite".into();

        let mut items = vec![ok.clone(), critical.clone(), critical_b.clone()];
        items.sort_by(|a, b| compare_by_urgency(a, b, LowBandPolicy::HalfOfMinimum));
        let order: Vec<&str> = items.iter().map(|i| i.description.as_str()).collect();
        assert_eq!(order, vec!["Èlite", "zeta", "Alfa"]);
    }

    #[test]
    fn parses_band_policies() {
        assert_eq!("half".parse::<LowBandPolicy>(), Ok(LowBandPolicy::HalfOfMinimum));
        assert_eq!(" Fixed:3 ".parse::<LowBandPolicy>(), Ok(LowBandPolicy::Fixed(3)));
        assert!("fixed:-1".parse::<LowBandPolicy>().is_err());
        assert!("triple".parse::<LowBandPolicy>().is_err());
        assert_eq!(LowBandPolicy::Fixed(3).to_string(), "fixed:3");
    }
}
