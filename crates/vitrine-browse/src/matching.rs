//! Value preparation and client-side name matching for filters.

use regex::RegexBuilder;
use vitrine_core::{dedupe_values, FilterValue, Product, PRICE_FIELD};

/// Turns raw `get_fields` output into the value list shown for `field`.
///
/// Nulls are dropped. For the price field the values are sorted ascending
/// before deduplication so the range control can take its bounds from the
/// ends; any non-numeric stragglers sort last in server order. Prices are
/// compared by numeric value, so `500` and `500.0` collapse to the first one
/// seen. Every other field keeps server order.
#[must_use]
pub fn prepare_filter_values(field: &str, raw: Vec<Option<FilterValue>>) -> Vec<FilterValue> {
    let mut values: Vec<FilterValue> = raw.into_iter().flatten().collect();
    if field == PRICE_FIELD {
        values.sort_by(|a, b| match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        // Sorted, so numerically equal prices are adjacent.
        values.dedup_by(|later, earlier| match (later.as_f64(), earlier.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => later == earlier,
        });
    }
    dedupe_values(values)
}

/// Keeps items whose display name equals `wanted`, ignoring case.
///
/// The server-side `product` filter does not match whole names, so results
/// are re-checked with `^wanted$`. `wanted` is matched literally. Items with
/// no name never match.
#[must_use]
pub fn retain_exact_name_matches(items: Vec<Product>, wanted: &str) -> Vec<Product> {
    let pattern = format!("^{}$", regex::escape(wanted));
    match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(re) => items
            .into_iter()
            .filter(|p| p.product.as_deref().is_some_and(|name| re.is_match(name)))
            .collect(),
        Err(e) => {
            tracing::warn!(error = %e, "name pattern rejected, falling back to plain comparison");
            let wanted = wanted.to_lowercase();
            items
                .into_iter()
                .filter(|p| {
                    p.product
                        .as_deref()
                        .is_some_and(|name| name.to_lowercase() == wanted)
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(v: f64) -> Option<FilterValue> {
        FilterValue::from_f64(v)
    }

    fn text(v: &str) -> Option<FilterValue> {
        Some(FilterValue::from(v))
    }

    #[test]
    fn price_values_are_sorted_and_unique() {
        let raw = vec![num(1500.0), None, num(500.0), num(1500.0), num(700.5), num(500.0)];
        let values = prepare_filter_values("price", raw);
        let numbers: Vec<f64> = values.iter().filter_map(FilterValue::as_f64).collect();
        assert_eq!(numbers, vec![500.0, 700.5, 1500.0]);
        assert!(numbers.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn price_duplicates_match_across_number_forms() {
        let raw: Vec<Option<FilterValue>> =
            serde_json::from_str("[1500.0, 500, 500.0, 1500, null]").unwrap();
        let values = prepare_filter_values("price", raw);
        assert_eq!(values.len(), 2);
        let numbers: Vec<f64> = values.iter().filter_map(FilterValue::as_f64).collect();
        assert_eq!(numbers, vec![500.0, 1500.0]);
    }

    #[test]
    fn other_fields_keep_server_order() {
        let raw = vec![text("Piaget"), text("Cartier"), None, text("Piaget"), text("Baraka")];
        let values = prepare_filter_values("brand", raw);
        assert_eq!(
            values,
            vec![
                FilterValue::from("Piaget"),
                FilterValue::from("Cartier"),
                FilterValue::from("Baraka"),
            ]
        );
    }

    #[test]
    fn numeric_values_of_other_fields_are_not_sorted() {
        let raw = vec![num(3.0), num(1.0), num(2.0)];
        let values = prepare_filter_values("brand", raw);
        let numbers: Vec<f64> = values.iter().filter_map(FilterValue::as_f64).collect();
        assert_eq!(numbers, vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn exact_match_is_anchored_and_case_insensitive() {
        let items = vec![
            Product::with_id("1").named("Chair"),
            Product::with_id("2").named("chairs"),
        ];
        let kept = retain_exact_name_matches(items, "Chair");
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "1");
    }

    #[test]
    fn exact_match_ignores_case_both_ways() {
        let items = vec![
            Product::with_id("1").named("GOLD RING"),
            Product::with_id("2").named("gold ring"),
            Product::with_id("3").named("a gold ring"),
        ];
        let kept = retain_exact_name_matches(items, "Gold Ring");
        let ids: Vec<&str> = kept.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        let items = vec![
            Product::with_id("1").named("Ring (18K)"),
            Product::with_id("2").named("Ring 18K"),
        ];
        let kept = retain_exact_name_matches(items, "ring (18k)");
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "1");
    }

    #[test]
    fn unnamed_items_never_match() {
        let items = vec![Product::with_id("1")];
        assert!(retain_exact_name_matches(items, "").is_empty());
    }
}
