//! Plain-text rendering of product cards and the page footer.

use vitrine_core::{PageState, Product};

const ABSENT: &str = "absent";

/// One card per product: id, name, price and brand, with unknown fields
/// shown as `absent`.
pub(crate) fn product_card(product: &Product) -> String {
    let name = product.product.as_deref().unwrap_or(ABSENT);
    let price = product
        .price
        .map_or_else(|| ABSENT.to_owned(), |p| p.to_string());
    let brand = product.brand.as_deref().unwrap_or(ABSENT);

    format!(
        "id:    {}\nname:  {name}\nprice: {price}\nbrand: {brand}",
        product.id
    )
}

pub(crate) fn page_footer(page: &PageState) -> String {
    format!(
        "page {} of {} (total {})",
        page.page_number,
        page.page_count(),
        page.total
    )
}

/// Cards separated by blank lines, followed by the footer.
pub(crate) fn product_page(products: &[Product], page: &PageState) -> String {
    let mut out = String::new();
    if products.is_empty() {
        out.push_str("no products\n\n");
    }
    for product in products {
        out.push_str(&product_card(product));
        out.push_str("\n\n");
    }
    out.push_str(&page_footer(page));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_shows_all_fields() {
        let product = Product::with_id("abc")
            .named("Gold ring")
            .priced(16700.0)
            .branded("Piaget");
        let card = product_card(&product);
        assert_eq!(
            card,
            "id:    abc\nname:  Gold ring\nprice: 16700\nbrand: Piaget"
        );
    }

    #[test]
    fn card_marks_missing_fields_absent() {
        let card = product_card(&Product::with_id("abc"));
        assert!(card.contains("name:  absent"));
        assert!(card.contains("price: absent"));
        assert!(card.contains("brand: absent"));
    }

    #[test]
    fn footer_reports_page_count() {
        let page = PageState {
            page_number: 2,
            page_size: 5,
            total: 12,
        };
        assert_eq!(page_footer(&page), "page 2 of 3 (total 12)");
    }

    #[test]
    fn empty_page_still_has_footer() {
        let out = product_page(&[], &PageState::new(50));
        assert!(out.starts_with("no products"));
        assert!(out.ends_with("page 1 of 1 (total 0)"));
    }
}
