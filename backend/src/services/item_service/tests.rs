use super::catalog::*;
use crate::models::Item;
use closet_rental_shared::{CatalogQuery, ItemSort};
use rust_decimal::Decimal;
use std::collections::HashSet;

fn item(item_id: i32, name: &str, price: i32) -> Item {
    Item {
        item_id,
        name: name.to_string(),
        color: None,
        price,
        brand: None,
        category: None,
        image_ref: None,
        is_liked: None,
        purchase_year: None,
        purchase_country: None,
        description: None,
        short_description: None,
        renter_name: None,
        renter_lastname: None,
        renter_email: None,
        availability: None,
        size: None,
        laundry_charge: None,
        renters_commission: None,
        safe_deposit: None,
        independent_designer_dress: None,
        user_id: 1,
        purchase_price_paid_by_renter: None,
        owner_role_id: None,
    }
}

fn dressed(item_id: i32, name: &str, price: i32, color: &str, brand: &str, size: &str) -> Item {
    Item {
        color: Some(color.to_string()),
        brand: Some(brand.to_string()),
        size: Some(size.to_string()),
        ..item(item_id, name, price)
    }
}

fn wardrobe() -> Vec<Item> {
    let mut independent = dressed(3, "Atelier gown", 12000, "black", "Nadia", "M");
    independent.independent_designer_dress = Some(true);
    let mut mainstream = dressed(4, "Cotton tee", 1500, "white", "Basics", "L");
    mainstream.independent_designer_dress = Some(false);

    vec![
        dressed(1, "Red silk dress", 6000, "red", "Zara", "S"),
        dressed(2, "blue jeans", 4500, "blue", "Levis", "M"),
        independent,
        mainstream,
        item(5, "Mystery coat", 8000),
    ]
}

fn names(items: &[Item]) -> Vec<&str> {
    items.iter().map(|i| i.name.as_str()).collect()
}

fn filter(query: CatalogQuery) -> CatalogFilter {
    CatalogFilter::from(query)
}

fn set(values: &[&str]) -> HashSet<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[test]
fn absent_filters_keep_every_item() {
    let items = wardrobe();
    let result = apply_filters(items.clone(), &filter(CatalogQuery::default()));
    assert_eq!(result.len(), items.len());
}

#[test]
fn empty_strings_count_as_absent() {
    let result = apply_filters(
        wardrobe(),
        &filter(CatalogQuery {
            query: Some(String::new()),
            colors: Some(String::new()),
            brands: Some("".to_string()),
            sizes: Some("  ".to_string()),
            ..Default::default()
        }),
    );
    assert_eq!(result.len(), 5);
}

#[test]
fn filtering_is_idempotent() {
    let f = filter(CatalogQuery {
        colors: Some("red,blue,black".to_string()),
        min_price: Some(Decimal::from(40)),
        sort: Some("priceDesc".to_string()),
        ..Default::default()
    });
    let once = apply_filters(wardrobe(), &f);
    let twice = apply_filters(once.clone(), &f);
    assert_eq!(once, twice);
}

#[test]
fn query_matches_name_case_insensitively() {
    let result = apply_filters(
        wardrobe(),
        &filter(CatalogQuery {
            query: Some("SILK".to_string()),
            ..Default::default()
        }),
    );
    assert_eq!(names(&result), vec!["Red silk dress"]);
}

#[test]
fn colour_filter_requires_a_listed_colour() {
    let colors = set(&["red", "blue"]);
    let items = wardrobe();
    assert!(contains_colors(Some(&colors), &items[0]));
    assert!(contains_colors(Some(&colors), &items[1]));
    assert!(!contains_colors(Some(&colors), &items[2]));
    // no colour recorded
    assert!(!contains_colors(Some(&colors), &items[4]));
    assert!(contains_colors(None, &items[4]));
}

#[test]
fn brand_and_size_filters_combine() {
    let result = apply_filters(
        wardrobe(),
        &filter(CatalogQuery {
            brands: Some("Levis,Nadia".to_string()),
            sizes: Some("M".to_string()),
            ..Default::default()
        }),
    );
    assert_eq!(names(&result), vec!["Atelier gown", "blue jeans"]);

    let sizes = set(&["S"]);
    assert!(!contains_sizes(Some(&sizes), &wardrobe()[4]));
    assert!(contains_brands(Some(&set(&["Zara"])), &wardrobe()[0]));
}

#[test]
fn independent_filter_ignores_unknown_marking() {
    let unknown = item(9, "Vintage", 1000);
    assert!(!contains_independent_designer_dresses(true, &unknown));
    assert!(contains_independent_designer_dresses(false, &unknown));

    let result = apply_filters(
        wardrobe(),
        &filter(CatalogQuery {
            independent_filter: Some(true),
            ..Default::default()
        }),
    );
    assert_eq!(names(&result), vec!["Atelier gown"]);
}

#[test]
fn price_bounds_compare_major_units() {
    let inside = item(1, "A", 6000);
    let outside = item(2, "B", 7000);
    let min = Some(Decimal::from(55));
    let max = Some(Decimal::from(65));

    assert!(above_min_price(min, &inside) && below_max_price(max, &inside));
    assert!(!below_max_price(max, &outside));
}

#[test]
fn price_bounds_are_inclusive_and_zero_is_a_bound() {
    let exact = item(1, "A", 5500);
    assert!(above_min_price(Some(Decimal::from(55)), &exact));
    assert!(below_max_price(Some(Decimal::from(55)), &exact));

    let priced = item(2, "B", 1);
    assert!(!below_max_price(Some(Decimal::ZERO), &priced));
    assert!(below_max_price(None, &priced));
}

#[test]
fn fractional_bounds_are_exact() {
    let item = item(1, "A", 5999);
    assert!(!above_min_price(Some(Decimal::new(6000, 2)), &item));
    assert!(below_max_price(Some(Decimal::new(5999, 2)), &item));
}

#[test]
fn sort_orders() {
    let items = vec![item(1, "B", 6000), item(2, "A", 5000)];

    let asc = apply_filters(items.clone(), &filter(CatalogQuery {
        sort: Some("priceAsc".to_string()),
        ..Default::default()
    }));
    assert_eq!(names(&asc), vec!["A", "B"]);

    let desc = apply_filters(items.clone(), &filter(CatalogQuery {
        sort: Some("priceDesc".to_string()),
        ..Default::default()
    }));
    assert_eq!(names(&desc), vec!["B", "A"]);

    let default = apply_filters(items, &filter(CatalogQuery::default()));
    assert_eq!(names(&default), vec!["A", "B"]);
}

#[test]
fn name_sort_ignores_case_and_is_stable_on_price() {
    let mut items = vec![
        item(1, "beta", 100),
        item(2, "Alpha", 100),
        item(3, "alpha", 100),
    ];
    sort_items(&mut items, ItemSort::Name);
    assert_eq!(names(&items), vec!["Alpha", "alpha", "beta"]);

    let mut same_price = vec![item(1, "x", 100), item(2, "y", 100), item(3, "z", 100)];
    sort_items(&mut same_price, ItemSort::PriceAsc);
    assert_eq!(names(&same_price), vec!["x", "y", "z"]);
}

#[test]
fn unknown_sort_falls_back_to_name() {
    let f = filter(CatalogQuery {
        sort: Some("newest".to_string()),
        ..Default::default()
    });
    assert_eq!(f.sort, ItemSort::Name);
}

#[test]
fn max_price_of_selection() {
    assert_eq!(max_price(&wardrobe()), Some(12000));
    assert_eq!(max_price(&[]), None);
}
