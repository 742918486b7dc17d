//! Catalog filtering and ordering. Pure functions over already loaded items.

use std::collections::HashSet;

use closet_rental_shared::{CatalogQuery, ItemSort, MINOR_UNITS_SCALE};
use rust_decimal::Decimal;

use crate::models::Item;

/// Parsed catalog query. Empty strings count as absent.
#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    /// Lowercased name fragment.
    pub query: Option<String>,
    pub colors: Option<HashSet<String>>,
    pub brands: Option<HashSet<String>>,
    pub sizes: Option<HashSet<String>>,
    pub independent_only: bool,
    /// Inclusive bounds in major units.
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub sort: ItemSort,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn value_set(value: Option<String>) -> Option<HashSet<String>> {
    let set: HashSet<String> = non_empty(value)?
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();
    (!set.is_empty()).then_some(set)
}

impl From<CatalogQuery> for CatalogFilter {
    fn from(query: CatalogQuery) -> Self {
        Self {
            query: non_empty(query.query).map(|q| q.to_lowercase()),
            colors: value_set(query.colors),
            brands: value_set(query.brands),
            sizes: value_set(query.sizes),
            independent_only: query.independent_filter.unwrap_or(false),
            min_price: query.min_price,
            max_price: query.max_price,
            sort: ItemSort::from_param(query.sort.as_deref()),
        }
    }
}

/// Price of an item in major units, e.g. 6000 -> 60.00.
pub fn major_units(price: i32) -> Decimal {
    Decimal::new(i64::from(price), MINOR_UNITS_SCALE)
}

fn contains_value(selected: Option<&HashSet<String>>, value: Option<&str>) -> bool {
    match selected {
        None => true,
        Some(selected) => value.map_or(false, |v| !v.is_empty() && selected.contains(v)),
    }
}

pub fn contains_query(query: Option<&str>, item: &Item) -> bool {
    query.map_or(true, |q| item.name.to_lowercase().contains(q))
}

pub fn contains_colors(colors: Option<&HashSet<String>>, item: &Item) -> bool {
    contains_value(colors, item.color.as_deref())
}

pub fn contains_brands(brands: Option<&HashSet<String>>, item: &Item) -> bool {
    contains_value(brands, item.brand.as_deref())
}

pub fn contains_sizes(sizes: Option<&HashSet<String>>, item: &Item) -> bool {
    contains_value(sizes, item.size.as_deref())
}

/// With the filter on, only items explicitly marked as independent designer
/// dresses pass; an unknown (null) marking does not.
pub fn contains_independent_designer_dresses(independent_only: bool, item: &Item) -> bool {
    !independent_only || item.independent_designer_dress == Some(true)
}

pub fn above_min_price(min_price: Option<Decimal>, item: &Item) -> bool {
    min_price.map_or(true, |min| major_units(item.price) >= min)
}

pub fn below_max_price(max_price: Option<Decimal>, item: &Item) -> bool {
    max_price.map_or(true, |max| major_units(item.price) <= max)
}

impl CatalogFilter {
    pub fn matches(&self, item: &Item) -> bool {
        contains_query(self.query.as_deref(), item)
            && contains_colors(self.colors.as_ref(), item)
            && contains_brands(self.brands.as_ref(), item)
            && contains_sizes(self.sizes.as_ref(), item)
            && contains_independent_designer_dresses(self.independent_only, item)
            && above_min_price(self.min_price, item)
            && below_max_price(self.max_price, item)
    }
}

pub fn sort_items(items: &mut [Item], sort: ItemSort) {
    match sort {
        ItemSort::PriceDesc => items.sort_by(|a, b| b.price.cmp(&a.price)),
        ItemSort::PriceAsc => items.sort_by(|a, b| a.price.cmp(&b.price)),
        ItemSort::Name => items.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        }),
    }
}

pub fn apply_filters(items: Vec<Item>, filter: &CatalogFilter) -> Vec<Item> {
    let mut selected: Vec<Item> = items.into_iter().filter(|item| filter.matches(item)).collect();
    sort_items(&mut selected, filter.sort);
    selected
}

pub fn max_price(items: &[Item]) -> Option<i32> {
    items.iter().map(|item| item.price).max()
}
