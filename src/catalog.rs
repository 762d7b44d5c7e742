//! Lookup tables of products, orders and users extracted from a corpus.
//!
//! Each record's instruction is checked against an ordered rule table; the
//! first rule that fires extracts an entity key from the record's input and
//! stores the record's output under it. Records no rule fires on are simply
//! not catalogued.

use ahash::AHashMap;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::corpus::Dataset;

/// Returned by [`CategorizedStore::product_info`] when nothing matches.
pub const PRODUCT_NOT_FOUND: &str = "Product not found in our database.";
/// Returned by [`CategorizedStore::user_info`] when nothing matches.
pub const USER_NOT_FOUND: &str = "User not found in our database.";
/// Returned by [`CategorizedStore::order_info`] when nothing matches.
pub const ORDER_NOT_FOUND: &str = "Order not found in our database.";

/// The kind of entity a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Product,
    Order,
    User,
}

/// One entry of the categorization table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryRule {
    /// Lowercase substring looked for in the instruction.
    pub instruction: &'static str,
    /// Marker preceding the entity key in the input.
    pub prefix: &'static str,
    pub category: Category,
}

/// Categorization rules in priority order.
pub const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        instruction: "product details",
        prefix: "Product Name:",
        category: Category::Product,
    },
    CategoryRule {
        instruction: "order details",
        prefix: "Order ID:",
        category: Category::Order,
    },
    CategoryRule {
        instruction: "user profile",
        prefix: "User ID:",
        category: Category::User,
    },
];

/// First rule whose instruction substring occurs in `instruction`, ignoring case.
pub fn categorize(instruction: &str) -> Option<&'static CategoryRule> {
    let lowered = instruction.to_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|rule| lowered.contains(rule.instruction))
}

/// Extract the key carried by the first line of `text` that contains `prefix`.
///
/// The prefix is removed from that line and the rest trimmed. Later lines are
/// never consulted, and an empty result is `None`.
pub fn extract_value(text: &str, prefix: &str) -> Option<String> {
    let line = text.lines().find(|line| line.contains(prefix))?;
    let value = line.replace(prefix, "");
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Insertion-ordered map from entity key to response text.
///
/// Re-inserting a key replaces its text but keeps its original position,
/// which decides the winner of a partial product match.
#[derive(Debug, Clone, Default)]
pub struct EntityTable {
    entries: Vec<(String, String)>,
    positions: AHashMap<String, usize>,
}

impl EntityTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: String, info: String) {
        match self.positions.get(&key) {
            Some(&position) => self.entries[position].1 = info,
            None => {
                self.positions.insert(key.clone(), self.entries.len());
                self.entries.push((key, info));
            }
        }
    }

    /// Exact-key lookup.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.positions
            .get(key)
            .map(|&position| self.entries[position].1.as_str())
    }

    /// Entries in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Products, orders and users catalogued from one dataset.
#[derive(Debug, Clone, Default)]
pub struct CategorizedStore {
    products: EntityTable,
    orders: EntityTable,
    users: EntityTable,
}

impl CategorizedStore {
    /// Scan `dataset` in order and catalogue every record a rule fires on.
    pub fn build(dataset: &Dataset) -> Self {
        let mut store = CategorizedStore::default();

        for record in dataset {
            let Some(rule) = categorize(&record.instruction) else {
                continue;
            };
            let Some(key) = extract_value(&record.input, rule.prefix) else {
                continue;
            };
            store
                .table_mut(rule.category)
                .insert(key, record.output.clone());
        }

        debug!(
            "Catalogued {} products, {} orders, {} users",
            store.products.len(),
            store.orders.len(),
            store.users.len()
        );
        store
    }

    fn table_mut(&mut self, category: Category) -> &mut EntityTable {
        match category {
            Category::Product => &mut self.products,
            Category::Order => &mut self.orders,
            Category::User => &mut self.users,
        }
    }

    pub fn table(&self, category: Category) -> &EntityTable {
        match category {
            Category::Product => &self.products,
            Category::Order => &self.orders,
            Category::User => &self.users,
        }
    }

    /// Look up a product by exact name, then by case-insensitive substring.
    ///
    /// The substring fallback returns the first catalogued product whose
    /// name contains `name`. A blank name never matches.
    pub fn product_info(&self, name: &str) -> &str {
        if let Some(info) = self.products.get(name) {
            return info;
        }
        if name.trim().is_empty() {
            return PRODUCT_NOT_FOUND;
        }

        let needle = name.to_lowercase();
        self.products
            .iter()
            .find(|(key, _)| key.to_lowercase().contains(&needle))
            .map(|(_, info)| info)
            .unwrap_or(PRODUCT_NOT_FOUND)
    }

    /// Look up a user by exact id.
    pub fn user_info(&self, user_id: &str) -> &str {
        self.users.get(user_id).unwrap_or(USER_NOT_FOUND)
    }

    /// Look up an order by exact id.
    ///
    /// Filtering by product name is not supported; a product alone always
    /// yields [`ORDER_NOT_FOUND`].
    pub fn order_info(&self, order_id: Option<&str>, _product_name: Option<&str>) -> &str {
        order_id
            .filter(|id| !id.is_empty())
            .and_then(|id| self.orders.get(id))
            .unwrap_or(ORDER_NOT_FOUND)
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}
