use serde::{Deserialize, Serialize};

/// A product document. `id` is the caller-assigned identifier; uniqueness is
/// enforced by a unique index on the collection, not checked before writes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub price: f64,
}
