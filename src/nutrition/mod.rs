pub mod lookup;
pub mod normalize;

use serde::{Deserialize, Serialize};

/// One entry of the upstream nutrient payload. Names are natural-language
/// ("Energy", "Vitamin A, RAE", ...), not a fixed enum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nutrient {
    pub name: String,
    pub value: f64,
}

impl Nutrient {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}
