// 🏷️ Category Registry - the closed set of expense labels
//
// Categories are fixed at compile time. Registry order (Category::ALL) is the
// order used everywhere a per-category breakdown is emitted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// CATEGORY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Food,
    Travel,
    Entertainment,
    Shopping,
    Utilities,
}

impl Category {
    /// Every known category, in registry order
    pub const ALL: [Category; 5] = [
        Category::Food,
        Category::Travel,
        Category::Entertainment,
        Category::Shopping,
        Category::Utilities,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Travel => "Travel",
            Category::Entertainment => "Entertainment",
            Category::Shopping => "Shopping",
            Category::Utilities => "Utilities",
        }
    }

    /// Exact, case-sensitive lookup by label
    pub fn from_label(label: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.as_str() == label)
    }

    /// Labels of every known category, in registry order
    pub fn labels() -> Vec<&'static str> {
        Category::ALL.iter().map(Category::as_str).collect()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::from_label(s).ok_or(crate::error::ValidationError::InvalidCategory)
    }
}
