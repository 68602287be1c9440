use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::WorkflowError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Facility,
    Furniture,
    Communication,
    Stationary,
    Others,
}

pub const STATIONARY_ITEMS: [&str; 6] = [
    "05A Toner",
    "A4 Paper",
    "Biro",
    "File Folders",
    "Notepads",
    "Staplers",
];

/// Communication item that the Admin can close without a vendor quote
pub const CUG_ISSUE: &str = "CUG Issue";

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Facility,
        Category::Furniture,
        Category::Communication,
        Category::Stationary,
        Category::Others,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Facility => "Facility",
            Category::Furniture => "Furniture",
            Category::Communication => "Communication",
            Category::Stationary => "Stationary",
            Category::Others => "Others",
        }
    }

    /// Fixed item list. Empty for `Others`, which takes a free-text description.
    pub fn items(&self) -> &'static [&'static str] {
        match self {
            Category::Facility => &["Door Repair", "AC Repair", "Electrical", "Plumbing", "Generator"],
            Category::Furniture => &["Chair Repair", "Table Repair", "New Chair"],
            Category::Communication => &[CUG_ISSUE, "Airtime Request", "Bulk SMS Recharge", "Internet Issue"],
            Category::Stationary => &STATIONARY_ITEMS,
            Category::Others => &[],
        }
    }

    /// Check that `item` may be requested under this category and return its
    /// normalized form.
    pub fn validate_item(&self, item: &str) -> Result<String, WorkflowError> {
        let item = item.trim();
        if item.is_empty() {
            return Err(WorkflowError::InvalidItem {
                category: *self,
                item: item.to_string(),
            });
        }
        match self {
            Category::Others => Ok(item.to_string()),
            _ if self.items().contains(&item) => Ok(item.to_string()),
            _ => Err(WorkflowError::InvalidItem {
                category: *self,
                item: item.to_string(),
            }),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown category '{}'", s))
    }
}
