use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Category entity - posts belong to exactly one of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Validated input for a category insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
}

/// Permissive holder for an incoming category, validated before persistence.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryDraft {
    pub name: Option<String>,
}

impl CategoryDraft {
    pub fn validate(self) -> Result<NewCategory, Vec<ValidationError>> {
        match self.name.filter(|s| !s.is_empty()) {
            Some(name) => Ok(NewCategory { name }),
            None => Err(vec![ValidationError::MissingField("name")]),
        }
    }
}
