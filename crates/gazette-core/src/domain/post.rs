use serde::{Deserialize, Serialize};

use crate::domain::Category;
use crate::error::ValidationError;

/// Number of code points of the body shown in the collection view.
pub const SUMMARY_LEN: usize = 70;

/// Post entity - a persisted article with its category.
///
/// `id` is assigned by storage and never changes afterwards; a `Post`
/// value only exists once the record has been through a repository, so
/// every field is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub category: Category,
}

impl Post {
    /// Derived, truncated rendering of the body for list-style views.
    ///
    /// Pure and uncached; repeated calls return the same value.
    pub fn summary(&self) -> String {
        summarize(&self.body)
    }
}

/// First [`SUMMARY_LEN`] code points of `body`, with `"..."` appended when
/// the body is longer. Lengths are measured in code points, not bytes.
pub fn summarize(body: &str) -> String {
    if body.chars().count() <= SUMMARY_LEN {
        return body.to_owned();
    }
    let mut summary: String = body.chars().take(SUMMARY_LEN).collect();
    summary.push_str("...");
    summary
}

/// Validated input for an insert or a full-field update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub body: String,
    pub category_id: i64,
}

/// Permissive holder for incoming post fields.
///
/// Any field may be absent or blank while the draft is being built; the
/// write constraints are enforced by an explicit [`PostDraft::validate`]
/// step before persistence, never by field assignment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostDraft {
    pub title: Option<String>,
    pub body: Option<String>,
    pub category: Option<i64>,
}

impl PostDraft {
    /// Create-path validation: all three fields are required, `title` and
    /// `body` must be non-empty. Collects every failing field instead of
    /// stopping at the first.
    pub fn validate(self) -> Result<NewPost, Vec<ValidationError>> {
        let mut errors = Vec::new();

        let title = non_blank(self.title);
        if title.is_none() {
            errors.push(ValidationError::MissingField("title"));
        }
        let body = non_blank(self.body);
        if body.is_none() {
            errors.push(ValidationError::MissingField("body"));
        }
        if self.category.is_none() {
            errors.push(ValidationError::MissingRelation("category"));
        }

        match (title, body, self.category) {
            (Some(title), Some(body), Some(category_id)) => Ok(NewPost {
                title,
                body,
                category_id,
            }),
            _ => Err(errors),
        }
    }

    /// Patch-path validation: provided fields replace the current values,
    /// omitted fields keep them, and the merged record must still satisfy
    /// the create constraints.
    pub fn apply_to(self, current: &Post) -> Result<NewPost, Vec<ValidationError>> {
        let merged = PostDraft {
            title: self.title.or_else(|| Some(current.title.clone())),
            body: self.body.or_else(|| Some(current.body.clone())),
            category: self.category.or(Some(current.category.id)),
        };
        merged.validate()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
