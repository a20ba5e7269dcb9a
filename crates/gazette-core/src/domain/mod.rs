//! Domain entities - the core business objects.

mod category;

mod post;

pub use category::{Category, CategoryDraft, NewCategory};
pub use post::{NewPost, Post, PostDraft, SUMMARY_LEN, summarize};
