//! SeaORM entity definitions.

pub mod category;
pub mod post;
