pub mod finger;
pub mod highlight;

pub use highlight::{HighlightGroup, HighlightRequest, HighlightStyle};
