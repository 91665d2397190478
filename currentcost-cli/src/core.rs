pub mod reconciler;
pub mod series;
pub mod tag;
