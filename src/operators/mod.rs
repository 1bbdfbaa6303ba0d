pub mod averaging;
pub mod inner_product;

pub use averaging::AveragingCache;
pub use inner_product::{InnerProductKind, Property};
