pub mod operator;
pub mod sparse;

pub use operator::LinearOperator;
pub use sparse::{diagonal, sd_inv, sdiag};
