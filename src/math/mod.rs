//! Mathematical utilities: quantile estimation, least squares, and
//! numerical Hessians.

pub mod hessian;
pub mod ols;
pub mod quantile;

pub use hessian::*;
pub use ols::*;
pub use quantile::*;
