//! Parametric distribution fitting and sampling.
//!
//! Responsibilities:
//!
//! - describe distribution families as open registry entries (`family`)
//! - fit a family to observed data by maximum likelihood (`fit`)
//! - draw native or shifted samples from a fitted family (`project`)

pub mod family;
pub mod fit;
pub mod project;

pub use family::*;
pub use fit::*;
pub use project::*;
