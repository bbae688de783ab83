//! Shared test fixtures for infopt crates.
//!
//! Each fixture builds a small, fully linked [`InfiniteModel`] and hands back
//! the references to its objects so tests can start from a known state.
//!
//! - [`dynamic`] - one time parameter, an infinite variable and its point evaluation
//! - [`stochastic`] - a dependent parameter group with an expectation measure
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! infopt-test = { workspace = true }
//! ```
//!
//! ```
//! use infopt_test::dynamic::DynamicFixture;
//!
//! let fixture = DynamicFixture::new();
//! assert!(fixture.model.is_valid(&fixture.y));
//! ```

pub mod dynamic;
pub mod stochastic;

pub use dynamic::DynamicFixture;
pub use stochastic::StochasticFixture;

use infopt_core::prelude::*;

/// Model with a single unit-interval parameter `t` and no supports.
pub fn scalar_interval_model() -> (InfiniteModel, GeneralRef) {
    let mut model = InfiniteModel::new();
    let t = model
        .insert_parameter(IndependentParameter::new(unit_interval()), "t")
        .expect("unit interval parameter");
    (model, t)
}

pub(crate) fn unit_interval() -> IntervalDomain {
    IntervalDomain::new(0.0, 1.0).expect("unit interval")
}
