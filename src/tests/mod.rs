//! Crate-level test support and cross-module tests.

pub mod mocks;
mod property;
mod unit;
