//! Centralized mocks and fixtures for integration testing

pub mod adapters;
pub mod test_app;

#[allow(unused_imports)]
pub use adapters::MockAdapter;
