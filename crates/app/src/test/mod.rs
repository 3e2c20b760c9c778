//! Shared fixtures for database-backed tests.


pub(crate) use context::TestContext;
