//! Painel domain, validation, and persistence.

pub mod auth;
pub mod context;
pub mod database;
pub mod domain;
pub mod validation;

#[cfg(test)]
mod test;

pub mod uuids;
