//! Painel Domain Concerns

pub mod products;
pub mod sellers;
