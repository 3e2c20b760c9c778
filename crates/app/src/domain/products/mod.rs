//! Products

pub mod data;
pub mod errors;
pub mod form;
pub mod records;
mod repository;
pub mod service;

pub use errors::ProductsServiceError;
pub use service::*;
