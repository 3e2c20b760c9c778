//! Sellers

pub mod records;
