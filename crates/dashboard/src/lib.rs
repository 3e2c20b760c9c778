//! Painel seller dashboard.
//!
//! Client-side state for the seller dashboard: the session store and the
//! access guard in front of every protected view, the catalog repository
//! (in-process or over the JSON API), and the controllers behind the
//! product list and edit screens.

pub mod catalog;
pub mod credentials;
pub mod edit;
pub mod errors;
pub mod guard;
pub mod http;
pub mod identity;
pub mod notifications;
pub mod repository;
pub mod routes;
pub mod session;

#[cfg(test)]
mod test_helpers;
