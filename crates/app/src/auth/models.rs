//! Auth data models.

use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    auth::{SessionToken, SessionTokenVersion},
    domain::sellers::records::SellerUuid,
};

/// Email and password submitted at sign-in.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"**redacted**")
            .finish()
    }
}

/// A validated sign-up, produced by [`crate::auth::validate_sign_up`].
#[derive(Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct SignUp {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

impl fmt::Debug for SignUp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignUp")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("password", &"**redacted**")
            .finish()
    }
}

/// The seller behind a live session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub session_uuid: Uuid,
    pub seller_uuid: SellerUuid,
    pub email: String,
    pub expires_at: Timestamp,
}

/// Session issuance result with the one-time raw token.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: SessionToken,
    pub identity: Identity,
}

/// Active session row used during bearer authentication.
#[derive(Debug, Clone)]
pub(crate) struct ActiveSession {
    pub seller_uuid: SellerUuid,
    pub email: String,
    pub version: SessionTokenVersion,
    pub token_hash: String,
    pub expires_at: Timestamp,
}

/// Seller row used when checking a password.
#[derive(Debug, Clone)]
pub(crate) struct SellerLogin {
    pub uuid: SellerUuid,
    pub email: String,
    pub password_hash: String,
}

/// New session persistence payload.
#[derive(Debug, Clone)]
pub(crate) struct NewSession {
    pub uuid: Uuid,
    pub seller_uuid: SellerUuid,
    pub version: SessionTokenVersion,
    pub token_hash: String,
    pub expires_at: Timestamp,
}
