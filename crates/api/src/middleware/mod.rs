//! Request extractors enforcing authentication and moderation.
//!
//! - [`auth::AuthUser`] -- signed-in user from the session token.
//! - [`auth::MaybeAuthUser`] -- optional session for public pages.
//! - [`moderation::UnbannedUser`] -- signed-in user not on the IP ban list.
//! - [`moderation::ClientIp`] -- resolved caller address.

pub mod auth;
pub mod moderation;
