//! Domain logic for the Best Dressed wardrobe service.
//!
//! Everything in this crate is pure: no database or network access. The
//! `db` crate compiles the filter types defined here into SQL and the `api`
//! crate wires them to HTTP.

pub mod catalog;
pub mod error;
pub mod marketplace;
pub mod moderation;
pub mod outfit;
pub mod recommendation;
pub mod search;
pub mod types;
pub mod wardrobe;
