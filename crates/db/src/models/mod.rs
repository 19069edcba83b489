//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` DTOs for inserts and updates where the API accepts them

pub mod banned_ip;
pub mod catalog_item;
pub mod forum;
pub mod outfit;
pub mod recommendation;
pub mod user;
pub mod user_profile;
pub mod wardrobe_item;
