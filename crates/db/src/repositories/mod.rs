//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Methods scoped to an owner take
//! the owning `user_id` and treat another user's rows as absent.

pub mod banned_ip_repo;
pub mod catalog_item_repo;
pub mod forum_repo;
pub mod hidden_item_repo;
pub mod outfit_repo;
pub mod recommendation_repo;
pub mod user_profile_repo;
pub mod user_repo;
pub mod wardrobe_item_repo;

pub use banned_ip_repo::BannedIpRepo;
pub use catalog_item_repo::CatalogItemRepo;
pub use forum_repo::{PostRepo, ThreadRepo};
pub use hidden_item_repo::HiddenItemRepo;
pub use outfit_repo::OutfitRepo;
pub use recommendation_repo::RecommendationRepo;
pub use user_profile_repo::UserProfileRepo;
pub use user_repo::UserRepo;
pub use wardrobe_item_repo::WardrobeItemRepo;
