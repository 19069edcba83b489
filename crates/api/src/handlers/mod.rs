pub mod auth;
pub mod catalog;
pub mod dashboard;
pub mod forum;
pub mod marketplace;
pub mod moderation;
pub mod outfits;
pub mod recommendations;
pub mod wardrobe;
