//! Outbound HTTP clients.
//!
//! Handlers reach third-party services only through the traits defined
//! here, so tests can swap in local implementations.
//!
//! - [`marketplace::MarketplaceApi`] -- key lookup and listing search.
//! - [`advisor::StyleAdvisor`] -- chat completions for recommendations.

pub mod advisor;
pub mod marketplace;

pub use advisor::{AdvisorConfig, AdvisorError, OpenAiAdvisor, StyleAdvisor};
pub use marketplace::{EbayClient, Listing, MarketplaceApi, MarketplaceConfig, MarketplaceError, PublicKeyRecord};
