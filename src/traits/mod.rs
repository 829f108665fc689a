//! Core trait abstractions.
//!
//! [`TokenSet`] is the contract shared by both pool variants,
//! [`PriceFeed`] the contract of the historical data source, and
//! [`FromConfig`] the construction hook used by the factory.

mod from_config;
mod price_feed;
mod token_set;

pub use from_config::FromConfig;
pub use price_feed::{PriceFeed, RankedToken, TokenQuote};
pub use token_set::TokenSet;
