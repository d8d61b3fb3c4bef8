//! Ride search.
//!
//! Answers "which rides go where I want to go?": rides whose endpoints
//! match the query text, plus rides that start close to the query's origin
//! as measured by road distance.

mod config;
mod engine;
mod nearby;
mod query;


pub use config::SearchConfig;
pub use engine::{MatchKind, RideMatch, RideSearchEngine, SearchResults};
pub use nearby::is_nearby;
pub use query::RideQuery;
