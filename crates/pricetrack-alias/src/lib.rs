//! Offline alias resolution: matching store-native catalog keys onto the
//! canonical cross-store product list.
//!
//! Batch process, independent of the scrape pipeline. It only ever produces
//! a proposal table for human review; the authoritative alias mapping is
//! written elsewhere, from the reviewed file.

mod csv;
pub mod error;
pub mod matcher;
pub mod proposal;
pub mod reference;

pub use error::AliasError;
pub use matcher::{best_match, MatchCandidate, MatchType};
pub use proposal::{
    build_proposals, load_approved, write_proposals, AliasProposal, ApprovedAliases, Approval,
    ProductAlias,
};
pub use reference::{load_alias_settings, load_canonical_products, AliasSettings, CanonicalProduct};
