//! Turns exported equipment pages into per-tier comparison tables.
//!
//! Pages go through the template scanner ([`wikitext`]), get a category
//! ([`classify`]), are reshaped into seven tiers ([`compile`]), grouped
//! ([`aggregate`]) and finally written back out as wiki tables ([`render`]).

pub mod aggregate;
pub mod cache;
pub mod classify;
pub mod compile;
pub mod config;
pub mod definitions;
pub mod render;
pub mod wikitext;
