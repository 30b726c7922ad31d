//! Feature definition loading for tagwise.
//!
//! Responsibilities:
//! - Parse JSON feature definitions and register them into a
//!   [`FeatureDb`](tagwise_core::FeatureDb).
//! - Provide the built-in catch-all features.
//! - Dump a registry back into definitions.
//!
//! Boundaries:
//! - Matching rules live in `tagwise-core`; this crate only drives its
//!   registration surface.
//!
//! Invariants:
//! - A failed load leaves the target registry unchanged.

#![forbid(unsafe_code)]

mod definition;
mod error;
mod fallback;
mod load;

pub use definition::FeatureDefinition;
pub use error::LoadError;
pub use fallback::{UNIDENTIFIED_OBJECT, fallback_features, register_fallbacks};
pub use load::{
    dump_definitions, dump_definitions_file, load_definitions, load_definitions_file, load_into,
};

#[cfg(test)]
mod tests;
