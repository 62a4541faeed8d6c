//! # Emocraft Core Library
//!
//! The combination DAG behind an emotion crafting game. Players start with
//! a handful of base emotions and discover new ones by combining two they
//! already hold:
//!
//! - **Rules**: unordered parent pairs mapped to a child, loaded from TOML
//! - **Levels**: combination depth of each emotion from the base layer
//! - **Base components**: which base emotions an emotion is made of
//! - **Ratios**: weighted base composition, for color blending
//! - **Discovery**: per-player progress over the graph
//! - **Dimensions**: affective profile (valence, arousal, ...) per emotion
//!
//! A graph is built once with [`GraphBuilder`] and then only queried;
//! queries on a finalized graph are memoized and safe to share across
//! threads.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod builder;
pub mod combine;
pub mod config;
pub mod dimensions;
pub mod discovery;
pub mod error;
pub mod graph;
pub mod logging;
pub mod ratios;
pub mod rules;
pub mod types;

pub use builder::{BuildOutput, BuildReport, GraphBuilder, build_graph};
pub use combine::combine_multiple;
pub use config::EmocraftConfig;
pub use error::EmocraftError;
pub use graph::CombinationGraph;
pub use ratios::compute_base_ratios;
pub use types::*;
