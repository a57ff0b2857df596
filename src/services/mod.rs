pub mod aggregator;
pub mod hydrator;
pub mod interactions;
pub mod items;
pub mod ranker;
pub mod recommendations;

pub use recommendations::RecommendationEngine;
