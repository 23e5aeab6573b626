//! Graph representation module

pub mod adjacency;
pub mod builder;

pub use adjacency::{Edge, EdgeWeights, LinkGraph};
pub use builder::GraphBuilder;
