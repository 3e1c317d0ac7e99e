//! Static quadtree for proximity queries between circular particles.
//! # Contracts:
//! - The tree is built once, then only queried. There is no removal or rebalancing.
//! - Particles are owned by the caller and addressed by their index in the borrowed slice.
//! - Nodes are never deeper than `max_depth - 1`, leaves at that depth may exceed `max_capacity`.
//!
pub mod collision;
pub mod geometry;
pub mod quadtree;

pub use geometry::{Circle, LineSegment, Particle, Point, Rectangle, Vector};
pub use quadtree::{
    ConfigError, InsertError, Node, ParticleId, Quadtree, QuadtreeConfig, DEFAULT_MAX_CAPACITY,
    DEFAULT_MAX_DEPTH,
};
