//! Bounded depth region quadtree over circular particles.
//!
//! # Contracts:
//! - Particles are owned by the caller, the tree stores [`ParticleId`]s into the borrowed slice.
//! - A particle is filed by its center only. Every child whose closed bounds contain the center
//!   receives it, so a center lying on a shared edge is stored more than once and shows up more
//!   than once in query results.
//! - A center that passed a node's gate is never lost. If rounding of the quadrant bounds leaves
//!   it outside of all four children, the nearest child takes it.
//! - Queries prune by testing the query circle against node boundaries, which finds every
//!   particle whose center is inside the query circle.
//!

use crate::geometry::{Circle, Particle, Point, Rectangle};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;
use tracing::{debug, trace, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_DEPTH: usize = 5;
pub const DEFAULT_MAX_CAPACITY: usize = 15;

type Children = Option<Box<[Node; 4]>>;

/// Index of a particle in the slice the tree was built over.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ParticleId(pub usize);

impl fmt::Display for ParticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QuadtreeConfig {
    /// Nodes at depth `max_depth - 1` are never subdivided.
    pub max_depth: usize,
    /// A leaf subdivides when an insertion would push it past this many particles.
    pub max_capacity: usize,
}

impl Default for QuadtreeConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_capacity: DEFAULT_MAX_CAPACITY,
        }
    }
}

impl QuadtreeConfig {
    pub fn new(max_depth: usize, max_capacity: usize) -> Result<Self, ConfigError> {
        let config = Self {
            max_depth,
            max_capacity,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        if self.max_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum ConfigError {
    #[error("max_depth must be at least 1")]
    ZeroDepth,
    #[error("max_capacity must be at least 1")]
    ZeroCapacity,
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum InsertError {
    /// The tree is unchanged, the particle will never be returned by a query.
    #[error("particle {id} centered at {center:?} is outside of the tree boundary")]
    OutOfBounds { id: ParticleId, center: Point },
    #[error("particle {id} does not exist, the tree holds {len} particles")]
    UnknownParticle { id: ParticleId, len: usize },
}

#[derive(Debug, Clone)]
pub struct Node {
    boundary: Rectangle,
    depth: usize,

    children: Children,

    items: Vec<ParticleId>,
}

impl Node {
    fn new(boundary: Rectangle, depth: usize) -> Self {
        Self {
            boundary,
            depth,
            children: None,
            items: Vec::new(),
        }
    }

    pub fn boundary(&self) -> &Rectangle {
        &self.boundary
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    pub fn children(&self) -> Option<&[Node; 4]> {
        self.children.as_deref()
    }

    /// Particles held directly by this node. Always empty for internal nodes.
    pub fn particles(&self) -> &[ParticleId] {
        &self.items
    }

    /// Return if the particle's center is inside this node
    fn insert(
        &mut self,
        id: ParticleId,
        particle: &Particle,
        particles: &[Particle],
        config: &QuadtreeConfig,
    ) -> bool {
        if !particle.center_in(&self.boundary) {
            return false;
        }
        self.place(id, particle, particles, config);
        true
    }

    /// File a particle whose center already passed this node's gate.
    fn place(
        &mut self,
        id: ParticleId,
        particle: &Particle,
        particles: &[Particle],
        config: &QuadtreeConfig,
    ) {
        if self.is_leaf() && self.items.len() + 1 > config.max_capacity {
            self.split(particles, config);
        }

        match self.children.as_mut() {
            None => self.items.push(id),
            Some(children) => distribute(children, id, particle, particles, config),
        }
    }

    fn split(&mut self, particles: &[Particle], config: &QuadtreeConfig) {
        debug_assert!(self.is_leaf());

        if self.depth + 1 >= config.max_depth {
            if self.items.len() == config.max_capacity {
                trace!(
                    depth = self.depth,
                    len = self.items.len(),
                    "leaf at the depth limit is over capacity"
                );
            }
            return;
        }

        let depth = self.depth + 1;
        let [ne, nw, se, sw] = self.boundary.quadrants();
        let mut children = Box::new([
            Self::new(ne, depth),
            Self::new(nw, depth),
            Self::new(se, depth),
            Self::new(sw, depth),
        ]);

        let items = std::mem::take(&mut self.items);
        trace!(depth = self.depth, redistributed = items.len(), "splitting node");

        for id in items {
            distribute(&mut children, id, &particles[id.0], particles, config);
        }

        self.children = Some(children);
    }

    fn search(&self, range: &Circle, particles: &[Particle], out: &mut Vec<ParticleId>) {
        if !range.intersects_rectangle(&self.boundary) {
            return;
        }

        match self.children {
            None => {
                for id in self.items.iter() {
                    if particles[id.0].intersects_circle(range) {
                        out.push(*id);
                    }
                }
            }
            Some(ref children) => {
                for child in children.iter() {
                    child.search(range, particles, out);
                }
            }
        }
    }

    fn max_depth(&self) -> usize {
        match self.children {
            None => self.depth,
            Some(ref children) => children
                .iter()
                .map(Node::max_depth)
                .max()
                .unwrap_or(self.depth),
        }
    }

    fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .flat_map(|c| c.iter())
            .map(Node::node_count)
            .sum::<usize>()
    }
}

/// Insert into every child whose bounds contain the center.
///
/// The quadrant bounds are rounded, so a center inside the parent can miss all four children by
/// a few ulps. Such a particle goes to the nearest child instead of being lost.
fn distribute(
    children: &mut [Node; 4],
    id: ParticleId,
    particle: &Particle,
    particles: &[Particle],
    config: &QuadtreeConfig,
) {
    let mut accepted = false;
    for child in children.iter_mut() {
        accepted |= child.insert(id, particle, particles, config);
    }
    if accepted {
        return;
    }

    let center = particle.center;
    let nearest = children.iter_mut().min_by(|a, b| {
        a.boundary
            .distance_squared(&center)
            .partial_cmp(&b.boundary.distance_squared(&center))
            .unwrap_or(Ordering::Equal)
    });
    if let Some(child) = nearest {
        trace!(%id, depth = child.depth, "center fell between quadrants, using the nearest");
        child.place(id, particle, particles, config);
    }
}

/// Quadtree over a borrowed slice of particles.
///
/// ```
/// use circle_quadtree::{Circle, Point, Quadtree, Rectangle, Vector};
///
/// let particles = [
///     Circle::new(Point::new(0.0, 0.0), 1.0),
///     Circle::new(Point::new(1.5, 0.0), 1.0),
/// ];
/// let boundary = Rectangle::new(Point::new(0.0, 0.0), Vector::new(1000.0, 1000.0));
/// let tree = Quadtree::build(boundary, &particles, Default::default()).unwrap();
///
/// let hits = tree.query(&Circle::new(Point::new(0.0, 0.0), 2.0));
/// assert_eq!(hits.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Quadtree<'a> {
    particles: &'a [Particle],
    config: QuadtreeConfig,
    root: Node,
    len: usize,
    dropped: usize,
}

impl<'a> Quadtree<'a> {
    /// Empty tree with the default configuration.
    pub fn new(boundary: Rectangle, particles: &'a [Particle]) -> Self {
        Self::with_valid_config(boundary, particles, QuadtreeConfig::default())
    }

    pub fn with_config(
        boundary: Rectangle,
        particles: &'a [Particle],
        config: QuadtreeConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_valid_config(boundary, particles, config))
    }

    /// Insert every particle of the slice. Particles outside of `boundary` are skipped and
    /// counted in [`dropped`](Quadtree::dropped).
    pub fn build(
        boundary: Rectangle,
        particles: &'a [Particle],
        config: QuadtreeConfig,
    ) -> Result<Self, ConfigError> {
        let mut tree = Self::with_config(boundary, particles, config)?;
        for id in (0..particles.len()).map(ParticleId) {
            if let Err(err) = tree.insert(id) {
                warn!("{}", err);
            }
        }
        debug!(
            inserted = tree.len,
            dropped = tree.dropped,
            depth = tree.depth(),
            nodes = tree.node_count(),
            "quadtree built"
        );
        Ok(tree)
    }

    fn with_valid_config(
        boundary: Rectangle,
        particles: &'a [Particle],
        config: QuadtreeConfig,
    ) -> Self {
        Self {
            particles,
            config,
            root: Node::new(boundary, 0),
            len: 0,
            dropped: 0,
        }
    }

    /// Insert the particle at `id`. Fails without modifying the tree if its center is outside of
    /// the root boundary.
    pub fn insert(&mut self, id: ParticleId) -> Result<(), InsertError> {
        let particles = self.particles;
        let particle = particles.get(id.0).ok_or(InsertError::UnknownParticle {
            id,
            len: particles.len(),
        })?;

        if !self.root.insert(id, particle, particles, &self.config) {
            self.dropped += 1;
            return Err(InsertError::OutOfBounds {
                id,
                center: particle.center,
            });
        }
        self.len += 1;
        Ok(())
    }

    /// Push the id of every stored particle intersecting `range` into `out`.
    /// `out` is not cleared.
    pub fn search(&self, range: &Circle, out: &mut Vec<ParticleId>) {
        self.root.search(range, self.particles, out);
    }

    pub fn query(&self, range: &Circle) -> Vec<ParticleId> {
        let mut out = Vec::new();
        self.search(range, &mut out);
        out
    }

    pub fn query_particles(&self, range: &Circle) -> Vec<&'a Particle> {
        let particles = self.particles;
        self.query(range)
            .into_iter()
            .map(|id| &particles[id.0])
            .collect()
    }

    pub fn particle(&self, id: ParticleId) -> Option<&'a Particle> {
        self.particles.get(id.0)
    }

    pub fn particles(&self) -> &'a [Particle] {
        self.particles
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn boundary(&self) -> &Rectangle {
        &self.root.boundary
    }

    pub fn config(&self) -> &QuadtreeConfig {
        &self.config
    }

    /// Number of successful insertions
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of insertions rejected because the particle was outside of the boundary
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Depth of the deepest node
    pub fn depth(&self) -> usize {
        self.root.max_depth()
    }

    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }
}
