//! Broad-phase + narrow-phase collision detection on top of [`Quadtree`].
//!
//! Every particle queries the tree with a circle around its own center, the candidates are then
//! tested pairwise. Only the querying particle's own id is skipped: two distinct particles with
//! the same center and radius collide with each other.
//!
//! Only particles whose center lies inside the query circle are guaranteed to be found, so the
//! results match [`brute_force_collision_count`] when `range_scale * r >= r + r'` holds for
//! every colliding pair, e.g. uniform radii with a scale of 2.
use crate::geometry::{Circle, Particle};
use crate::quadtree::{ParticleId, Quadtree};
use rayon::prelude::*;

/// Scale of the query circle used by the collision counters for uniform particles.
pub const DEFAULT_RANGE_SCALE: f32 = 2.0;

/// Number of ordered colliding pairs.
pub fn collision_count(tree: &Quadtree<'_>, range_scale: f32) -> usize {
    let mut candidates = Vec::new();
    tree.particles()
        .iter()
        .enumerate()
        .map(|(i, p)| collisions_of(tree, ParticleId(i), p, range_scale, &mut candidates))
        .sum()
}

/// Same as [`collision_count`] but the particles are processed on the rayon thread pool.
pub fn par_collision_count(tree: &Quadtree<'_>, range_scale: f32) -> usize {
    tree.particles()
        .par_iter()
        .enumerate()
        .map_init(Vec::new, |candidates, (i, p)| {
            collisions_of(tree, ParticleId(i), p, range_scale, candidates)
        })
        .sum()
}

/// O(n^2) reference implementation
pub fn brute_force_collision_count(particles: &[Particle]) -> usize {
    particles
        .iter()
        .enumerate()
        .map(|(i, p)| {
            particles
                .iter()
                .enumerate()
                .filter(|(j, other)| i != *j && p.intersects_circle(other))
                .count()
        })
        .sum()
}

/// Unordered colliding pairs `(a, b)` with `a < b`, sorted.
pub fn collision_pairs(tree: &Quadtree<'_>, range_scale: f32) -> Vec<(ParticleId, ParticleId)> {
    let particles = tree.particles();
    let mut candidates = Vec::new();
    let mut pairs = Vec::new();

    for (i, p) in particles.iter().enumerate() {
        let id = ParticleId(i);
        candidates.clear();
        tree.search(&query_range(p, range_scale), &mut candidates);
        candidates.sort_unstable();
        candidates.dedup();

        for other in candidates.iter() {
            if *other != id && p.intersects_circle(&particles[other.0]) {
                pairs.push(if id < *other { (id, *other) } else { (*other, id) });
            }
        }
    }

    pairs.sort_unstable();
    pairs.dedup();
    pairs
}

fn query_range(p: &Particle, range_scale: f32) -> Circle {
    Circle::new(p.center, p.radius * range_scale)
}

fn collisions_of(
    tree: &Quadtree<'_>,
    own: ParticleId,
    p: &Particle,
    range_scale: f32,
    candidates: &mut Vec<ParticleId>,
) -> usize {
    let particles = tree.particles();
    candidates.clear();
    tree.search(&query_range(p, range_scale), candidates);
    // particles on quadrant edges are reported once per leaf holding them
    candidates.sort_unstable();
    candidates.dedup();

    candidates
        .iter()
        .filter(|id| **id != own && p.intersects_circle(&particles[id.0]))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, Rectangle, Vector};
    use crate::quadtree::QuadtreeConfig;
    use rand::prelude::*;
    use rand::rngs::SmallRng;

    fn world() -> Rectangle {
        Rectangle::new(Point::new(0.0, 0.0), Vector::new(1000.0, 1000.0))
    }

    fn random_particles(n: usize) -> Vec<Particle> {
        let mut rng = SmallRng::seed_from_u64(0xdeadbeef);
        (0..n)
            .map(|_| {
                Circle::new(
                    Point::new(rng.gen_range(-1000.0, 1000.0), rng.gen_range(-1000.0, 1000.0)),
                    // dense enough to produce plenty of collisions
                    8.0,
                )
            })
            .collect()
    }

    #[test]
    fn counts_match_brute_force() {
        let particles = random_particles(2000);
        let tree = Quadtree::build(world(), &particles, QuadtreeConfig::default()).unwrap();

        let expected = brute_force_collision_count(&particles);
        assert!(expected > 0);
        assert_eq!(collision_count(&tree, DEFAULT_RANGE_SCALE), expected);
        assert_eq!(par_collision_count(&tree, DEFAULT_RANGE_SCALE), expected);
    }

    #[test]
    fn pairs_are_unordered_and_unique() {
        let particles = random_particles(2000);
        let tree = Quadtree::build(world(), &particles, QuadtreeConfig::default()).unwrap();

        let pairs = collision_pairs(&tree, DEFAULT_RANGE_SCALE);
        assert_eq!(pairs.len() * 2, brute_force_collision_count(&particles));
        for (a, b) in pairs.iter() {
            assert!(a < b);
            assert!(particles[a.0].intersects_circle(&particles[b.0]));
        }
    }

    #[test]
    fn identical_particles_collide_with_each_other() {
        let particles = vec![Circle::new(Point::new(1.0, 1.0), 1.0); 3];
        let tree = Quadtree::build(world(), &particles, QuadtreeConfig::default()).unwrap();

        assert_eq!(brute_force_collision_count(&particles), 6);
        assert_eq!(collision_count(&tree, DEFAULT_RANGE_SCALE), 6);
        assert_eq!(par_collision_count(&tree, DEFAULT_RANGE_SCALE), 6);
        assert_eq!(
            collision_pairs(&tree, DEFAULT_RANGE_SCALE),
            vec![
                (ParticleId(0), ParticleId(1)),
                (ParticleId(0), ParticleId(2)),
                (ParticleId(1), ParticleId(2)),
            ]
        );
    }

    #[test]
    fn lone_particle_does_not_collide_with_itself() {
        let particles = [Circle::new(Point::new(1.0, 1.0), 1.0)];
        let tree = Quadtree::build(world(), &particles, QuadtreeConfig::default()).unwrap();

        assert_eq!(brute_force_collision_count(&particles), 0);
        assert_eq!(collision_count(&tree, DEFAULT_RANGE_SCALE), 0);
    }

    #[test]
    fn touching_pair() {
        let particles = [
            Circle::new(Point::new(0.0, 0.0), 1.0),
            Circle::new(Point::new(2.0, 0.0), 1.0),
            Circle::new(Point::new(50.0, 0.0), 1.0),
        ];
        let tree = Quadtree::build(world(), &particles, QuadtreeConfig::default()).unwrap();

        assert_eq!(collision_count(&tree, DEFAULT_RANGE_SCALE), 2);
        assert_eq!(
            collision_pairs(&tree, DEFAULT_RANGE_SCALE),
            vec![(ParticleId(0), ParticleId(1))]
        );
    }
}
