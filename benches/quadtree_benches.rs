use circle_quadtree::collision::{
    brute_force_collision_count, collision_count, par_collision_count, DEFAULT_RANGE_SCALE,
};
use circle_quadtree::{Circle, Particle, Point, Quadtree, QuadtreeConfig, Rectangle, Vector};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{rngs::SmallRng, Rng, SeedableRng};

fn get_rand() -> impl rand::Rng {
    SmallRng::seed_from_u64(0xdeadbeef)
}

fn world(half: f32) -> Rectangle {
    Rectangle::new(Point::new(0.0, 0.0), Vector::new(half, half))
}

fn random_particles(rng: &mut impl Rng, len: usize, half: f32, radius: f32) -> Vec<Particle> {
    (0..len)
        .map(|_| {
            let p = Point::new(rng.gen_range(-half, half), rng.gen_range(-half, half));
            Circle::new(p, radius)
        })
        .collect()
}

fn make_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("Quadtree make_tree");
    for size in 8..14 {
        let size = 1 << size;
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut rng = get_rand();
            let particles = random_particles(&mut rng, size, 1000.0, 1.0);

            b.iter(|| {
                let tree = Quadtree::build(world(1000.0), &particles, QuadtreeConfig::default())
                    .expect("default config to be valid");
                black_box(tree.len())
            });
        });
    }
    group.finish();
}

fn find_in_range_sparse(c: &mut Criterion) {
    let mut group = c.benchmark_group("Quadtree find_in_range sparse");
    for size in 8..14 {
        let size = 1 << size;
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut rng = get_rand();
            let particles = random_particles(&mut rng, size, 1000.0, 1.0);
            let tree = Quadtree::build(world(1000.0), &particles, QuadtreeConfig::default())
                .expect("default config to be valid");

            let mut res = Vec::new();
            b.iter(|| {
                let p = Point::new(rng.gen_range(-1000.0, 1000.0), rng.gen_range(-1000.0, 1000.0));
                res.clear();
                tree.search(&Circle::new(p, 64.0), &mut res);
                black_box(&res);
            });
        });
    }
    group.finish();
}

fn find_in_range_dense(c: &mut Criterion) {
    let mut group = c.benchmark_group("Quadtree find_in_range dense");
    for size in 8..14 {
        let size = 1 << size;
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut rng = get_rand();
            let particles = random_particles(&mut rng, size, 100.0, 1.0);
            let tree = Quadtree::build(world(100.0), &particles, QuadtreeConfig::default())
                .expect("default config to be valid");

            let mut res = Vec::new();
            b.iter(|| {
                let p = Point::new(rng.gen_range(-100.0, 100.0), rng.gen_range(-100.0, 100.0));
                res.clear();
                tree.search(&Circle::new(p, 16.0), &mut res);
                black_box(&res);
            });
        });
    }
    group.finish();
}

fn collisions(c: &mut Criterion) {
    let mut group = c.benchmark_group("Collision count");
    group.sample_size(10);
    for size in [1000, 5000].iter() {
        let mut rng = get_rand();
        let particles = random_particles(&mut rng, *size, 1000.0, 1.0);
        let tree = Quadtree::build(world(1000.0), &particles, QuadtreeConfig::default())
            .expect("default config to be valid");

        group.bench_with_input(BenchmarkId::new("quadtree", size), size, |b, _| {
            b.iter(|| collision_count(&tree, DEFAULT_RANGE_SCALE))
        });
        group.bench_with_input(BenchmarkId::new("quadtree parallel", size), size, |b, _| {
            b.iter(|| par_collision_count(&tree, DEFAULT_RANGE_SCALE))
        });
        group.bench_with_input(BenchmarkId::new("brute force", size), size, |b, _| {
            b.iter(|| brute_force_collision_count(&particles))
        });
    }
    group.finish();
}

criterion_group!(
    quadtree_benches,
    make_tree,
    find_in_range_sparse,
    find_in_range_dense,
    collisions,
);

criterion_main!(quadtree_benches);
