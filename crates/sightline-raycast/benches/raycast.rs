use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use sightline_math::{Point3, Vec3};
use sightline_raycast::{
    Mesh, MidpointBuilder, RayCaster, ShiftedMedianBuilder, SweepBuilder, TreeBuilder,
};

struct Lcg(u32);

impl Lcg {
    fn next(&mut self) -> f32 {
        self.0 = self.0.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        (self.0 >> 8) as f32 / 16_777_216.0
    }
}

/// A grid of floating quads at pseudo-random heights.
fn terrain_mesh(cells: u32) -> Mesh {
    let mut rng = Lcg(0xbeef);
    let mut positions = Vec::new();
    let mut faces = Vec::new();

    for cell_y in 0..cells {
        for cell_x in 0..cells {
            let (x, y) = (cell_x as f32, cell_y as f32);
            let h = rng.next() * 8.0;

            let base = positions.len() as u32;
            positions.push(Point3::new(x, y, h));
            positions.push(Point3::new(x + 1.0, y, h));
            positions.push(Point3::new(x + 1.0, y + 1.0, h));
            positions.push(Point3::new(x, y + 1.0, h));
            faces.push([base, base + 1, base + 2]);
            faces.push([base, base + 2, base + 3]);
        }
    }

    Mesh::new(positions, faces)
}

pub fn bench(c: &mut Criterion) {
    let mesh = terrain_mesh(64);

    let mut group = c.benchmark_group("Tree build");
    let strategies: [&dyn TreeBuilder; 3] = [&MidpointBuilder, &ShiftedMedianBuilder, &SweepBuilder];
    for strategy in strategies {
        group.bench_with_input(
            BenchmarkId::from_parameter(strategy.name()),
            &mesh,
            |b, mesh| b.iter(|| RayCaster::build_with(std::slice::from_ref(mesh), strategy)),
        );
    }
    group.finish();

    let mut group = c.benchmark_group("Queries");
    let mut engine = RayCaster::build(std::slice::from_ref(&mesh)).unwrap();
    let mut rng = Lcg(0x5eed);
    let rays: Vec<(Point3, Vec3)> = (0..256)
        .map(|_| {
            (
                Point3::new(rng.next() * 64.0, rng.next() * 64.0, 20.0),
                Vec3::new(rng.next() - 0.5, rng.next() - 0.5, -1.0),
            )
        })
        .collect();

    group.bench_function("find_all_hits x256", |b| {
        b.iter(|| {
            let mut total = 0usize;
            for &(origin, direction) in &rays {
                total += engine.find_all_hits(origin, direction).unwrap().len();
            }
            total
        })
    });
    group.bench_function("find_nearest_hit x256", |b| {
        b.iter(|| {
            let mut total = 0usize;
            for &(origin, direction) in &rays {
                total += engine.find_nearest_hit(origin, direction).is_some() as usize;
            }
            total
        })
    });
    group.finish();
}

criterion_group!(benches, bench);
criterion_main!(benches);
