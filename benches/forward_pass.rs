//! Forward-pass throughput of the three dueling networks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::Array2;

use dueling_q::models::{CylinderCoordConv, CylinderNet, LanderNet};
use dueling_q::network::QNetwork;
use dueling_q::observation::{CylinderImageObservation, CylinderObservation};

fn bench_lander(c: &mut Criterion) {
    let mut group = c.benchmark_group("lander_forward");
    let net = LanderNet::new();

    for batch_size in [1, 32, 256] {
        group.bench_with_input(BenchmarkId::from_parameter(batch_size), &batch_size, |b, &batch_size| {
            let states = Array2::from_elem((batch_size, 8), 0.1);
            b.iter(|| black_box(net.q_values(black_box(&states))))
        });
    }

    group.finish();
}

fn bench_cylinder(c: &mut Criterion) {
    let mut group = c.benchmark_group("cylinder_forward");

    for n_hidden in [0, 1, 3] {
        group.bench_with_input(BenchmarkId::new("n_hidden", n_hidden), &n_hidden, |b, &n_hidden| {
            let net = CylinderNet::new(128, n_hidden, false).unwrap();
            let obs = CylinderObservation::zeros(32, net.dims());
            b.iter(|| black_box(net.q_values(black_box(&obs))))
        });
    }

    group.finish();
}

fn bench_coord_conv(c: &mut Criterion) {
    let net = CylinderCoordConv::new(false).unwrap();
    let obs = CylinderImageObservation::zeros(8, net.dims(), net.image_dims());

    c.bench_function("coord_conv_forward_batch_8", |b| {
        b.iter(|| black_box(net.q_values(black_box(&obs))))
    });
}

criterion_group!(benches, bench_lander, bench_cylinder, bench_coord_conv);
criterion_main!(benches);
