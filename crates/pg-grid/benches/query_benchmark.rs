use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use std::sync::Arc;

use pg_core::MetaData;
use pg_grid::{GridMemberBuilder, PdfMember};

fn make_handle(nx: usize, nq2: usize) -> PdfMember {
    let xs: Vec<f64> = (0..nx).map(|i| 1e-4 * (9999.0f64).powf(i as f64 / (nx - 1) as f64)).collect();
    let q2s: Vec<f64> = (0..nq2).map(|i| 2.0 * (5e5f64).powf(i as f64 / (nq2 - 1) as f64)).collect();
    let pids = [-2, -1, 21, 1, 2];

    let mut values = Vec::with_capacity(pids.len() * nx * nq2);
    for ipid in 0..pids.len() {
        for ix in 0..nx {
            for iq2 in 0..nq2 {
                values.push(((ipid + 1) * (ix + 1)) as f64 / (iq2 + 1) as f64);
            }
        }
    }

    let mut builder = GridMemberBuilder::new();
    builder.add_subgrid_collinear(vec![1.0], vec![0.118], xs, q2s, values).unwrap();
    builder.set_flavors(&pids).unwrap();

    let meta = MetaData { num_members: 1, flavors: pids.to_vec(), ..MetaData::default() };
    PdfMember::new(Arc::new(meta), builder.finish().unwrap()).unwrap()
}

fn bench_xfx_q2(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");

    for (nx, nq2) in [(50usize, 30usize), (200, 60)] {
        let pdf = make_handle(nx, nq2);
        let (x_min, x_max) = (pdf.x_min(), pdf.x_max());
        let (q2_min, q2_max) = (pdf.q2_min(), pdf.q2_max());

        group.bench_with_input(
            BenchmarkId::new("xfx_q2_sweep", format!("{nx}x{nq2}")),
            &pdf,
            |b, pdf| {
                b.iter(|| {
                    let mut acc = 0.0;
                    for i in 0..64 {
                        let t = i as f64 / 63.0;
                        let x = (x_min * (x_max / x_min).powf(t)).min(x_max);
                        let q2 = (q2_min * (q2_max / q2_min).powf(1.0 - t)).min(q2_max);
                        acc += pdf.xfx_q2(21, x, q2).unwrap();
                    }
                    black_box(acc)
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_xfx_q2);
criterion_main!(benches);
