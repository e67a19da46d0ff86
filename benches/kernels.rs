use briny_nnet::backend::{Backend, Verification, set_backend, set_verification};
use briny_nnet::nnet::{copy_rows, copy_sum_rows, one_hot_encode};
use briny_nnet::{Mapping, Matrix};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::Rng;

const ROWS: usize = 4096;
const ROWSIZE: usize = 256;

fn random_ids(n: usize, rows: usize) -> Vec<i32> {
    let mut rng = rand::rng();
    (0..n).map(|_| rng.random_range(0..rows as i32)).collect()
}

fn benchmark_kernels(c: &mut Criterion) {
    set_verification(Verification::Unchecked);

    let mut rng = rand::rng();
    let table = Matrix::new(
        ROWS,
        ROWSIZE,
        (0..ROWS * ROWSIZE).map(|_| rng.random::<f32>()).collect(),
    );

    let labels = random_ids(ROWS, 10);
    let mut encoded = Matrix::<f32>::zeros(ROWS, 10);
    c.bench_function("one_hot_encode", |b| {
        b.iter(|| one_hot_encode(black_box(&labels), 10, encoded.view_mut()))
    });

    let ids = random_ids(ROWS, ROWS);
    let mut gathered = Matrix::<f32>::zeros(ROWS, ROWSIZE);
    let mut group = c.benchmark_group("copy_rows");
    for backend in [Backend::Serial, Backend::Parallel] {
        set_backend(backend);
        group.bench_function(BenchmarkId::new("gather", format!("{backend:?}")), |b| {
            b.iter(|| {
                copy_rows(black_box(&ids), table.view(), gathered.view_mut(), Mapping::Gather)
            })
        });
    }
    group.finish();

    let mut group = c.benchmark_group("copy_sum_rows");
    set_backend(Backend::Parallel);
    for numrows in [1usize, 8, 32] {
        let numsums = ROWS / numrows;
        let ids = random_ids(numsums * numrows, ROWS);
        let coefs = vec![1.0 / numrows as f32; ids.len()];
        let mut pooled = Matrix::<f32>::zeros(numsums, ROWSIZE);
        group.bench_with_input(BenchmarkId::from_parameter(numrows), &numrows, |b, &numrows| {
            b.iter(|| {
                copy_sum_rows(
                    black_box(&ids),
                    numrows,
                    table.view(),
                    pooled.view_mut(),
                    Mapping::Gather,
                    &coefs,
                    0.0,
                    1.0,
                )
            })
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_kernels);
criterion_main!(benches);
