// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use criterion::{Criterion, criterion_group, criterion_main};
use grist_model::{
    catalogue::Catalogue,
    ingredient::Ingredient,
    request::{SolveRequest, SolveRequestBuilder},
    style::{BandSegment, Style},
};
use grist_solver::solver::solve;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHashMap;
use std::hint::black_box;

fn build_catalogue(num_ingredients: usize) -> Catalogue {
    let mut rng = ChaCha8Rng::seed_from_u64(1234);
    let attrs: Vec<String> = ["taste", "color", "strength", "foam"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut style = Style::new(vec![0.0; 4]).with_min_count("ing0", 1);
    for attr in &attrs {
        style = style.with_bands(
            attr.clone(),
            vec![
                BandSegment::new(0.0, 0.99, "red"),
                BandSegment::new(1.0, 2.99, "green"),
                BandSegment::new(3.0, 10.0, "red"),
            ],
        );
    }
    let mut styles = FxHashMap::default();
    styles.insert("bench".to_string(), style);

    let ingredients = (0..num_ingredients)
        .map(|i| {
            Ingredient::new(
                format!("ing{i}"),
                (0..4).map(|_| rng.random_range(-1.0..1.5)).collect(),
            )
            .with_unit_cost(rng.random_range(0.5..4.0))
        })
        .collect();

    Catalogue::new(attrs, styles, ingredients)
}

fn build_request() -> SolveRequest {
    SolveRequestBuilder::new("bench")
        .band_preference("taste", ["green"])
        .band_preference("color", ["green"])
        .total_cap(12)
        .per_cap(6)
        .top_k(5)
        .max_visits(200_000)
        .build()
}

fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve");

    for size in [6usize, 10, 14] {
        let catalogue = build_catalogue(size);
        let request = build_request();
        group.bench_function(format!("ingredients_{size}"), |b| {
            b.iter(|| {
                let outcome = solve(black_box(&catalogue), black_box(&request));
                black_box(outcome)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_solve);
criterion_main!(benches);
