//! Benchmarks for both recommenders
//!
//! Run with: cargo bench --package recommenders
//!
//! Uses a synthetic single-decade catalog so no data files are needed.

use catalog::{Movie, Preferences};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use pipeline::{FeatureSchema, Recommender};
use recommenders::{PopularityRecommender, SimilarityRecommender};

const GENRES: [&str; 6] = ["Action", "Comedy", "Crime", "Drama", "Horror", "Romance"];
const STYLES: [&str; 4] = ["Dark", "Epic", "Light", "Quirky"];

fn synthetic_slice(rows: usize) -> Vec<Movie> {
    (0..rows)
        .map(|i| Movie {
            title: format!("Movie {i}"),
            genre: GENRES[i % GENRES.len()].to_string(),
            duration: 80 + (i * 37 % 100) as u32,
            style: STYLES[i % STYLES.len()].to_string(),
            popularity: (1 + i * 7 % 10) as f32,
            year: 1990 + (i % 10) as u16,
        })
        .collect()
}

fn preferences() -> Preferences {
    Preferences::new("Crime", 300, "Dark", 6, "1990s").expect("valid decade")
}

fn bench_encode(c: &mut Criterion) {
    let slice = synthetic_slice(2_000);

    c.bench_function("fit_and_encode_2000", |b| {
        b.iter(|| {
            let schema = FeatureSchema::fit(black_box(&slice));
            black_box(schema.encode(&slice))
        })
    });
}

fn bench_similarity(c: &mut Criterion) {
    let slice = synthetic_slice(2_000);
    let preferences = preferences();
    let recommender = SimilarityRecommender::new();

    c.bench_function("similarity_recommend_2000", |b| {
        b.iter(|| black_box(recommender.recommend(black_box(&slice), &preferences)))
    });
}

fn bench_popularity(c: &mut Criterion) {
    let slice = synthetic_slice(2_000);
    let preferences = preferences();
    let recommender = PopularityRecommender::new();

    c.bench_function("popularity_recommend_2000", |b| {
        b.iter(|| black_box(recommender.recommend(black_box(&slice), &preferences)))
    });
}

criterion_group!(benches, bench_encode, bench_similarity, bench_popularity);
criterion_main!(benches);
