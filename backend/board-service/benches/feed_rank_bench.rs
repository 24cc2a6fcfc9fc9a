use board_service::models::Post;
use board_service::services::feed::{rank, SortMode};
use chrono::{Duration, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use uuid::Uuid;

fn make_posts(count: usize) -> Vec<Post> {
    let base = Utc::now();
    (0..count)
        .map(|i| Post {
            id: Uuid::new_v4(),
            content: format!("post number {}", i),
            score: ((i * 7919) % 101) as i64 - 50,
            created_at: base - Duration::seconds(i as i64),
            owner_session_id: format!("session-{}", i % 50),
        })
        .collect()
}

/// Benchmark hot ranking across feed sizes
fn bench_rank_hot(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank_hot");

    for post_count in [100, 1000, 10000].iter() {
        let posts = make_posts(*post_count);

        group.bench_with_input(
            format!("hot_{}_posts", post_count),
            &posts,
            |b, posts| {
                b.iter(|| rank(black_box(posts), SortMode::Hot));
            },
        );
    }

    group.finish();
}

/// Benchmark new ranking across feed sizes
fn bench_rank_new(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank_new");

    for post_count in [100, 1000, 10000].iter() {
        let posts = make_posts(*post_count);

        group.bench_with_input(
            format!("new_{}_posts", post_count),
            &posts,
            |b, posts| {
                b.iter(|| rank(black_box(posts), SortMode::New));
            },
        );
    }

    group.finish();
}

/// Benchmark the already-sorted case, the common steady-state for hot feeds
fn bench_rank_presorted(c: &mut Criterion) {
    let mut posts = make_posts(1000);
    posts.sort_by(|a, b| b.score.cmp(&a.score));

    c.bench_function("hot_1000_presorted", |b| {
        b.iter(|| rank(black_box(&posts), SortMode::Hot));
    });
}

criterion_group!(benches, bench_rank_hot, bench_rank_new, bench_rank_presorted);
criterion_main!(benches);
