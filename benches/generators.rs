use criterion::{criterion_group, criterion_main, Criterion};
use amazeing::{
    generators::{self, Algorithm},
    maze::MazeBuilder,
    units::{Height, Width},
};

fn bench_algorithm_32(c: &mut Criterion, name: &str, algorithm: Algorithm) {
    let mut maze = MazeBuilder::new(Width(32), Height(32)).seed(7).build().unwrap();

    c.bench_function(name, move |b| {
        b.iter(|| generators::generate_with(&mut maze, algorithm).unwrap())
    });
}

fn bench_recursive_backtracker_maze_32(c: &mut Criterion) {
    bench_algorithm_32(c, "recursive_backtracker_maze_32", Algorithm::RecursiveBacktracker);
}

fn bench_prim_maze_32(c: &mut Criterion) {
    bench_algorithm_32(c, "prim_maze_32", Algorithm::Prim);
}

fn bench_kruskal_maze_32(c: &mut Criterion) {
    bench_algorithm_32(c, "kruskal_maze_32", Algorithm::Kruskal);
}

fn bench_dump_compact_32(c: &mut Criterion) {
    let mut maze = MazeBuilder::new(Width(32), Height(32)).build().unwrap();
    generators::generate(&mut maze, "dfs").unwrap();

    c.bench_function("dump_compact_32", move |b| b.iter(|| maze.dump_compact()));
}

criterion_group!(
    benches,
    bench_recursive_backtracker_maze_32,
    bench_prim_maze_32,
    bench_kruskal_maze_32,
    bench_dump_compact_32
);
criterion_main!(benches);
