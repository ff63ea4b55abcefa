//! Performance benchmarks for the comment tree.

use comment_tree::{
    add_reply, Author, Collaborators, FixedClock, MutationContext, Node, NodeId, ReplyScope,
    Seed, SequentialIdSource, ThreadConfig, ThreadSession, Timestamp, Tree,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;

/// `comments` top-level comments with `replies` replies each.
fn build_tree(comments: usize, replies: usize) -> Vec<Node> {
    let author = Author::new("u", "bench");
    (0..comments)
        .map(|c| {
            let id = format!("c{c}");
            (0..replies).fold(
                Node::comment(NodeId::from(id.as_str()), author.clone(), "comment", Timestamp(0)),
                |node, r| {
                    node.with_reply(Node::reply(
                        NodeId(format!("{id}-r{r}")),
                        NodeId::from(id.as_str()),
                        author.clone(),
                        "reply",
                        Timestamp(0),
                    ))
                },
            )
        })
        .collect()
}

/// Benchmark reply insertion against tree width
fn bench_add_reply(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_reply");

    for comments in [10, 100, 1000, 5000] {
        group.bench_with_input(
            BenchmarkId::new("top_level_comments", comments),
            &comments,
            |b, &comments| {
                let tree = Tree::from_nodes(build_tree(comments, 5), 64).unwrap();
                let ids = SequentialIdSource::new("bench");
                let clock = FixedClock::starting_at(Timestamp(0));
                let ctx = MutationContext {
                    ids: &ids,
                    clock: &clock,
                    scope: ReplyScope::AnyDepth,
                    max_depth: 64,
                };
                // Worst case for the search: the last comment.
                let target = NodeId(format!("c{}", comments - 1));
                let author = Author::new("u", "bench");

                b.iter(|| {
                    black_box(add_reply(&tree, ctx, &target, "hello", Some(&author)));
                });
            },
        );
    }

    group.finish();
}

/// Benchmark rendering one page with every thread open
fn bench_render_page(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_page");

    for replies in [2, 20, 200] {
        group.bench_with_input(
            BenchmarkId::new("replies_per_comment", replies),
            &replies,
            |b, &replies| {
                let config = ThreadConfig {
                    page_size: 10,
                    ..Default::default()
                };
                let mut session = ThreadSession::new(
                    Seed::new(build_tree(100, replies), None),
                    config,
                    Collaborators::default().with_ids(Arc::new(SequentialIdSource::new("s"))),
                )
                .unwrap();
                for i in 0..10 {
                    let id = NodeId(format!("c{i}"));
                    session.toggle_replies_visible(&id);
                    session.set_thread_expanded(&id, true);
                }

                b.iter(|| {
                    black_box(session.snapshot());
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_add_reply, bench_render_page);
criterion_main!(benches);
