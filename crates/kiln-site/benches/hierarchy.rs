//! Benchmarks for hierarchy resolution over generated catalogs.

use std::convert::Infallible;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use kiln_site::{
    BreadcrumbOptions, NavOptions, NullTitleResolver, PageRecord, TreeNode, TreeOptions,
    build_tree, get_breadcrumbs, get_nav_tree,
};

/// Generate a catalog of index pages with the given depth and breadth.
fn generate_catalog(depth: usize, breadth: usize) -> Vec<PageRecord> {
    fn level(prefix: &str, current: usize, max: usize, breadth: usize, out: &mut Vec<PageRecord>) {
        out.push(PageRecord::from_url(prefix).with_title(format!("Level {current}")));
        if current == max {
            return;
        }
        for i in 0..breadth {
            let child = format!("{prefix}section-{i}/");
            level(&child, current + 1, max, breadth, out);
        }
    }

    let mut pages = Vec::new();
    level("/", 0, depth, breadth, &mut pages);
    pages
}

fn deepest(pages: &[PageRecord]) -> &PageRecord {
    pages.iter().max_by_key(|p| p.depth()).unwrap()
}

fn bench_build_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_tree");

    for (depth, breadth) in [(2, 5), (3, 4), (4, 4)] {
        let pages = generate_catalog(depth, breadth);
        let urls: Vec<&str> = pages.iter().map(|p| p.url.as_str()).collect();
        let options = TreeOptions {
            current_url: Some(deepest(&pages).url.clone()),
            ..TreeOptions::default()
        };

        let enrich = |node: &mut TreeNode| node.title.push('x');

        group.bench_with_input(
            BenchmarkId::new("pages", urls.len()),
            &urls,
            |b, urls| b.iter(|| build_tree(urls, &options, enrich)),
        );
    }

    group.finish();
}

fn bench_breadcrumbs(c: &mut Criterion) {
    let pages = generate_catalog(4, 4);
    let target = deepest(&pages);
    let options = BreadcrumbOptions::<Infallible>::default();

    c.bench_function("breadcrumbs_depth_4", |b| {
        b.iter(|| get_breadcrumbs(target, &pages, &NullTitleResolver, &options))
    });
}

fn bench_nav_tree(c: &mut Criterion) {
    let pages = generate_catalog(4, 4);
    let target = deepest(&pages);

    let mut group = c.benchmark_group("nav_tree");

    group.bench_function("default_depth", |b| {
        let options = NavOptions::<Infallible>::default();
        b.iter(|| get_nav_tree(target, &pages, &NullTitleResolver, &options))
    });

    group.bench_function("root_with_transform", |b| {
        let transform = |node: TreeNode| -> Result<Option<TreeNode>, Infallible> {
            Ok((!node.url.ends_with("section-3/")).then_some(node))
        };
        let options = NavOptions {
            base_depth: Some(0),
            transform_node: Some(&transform),
            ..NavOptions::default()
        };
        b.iter(|| get_nav_tree(target, &pages, &NullTitleResolver, &options))
    });

    group.finish();
}

criterion_group!(benches, bench_build_tree, bench_breadcrumbs, bench_nav_tree);
criterion_main!(benches);
