//! End-to-end tests for replaying paths against a mock graph.
//!
//! The mock uses pointer identity, so de-duplication here is by reference.

mod common;

use common::{names, MockGraph, MockNode};
use futures::FutureExt;
use graph_lens::{
    walk, EdgeKind, Error, Frontier, Path, Traverse, Walker, WalkerConfig,
};
use pretty_assertions::assert_eq;

/// a -one-> b -one-> c
fn singular_chain(g: &MockGraph) -> MockNode {
    let (a, b, c) = (g.node("a"), g.node("b"), g.node("c"));
    b.set_one("next", Some(&c));
    a.set_one("next", Some(&b));
    a
}

/// a -kids-> [b1, b2, b3]; each bi -friend-> ci
fn fan_out(g: &MockGraph) -> (MockNode, Vec<MockNode>, Vec<MockNode>) {
    let a = g.node("a");
    let bs: Vec<MockNode> = (1..=3).map(|i| g.node(&format!("b{i}"))).collect();
    let cs: Vec<MockNode> = (1..=3).map(|i| g.node(&format!("c{i}"))).collect();
    for (b, c) in bs.iter().zip(&cs) {
        b.set_one("friend", Some(c));
    }
    a.set_many("kids", &bs.iter().collect::<Vec<_>>());
    (a, bs, cs)
}

// ============================================================================
// 1. Singular chaining
// ============================================================================

#[tokio::test]
async fn test_singular_chain_returns_single_node() {
    let g = MockGraph::new();
    let a = singular_chain(&g);

    let end = a.traverse(|x| x.one("next").one("next")).await.unwrap();
    assert_eq!(end.map(|n| n.name().to_string()), Some("c".to_string()));

    let frontier = walk(&a, &Path::parse("next.next").unwrap()).await.unwrap();
    assert!(!frontier.is_many());
}

#[tokio::test]
async fn test_absent_singular_hop_yields_none() {
    let g = MockGraph::new();
    let a = singular_chain(&g);

    // c has no `next` set: a.next.next.next is absent.
    let c = a.traverse(|x| x.one("next").one("next")).await.unwrap().unwrap();
    c.set_one("next", None);
    let end = a.traverse(|x| x.one("next").one("next").one("next")).await.unwrap();
    assert!(end.is_none());
}

#[tokio::test]
async fn test_hops_after_absent_are_not_resolved() {
    let g = MockGraph::new();
    let a = g.node("a");
    a.set_one("next", None);

    let before = g.resolutions();
    let end = a.traverse(|x| x.one("next").one("next").many("kids")).await.unwrap();
    assert!(end.is_empty());
    assert_eq!(g.resolutions() - before, 1);
}

// ============================================================================
// 2. Fan-out flattening and ordering
// ============================================================================

#[tokio::test]
async fn test_fan_out_flattens_in_frontier_order() {
    let g = MockGraph::new();
    let (a, _, _) = fan_out(&g);

    let friends = a.traverse(|x| x.many("kids").one("friend")).await.unwrap();
    assert_eq!(names(&friends), vec!["c1", "c2", "c3"]);
}

#[tokio::test]
async fn test_single_step_fan_out_is_returned_as_provided() {
    let g = MockGraph::new();
    let a = g.node("a");
    let b = g.node("b");
    // Duplicates straight out of the provider are not collapsed on the first hop.
    a.set_many("kids", &[&b, &b]);

    let kids = a.traverse(|x| x.many("kids")).await.unwrap();
    assert_eq!(names(&kids), vec!["b", "b"]);
}

#[tokio::test]
async fn test_plural_after_plural_concatenates() {
    let g = MockGraph::new();
    let (a, bs, _) = fan_out(&g);
    let (x, y, z) = (g.node("x"), g.node("y"), g.node("z"));
    bs[0].set_many("toys", &[&x, &y]);
    bs[1].set_many("toys", &[]);
    bs[2].set_many("toys", &[&z]);

    let toys = a.traverse(|p| p.many("kids").many("toys")).await.unwrap();
    assert_eq!(names(&toys), vec!["x", "y", "z"]);
}

// ============================================================================
// 3. De-duplication
// ============================================================================

#[tokio::test]
async fn test_converging_members_are_deduplicated() {
    let g = MockGraph::new();
    let (a, bs, _) = fan_out(&g);
    let shared = g.node("shared");
    for b in &bs {
        b.set_one("friend", Some(&shared));
    }

    let friends = a.traverse(|x| x.many("kids").one("friend")).await.unwrap();
    assert_eq!(names(&friends), vec!["shared"]);
}

#[tokio::test]
async fn test_dedup_keeps_first_seen_order() {
    let g = MockGraph::new();
    let (a, bs, cs) = fan_out(&g);
    bs[2].set_one("friend", Some(&cs[0]));

    let friends = a.traverse(|x| x.many("kids").one("friend")).await.unwrap();
    assert_eq!(names(&friends), vec!["c1", "c2"]);
}

#[tokio::test]
async fn test_distinct_nodes_with_equal_names_are_kept() {
    let g = MockGraph::new();
    let a = g.node("a");
    let (b1, b2) = (g.node("b"), g.node("b"));
    let (c1, c2) = (g.node("twin"), g.node("twin"));
    b1.set_one("friend", Some(&c1));
    b2.set_one("friend", Some(&c2));
    a.set_many("kids", &[&b1, &b2]);

    let friends = a.traverse(|x| x.many("kids").one("friend")).await.unwrap();
    assert_eq!(friends.len(), 2);
}

#[tokio::test]
async fn test_three_hop_convergence_revisiting_plural_edge() {
    // a -kids-> [b1, b2]; b1,b2 -parent-> p; p -kids-> [b1, b2]
    // Both upstream paths converge on p before the plural `kids` edge is
    // taken again, so the final frontier holds each kid once.
    let g = MockGraph::new();
    let a = g.node("a");
    let p = g.node("p");
    let (b1, b2) = (g.node("b1"), g.node("b2"));
    a.set_many("kids", &[&b1, &b2]);
    p.set_many("kids", &[&b1, &b2]);
    b1.set_one("parent", Some(&p));
    b2.set_one("parent", Some(&p));

    let kids = a.traverse(|x| x.many("kids").one("parent").many("kids")).await.unwrap();
    assert_eq!(names(&kids), vec!["b1", "b2"]);

    let again = a
        .traverse(|x| x.many("kids").one("parent").many("kids").one("parent").many("kids"))
        .await
        .unwrap();
    assert_eq!(names(&again), vec!["b1", "b2"]);
}

// ============================================================================
// 4. Absent filtering in sequences
// ============================================================================

#[tokio::test]
async fn test_absent_members_are_filtered() {
    let g = MockGraph::new();
    let (a, bs, _) = fan_out(&g);
    bs[0].set_one("friend", None);
    bs[2].set_one("friend", None);

    let friends = a.traverse(|x| x.many("kids").one("friend")).await.unwrap();
    assert_eq!(names(&friends), vec!["c2"]);

    for b in &bs {
        b.set_one("friend", None);
    }
    let none = a.traverse(|x| x.many("kids").one("friend")).await.unwrap();
    assert!(none.is_empty());
}

// ============================================================================
// 5. Empty path
// ============================================================================

#[test]
fn test_empty_path_returns_root_immediately() {
    let g = MockGraph::new();
    let a = g.node("a");

    let frontier = walk(&a, &Path::empty()).now_or_never().expect("ready").unwrap();
    match frontier {
        Frontier::One(Some(root)) => assert_eq!(root.name(), "a"),
        other => panic!("unexpected frontier: {other:?}"),
    }
    assert_eq!(g.resolutions(), 0);
}

#[tokio::test]
async fn test_identity_traversal_returns_root() {
    let g = MockGraph::new();
    let a = g.node("a");
    let root = a.traverse(|x| x).await.unwrap();
    assert_eq!(root.map(|n| n.name().to_string()), Some("a".to_string()));
}

// ============================================================================
// 6. Failure propagation
// ============================================================================

#[tokio::test]
async fn test_failure_in_fan_out_fails_whole_walk() {
    let g = MockGraph::new();
    let (a, bs, _) = fan_out(&g);
    bs[1].fail("friend", EdgeKind::Singular, "connection reset");

    let err = a.traverse(|x| x.many("kids").one("friend")).await.unwrap_err();
    match err {
        Error::EdgeResolution { node, edge, message } => {
            assert_eq!(node, "b2");
            assert_eq!(edge, "friend");
            assert_eq!(message, "connection reset");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_failure_on_root_hop_aborts_remaining_hops() {
    let g = MockGraph::new();
    let a = g.node("a");
    a.fail("kids", EdgeKind::Plural, "timeout");

    let before = g.resolutions();
    let err = a.traverse(|x| x.many("kids").one("friend")).await.unwrap_err();
    assert!(matches!(err, Error::EdgeResolution { .. }));
    assert_eq!(g.resolutions() - before, 1);
}

#[tokio::test]
async fn test_unknown_edge_fails() {
    let g = MockGraph::new();
    let (a, _, _) = fan_out(&g);

    let err = a.traverse(|x| x.many("kids").one("enemy")).await.unwrap_err();
    match err {
        Error::UnknownEdge { node, edge } => {
            assert_eq!(node, "b1");
            assert_eq!(edge, "enemy");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_chain_resolves_nothing() {
    let g = MockGraph::new();
    let (a, _, _) = fan_out(&g);

    let err = a
        .traverse(|x| {
            let _ = x.clone().many("kids");
            x.many("kids")
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::MalformedPath { .. }));
    assert_eq!(g.resolutions(), 0);
}

// ============================================================================
// 7. Cardinality shaping
// ============================================================================

#[tokio::test]
async fn test_singular_declaration_over_plural_edge_is_a_mismatch() {
    let g = MockGraph::new();
    let (a, _, _) = fan_out(&g);

    let err = a.traverse(|x| x.one("kids")).await.unwrap_err();
    assert!(matches!(err, Error::CardinalityMismatch { expected: "one", got: "many" }));
}

#[tokio::test]
async fn test_plural_declaration_over_singular_edge_yields_sequence() {
    let g = MockGraph::new();
    let a = singular_chain(&g);

    let seq = a.traverse(|x| x.many("next")).await.unwrap();
    assert_eq!(names(&seq), vec!["b"]);
}

#[tokio::test]
async fn test_undeclared_hops_keep_cardinality() {
    let g = MockGraph::new();
    let (a, _, _) = fan_out(&g);

    let friends = a.traverse(|x| x.many("kids").edge("friend")).await.unwrap();
    assert_eq!(names(&friends), vec!["c1", "c2", "c3"]);
}

// ============================================================================
// 8. Concurrency
// ============================================================================

#[tokio::test]
async fn test_fan_out_batch_is_issued_together() {
    let g = MockGraph::new();
    let (a, _, _) = fan_out(&g);

    a.traverse(|x| x.many("kids").one("friend")).await.unwrap();
    assert_eq!(g.peak_in_flight(), 3);
    assert_eq!(g.resolutions(), 4);
}

#[tokio::test]
async fn test_batch_width_limits_in_flight_resolutions() {
    let g = MockGraph::new();
    let (a, _, _) = fan_out(&g);
    let walker = Walker::with_config(WalkerConfig::default().with_batch_width(2));

    let friends = walker
        .traverse(&a, |x| x.many("kids").one("friend"))
        .await
        .unwrap();
    assert_eq!(names(&friends), vec!["c1", "c2", "c3"]);
    assert_eq!(g.peak_in_flight(), 2);
}

#[tokio::test]
async fn test_hop_limit_is_checked_before_resolution() {
    let g = MockGraph::new();
    let a = singular_chain(&g);
    let walker = Walker::with_config(WalkerConfig::default().with_max_hops(1));

    let err = walker.walk(&a, &Path::parse("next.next").unwrap()).await.unwrap_err();
    assert!(matches!(err, Error::PathTooLong { len: 2, max: 1 }));
    assert_eq!(g.resolutions(), 0);
}
