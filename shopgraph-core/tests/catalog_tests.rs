//! Tool catalog behaviour over the in-memory commerce graph

use std::collections::HashSet;
use std::sync::Arc;

use shopgraph_core::catalog::{recommend_product, search_customer, SEARCH_RESULT_LIMIT};
use shopgraph_core::{ConnectionManager, InMemoryGraph, Neo4jSettings, QueryExecutor};

fn executor_for(graph: &InMemoryGraph) -> QueryExecutor {
    let settings = Neo4jSettings::new()
        .uri("bolt://localhost:7687")
        .username("neo4j")
        .password("password");
    let manager = ConnectionManager::new(Arc::new(settings), Arc::new(graph.clone()));
    QueryExecutor::new(Arc::new(manager))
}

/// A and B bought P1; B also bought P2; C bought nothing
fn abc_graph() -> InMemoryGraph {
    let graph = InMemoryGraph::new();
    graph.add_product("P1", "Pour-over kettle");
    graph.add_product("P2", "Coffee grinder");
    graph.add_customer("A", "Alice Anders", "alice@example.com");
    graph.add_customer("B", "Bob Brown", "bob@example.com");
    graph.add_customer("C", "Carol Chen", "carol@example.com");
    graph.add_order("A", &["P1"]);
    graph.add_order("B", &["P1", "P2"]);
    graph
}

/// A wider graph with overlapping baskets
fn store_graph() -> InMemoryGraph {
    let graph = InMemoryGraph::new();
    for (id, title) in [
        ("beans", "Espresso beans"),
        ("filter", "Paper filters"),
        ("grinder", "Burr grinder"),
        ("kettle", "Gooseneck kettle"),
        ("mug", "Ceramic mug"),
        ("scale", "Drip scale"),
    ] {
        graph.add_product(id, title);
    }
    graph.add_customer("u1", "Ann", "ann@shop.test");
    graph.add_customer("u2", "Ben", "ben@shop.test");
    graph.add_customer("u3", "Cat", "cat@shop.test");
    graph.add_customer("u4", "Dan", "dan@shop.test");
    graph.add_order("u1", &["beans", "filter"]);
    graph.add_order("u2", &["beans", "grinder"]);
    graph.add_order("u2", &["mug"]);
    graph.add_order("u3", &["filter", "grinder", "kettle"]);
    graph.add_order("u4", &["scale"]);
    graph
}

#[tokio::test]
async fn test_scenario_co_purchase() {
    let graph = abc_graph();
    let executor = executor_for(&graph);

    let recs = recommend_product(&executor, "A", 5).await.unwrap();
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].product_id, "P2");
    assert_eq!(recs[0].score, 1);
    assert_eq!(recs[0].title.as_deref(), Some("Coffee grinder"));

    let recs = recommend_product(&executor, "C", 5).await.unwrap();
    assert!(recs.is_empty());
}

#[tokio::test]
async fn test_unknown_customer_gets_empty_list() {
    let executor = executor_for(&abc_graph());
    let recs = recommend_product(&executor, "does-not-exist", 5).await.unwrap();
    assert!(recs.is_empty());
}

#[tokio::test]
async fn test_limit_zero_is_empty() {
    let executor = executor_for(&store_graph());
    for customer in ["u1", "u2", "u3", "u4"] {
        assert!(recommend_product(&executor, customer, 0).await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_scores_and_ordering() {
    let executor = executor_for(&store_graph());

    // u1 owns beans, filter. u2 shares beans -> grinder, mug.
    // u3 shares filter -> grinder, kettle.
    let recs = recommend_product(&executor, "u1", 5).await.unwrap();
    let got: Vec<(&str, i64)> = recs.iter().map(|r| (r.product_id.as_str(), r.score)).collect();

    assert_eq!(got, vec![("grinder", 2), ("kettle", 1), ("mug", 1)]);
}

#[tokio::test]
async fn test_limit_caps_result() {
    let executor = executor_for(&store_graph());

    let recs = recommend_product(&executor, "u1", 2).await.unwrap();
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0].product_id, "grinder");
    // Ties resolve by product id
    assert_eq!(recs[1].product_id, "kettle");
}

#[tokio::test]
async fn test_repeat_purchases_multiply_score() {
    let graph = abc_graph();
    graph.add_order("B", &["P2"]);
    let executor = executor_for(&graph);

    let recs = recommend_product(&executor, "A", 5).await.unwrap();
    assert_eq!(recs[0].product_id, "P2");
    assert_eq!(recs[0].score, 2);
}

#[tokio::test]
async fn test_never_recommends_owned_products() {
    let graph = store_graph();
    let executor = executor_for(&graph);
    let baskets = [
        ("u1", vec!["beans", "filter"]),
        ("u2", vec!["beans", "grinder", "mug"]),
        ("u3", vec!["filter", "grinder", "kettle"]),
        ("u4", vec!["scale"]),
    ];

    for (customer, owned) in baskets {
        for limit in [1, 3, 10] {
            let recs = recommend_product(&executor, customer, limit).await.unwrap();
            assert!(recs.len() <= limit as usize);
            for rec in &recs {
                assert!(
                    !owned.contains(&rec.product_id.as_str()),
                    "{} was recommended {}",
                    customer,
                    rec.product_id
                );
            }
        }
    }
}

#[tokio::test]
async fn test_isolated_buyer_gets_nothing() {
    let executor = executor_for(&store_graph());
    assert!(recommend_product(&executor, "u4", 5).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_search_matches_name_or_email() {
    let executor = executor_for(&abc_graph());

    let by_name = search_customer(&executor, "brown").await.unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].email.as_deref(), Some("bob@example.com"));

    let by_email = search_customer(&executor, "carol@").await.unwrap();
    assert_eq!(by_email.len(), 1);
    assert_eq!(by_email[0].name.as_deref(), Some("Carol Chen"));

    // Substring, not prefix
    let middle = search_customer(&executor, "ander").await.unwrap();
    assert_eq!(middle.len(), 1);

    let all = search_customer(&executor, "example.com").await.unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn test_search_ignores_case() {
    let executor = executor_for(&abc_graph());

    let upper: HashSet<_> = search_customer(&executor, "ALICE").await.unwrap().into_iter().map(|c| c.node_id).collect();
    let lower: HashSet<_> = search_customer(&executor, "alice").await.unwrap().into_iter().map(|c| c.node_id).collect();

    assert_eq!(upper.len(), 1);
    assert_eq!(upper, lower);
}

#[tokio::test]
async fn test_search_results_contain_term() {
    let executor = executor_for(&store_graph());

    for term in ["a", "SHOP", "n@", "zzz"] {
        let needle = term.to_lowercase();
        for customer in search_customer(&executor, term).await.unwrap() {
            let name = customer.name.unwrap_or_default().to_lowercase();
            let email = customer.email.unwrap_or_default().to_lowercase();
            assert!(name.contains(&needle) || email.contains(&needle));
        }
    }
}

#[tokio::test]
async fn test_search_capped_at_25() {
    let graph = InMemoryGraph::new();
    for i in 0..40 {
        graph.add_customer(&format!("c{}", i), &format!("Customer {}", i), &format!("c{}@bulk.test", i));
    }
    let executor = executor_for(&graph);

    let hits = search_customer(&executor, "bulk").await.unwrap();
    assert_eq!(hits.len(), SEARCH_RESULT_LIMIT);
}

#[tokio::test]
async fn test_search_tolerates_missing_fields() {
    let graph = InMemoryGraph::new();
    graph.insert_customer("n1", None, Some("anon@example.com"));
    graph.insert_customer("n2", Some("No Email"), None);
    let executor = executor_for(&graph);

    let hits = search_customer(&executor, "anon").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, None);

    let hits = search_customer(&executor, "email").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].email, None);
}

#[tokio::test]
async fn test_search_ids_pass_through() {
    let executor = executor_for(&abc_graph());
    let hits = search_customer(&executor, "bob").await.unwrap();

    assert_eq!(hits[0].id, 1);
    assert_eq!(hits[0].node_id, "4:memory:1");
}
