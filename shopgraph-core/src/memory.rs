//! In-memory commerce graph
//!
//! Answers the catalog templates over customers, products and orders held in
//! memory, with the same semantics as their Cypher text. Useful for tests and
//! for running the server without a database.
//!
//! # Example
//!
//! ```rust
//! use shopgraph_core::memory::InMemoryGraph;
//!
//! let graph = InMemoryGraph::new();
//! graph.add_product("p1", "Kettle");
//! graph.add_customer("c1", "Alice", "alice@example.com");
//! graph.add_order("c1", &["p1"]);
//! ```

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde_json::json;

use crate::catalog::{RECOMMEND_PRODUCT, SEARCH_CUSTOMER, SEARCH_RESULT_LIMIT};
use crate::config::GraphConfig;
use crate::connection::{Connector, GraphConnection, GraphSession};
use crate::error::{GraphError, Result};
use crate::query::{CypherQuery, Record};

#[derive(Debug, Clone)]
struct CustomerNode {
    internal_id: i64,
    id: String,
    name: Option<String>,
    email: Option<String>,
}

#[derive(Debug, Clone)]
struct ProductNode {
    id: String,
    title: Option<String>,
}

/// An order: who placed it and one product id per line item
#[derive(Debug, Clone)]
struct OrderNode {
    customer_id: String,
    line_items: Vec<String>,
}

#[derive(Debug, Default)]
struct GraphData {
    customers: Vec<CustomerNode>,
    products: HashMap<String, ProductNode>,
    orders: Vec<OrderNode>,
    next_internal_id: i64,
}

#[derive(Debug, Default)]
struct SessionLog {
    opened: AtomicUsize,
    closed: AtomicUsize,
    databases: RwLock<Vec<Option<String>>>,
}

/// Thread-safe in-memory graph. Clone is cheap and shares state.
///
/// Customer domain ids are assumed unique.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGraph {
    data: Arc<RwLock<GraphData>>,
    log: Arc<SessionLog>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a customer with domain id `id`
    pub fn add_customer(&self, id: &str, name: &str, email: &str) {
        self.insert_customer(id, Some(name), Some(email));
    }

    /// Add a customer whose name and/or email are unset
    pub fn insert_customer(&self, id: &str, name: Option<&str>, email: Option<&str>) {
        if let Ok(mut data) = self.data.write() {
            let internal_id = data.next_internal_id;
            data.next_internal_id += 1;
            data.customers.push(CustomerNode {
                internal_id,
                id: id.to_string(),
                name: name.map(str::to_string),
                email: email.map(str::to_string),
            });
        }
    }

    /// Add a product
    pub fn add_product(&self, id: &str, title: &str) {
        if let Ok(mut data) = self.data.write() {
            data.products.insert(
                id.to_string(),
                ProductNode {
                    id: id.to_string(),
                    title: Some(title.to_string()),
                },
            );
        }
    }

    /// Add an order for `customer_id` with one line item per product id
    pub fn add_order(&self, customer_id: &str, product_ids: &[&str]) {
        if let Ok(mut data) = self.data.write() {
            data.orders.push(OrderNode {
                customer_id: customer_id.to_string(),
                line_items: product_ids.iter().map(|p| p.to_string()).collect(),
            });
        }
    }

    /// Make every query fail, as if the database went away
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Sessions opened so far
    pub fn sessions_opened(&self) -> usize {
        self.log.opened.load(Ordering::SeqCst)
    }

    /// Sessions closed so far
    pub fn sessions_closed(&self) -> usize {
        self.log.closed.load(Ordering::SeqCst)
    }

    /// Target database of every session opened so far, in order
    pub fn session_databases(&self) -> Vec<Option<String>> {
        self.log
            .databases
            .read()
            .map(|d| d.clone())
            .unwrap_or_default()
    }

    fn search(&self, q: &str) -> Result<Vec<Record>> {
        let data = self.read(SEARCH_CUSTOMER.name)?;
        let needle = q.to_lowercase();
        let contains = |field: &Option<String>| {
            field
                .as_deref()
                .is_some_and(|v| v.to_lowercase().contains(&needle))
        };

        Ok(data
            .customers
            .iter()
            .filter(|c| contains(&c.name) || contains(&c.email))
            .take(SEARCH_RESULT_LIMIT)
            .map(|c| {
                Record::new().with(
                    "customer",
                    json!({
                        "id": c.internal_id,
                        "nodeId": format!("4:memory:{}", c.internal_id),
                        "name": c.name,
                        "email": c.email,
                    }),
                )
            })
            .collect())
    }

    fn recommend(&self, customer_id: &str, limit: i64) -> Result<Vec<Record>> {
        let data = self.read(RECOMMEND_PRODUCT.name)?;

        if limit < 0 {
            return Err(GraphError::query(
                RECOMMEND_PRODUCT.name,
                "LIMIT must be a non-negative integer",
            ));
        }

        let Some(target) = data.customers.iter().find(|c| c.id == customer_id) else {
            return Ok(Vec::new());
        };

        let owned: BTreeSet<&str> = line_items_of(&data, &target.id).collect();
        let mut scores: HashMap<&str, i64> = HashMap::new();

        for product in &owned {
            for other in data.customers.iter().filter(|o| o.id != target.id) {
                let hits = line_items_of(&data, &other.id)
                    .filter(|p| p == product)
                    .count() as i64;
                if hits == 0 {
                    continue;
                }
                // One row per (line item of `product`, line item of `rec`) pair
                for rec in line_items_of(&data, &other.id).filter(|p| !owned.contains(p)) {
                    *scores.entry(rec).or_default() += hits;
                }
            }
        }

        let mut ranked: Vec<(&str, i64)> = scores.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        Ok(ranked
            .into_iter()
            .take(limit as usize)
            .map(|(id, score)| {
                let product = &data.products[id];
                Record::new().with(
                    "recommendation",
                    json!({
                        "productId": product.id,
                        "title": product.title,
                        "score": score,
                    }),
                )
            })
            .collect())
    }

    fn read(&self, template: &str) -> Result<std::sync::RwLockReadGuard<'_, GraphData>> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(GraphError::query(template, "database unavailable"));
        }
        self.data
            .read()
            .map_err(|_| GraphError::query(template, "graph lock poisoned"))
    }
}

/// Product ids of every line item in every order placed by `customer_id`.
/// Line items pointing at unknown products are skipped, as a graph match would.
fn line_items_of<'a>(data: &'a GraphData, customer_id: &'a str) -> impl Iterator<Item = &'a str> {
    data.orders
        .iter()
        .filter(move |o| o.customer_id == customer_id)
        .flat_map(|o| o.line_items.iter().map(String::as_str))
        .filter(move |p| data.products.contains_key(*p))
}

#[async_trait]
impl GraphConnection for InMemoryGraph {
    async fn open_session(&self, database: Option<&str>) -> Result<Box<dyn GraphSession>> {
        self.log.opened.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut databases) = self.log.databases.write() {
            databases.push(database.map(str::to_string));
        }
        Ok(Box::new(InMemorySession {
            graph: self.clone(),
            released: false,
        }))
    }

    fn name(&self) -> &'static str {
        "in-memory"
    }
}

#[async_trait]
impl Connector for InMemoryGraph {
    async fn connect(&self, _config: &GraphConfig) -> Result<Arc<dyn GraphConnection>> {
        Ok(Arc::new(self.clone()))
    }
}

/// Counts as closed exactly once, whether closed or dropped
struct InMemorySession {
    graph: InMemoryGraph,
    released: bool,
}

impl InMemorySession {
    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.graph.log.closed.fetch_add(1, Ordering::SeqCst);
        }
    }
}

impl Drop for InMemorySession {
    fn drop(&mut self) {
        self.release();
    }
}

#[async_trait]
impl GraphSession for InMemorySession {
    async fn run(&mut self, query: &CypherQuery) -> Result<Vec<Record>> {
        let text_param = |name: &str| {
            query
                .param(name)
                .and_then(|v| v.as_str())
                .ok_or_else(|| GraphError::query(query.name(), format!("expected string ${}", name)))
        };

        match query.name() {
            n if n == SEARCH_CUSTOMER.name => self.graph.search(text_param("q")?),
            n if n == RECOMMEND_PRODUCT.name => {
                let limit = query
                    .param("limit")
                    .and_then(|v| v.as_i64())
                    .ok_or_else(|| GraphError::query(n, "expected integer $limit"))?;
                self.graph.recommend(text_param("customer_id")?, limit)
            }
            other => Err(GraphError::query(other, "template not supported in memory")),
        }
    }

    async fn close(mut self: Box<Self>) -> Result<()> {
        self.release();
        Ok(())
    }
}
