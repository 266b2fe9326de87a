//! Exact-match route table.
//!
//! [`RouteTable`] is built once from the ordered route list and then
//! only read. A request matches a route when both its method and its
//! path are byte-for-byte equal to the configured ones; nothing is
//! normalized (no case folding, no trailing-slash handling). When
//! several routes share a method and path, the first one declared wins.

use std::collections::HashMap;

use crate::config::model::RouteSpec;
use crate::error::{BounceError, ValidationError};

#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<RouteSpec>,
}

impl RouteTable {
    /// Fails if `specs` is empty. Backend reachability is not checked here.
    pub fn build(specs: Vec<RouteSpec>) -> Result<Self, BounceError> {
        if specs.is_empty() {
            return Err(BounceError::ConfigValidation {
                errors: vec![ValidationError::root(
                    "routes",
                    "at least one route must be defined",
                )],
            });
        }

        let table = Self { routes: specs };
        for (idx, winner) in table.shadowed() {
            let spec = &table.routes[idx];
            tracing::warn!(
                index = idx,
                shadowed_by = winner,
                method = %spec.method,
                path = %spec.path,
                "route is shadowed by an earlier route with the same method and path"
            );
        }

        Ok(table)
    }

    /// `(index, winner)` for every route that can never match because an
    /// earlier route at `winner` has the same method and path.
    #[must_use]
    pub fn shadowed(&self) -> Vec<(usize, usize)> {
        let mut first = HashMap::new();
        let mut shadowed = Vec::new();
        for (idx, spec) in self.routes.iter().enumerate() {
            let winner = *first
                .entry((spec.method.as_str(), spec.path.as_str()))
                .or_insert(idx);
            if winner != idx {
                shadowed.push((idx, winner));
            }
        }
        shadowed
    }

    /// First route, in declaration order, whose method and path equal the request's.
    #[must_use]
    pub fn match_route(&self, method: &str, path: &str) -> Option<(usize, &RouteSpec)> {
        self.routes
            .iter()
            .enumerate()
            .find(|(_, r)| r.method == method && r.path == path)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RouteSpec> {
        self.routes.iter()
    }
}
