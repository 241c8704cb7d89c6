// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Adjacency bookkeeping between scopes.

use crate::scope::ScopeIndex;
use ahash::AHashSet;

/// Producers and consumers of one scope. Indexed like the scopes.
#[derive(Debug, Clone, Default)]
pub struct GraphNode {
    producers: Vec<ScopeIndex>,
    consumers: Vec<ScopeIndex>,
    pub(crate) group_id: Option<u32>,
}

impl GraphNode {
    /// Scopes that must run before this one.
    pub fn producers(&self) -> &[ScopeIndex] {
        &self.producers
    }

    /// Scopes that must run after this one.
    pub fn consumers(&self) -> &[ScopeIndex] {
        &self.consumers
    }

    /// Dense group id resolved by the last successful compile.
    pub fn group_id(&self) -> Option<u32> {
        self.group_id
    }
}

/// A producer → consumer ordering between two scopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphEdge {
    /// Runs first.
    pub producer: ScopeIndex,
    /// Runs after `producer`.
    pub consumer: ScopeIndex,
}

/// Graph nodes plus a deduplicated edge list.
#[derive(Debug, Default)]
pub(crate) struct ScopeGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    edge_set: AHashSet<GraphEdge>,
}

impl ScopeGraph {
    pub fn add_node(&mut self) {
        self.nodes.push(GraphNode::default());
    }

    /// Inserts `producer → consumer`. Self-edges and duplicates are dropped.
    ///
    /// Returns `true` if a new edge was added.
    pub fn insert_edge(&mut self, producer: ScopeIndex, consumer: ScopeIndex) -> bool {
        if producer == consumer {
            return false;
        }
        let edge = GraphEdge { producer, consumer };
        if !self.edge_set.insert(edge) {
            return false;
        }
        self.edges.push(edge);
        self.nodes[producer.index()].consumers.push(consumer);
        self.nodes[consumer.index()].producers.push(producer);
        true
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [GraphNode] {
        &mut self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.edge_set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_with(nodes: usize) -> ScopeGraph {
        let mut graph = ScopeGraph::default();
        for _ in 0..nodes {
            graph.add_node();
        }
        graph
    }

    #[test]
    fn edges_are_deduplicated() {
        let mut graph = graph_with(2);
        assert!(graph.insert_edge(ScopeIndex(0), ScopeIndex(1)));
        assert!(!graph.insert_edge(ScopeIndex(0), ScopeIndex(1)));
        assert_eq!(graph.edges().len(), 1);
        assert_eq!(graph.nodes()[0].consumers(), &[ScopeIndex(1)]);
        assert_eq!(graph.nodes()[1].producers(), &[ScopeIndex(0)]);
    }

    #[test]
    fn self_edges_are_dropped() {
        let mut graph = graph_with(1);
        assert!(!graph.insert_edge(ScopeIndex(0), ScopeIndex(0)));
        assert!(graph.edges().is_empty());
        assert!(graph.nodes()[0].producers().is_empty());
    }

    #[test]
    fn opposite_directions_are_distinct() {
        let mut graph = graph_with(2);
        assert!(graph.insert_edge(ScopeIndex(0), ScopeIndex(1)));
        assert!(graph.insert_edge(ScopeIndex(1), ScopeIndex(0)));
        assert_eq!(graph.edges().len(), 2);
    }
}
