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

//! Kahn's algorithm over groups.
//!
//! Nodes are dense indices and edges are `(producer, consumer)` pairs. Nodes
//! may carry a group key. Every group is collapsed into a single unit, the
//! units are sorted, and each unit emits its members in their own dependency
//! order, so a group always comes out contiguous.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// The dependency graph contains a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleError {
    /// Edges between nodes that could not be placed, as `(producer, consumer)`.
    pub remaining_edges: Vec<(usize, usize)>,
}

/// A group cannot be contiguous without running a consumer ahead of one of
/// its producers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupOrderError {
    /// Producer node of the violated edge.
    pub producer: usize,
    /// Consumer node of the violated edge.
    pub consumer: usize,
}

/// Why a sort failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortError {
    /// See [`CycleError`].
    Cycle(CycleError),
    /// See [`GroupOrderError`].
    GroupOrder(GroupOrderError),
}

impl From<CycleError> for SortError {
    fn from(err: CycleError) -> Self {
        SortError::Cycle(err)
    }
}

impl From<GroupOrderError> for SortError {
    fn from(err: GroupOrderError) -> Self {
        SortError::GroupOrder(err)
    }
}

/// One entry of a sorted order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortedNode {
    /// The node index.
    pub node: usize,
    /// Dense group id; ungrouped nodes each own a unique id.
    pub group_id: u32,
    /// `true` if the node carried a group key.
    pub grouped: bool,
}

/// Sorts `node_count` nodes so every producer precedes its consumers and
/// nodes sharing a group key are contiguous.
///
/// # Arguments
///
/// * `node_count`: Number of nodes; nodes are `0..node_count`.
/// * `edges`: Directed `(producer, consumer)` edges. Duplicates are tolerated.
/// * `group_of`: The group key of a node, if any.
///
/// # Returns
///
/// * `Ok(Vec<SortedNode>)`: The nodes in execution order.
/// * `Err(SortError::Cycle)`: Some nodes could never become ready.
/// * `Err(SortError::GroupOrder)`: Group contiguity conflicts with an edge.
pub fn topological_sort<G>(
    node_count: usize,
    edges: &[(usize, usize)],
    mut group_of: impl FnMut(usize) -> Option<G>,
) -> Result<Vec<SortedNode>, SortError>
where
    G: Eq + Hash,
{
    if node_count == 0 {
        return Ok(Vec::new());
    }

    // 1. Outgoing edges per producer.
    let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); node_count];
    for (edge_index, &(producer, _)) in edges.iter().enumerate() {
        outgoing[producer].push(edge_index);
    }

    // 2. Plain dependency pass. Only a cycle between nodes is reported here.
    check_acyclic(node_count, edges, &outgoing)?;

    // 3. Collapse each group into one unit. Units are numbered by their first
    // member, ungrouped nodes own a unit each.
    let mut unit_of = vec![0usize; node_count];
    let mut unit_members: Vec<Vec<usize>> = Vec::new();
    let mut unit_grouped: Vec<bool> = Vec::new();
    let mut unit_by_key: HashMap<G, usize> = HashMap::new();
    for node in 0..node_count {
        let unit = match group_of(node) {
            Some(key) => *unit_by_key.entry(key).or_insert_with(|| {
                unit_members.push(Vec::new());
                unit_grouped.push(true);
                unit_members.len() - 1
            }),
            None => {
                unit_members.push(Vec::new());
                unit_grouped.push(false);
                unit_members.len() - 1
            }
        };
        unit_of[node] = unit;
        unit_members[unit].push(node);
    }

    // 4. Unsorted producers: across units per unit, inside a unit per node.
    let unit_count = unit_members.len();
    let mut unit_producer_count = vec![0usize; unit_count];
    let mut inner_producer_count = vec![0usize; node_count];
    for &(producer, consumer) in edges {
        if unit_of[producer] == unit_of[consumer] {
            inner_producer_count[consumer] += 1;
        } else {
            unit_producer_count[unit_of[consumer]] += 1;
        }
    }

    // 5. Unit pass. A popped unit emits all of its members before the next
    // unit starts; members are acyclic among themselves after step 2.
    let mut queue: VecDeque<usize> = (0..unit_count)
        .filter(|&unit| unit_producer_count[unit] == 0)
        .collect();
    let mut sorted = Vec::with_capacity(node_count);
    let mut next_group_id: u32 = 0;
    while let Some(unit) = queue.pop_front() {
        let group_id = next_group_id;
        next_group_id += 1;
        let grouped = unit_grouped[unit];

        let mut ready: VecDeque<usize> = unit_members[unit]
            .iter()
            .copied()
            .filter(|&node| inner_producer_count[node] == 0)
            .collect();
        while let Some(node) = ready.pop_front() {
            sorted.push(SortedNode {
                node,
                group_id,
                grouped,
            });
            for &edge_index in &outgoing[node] {
                let consumer = edges[edge_index].1;
                let consumer_unit = unit_of[consumer];
                if consumer_unit == unit {
                    inner_producer_count[consumer] -= 1;
                    if inner_producer_count[consumer] == 0 {
                        ready.push_back(consumer);
                    }
                } else {
                    unit_producer_count[consumer_unit] -= 1;
                    if unit_producer_count[consumer_unit] == 0 {
                        queue.push_back(consumer_unit);
                    }
                }
            }
        }
    }

    // 6. Units left over form a cycle that only exists because of grouping.
    if sorted.len() != node_count {
        let blocked = |node: usize| unit_producer_count[unit_of[node]] > 0;
        let remaining_edges: Vec<(usize, usize)> = edges
            .iter()
            .copied()
            .filter(|&(producer, consumer)| {
                unit_of[producer] != unit_of[consumer] && blocked(producer) && blocked(consumer)
            })
            .collect();
        // Report the edge entering a group from outside of it.
        return match remaining_edges
            .iter()
            .find(|&&(_, consumer)| unit_grouped[unit_of[consumer]])
        {
            Some(&(producer, consumer)) => Err(GroupOrderError { producer, consumer }.into()),
            None => Err(CycleError { remaining_edges }.into()),
        };
    }

    Ok(sorted)
}

fn check_acyclic(
    node_count: usize,
    edges: &[(usize, usize)],
    outgoing: &[Vec<usize>],
) -> Result<(), CycleError> {
    let mut producer_count = vec![0usize; node_count];
    for &(_, consumer) in edges {
        producer_count[consumer] += 1;
    }

    let mut queue: VecDeque<usize> = (0..node_count)
        .filter(|&node| producer_count[node] == 0)
        .collect();
    let mut placed = 0;
    while let Some(node) = queue.pop_front() {
        placed += 1;
        for &edge_index in &outgoing[node] {
            let consumer = edges[edge_index].1;
            producer_count[consumer] -= 1;
            if producer_count[consumer] == 0 {
                queue.push_back(consumer);
            }
        }
    }

    if placed == node_count {
        return Ok(());
    }
    let remaining_edges = edges
        .iter()
        .copied()
        .filter(|&(producer, consumer)| {
            producer_count[producer] > 0 && producer_count[consumer] > 0
        })
        .collect();
    Err(CycleError { remaining_edges })
}
