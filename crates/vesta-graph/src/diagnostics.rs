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

//! Compile statistics and Graphviz export.

use crate::frame_graph::FrameGraph;
use std::fmt;
use std::time::Duration;
use vesta_core::scope::ScopeActivation;
use vesta_core::ScopeGroupId;

/// Figures recorded by the last successful [`FrameGraph::end`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameGraphStatistics {
    /// Frame number the figures belong to.
    pub frame: u64,
    /// Scopes recorded.
    pub scope_count: usize,
    /// Distinct edges.
    pub edge_count: usize,
    /// Registered attachments.
    pub attachment_count: usize,
    /// Registered transient attachments.
    pub transient_attachment_count: usize,
    /// Distinct scope groups.
    pub group_count: usize,
    /// Time spent in `end`.
    pub compile_time: Duration,
}

/// Formats a frame graph as a DOT digraph.
///
/// Nodes are labeled with the scope id, plus the compiled position once the
/// frame compiled. Subpass scopes are grouped into clusters.
pub struct DotGraph<'a>(pub &'a FrameGraph);

impl fmt::Display for DotGraph<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let graph = self.0;
        writeln!(f, "digraph frame_graph {{")?;
        writeln!(f, "  rankdir=LR;")?;
        writeln!(f, "  node [shape=box];")?;

        for scope in graph.recorded_scopes() {
            let index = scope.index().index();
            match scope.activation() {
                Some(info) => {
                    let style = match info.activation {
                        ScopeActivation::Subpass => ", style=rounded",
                        ScopeActivation::None => "",
                    };
                    writeln!(
                        f,
                        "  n{index} [label=\"{} #{} ({})\"{style}];",
                        Escaped(scope.id().as_str()),
                        info.position,
                        scope.hardware_queue_class()
                    )?;
                }
                None => writeln!(
                    f,
                    "  n{index} [label=\"{} ({})\"];",
                    Escaped(scope.id().as_str()),
                    scope.hardware_queue_class()
                )?,
            }
        }

        let mut groups: Vec<(&ScopeGroupId, Vec<usize>)> = Vec::new();
        for scope in graph.recorded_scopes() {
            let Some(group) = scope.group_id() else {
                continue;
            };
            match groups.iter_mut().find(|(id, _)| *id == group) {
                Some((_, members)) => members.push(scope.index().index()),
                None => groups.push((group, vec![scope.index().index()])),
            }
        }
        for (cluster, (group, members)) in groups.iter().enumerate() {
            writeln!(f, "  subgraph cluster_{cluster} {{")?;
            writeln!(f, "    label=\"{}\";", Escaped(group.as_str()))?;
            for member in members {
                writeln!(f, "    n{member};")?;
            }
            writeln!(f, "  }}")?;
        }

        for edge in graph.edges() {
            writeln!(
                f,
                "  n{} -> n{};",
                edge.producer.index(),
                edge.consumer.index()
            )?;
        }
        writeln!(f, "}}")
    }
}

/// Writes a string as the body of a quoted DOT id.
struct Escaped<'a>(&'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0.chars() {
            match c {
                '"' => f.write_str("\\\"")?,
                '\\' => f.write_str("\\\\")?,
                '\n' => f.write_str("\\n")?,
                _ => fmt::Write::write_char(f, c)?,
            }
        }
        Ok(())
    }
}

pub(crate) fn to_dot(graph: &FrameGraph) -> String {
    DotGraph(graph).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vesta_core::attachment::{
        BufferAttachmentDescriptor, BufferBindFlags, BufferDescriptor, ScopeAttachmentAccess,
        ScopeAttachmentStage,
    };
    use vesta_core::scope::ScopeDescriptor;

    #[test]
    fn dot_lists_nodes_clusters_and_edges() {
        let mut graph = FrameGraph::default();
        graph.begin();
        graph
            .create_transient_buffer(
                "data",
                BufferDescriptor::new(64, BufferBindFlags::SHADER_WRITE),
            )
            .unwrap();

        graph.begin_scope(ScopeDescriptor::new("produce").with_group("post"));
        graph
            .use_shader_buffer(
                BufferAttachmentDescriptor::new("data"),
                ScopeAttachmentAccess::Write,
                ScopeAttachmentStage::COMPUTE_SHADER,
            )
            .unwrap();
        graph.end_scope();

        graph.begin_scope(ScopeDescriptor::new("consume"));
        graph
            .use_shader_buffer(
                BufferAttachmentDescriptor::new("data"),
                ScopeAttachmentAccess::Read,
                ScopeAttachmentStage::COMPUTE_SHADER,
            )
            .unwrap();
        graph.end_scope();
        graph.end().unwrap();

        let dot = graph.to_dot();
        assert!(dot.starts_with("digraph frame_graph {"));
        assert!(dot.contains("n0 [label=\"produce #0 (graphics)\", style=rounded];"));
        assert!(dot.contains("n1 [label=\"consume #1 (graphics)\"];"));
        assert!(dot.contains("subgraph cluster_0"));
        assert!(dot.contains("label=\"post\";"));
        assert!(dot.contains("n0 -> n1;"));
        assert!(dot.trim_end().ends_with('}'));
    }

    #[test]
    fn dot_escapes_quotes_and_backslashes() {
        let mut graph = FrameGraph::default();
        graph.begin();
        graph.begin_scope(ScopeDescriptor::new("say \"hi\"").with_group("a\\b"));
        graph.end_scope();
        graph.end().unwrap();

        let dot = graph.to_dot();
        assert!(dot.contains(r#"n0 [label="say \"hi\" #0 (graphics)", style=rounded];"#));
        assert!(dot.contains(r#"label="a\\b";"#));
    }

    #[test]
    fn statistics_default_to_zero() {
        let stats = FrameGraphStatistics::default();
        assert_eq!(stats.scope_count, 0);
        assert_eq!(stats.compile_time, Duration::ZERO);
    }
}
