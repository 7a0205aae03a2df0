//! Flowchart layer: nodes and directed edges.
//!
//! Stored in a `StableDiGraph` so node indices survive removals. Node ids
//! come from a strictly monotonic counter and are never reused, even after
//! a node is deleted. This layer is deliberately outside freeform history.

use crate::error::{Error, Result};
use kurbo::{Point, Vec2};
use petgraph::Direction;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::stable_graph::StableDiGraph;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Flowchart node type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    #[default]
    Standard,
    Image,
    Text,
    TextInput,
    TextOutput,
}

impl NodeKind {
    /// Whether edges may start at this node.
    pub fn has_source_handle(self) -> bool {
        !matches!(self, NodeKind::TextOutput)
    }

    /// Whether edges may end at this node.
    pub fn has_target_handle(self) -> bool {
        !matches!(self, NodeKind::TextInput)
    }
}

/// Type-specific node data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodePayload {
    Standard {
        label: String,
    },
    Image {
        label: String,
        image_url: Option<String>,
    },
    Text {
        label: String,
        content: String,
    },
    TextInput {
        label: String,
        placeholder: String,
        value: String,
    },
    TextOutput {
        label: String,
        output: String,
    },
}

impl NodePayload {
    /// Default payload for a freshly placed node.
    pub fn default_for(kind: NodeKind, label: String) -> Self {
        match kind {
            NodeKind::Standard => NodePayload::Standard { label },
            NodeKind::Image => NodePayload::Image {
                label,
                image_url: None,
            },
            NodeKind::Text => NodePayload::Text {
                label,
                content: "Sample text content. Edit me!".into(),
            },
            NodeKind::TextInput => NodePayload::TextInput {
                label,
                placeholder: "Enter text...".into(),
                value: String::new(),
            },
            NodeKind::TextOutput => NodePayload::TextOutput {
                label,
                output: "Output will appear here".into(),
            },
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            NodePayload::Standard { .. } => NodeKind::Standard,
            NodePayload::Image { .. } => NodeKind::Image,
            NodePayload::Text { .. } => NodeKind::Text,
            NodePayload::TextInput { .. } => NodeKind::TextInput,
            NodePayload::TextOutput { .. } => NodeKind::TextOutput,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            NodePayload::Standard { label }
            | NodePayload::Image { label, .. }
            | NodePayload::Text { label, .. }
            | NodePayload::TextInput { label, .. }
            | NodePayload::TextOutput { label, .. } => label,
        }
    }

    fn label_mut(&mut self) -> &mut String {
        match self {
            NodePayload::Standard { label }
            | NodePayload::Image { label, .. }
            | NodePayload::Text { label, .. }
            | NodePayload::TextInput { label, .. }
            | NodePayload::TextOutput { label, .. } => label,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowNode {
    pub id: String,
    pub position: Point,
    pub payload: NodePayload,
}

impl FlowNode {
    pub fn kind(&self) -> NodeKind {
        self.payload.kind()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

/// Pan/zoom of the graph layer; maps screen pixels to graph coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphViewport {
    pub width: f64,
    pub height: f64,
    /// Screen offset of the graph origin.
    pub pan: Vec2,
    pub zoom: f64,
}

impl Default for GraphViewport {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            pan: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl GraphViewport {
    pub fn screen_to_graph(&self, p: Point) -> Point {
        ((p.to_vec2() - self.pan) / self.zoom).to_point()
    }

    pub fn graph_to_screen(&self, p: Point) -> Point {
        (p.to_vec2() * self.zoom + self.pan).to_point()
    }
}

/// Nodes and edges of the flowchart.
#[derive(Debug, Clone, Default)]
pub struct GraphModel {
    graph: StableDiGraph<FlowNode, FlowEdge>,
    id_index: HashMap<String, NodeIndex>,
    /// Last issued node number.
    counter: u64,
    pub viewport: GraphViewport,
}

impl GraphModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// A board seeded with the usual "Start" node at (250, 5).
    pub fn with_start_node() -> Self {
        let mut model = Self::new();
        let id = model.add_node(NodeKind::Standard, Point::new(250.0, 5.0));
        model.set_label(&id, "Start");
        model
    }

    /// Place a node with a fresh `node_<n>` id and its kind's default payload,
    /// labelled `Node <n>`. Returns the new id.
    pub fn add_node(&mut self, kind: NodeKind, position: Point) -> String {
        self.counter += 1;
        let n = self.counter;
        let id = format!("node_{n}");
        let node = FlowNode {
            id: id.clone(),
            position,
            payload: NodePayload::default_for(kind, format!("Node {n}")),
        };
        let idx = self.graph.add_node(node);
        self.id_index.insert(id.clone(), idx);
        log::debug!("graph: added {id} ({kind:?}) at ({}, {})", position.x, position.y);
        id
    }

    /// Connect `source` → `target`. Connecting an already connected ordered
    /// pair returns the existing edge id.
    ///
    /// # Errors
    /// `Error::UnknownNode` for a missing endpoint, `Error::InvalidConnection`
    /// when a handle rule forbids the edge.
    pub fn connect(&mut self, source: &str, target: &str) -> Result<String> {
        let s = self.index(source)?;
        let t = self.index(target)?;

        if let Some(existing) = self.graph.edges_connecting(s, t).next() {
            return Ok(existing.weight().id.clone());
        }
        let invalid = |reason: &'static str| Error::InvalidConnection {
            from: source.to_string(),
            to: target.to_string(),
            reason,
        };
        if s == t {
            return Err(invalid("a node cannot connect to itself"));
        }
        if !self.graph[s].kind().has_source_handle() {
            return Err(invalid("source node has no outgoing handle"));
        }
        if !self.graph[t].kind().has_target_handle() {
            return Err(invalid("target node has no incoming handle"));
        }

        let id = format!("edge_{source}-{target}");
        self.graph.add_edge(
            s,
            t,
            FlowEdge {
                id: id.clone(),
                source: source.to_string(),
                target: target.to_string(),
            },
        );
        log::debug!("graph: connected {source} -> {target}");
        Ok(id)
    }

    /// Remove a node and every edge touching it. The id is not reissued.
    pub fn remove_node(&mut self, id: &str) -> Option<FlowNode> {
        let idx = self.id_index.remove(id)?;
        self.graph.remove_node(idx)
    }

    pub fn remove_edge(&mut self, id: &str) -> Option<FlowEdge> {
        let idx = self.edge_index(id)?;
        self.graph.remove_edge(idx)
    }

    /// # Errors
    /// `Error::UnknownNode` if `id` does not exist.
    pub fn move_node(&mut self, id: &str, position: Point) -> Result<()> {
        let idx = self.index(id)?;
        self.graph[idx].position = position;
        Ok(())
    }

    pub fn set_label(&mut self, id: &str, label: &str) -> bool {
        match self.id_index.get(id) {
            Some(&idx) => {
                *self.graph[idx].payload.label_mut() = label.to_string();
                true
            }
            None => false,
        }
    }

    pub fn node(&self, id: &str) -> Option<&FlowNode> {
        self.id_index.get(id).map(|&idx| &self.graph[idx])
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut FlowNode> {
        let idx = *self.id_index.get(id)?;
        self.graph.node_weight_mut(idx)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &FlowNode> {
        self.graph.node_indices().map(|i| &self.graph[i])
    }

    pub fn edges(&self) -> impl Iterator<Item = &FlowEdge> {
        self.graph.edge_indices().map(|e| &self.graph[e])
    }

    /// Edges leaving `id`.
    pub fn outgoing(&self, id: &str) -> Vec<&FlowEdge> {
        self.id_index
            .get(id)
            .map(|&idx| {
                self.graph
                    .edges_directed(idx, Direction::Outgoing)
                    .map(|e| e.weight())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    fn index(&self, id: &str) -> Result<NodeIndex> {
        self.id_index
            .get(id)
            .copied()
            .ok_or_else(|| Error::UnknownNode(id.to_string()))
    }

    fn edge_index(&self, id: &str) -> Option<EdgeIndex> {
        self.graph.edge_indices().find(|&e| self.graph[e].id == id)
    }
}
