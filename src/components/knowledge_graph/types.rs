use std::collections::HashSet;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ValidationError;

/// Tags the statistics panel counts as projects.
const PROJECT_TAGS: &[&str] = &["Project", "GitHub", "Notion"];

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub id: String,
	pub name: String,
	pub kind: String,
	pub properties: Map<String, Value>,
}

#[cfg(test)]
impl Node {
	pub fn new(id: impl Into<String>, name: impl Into<String>, kind: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			name: name.into(),
			kind: kind.into(),
			properties: Map::new(),
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Link {
	pub source: String,
	pub target: String,
	pub relation: String,
}

#[cfg(test)]
impl Link {
	pub fn new(
		source: impl Into<String>,
		target: impl Into<String>,
		relation: impl Into<String>,
	) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			relation: relation.into(),
		}
	}
}

/// Known type tags. Anything else is `Other` and rendered with the default colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
	Skill,
	Project,
	GitHub,
	Notion,
	Other,
}

impl NodeKind {
	pub fn from_tag(tag: &str) -> Self {
		match tag {
			"Skill" => NodeKind::Skill,
			"Project" => NodeKind::Project,
			"GitHub" => NodeKind::GitHub,
			"Notion" => NodeKind::Notion,
			_ => NodeKind::Other,
		}
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GraphStats {
	pub nodes: usize,
	pub links: usize,
	pub skills: usize,
	pub projects: usize,
}

/// Immutable node/link collection. A new snapshot replaces the old one wholesale;
/// the sequences sit behind `Arc` so reference identity can be compared cheaply.
#[derive(Clone, Debug, Default)]
pub struct GraphSnapshot {
	nodes: Arc<Vec<Node>>,
	links: Arc<Vec<Link>>,
}

impl GraphSnapshot {
	pub fn new(nodes: Vec<Node>, links: Vec<Link>) -> Result<Self, ValidationError> {
		let mut seen = HashSet::with_capacity(nodes.len());
		for node in &nodes {
			if !seen.insert(node.id.as_str()) {
				return Err(ValidationError::DuplicateNodeId(node.id.clone()));
			}
		}
		Ok(Self {
			nodes: Arc::new(nodes),
			links: Arc::new(links),
		})
	}

	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub fn links(&self) -> &[Link] {
		&self.links
	}

	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	pub fn link_count(&self) -> usize {
		self.links.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn nodes_of_type<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
		self.nodes.iter().filter(move |n| n.kind == tag)
	}

	/// True when `other` carries the very same node sequence (same allocation).
	pub fn same_nodes(&self, other: &GraphSnapshot) -> bool {
		Arc::ptr_eq(&self.nodes, &other.nodes)
	}

	/// True when both sequences are shared with `other`.
	pub fn same_as(&self, other: &GraphSnapshot) -> bool {
		self.same_nodes(other) && Arc::ptr_eq(&self.links, &other.links)
	}

	pub fn stats(&self) -> GraphStats {
		GraphStats {
			nodes: self.node_count(),
			links: self.link_count(),
			skills: self.nodes_of_type("Skill").count(),
			projects: self
				.nodes
				.iter()
				.filter(|n| PROJECT_TAGS.contains(&n.kind.as_str()))
				.count(),
		}
	}
}

impl PartialEq for GraphSnapshot {
	fn eq(&self, other: &Self) -> bool {
		self.nodes == other.nodes && self.links == other.links
	}
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct WireNode {
	pub id: Option<String>,
	pub name: Option<String>,
	#[serde(rename = "type")]
	pub kind: Option<String>,
	#[serde(default)]
	pub properties: Option<Map<String, Value>>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct WireLink {
	pub source: Option<String>,
	pub target: Option<String>,
	#[serde(rename = "type")]
	pub relation: Option<String>,
}

/// Graph as the upstream service serialises it, before validation.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct WireGraph {
	#[serde(default)]
	pub nodes: Vec<WireNode>,
	#[serde(default)]
	pub links: Vec<WireLink>,
}

impl TryFrom<WireGraph> for GraphSnapshot {
	type Error = ValidationError;

	fn try_from(wire: WireGraph) -> Result<Self, Self::Error> {
		let nodes = wire
			.nodes
			.into_iter()
			.enumerate()
			.map(|(index, raw)| {
				let id = raw.id.ok_or(ValidationError::MissingNodeId { index })?;
				Ok(Node {
					name: raw.name.unwrap_or_else(|| id.clone()),
					kind: raw.kind.unwrap_or_default(),
					properties: raw.properties.unwrap_or_default(),
					id,
				})
			})
			.collect::<Result<Vec<_>, ValidationError>>()?;

		let links = wire
			.links
			.into_iter()
			.enumerate()
			.map(|(index, raw)| {
				let source = raw.source.ok_or(ValidationError::MissingLinkEndpoint {
					index,
					endpoint: "source",
				})?;
				let target = raw.target.ok_or(ValidationError::MissingLinkEndpoint {
					index,
					endpoint: "target",
				})?;
				Ok(Link {
					source,
					target,
					relation: raw.relation.unwrap_or_default(),
				})
			})
			.collect::<Result<Vec<_>, ValidationError>>()?;

		GraphSnapshot::new(nodes, links)
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	fn wire(value: Value) -> WireGraph {
		serde_json::from_value(value).unwrap()
	}

	#[test]
	fn converts_wire_graph_with_fallbacks() {
		let snapshot = GraphSnapshot::try_from(wire(json!({
			"nodes": [
				{"id": "a", "name": "Rust", "type": "Skill", "properties": {"level": 3}},
				{"id": "b", "type": "Project"},
				{"id": "c"}
			],
			"links": [{"source": "b", "target": "a", "type": "USES"}]
		})))
		.unwrap();

		assert_eq!(snapshot.node_count(), 3);
		assert_eq!(snapshot.link_count(), 1);
		assert_eq!(snapshot.nodes()[0].properties["level"], json!(3));
		assert_eq!(snapshot.nodes()[1].name, "b");
		assert_eq!(snapshot.nodes()[2].kind, "");
		assert_eq!(NodeKind::from_tag(&snapshot.nodes()[2].kind), NodeKind::Other);
		assert_eq!(snapshot.links()[0].relation, "USES");
	}

	#[test]
	fn rejects_node_without_identity() {
		let err = GraphSnapshot::try_from(wire(json!({
			"nodes": [{"id": "a"}, {"name": "nameless"}]
		})))
		.unwrap_err();
		assert_eq!(err, ValidationError::MissingNodeId { index: 1 });
	}

	#[test]
	fn rejects_link_without_target() {
		let err = GraphSnapshot::try_from(wire(json!({
			"nodes": [{"id": "a"}],
			"links": [{"source": "a"}]
		})))
		.unwrap_err();
		assert_eq!(
			err,
			ValidationError::MissingLinkEndpoint {
				index: 0,
				endpoint: "target"
			}
		);
	}

	#[test]
	fn rejects_duplicate_identity() {
		let err = GraphSnapshot::new(
			vec![Node::new("a", "A", "Skill"), Node::new("a", "A2", "Project")],
			vec![],
		)
		.unwrap_err();
		assert_eq!(err, ValidationError::DuplicateNodeId("a".into()));
	}

	#[test]
	fn dangling_links_are_accepted_by_the_model() {
		let snapshot = GraphSnapshot::new(
			vec![Node::new("a", "A", "Skill")],
			vec![Link::new("a", "missing", "USES")],
		)
		.unwrap();
		assert_eq!(snapshot.link_count(), 1);
	}

	#[test]
	fn type_filter_uses_exact_match() {
		let snapshot = GraphSnapshot::new(
			vec![
				Node::new("a", "A", "Skill"),
				Node::new("b", "B", "skill"),
				Node::new("c", "C", "Skill"),
			],
			vec![],
		)
		.unwrap();
		let ids: Vec<_> = snapshot.nodes_of_type("Skill").map(|n| n.id.as_str()).collect();
		assert_eq!(ids, ["a", "c"]);
		assert_eq!(NodeKind::from_tag("skill"), NodeKind::Other);
	}

	#[test]
	fn stats_count_projects_across_sources() {
		let snapshot = GraphSnapshot::new(
			vec![
				Node::new("s", "Rust", "Skill"),
				Node::new("p", "site", "Project"),
				Node::new("g", "repo", "GitHub"),
				Node::new("n", "page", "Notion"),
				Node::new("x", "?", "Unknown"),
			],
			vec![Link::new("p", "s", "USES")],
		)
		.unwrap();
		assert_eq!(
			snapshot.stats(),
			GraphStats {
				nodes: 5,
				links: 1,
				skills: 1,
				projects: 3,
			}
		);
	}

	#[test]
	fn clones_share_node_sequence() {
		let snapshot = GraphSnapshot::new(vec![Node::new("a", "A", "Skill")], vec![]).unwrap();
		let copy = snapshot.clone();
		assert!(snapshot.same_nodes(&copy));
		assert!(snapshot.same_as(&copy));

		let rebuilt = GraphSnapshot::new(vec![Node::new("a", "A", "Skill")], vec![]).unwrap();
		assert!(!snapshot.same_nodes(&rebuilt));
		assert_eq!(snapshot, rebuilt);
	}
}
