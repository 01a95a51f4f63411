use std::collections::HashMap;

use log::debug;

use super::camera::{OrbitCamera, Projected, Viewport};
use super::layout::{Layout, Point3};
use super::palette;
use super::types::GraphSnapshot;

/// World-space sphere radius of a node marker.
pub const MARKER_RADIUS: f64 = 0.5;
/// Extra screen pixels around a marker that still count as a hit.
pub const HIT_SLOP: f64 = 2.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
	/// Index into the snapshot's node sequence.
	pub node: usize,
	pub position: Point3,
	pub color: &'static str,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
	pub source: usize,
	pub target: usize,
	pub from: Point3,
	pub to: Point3,
}

/// Everything drawable for one snapshot/layout pair.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
	pub markers: Vec<Marker>,
	pub segments: Vec<Segment>,
	/// Links skipped because an endpoint has no position.
	pub dropped_links: usize,
}

impl Scene {
	pub fn build(snapshot: &GraphSnapshot, layout: &Layout) -> Self {
		let mut index = HashMap::with_capacity(snapshot.node_count());
		let markers: Vec<Marker> = snapshot
			.nodes()
			.iter()
			.enumerate()
			.filter_map(|(i, node)| {
				let position = layout.position(&node.id)?;
				index.insert(node.id.as_str(), (i, position));
				Some(Marker {
					node: i,
					position,
					color: palette::color_for(&node.kind),
				})
			})
			.collect();

		let mut dropped_links = 0;
		let segments = snapshot
			.links()
			.iter()
			.filter_map(|link| {
				match (index.get(link.source.as_str()), index.get(link.target.as_str())) {
					(Some(&(source, from)), Some(&(target, to))) => Some(Segment {
						source,
						target,
						from,
						to,
					}),
					_ => {
						debug!("dropping dangling link {} -> {}", link.source, link.target);
						dropped_links += 1;
						None
					}
				}
			})
			.collect();

		Self {
			markers,
			segments,
			dropped_links,
		}
	}

	pub fn is_empty(&self) -> bool {
		self.markers.is_empty()
	}

	/// Node indices linked to `node` in either direction.
	pub fn neighbors(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
		self.segments.iter().filter_map(move |s| {
			if s.source == node {
				Some(s.target)
			} else if s.target == node {
				Some(s.source)
			} else {
				None
			}
		})
	}

	/// Projects every visible marker, paired with its screen position.
	pub fn project_markers<'a>(
		&'a self,
		camera: &'a OrbitCamera,
		viewport: Viewport,
	) -> impl Iterator<Item = (&'a Marker, Projected)> + 'a {
		self.markers
			.iter()
			.filter_map(move |m| camera.project(m.position, viewport).map(|p| (m, p)))
	}

	/// Node index of the marker under `(sx, sy)`; the one nearest the camera wins.
	/// Only marker discs are hit, never lines or labels.
	pub fn marker_at(
		&self,
		camera: &OrbitCamera,
		viewport: Viewport,
		sx: f64,
		sy: f64,
	) -> Option<usize> {
		self.project_markers(camera, viewport)
			.filter(|(_, p)| {
				let radius = MARKER_RADIUS * p.scale + HIT_SLOP;
				(p.x - sx).hypot(p.y - sy) <= radius
			})
			.min_by(|(_, a), (_, b)| a.depth.total_cmp(&b.depth))
			.map(|(m, _)| m.node)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::knowledge_graph::types::{Link, Node};
	use crate::config::{CameraParams, LayoutParams};

	const VIEW: Viewport = Viewport {
		width: 800.0,
		height: 600.0,
	};

	fn sample() -> GraphSnapshot {
		GraphSnapshot::new(
			vec![
				Node::new("a", "Rust", "Skill"),
				Node::new("b", "site", "Project"),
				Node::new("c", "misc", "Unknown"),
			],
			vec![Link::new("a", "b", "USES"), Link::new("b", "z", "USES")],
		)
		.unwrap()
	}

	fn scene_for(snapshot: &GraphSnapshot) -> Scene {
		Scene::build(snapshot, &Layout::compute(snapshot.nodes(), LayoutParams::default()))
	}

	#[test]
	fn mixed_snapshot_drops_dangling_link() {
		let snapshot = sample();
		let scene = scene_for(&snapshot);

		assert_eq!(scene.markers.len(), 3);
		assert_eq!(scene.segments.len(), 1);
		assert_eq!(scene.dropped_links, 1);
		assert_eq!((scene.segments[0].source, scene.segments[0].target), (0, 1));
		assert_eq!(scene.markers[0].color, palette::color_for("Skill"));
		assert_eq!(scene.markers[2].color, palette::DEFAULT_COLOR);
	}

	#[test]
	fn dangling_link_does_not_disturb_others() {
		let clean = GraphSnapshot::new(
			sample().nodes().to_vec(),
			vec![Link::new("a", "b", "USES")],
		)
		.unwrap();
		let with_dangling = scene_for(&sample());
		let without = scene_for(&clean);
		assert_eq!(with_dangling.markers, without.markers);
		assert_eq!(with_dangling.segments, without.segments);
	}

	#[test]
	fn segment_endpoints_follow_layout() {
		let snapshot = sample();
		let layout = Layout::compute(snapshot.nodes(), LayoutParams::default());
		let scene = Scene::build(&snapshot, &layout);
		assert_eq!(Some(scene.segments[0].from), layout.position("a"));
		assert_eq!(Some(scene.segments[0].to), layout.position("b"));
	}

	#[test]
	fn empty_snapshot_builds_empty_scene() {
		let scene = scene_for(&GraphSnapshot::default());
		assert!(scene.is_empty());
		assert!(scene.segments.is_empty());
		assert_eq!(scene.dropped_links, 0);
	}

	#[test]
	fn stale_layout_leaves_unplaced_nodes_out() {
		let snapshot = sample();
		let layout = Layout::compute(&snapshot.nodes()[..1], LayoutParams::default());
		let scene = Scene::build(&snapshot, &layout);
		assert_eq!(scene.markers.len(), 1);
		assert!(scene.segments.is_empty());
	}

	#[test]
	fn neighbors_are_undirected() {
		let scene = scene_for(&sample());
		assert_eq!(scene.neighbors(0).collect::<Vec<_>>(), [1]);
		assert_eq!(scene.neighbors(1).collect::<Vec<_>>(), [0]);
		assert_eq!(scene.neighbors(2).count(), 0);
	}

	#[test]
	fn hit_test_finds_marker_under_pointer() {
		let scene = scene_for(&sample());
		let camera = OrbitCamera::new(CameraParams::default());
		for marker in &scene.markers {
			let p = camera.project(marker.position, VIEW).unwrap();
			assert_eq!(scene.marker_at(&camera, VIEW, p.x, p.y), Some(marker.node));
		}
	}

	#[test]
	fn hit_test_misses_empty_space_and_lines() {
		let scene = scene_for(&sample());
		let camera = OrbitCamera::new(CameraParams::default());
		assert_eq!(scene.marker_at(&camera, VIEW, 2.0, 2.0), None);

		// midpoint of the a -> b segment lies on the line, away from both markers
		let s = &scene.segments[0];
		let mid = [
			(s.from[0] + s.to[0]) / 2.0,
			(s.from[1] + s.to[1]) / 2.0,
			(s.from[2] + s.to[2]) / 2.0,
		];
		let p = camera.project(mid, VIEW).unwrap();
		assert_eq!(scene.marker_at(&camera, VIEW, p.x, p.y), None);
	}
}
