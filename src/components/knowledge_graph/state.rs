use std::collections::HashSet;

use log::{debug, info};

use super::camera::{OrbitCamera, Viewport};
use super::interaction::ClickTracker;
use super::layout::Layout;
use super::render::RenderStats;
use super::scene::Scene;
use super::types::GraphSnapshot;
use crate::config::{CameraParams, LayoutParams};

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<usize>,
	pub neighbors: HashSet<usize>,
	pub highlight_t: f64,
	pub prev_node: Option<usize>,
	pub prev_neighbors: HashSet<usize>,
	delay_t: f64,
}

/// Per-canvas state: the current snapshot with its layout and scene, plus view
/// state (camera, hover, pointer) that outlives snapshot changes.
pub struct KnowledgeGraphState {
	pub snapshot: GraphSnapshot,
	pub layout: Layout,
	pub scene: Scene,
	pub camera: OrbitCamera,
	pub hover: HoverState,
	pub tracker: ClickTracker,
	pub viewport: Viewport,
	/// Stats of the last drawn frame.
	pub frame: RenderStats,
	layout_params: LayoutParams,
}

impl KnowledgeGraphState {
	pub fn new(
		snapshot: GraphSnapshot,
		layout_params: LayoutParams,
		camera: CameraParams,
		width: f64,
		height: f64,
	) -> Self {
		let layout = Layout::compute(snapshot.nodes(), layout_params);
		let scene = Scene::build(&snapshot, &layout);
		Self {
			snapshot,
			layout,
			scene,
			camera: OrbitCamera::new(camera),
			hover: HoverState::default(),
			tracker: ClickTracker::default(),
			viewport: Viewport { width, height },
			frame: RenderStats::default(),
			layout_params,
		}
	}

	/// Swaps in a new snapshot. The layout is recomputed when the node sequence
	/// changed by reference or by count, the scene whenever either sequence did.
	/// Camera is left alone; pointer and hover state refer to old indices and
	/// are reset. Returns whether a relayout happened.
	pub fn set_snapshot(&mut self, snapshot: GraphSnapshot) -> bool {
		if snapshot.same_as(&self.snapshot) {
			return false;
		}
		let relayout = !snapshot.same_nodes(&self.snapshot)
			|| snapshot.node_count() != self.layout.len();
		if relayout {
			self.layout = Layout::compute(snapshot.nodes(), self.layout_params);
			debug!("layout recomputed for {} nodes", snapshot.node_count());
		}
		self.scene = Scene::build(&snapshot, &self.layout);
		info!(
			"snapshot: {} nodes, {} links ({} dropped)",
			snapshot.node_count(),
			snapshot.link_count(),
			self.scene.dropped_links
		);
		self.snapshot = snapshot;
		self.tracker.cancel();
		self.hover = HoverState::default();
		relayout
	}

	pub fn marker_at(&self, sx: f64, sy: f64) -> Option<usize> {
		self.scene.marker_at(&self.camera, self.viewport, sx, sy)
	}

	pub fn set_hover(&mut self, node: Option<usize>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// keep the old highlight around while it fades out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			self.hover.neighbors.extend(self.scene.neighbors(idx));
		}
	}

	pub fn is_highlighted(&self, idx: usize) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn is_hovered(&self, idx: usize) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	/// Advances the hover fade.
	pub fn tick(&mut self, dt: f64) {
		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.viewport = Viewport { width, height };
	}
}
