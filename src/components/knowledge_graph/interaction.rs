//! Pointer gestures on the canvas, reduced to selection events and camera drags.
//!
//! The tracker owns no selection. A completed click on a marker yields a
//! [`NodeSelected`] carrying the full node record; whoever hosts the canvas
//! decides what selection means.

use super::types::{GraphSnapshot, Node};

/// Pointer travel in pixels before a press stops counting as a click.
pub const CLICK_TOLERANCE: f64 = 4.0;
/// `MouseEvent.button` of the primary button; only it can select.
pub const PRIMARY_BUTTON: i16 = 0;

#[derive(Clone, Debug, PartialEq)]
pub struct NodeSelected {
	pub node: Node,
}

/// What a pointer drag should do to the camera.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragMode {
	Orbit,
	Pan,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraDrag {
	pub mode: DragMode,
	pub dx: f64,
	pub dy: f64,
}

#[derive(Clone, Debug, PartialEq)]
struct Press {
	origin: (f64, f64),
	last: (f64, f64),
	marker: Option<usize>,
	mode: DragMode,
	primary: bool,
	dragging: bool,
}

#[derive(Clone, Debug, Default)]
pub struct ClickTracker {
	press: Option<Press>,
}

impl ClickTracker {
	pub fn is_idle(&self) -> bool {
		self.press.is_none()
	}

	pub fn is_dragging(&self) -> bool {
		self.press.as_ref().is_some_and(|p| p.dragging)
	}

	pub fn press(
		&mut self,
		x: f64,
		y: f64,
		marker: Option<usize>,
		mode: DragMode,
		button: i16,
	) {
		self.press = Some(Press {
			origin: (x, y),
			last: (x, y),
			marker,
			mode,
			primary: button == PRIMARY_BUTTON,
			dragging: false,
		});
	}

	/// Once the pointer leaves the tolerance disc the press becomes a camera drag
	/// and can no longer select.
	pub fn moved(&mut self, x: f64, y: f64) -> Option<CameraDrag> {
		let press = self.press.as_mut()?;
		if !press.dragging {
			let (ox, oy) = press.origin;
			if (x - ox).hypot(y - oy) <= CLICK_TOLERANCE {
				return None;
			}
			press.dragging = true;
		}
		let (lx, ly) = press.last;
		press.last = (x, y);
		Some(CameraDrag {
			mode: press.mode,
			dx: x - lx,
			dy: y - ly,
		})
	}

	/// Ends the gesture. Returns the node index when a primary-button press and
	/// its release landed on the same marker without dragging.
	pub fn release(&mut self, marker: Option<usize>) -> Option<usize> {
		let press = self.press.take()?;
		match (press.dragging, press.primary, press.marker, marker) {
			(false, true, Some(down), Some(up)) if down == up => Some(down),
			_ => None,
		}
	}

	pub fn cancel(&mut self) {
		self.press = None;
	}

	/// `release` resolved against the snapshot the marker indices refer to.
	pub fn release_on(
		&mut self,
		marker: Option<usize>,
		snapshot: &GraphSnapshot,
	) -> Option<NodeSelected> {
		let index = self.release(marker)?;
		snapshot.nodes().get(index).map(|node| NodeSelected { node: node.clone() })
	}
}

/// Hands a selection to the host callback, if one is wired. Without one the
/// click is inert.
pub fn dispatch<F: Fn(Node)>(event: Option<NodeSelected>, on_select: Option<F>) -> bool {
	match (event, on_select) {
		(Some(event), Some(callback)) => {
			log::debug!("node selected: {}", event.node.id);
			callback(event.node);
			true
		}
		_ => false,
	}
}
