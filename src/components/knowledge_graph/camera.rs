use std::f64::consts::FRAC_PI_2;

use super::layout::Point3;
use crate::config::CameraParams;

pub const NEAR_CLIP: f64 = 0.1;
/// Clipped vertices land this far in front of the near plane.
const CLIP_EPSILON: f64 = 1e-3;
const MIN_DISTANCE: f64 = 2.0;
const MAX_DISTANCE: f64 = 100.0;
const PITCH_LIMIT: f64 = FRAC_PI_2 - 0.01;
const ROTATE_SPEED: f64 = 0.005;
const ZOOM_STEP: f64 = 1.1;
const WORLD_UP: Point3 = [0.0, 1.0, 0.0];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	pub width: f64,
	pub height: f64,
}

/// A world point after projection onto the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
	pub x: f64,
	pub y: f64,
	/// Distance along the view direction; larger is further away.
	pub depth: f64,
	/// Screen pixels per world unit at this depth.
	pub scale: f64,
}

/// Orbit camera around `target`: yaw about world Y, pitch towards the poles.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitCamera {
	pub target: Point3,
	pub yaw: f64,
	pub pitch: f64,
	pub distance: f64,
	pub fov: f64,
}

impl OrbitCamera {
	pub fn new(params: CameraParams) -> Self {
		let offset = sub(params.eye, params.target);
		let distance = length(offset).clamp(MIN_DISTANCE, MAX_DISTANCE);
		Self {
			target: params.target,
			yaw: offset[0].atan2(offset[2]),
			pitch: (offset[1] / length(offset).max(f64::EPSILON))
				.asin()
				.clamp(-PITCH_LIMIT, PITCH_LIMIT),
			distance,
			fov: params.fov_degrees.to_radians(),
		}
	}

	pub fn eye(&self) -> Point3 {
		let (sy, cy) = self.yaw.sin_cos();
		let (sp, cp) = self.pitch.sin_cos();
		add(
			self.target,
			scale([cp * sy, sp, cp * cy], self.distance),
		)
	}

	/// Forward, right and up unit vectors.
	fn basis(&self) -> (Point3, Point3, Point3) {
		let fwd = normalize(sub(self.target, self.eye()));
		let right = normalize(cross(fwd, WORLD_UP));
		let up = cross(right, fwd);
		(fwd, right, up)
	}

	fn focal_length(&self, viewport: Viewport) -> f64 {
		(viewport.height / 2.0) / (self.fov / 2.0).tan()
	}

	/// `None` when the point is behind the near plane.
	pub fn project(&self, point: Point3, viewport: Viewport) -> Option<Projected> {
		let (fwd, right, up) = self.basis();
		let d = sub(point, self.eye());
		let depth = dot(d, fwd);
		if depth <= NEAR_CLIP {
			return None;
		}
		let scale = self.focal_length(viewport) / depth;
		Some(Projected {
			x: viewport.width / 2.0 + dot(d, right) * scale,
			y: viewport.height / 2.0 - dot(d, up) * scale,
			depth,
			scale,
		})
	}

	/// Depth of `point` along the view direction.
	pub fn depth(&self, point: Point3) -> f64 {
		let (fwd, _, _) = self.basis();
		dot(sub(point, self.eye()), fwd)
	}

	/// Projects both ends of a world-space segment. An end behind the near plane
	/// is moved along the segment to just in front of it; `None` only when the
	/// whole segment is behind.
	pub fn project_segment(
		&self,
		from: Point3,
		to: Point3,
		viewport: Viewport,
	) -> Option<(Projected, Projected)> {
		let (da, db) = (self.depth(from), self.depth(to));
		if da <= NEAR_CLIP && db <= NEAR_CLIP {
			return None;
		}
		let clip = |behind: Point3, d_behind: f64, front: Point3, d_front: f64| {
			let t = (NEAR_CLIP + CLIP_EPSILON - d_behind) / (d_front - d_behind);
			add(behind, scale(sub(front, behind), t.clamp(0.0, 1.0)))
		};
		let (from, to) = if da <= NEAR_CLIP {
			(clip(from, da, to, db), to)
		} else if db <= NEAR_CLIP {
			(from, clip(to, db, from, da))
		} else {
			(from, to)
		};
		Some((self.project(from, viewport)?, self.project(to, viewport)?))
	}

	/// Drag by `(dx, dy)` screen pixels rotates around the target.
	pub fn orbit(&mut self, dx: f64, dy: f64) {
		self.yaw -= dx * ROTATE_SPEED;
		self.pitch = (self.pitch + dy * ROTATE_SPEED).clamp(-PITCH_LIMIT, PITCH_LIMIT);
	}

	/// Positive `delta` (wheel down) moves away.
	pub fn zoom(&mut self, delta: f64) {
		let factor = if delta > 0.0 { ZOOM_STEP } else { 1.0 / ZOOM_STEP };
		self.distance = (self.distance * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
	}

	/// Shifts the target so the scene follows the pointer by `(dx, dy)` pixels.
	pub fn pan(&mut self, dx: f64, dy: f64, viewport: Viewport) {
		let (_, right, up) = self.basis();
		let per_pixel = self.distance / self.focal_length(viewport);
		let shift = add(scale(right, -dx * per_pixel), scale(up, dy * per_pixel));
		self.target = add(self.target, shift);
	}
}

fn add(a: Point3, b: Point3) -> Point3 {
	[a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

fn sub(a: Point3, b: Point3) -> Point3 {
	[a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn scale(a: Point3, k: f64) -> Point3 {
	[a[0] * k, a[1] * k, a[2] * k]
}

fn dot(a: Point3, b: Point3) -> f64 {
	a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: Point3, b: Point3) -> Point3 {
	[
		a[1] * b[2] - a[2] * b[1],
		a[2] * b[0] - a[0] * b[2],
		a[0] * b[1] - a[1] * b[0],
	]
}

fn length(a: Point3) -> f64 {
	dot(a, a).sqrt()
}

fn normalize(a: Point3) -> Point3 {
	let len = length(a);
	if len < f64::EPSILON {
		return a;
	}
	scale(a, 1.0 / len)
}

#[cfg(test)]
mod tests {
	use super::*;

	const VIEW: Viewport = Viewport {
		width: 800.0,
		height: 600.0,
	};

	fn close(a: Point3, b: Point3) -> bool {
		(0..3).all(|i| (a[i] - b[i]).abs() < 1e-9)
	}

	#[test]
	fn starts_at_configured_eye() {
		let camera = OrbitCamera::new(CameraParams::default());
		assert!(close(camera.eye(), [10.0, 10.0, 10.0]));
	}

	#[test]
	fn target_projects_to_viewport_centre() {
		let camera = OrbitCamera::new(CameraParams::default());
		let p = camera.project([0.0; 3], VIEW).unwrap();
		assert!((p.x - 400.0).abs() < 1e-9);
		assert!((p.y - 300.0).abs() < 1e-9);
		assert!((p.depth - 300f64.sqrt()).abs() < 1e-9);
	}

	#[test]
	fn points_behind_camera_are_culled() {
		let camera = OrbitCamera::new(CameraParams::default());
		assert_eq!(camera.project([20.0, 20.0, 20.0], VIEW), None);
	}

	#[test]
	fn segment_crossing_near_plane_is_clipped_not_dropped() {
		let camera = OrbitCamera::new(CameraParams::default());
		let (behind, centre) = ([20.0, 20.0, 20.0], [0.0; 3]);
		assert_eq!(camera.project(behind, VIEW), None);

		let (a, b) = camera.project_segment(behind, centre, VIEW).unwrap();
		assert!(a.depth > NEAR_CLIP && a.depth < NEAR_CLIP + 0.01);
		assert_eq!(Some(b), camera.project(centre, VIEW));

		let (a, b) = camera.project_segment(centre, behind, VIEW).unwrap();
		assert_eq!(Some(a), camera.project(centre, VIEW));
		assert!(b.depth < NEAR_CLIP + 0.01);
	}

	#[test]
	fn segment_wholly_behind_camera_is_culled() {
		let camera = OrbitCamera::new(CameraParams::default());
		assert_eq!(
			camera.project_segment([20.0, 20.0, 20.0], [30.0, 15.0, 20.0], VIEW),
			None
		);
	}

	#[test]
	fn visible_segment_projects_unchanged() {
		let camera = OrbitCamera::new(CameraParams::default());
		let (from, to) = ([6.0, 0.0, 0.0], [-6.0, 0.0, 0.0]);
		assert_eq!(
			camera.project_segment(from, to, VIEW),
			Some((
				camera.project(from, VIEW).unwrap(),
				camera.project(to, VIEW).unwrap()
			))
		);
	}

	#[test]
	fn nearer_points_scale_larger() {
		let camera = OrbitCamera::new(CameraParams::default());
		let near = camera.project([5.0, 5.0, 5.0], VIEW).unwrap();
		let far = camera.project([-5.0, -5.0, -5.0], VIEW).unwrap();
		assert!(near.scale > far.scale);
		assert!(near.depth < far.depth);
	}

	#[test]
	fn zoom_is_clamped() {
		let mut camera = OrbitCamera::new(CameraParams::default());
		for _ in 0..200 {
			camera.zoom(-1.0);
		}
		assert_eq!(camera.distance, MIN_DISTANCE);
		for _ in 0..200 {
			camera.zoom(1.0);
		}
		assert_eq!(camera.distance, MAX_DISTANCE);
	}

	#[test]
	fn orbit_keeps_distance_and_clamps_pitch() {
		let mut camera = OrbitCamera::new(CameraParams::default());
		let distance = camera.distance;
		camera.orbit(120.0, 10_000.0);
		assert_eq!(camera.pitch, PITCH_LIMIT);
		assert!((length(sub(camera.eye(), camera.target)) - distance).abs() < 1e-9);
	}

	#[test]
	fn pan_moves_target_with_pointer() {
		let mut camera = OrbitCamera::new(CameraParams::default());
		let before = camera.project([0.0; 3], VIEW).unwrap();
		camera.pan(50.0, 0.0, VIEW);
		let after = camera.project([0.0; 3], VIEW).unwrap();
		assert!((after.x - before.x - 50.0).abs() < 1e-6);
		assert!((after.y - before.y).abs() < 1e-6);
	}
}
