//! Application configuration, provided to the component tree through context.

/// Base URL of the graph service used when `KG_API_BASE` is unset at build time.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000/api";

/// Top-level configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
	/// Base URL of the graph service, without trailing slash.
	pub api_base: String,
	/// Ring layout parameters.
	pub layout: LayoutParams,
	/// Initial camera placement.
	pub camera: CameraParams,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			api_base: option_env!("KG_API_BASE")
				.unwrap_or(DEFAULT_API_BASE)
				.trim_end_matches('/')
				.to_string(),
			layout: LayoutParams::default(),
			camera: CameraParams::default(),
		}
	}
}

/// Radius and vertical undulation of the node ring.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutParams {
	/// Ring radius in world units.
	pub radius: f64,
	/// Amplitude of the `sin(2θ)` Z offset.
	pub z_amplitude: f64,
}

impl Default for LayoutParams {
	fn default() -> Self {
		Self {
			radius: 6.0,
			z_amplitude: 2.0,
		}
	}
}

/// Where the camera starts. Later snapshots never move it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraParams {
	/// Eye position in world space.
	pub eye: [f64; 3],
	/// Orbit target.
	pub target: [f64; 3],
	/// Vertical field of view in degrees.
	pub fov_degrees: f64,
}

impl Default for CameraParams {
	fn default() -> Self {
		Self {
			eye: [10.0, 10.0, 10.0],
			target: [0.0, 0.0, 0.0],
			fov_degrees: 60.0,
		}
	}
}
