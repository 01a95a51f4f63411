use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::camera::{OrbitCamera, Projected, Viewport};
use super::layout::Point3;
use super::palette;
use super::scene::{MARKER_RADIUS, Marker, Scene, Segment};
use super::state::KnowledgeGraphState;

const BACKGROUND: &str = "#1a1a1a";
const GRID_HALF_SIZE: f64 = 10.0;
const GRID_DIVISIONS: usize = 20;
const LABEL_DISTANCE_FACTOR: f64 = 12.0;
const LABEL_FONT_PX: f64 = 14.0;
const LIGHT_POSITION: Point3 = [10.0, 10.0, 10.0];
const LIGHT_FALLOFF: f64 = 20.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
	pub markers: usize,
	pub segments: usize,
	pub labels: usize,
}

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(state: &KnowledgeGraphState, ctx: &CanvasRenderingContext2d) -> RenderStats {
	let view = state.viewport;
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, view.width, view.height);

	if state.scene.is_empty() {
		draw_empty_hint(ctx, view);
		return RenderStats::default();
	}

	draw_grid(&state.camera, ctx, view);
	let mut stats = RenderStats {
		segments: draw_segments(state, ctx),
		..RenderStats::default()
	};

	// back to front so nearer spheres cover further ones
	let mut visible: Vec<(&Marker, Projected)> =
		state.scene.project_markers(&state.camera, view).collect();
	visible.sort_by(|(_, a), (_, b)| b.depth.total_cmp(&a.depth));

	for (marker, p) in &visible {
		draw_marker(state, ctx, marker, p);
		stats.markers += 1;
	}
	for (marker, p) in &visible {
		if draw_label(state, ctx, marker, p) {
			stats.labels += 1;
		}
	}
	stats
}

fn draw_empty_hint(ctx: &CanvasRenderingContext2d, view: Viewport) {
	ctx.set_fill_style_str("rgba(255, 255, 255, 0.4)");
	ctx.set_font("16px sans-serif");
	ctx.set_text_align("center");
	let _ = ctx.fill_text("Nothing to draw yet", view.width / 2.0, view.height / 2.0);
	ctx.set_text_align("start");
}

/// Ground grid on the XZ plane: world endpoints plus whether it is a centre line.
fn grid_lines() -> impl Iterator<Item = (Point3, Point3, bool)> {
	let step = 2.0 * GRID_HALF_SIZE / GRID_DIVISIONS as f64;
	(0..=GRID_DIVISIONS).flat_map(move |i| {
		let offset = -GRID_HALF_SIZE + i as f64 * step;
		let centre = i == GRID_DIVISIONS / 2;
		[
			([offset, 0.0, -GRID_HALF_SIZE], [offset, 0.0, GRID_HALF_SIZE], centre),
			([-GRID_HALF_SIZE, 0.0, offset], [GRID_HALF_SIZE, 0.0, offset], centre),
		]
	})
}

/// Screen-space line for every segment with any part in front of the camera.
fn project_segments<'a>(
	scene: &'a Scene,
	camera: &'a OrbitCamera,
	view: Viewport,
) -> impl Iterator<Item = (&'a Segment, Projected, Projected)> + 'a {
	scene.segments.iter().filter_map(move |segment| {
		let (a, b) = camera.project_segment(segment.from, segment.to, view)?;
		Some((segment, a, b))
	})
}

fn stroke_line(ctx: &CanvasRenderingContext2d, a: &Projected, b: &Projected) {
	ctx.begin_path();
	ctx.move_to(a.x, a.y);
	ctx.line_to(b.x, b.y);
	ctx.stroke();
}

fn draw_grid(camera: &OrbitCamera, ctx: &CanvasRenderingContext2d, view: Viewport) {
	ctx.set_line_width(1.0);
	for (from, to, centre) in grid_lines() {
		if let Some((a, b)) = camera.project_segment(from, to, view) {
			ctx.set_stroke_style_str(if centre { "#444444" } else { "#2e2e2e" });
			stroke_line(ctx, &a, &b);
		}
	}
}

fn draw_segments(state: &KnowledgeGraphState, ctx: &CanvasRenderingContext2d) -> usize {
	let t = ease_out_cubic(state.hover.highlight_t);
	let has_highlight = state.has_active_highlight();
	let mut drawn = 0;

	for (segment, a, b) in project_segments(&state.scene, &state.camera, state.viewport) {
		let lit = has_highlight
			&& (state.is_hovered(segment.source) || state.is_hovered(segment.target));
		let (alpha, width) = match (has_highlight, lit) {
			(false, _) => (0.5, 1.0),
			(true, true) => (0.5 + 0.4 * t, 1.0 + 0.5 * t),
			(true, false) => (0.5 - 0.35 * t, 1.0),
		};
		ctx.set_stroke_style_str(&format!("rgba(136, 170, 255, {})", alpha));
		ctx.set_line_width(width);
		stroke_line(ctx, &a, &b);
		drawn += 1;
	}
	drawn
}

/// Ambient plus a point light falling off with distance.
fn shade(position: Point3) -> f64 {
	let dist_sq: f64 = (0..3).map(|i| (LIGHT_POSITION[i] - position[i]).powi(2)).sum();
	0.5 + 0.5 / (1.0 + dist_sq / LIGHT_FALLOFF.powi(2))
}

fn draw_marker(
	state: &KnowledgeGraphState,
	ctx: &CanvasRenderingContext2d,
	marker: &Marker,
	p: &Projected,
) {
	let t = ease_out_cubic(state.hover.highlight_t);
	let has_highlight = state.has_active_highlight();
	let highlighted = state.is_highlighted(marker.node);
	let hovered = state.is_hovered(marker.node);

	let mut radius = MARKER_RADIUS * p.scale;
	let alpha = if has_highlight && !highlighted {
		1.0 - 0.6 * t
	} else {
		1.0
	};
	if hovered {
		radius *= 1.0 + 0.3 * t;
	}

	if highlighted && t > 0.01 {
		let glow = radius * if hovered { 1.8 + 1.2 * t } else { 1.4 + 0.6 * t };
		if let Ok(gradient) = ctx.create_radial_gradient(p.x, p.y, radius * 0.3, p.x, p.y, glow) {
			let a = if hovered { 0.35 * t } else { 0.2 * t };
			let _ = gradient.add_color_stop(0.0, &format!("rgba(255, 255, 255, {})", a));
			let _ = gradient.add_color_stop(0.6, &format!("rgba(200, 220, 255, {})", a * 0.3));
			let _ = gradient.add_color_stop(1.0, "rgba(255, 255, 255, 0)");
			ctx.begin_path();
			let _ = ctx.arc(p.x, p.y, glow, 0.0, 2.0 * PI);
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
			ctx.fill();
		}
	}

	let (r, g, b) = palette::rgb(marker.color);
	let light = shade(marker.position);
	let lit = |c: u8| (c as f64 * light).round() as u8;
	let dark = |c: u8| (c as f64 * light * 0.35).round() as u8;

	ctx.set_global_alpha(alpha);
	ctx.begin_path();
	let _ = ctx.arc(p.x, p.y, radius, 0.0, 2.0 * PI);
	// highlight offset towards the light, roughly up and to the right on screen
	match ctx.create_radial_gradient(
		p.x + radius * 0.35,
		p.y - radius * 0.35,
		radius * 0.1,
		p.x,
		p.y,
		radius,
	) {
		Ok(gradient) => {
			let inner = format!("rgb({}, {}, {})", lit(r), lit(g), lit(b));
			let outer = format!("rgb({}, {}, {})", dark(r), dark(g), dark(b));
			let _ = gradient.add_color_stop(0.0, &inner);
			let _ = gradient.add_color_stop(1.0, &outer);
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		Err(_) => ctx.set_fill_style_str(marker.color),
	}
	ctx.fill();
	ctx.set_global_alpha(1.0);

	if hovered && t > 0.01 {
		ctx.begin_path();
		let _ = ctx.arc(p.x, p.y, radius + 2.0, 0.0, 2.0 * PI);
		ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", 0.7 * t));
		ctx.set_line_width(1.5);
		ctx.stroke();
	}
}

fn draw_label(
	state: &KnowledgeGraphState,
	ctx: &CanvasRenderingContext2d,
	marker: &Marker,
	p: &Projected,
) -> bool {
	let Some(node) = state.snapshot.nodes().get(marker.node) else {
		return false;
	};
	let size = (LABEL_FONT_PX * LABEL_DISTANCE_FACTOR / p.depth).clamp(6.0, 28.0);
	let alpha = if state.has_active_highlight() && !state.is_highlighted(marker.node) {
		0.35
	} else {
		1.0
	};

	ctx.set_font(&format!("bold {}px sans-serif", size));
	let text_width = ctx
		.measure_text(&node.name)
		.map(|m| m.width())
		.unwrap_or(node.name.len() as f64 * size * 0.6);
	let (pad_x, pad_y) = (size * 0.9, size * 0.45);
	let (w, h) = (text_width + 2.0 * pad_x, size + 2.0 * pad_y);
	// pill floats just above the sphere
	let (x, y) = (p.x - w / 2.0, p.y - MARKER_RADIUS * p.scale - h - 4.0);

	ctx.set_global_alpha(alpha);
	ctx.set_fill_style_str("#0a0a14");
	ctx.fill_rect(x, y, w, h);
	ctx.set_stroke_style_str("#ff3333");
	ctx.set_line_width(2.0);
	ctx.stroke_rect(x, y, w, h);
	ctx.set_fill_style_str("#ff3333");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(&node.name, x + pad_x, y + h / 2.0);
	ctx.set_text_baseline("alphabetic");
	ctx.set_global_alpha(1.0);
	true
}
