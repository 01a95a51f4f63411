use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, error};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::interaction::{self, DragMode};
use super::render;
use super::state::KnowledgeGraphState;
use super::types::{GraphSnapshot, Node};
use crate::config::AppConfig;

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn pointer_position(
	canvas_ref: NodeRef<leptos::html::Canvas>,
	ev: &MouseEvent,
) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?;
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn set_cursor(canvas_ref: NodeRef<leptos::html::Canvas>, cursor: &str) {
	if let Some(canvas) = canvas_ref.get() {
		let _ = web_sys::HtmlElement::style(&canvas).set_property("cursor", cursor);
	}
}

/// 3D knowledge graph drawn onto a canvas.
///
/// Left-drag orbits, right- or shift-drag pans, the wheel zooms. Clicking a node
/// marker hands its record to `on_node_click`. Replacing `data` re-lays out the
/// nodes without touching the camera.
#[component]
pub fn KnowledgeGraph3D(
	#[prop(into)] data: Signal<GraphSnapshot>,
	#[prop(optional)] on_node_click: Option<Callback<Node>>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let config = use_context::<AppConfig>().unwrap_or_default();
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<KnowledgeGraphState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if state_init.borrow().is_some() {
			return;
		}
		let Some(window) = web_sys::window() else {
			error!("no window, graph canvas not started");
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((800.0, 600.0))
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|ctx| ctx.dyn_into().ok())
		{
			Some(ctx) => ctx,
			None => {
				error!("canvas has no 2d context");
				return;
			}
		};
		*state_init.borrow_mut() = Some(KnowledgeGraphState::new(
			data.get_untracked(),
			config.layout,
			config.camera,
			w,
			h,
		));

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		let mut last_frame = js_sys::Date::now();
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			let now = js_sys::Date::now();
			// seconds, capped so a backgrounded tab doesn't jump the fade
			let dt = ((now - last_frame) / 1000.0).clamp(0.0, 0.1);
			last_frame = now;
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick(dt);
				let stats = render::render(s, &ctx);
				if stats != s.frame {
					debug!(
						"drawing {} markers, {} segments, {} labels",
						stats.markers, stats.segments, stats.labels
					);
					s.frame = stats;
				}
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	// a new snapshot supersedes the old one before the next frame is drawn
	let state_data = state.clone();
	Effect::new(move |_| {
		let snapshot = data.get();
		if let Some(ref mut s) = *state_data.borrow_mut() {
			s.set_snapshot(snapshot);
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			let mode = if ev.button() == 2 || ev.shift_key() {
				DragMode::Pan
			} else {
				DragMode::Orbit
			};
			let marker = s.marker_at(x, y);
			s.tracker.press(x, y, marker, mode, ev.button());
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		let cursor = match *state_mm.borrow_mut() {
			Some(ref mut s) if s.tracker.is_idle() => {
				let hovered = s.marker_at(x, y);
				s.set_hover(hovered);
				if hovered.is_some() { "pointer" } else { "grab" }
			}
			Some(ref mut s) => {
				if let Some(drag) = s.tracker.moved(x, y) {
					s.set_hover(None);
					match drag.mode {
						DragMode::Orbit => s.camera.orbit(drag.dx, drag.dy),
						DragMode::Pan => s.camera.pan(drag.dx, drag.dy, s.viewport),
					}
				}
				if s.tracker.is_dragging() { "grabbing" } else { "pointer" }
			}
			None => return,
		};
		set_cursor(canvas_ref, cursor);
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		// release the borrow before the host callback runs
		let event = match *state_mu.borrow_mut() {
			Some(ref mut s) => {
				let marker = s.marker_at(x, y);
				s.tracker.release_on(marker, &s.snapshot)
			}
			None => None,
		};
		interaction::dispatch(event, on_node_click.map(|cb| move |node: Node| cb.run(node)));
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.tracker.cancel();
			s.set_hover(None);
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.camera.zoom(ev.delta_y());
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="knowledge-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			on:contextmenu=|ev: MouseEvent| ev.prevent_default()
			style="display: block; cursor: grab;"
		/>
	}
}
