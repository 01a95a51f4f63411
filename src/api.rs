//! Client for the graph service.
//!
//! The service aggregates a GitHub account and an optional Notion database into
//! a graph (`POST /graph/build`) and serves the result (`GET /graph/data`).
//! Requests go through the browser's `fetch`; body parsing is kept separate so
//! it can be checked without a browser.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::components::knowledge_graph::{GraphSnapshot, WireGraph};
use crate::error::FetchError;

/// Parameters for a graph build. The GitHub username is required.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BuildRequest {
	github_username: String,
	notion_database_id: Option<String>,
}

impl BuildRequest {
	/// Trims both inputs; an empty Notion id means "GitHub only".
	pub fn new(github_username: &str, notion_database_id: &str) -> Result<Self, &'static str> {
		let github_username = github_username.trim();
		if github_username.is_empty() {
			return Err("Please enter a GitHub username");
		}
		let notion_database_id = Some(notion_database_id.trim())
			.filter(|id| !id.is_empty())
			.map(str::to_string);
		Ok(Self {
			github_username: github_username.to_string(),
			notion_database_id,
		})
	}
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
	#[serde(default)]
	data: Option<T>,
	#[serde(default)]
	message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
	detail: String,
}

/// Parses a `GET /graph/data` body into a validated snapshot.
pub fn parse_graph_response(body: &str) -> Result<GraphSnapshot, FetchError> {
	let envelope: Envelope<WireGraph> = serde_json::from_str(body)?;
	let wire = envelope
		.data
		.ok_or_else(|| FetchError::Malformed("response has no `data`".into()))?;
	Ok(GraphSnapshot::try_from(wire)?)
}

/// Parses a `POST /graph/build` body, returning the service's summary message.
pub fn parse_build_response(body: &str) -> Result<String, FetchError> {
	let envelope: Envelope<serde_json::Value> = serde_json::from_str(body)?;
	Ok(envelope.message.unwrap_or_default())
}

/// Turns a non-success response into a `FetchError`, preferring the `detail`
/// field error responses carry.
pub fn status_error(status: u16, body: &str) -> FetchError {
	let detail = serde_json::from_str::<ErrorBody>(body)
		.map(|e| e.detail)
		.unwrap_or_else(|_| body.trim().to_string());
	FetchError::Status { status, detail }
}

fn js_error(err: JsValue) -> FetchError {
	FetchError::Network(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
}

#[derive(Clone, Debug)]
pub struct GraphClient {
	base_url: String,
}

impl GraphClient {
	pub fn new(base_url: &str) -> Self {
		Self {
			base_url: base_url.trim_end_matches('/').to_string(),
		}
	}

	async fn send(
		&self,
		method: &str,
		path: &str,
		body: Option<String>,
	) -> Result<String, FetchError> {
		let url = format!("{}{}", self.base_url, path);
		debug!("{} {}", method, url);

		let opts = RequestInit::new();
		opts.set_method(method);
		opts.set_mode(RequestMode::Cors);
		if let Some(body) = &body {
			opts.set_body(&JsValue::from_str(body));
		}
		let request = Request::new_with_str_and_init(&url, &opts).map_err(js_error)?;
		if body.is_some() {
			request
				.headers()
				.set("Content-Type", "application/json")
				.map_err(js_error)?;
		}

		let window = web_sys::window().ok_or_else(|| FetchError::Network("no window".into()))?;
		let resp: Response = JsFuture::from(window.fetch_with_request(&request))
			.await
			.map_err(js_error)?
			.dyn_into()
			.map_err(|_| FetchError::Malformed("response is not a Response".into()))?;

		let text = JsFuture::from(resp.text().map_err(js_error)?)
			.await
			.map_err(js_error)?
			.as_string()
			.unwrap_or_default();

		if !resp.ok() {
			return Err(status_error(resp.status(), &text));
		}
		Ok(text)
	}

	/// Runs the upstream aggregation. Completes before a following
	/// [`fetch_graph`](Self::fetch_graph) can see the new graph.
	pub async fn build_graph(&self, request: &BuildRequest) -> Result<(), FetchError> {
		let body = serde_json::to_string(request)?;
		let message = parse_build_response(&self.send("POST", "/graph/build", Some(body)).await?)?;
		info!("graph built: {}", message);
		Ok(())
	}

	pub async fn fetch_graph(&self) -> Result<GraphSnapshot, FetchError> {
		parse_graph_response(&self.send("GET", "/graph/data", None).await?)
	}

	/// Build then fetch; the first failure wins.
	pub async fn rebuild(&self, request: &BuildRequest) -> Result<GraphSnapshot, FetchError> {
		self.build_graph(request).await?;
		self.fetch_graph().await
	}
}
