use std::future::Future;

use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{BuildRequest, GraphClient};
use crate::components::knowledge_graph::{GraphSnapshot, KnowledgeGraph3D, Node, palette};
use crate::config::AppConfig;
use crate::error::FetchError;
use crate::store::{GraphStore, LoadState};

/// Issues a ticket and lands the request's outcome in the store once it
/// resolves. Outcomes of superseded requests are dropped by the store.
fn run_request<F>(store: RwSignal<GraphStore>, request: F)
where
	F: Future<Output = Result<GraphSnapshot, FetchError>> + 'static,
{
	let Some(ticket) = store.try_update(GraphStore::begin) else {
		return;
	};
	spawn_local(async move {
		let result = request.await;
		store.try_update(|s| s.finish(ticket, result));
	});
}

fn status_line(state: &LoadState, empty: bool) -> &'static str {
	match state {
		LoadState::Idle => "Enter a GitHub username and build the graph.",
		LoadState::Loading => "Building graph…",
		LoadState::Ready if empty => "The graph is empty, nothing to draw.",
		LoadState::Ready => {
			"Drag to orbit, right-drag to pan, scroll to zoom. Click a node for details."
		}
		LoadState::Failed(_) => "Showing the last graph that loaded.",
	}
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let config = use_context::<AppConfig>().unwrap_or_default();
	let client = GraphClient::new(&config.api_base);

	let store = RwSignal::new(GraphStore::default());
	let selected = RwSignal::new(None::<Node>);
	let github_username = RwSignal::new(String::new());
	let notion_database_id = RwSignal::new(String::new());
	let form_error = RwSignal::new(None::<String>);

	let graph_data = Signal::derive(move || store.with(GraphStore::snapshot));
	let stats = Memo::new(move |_| store.with(|s| s.snapshot().stats()));
	let loading = move || store.with(GraphStore::is_loading);
	let error_message =
		move || form_error.get().or_else(|| store.with(|s| s.error().map(str::to_string)));
	let on_node_click = Callback::new(move |node: Node| selected.set(Some(node)));

	let build_client = client.clone();
	let on_build = move |ev: SubmitEvent| {
		ev.prevent_default();
		let request = match BuildRequest::new(
			&github_username.get_untracked(),
			&notion_database_id.get_untracked(),
		) {
			Ok(request) => request,
			Err(message) => {
				form_error.set(Some(message.to_string()));
				return;
			}
		};
		form_error.set(None);
		let client = build_client.clone();
		run_request(store, async move { client.rebuild(&request).await });
	};

	let on_reload = move |_| {
		form_error.set(None);
		let client = client.clone();
		run_request(store, async move { client.fetch_graph().await });
	};

	view! {
		<div class="fullscreen-graph">
			<KnowledgeGraph3D data=graph_data on_node_click=on_node_click fullscreen=true />
			<div class="graph-overlay">
				<h1>"Knowledge Graph Visualizer"</h1>
				<p class="subtitle">
					{move || store.with(|s| status_line(s.state(), s.snapshot().is_empty()))}
				</p>

				<form class="panel" on:submit=on_build>
					<h2>"Configuration"</h2>
					<label>"GitHub Username " <span class="required">"*"</span></label>
					<input
						type="text"
						placeholder="e.g., octocat"
						prop:value=move || github_username.get()
						on:input=move |ev| github_username.set(event_target_value(&ev))
					/>
					<label>"Notion Database ID (optional)"</label>
					<input
						type="text"
						placeholder="Your Notion database ID"
						prop:value=move || notion_database_id.get()
						on:input=move |ev| notion_database_id.set(event_target_value(&ev))
					/>
					<p class="hint">"Leave empty to only use GitHub data"</p>

					<Show when=move || error_message().is_some()>
						<div class="error">{move || error_message().unwrap_or_default()}</div>
					</Show>

					<button
						type="submit"
						disabled=move || {
							loading() || github_username.with(|u| u.trim().is_empty())
						}
					>
						{move || {
							if loading() { "Building..." } else { "Build Knowledge Graph" }
						}}
					</button>
					<button type="button" class="secondary" disabled=loading on:click=on_reload>
						"Reload"
					</button>
				</form>

				<Show when=move || selected.with(Option::is_some)>
					<div class="panel">
						<h2>"Selected Node"</h2>
						{move || {
							selected
								.get()
								.map(|node| {
									let properties = (!node.properties.is_empty())
										.then(|| {
											serde_json::to_string_pretty(&node.properties)
												.unwrap_or_default()
										});
									view! {
										<p>
											<span
												class="swatch"
												style:background=palette::color_for(&node.kind)
											></span>
											<strong>"Name: "</strong>
											{node.name.clone()}
										</p>
										<p>
											<strong>"Type: "</strong>
											{node.kind.clone()}
										</p>
										{properties
											.map(|json| {
												view! {
													<p><strong>"Properties:"</strong></p>
													<pre>{json}</pre>
												}
											})}
									}
								})
						}}
						<button
							type="button"
							class="secondary"
							on:click=move |_| selected.set(None)
						>
							"Clear selection"
						</button>
					</div>
				</Show>

				<div class="panel stats">
					<h2>"Statistics"</h2>
					<p>"Total Nodes: " <strong>{move || stats.get().nodes}</strong></p>
					<p>"Connections: " <strong>{move || stats.get().links}</strong></p>
					<p>"Skills: " <strong>{move || stats.get().skills}</strong></p>
					<p>"Projects: " <strong>{move || stats.get().projects}</strong></p>
				</div>
			</div>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn status_distinguishes_empty_from_missing() {
		assert_ne!(
			status_line(&LoadState::Idle, true),
			status_line(&LoadState::Ready, true)
		);
		assert_ne!(
			status_line(&LoadState::Ready, true),
			status_line(&LoadState::Ready, false)
		);
		assert_eq!(
			status_line(&LoadState::Failed("x".into()), false),
			"Showing the last graph that loaded."
		);
	}
}
