use knowledge_graph_3d::{App, init_logging};

fn main() {
	init_logging();
	leptos::mount::mount_to_body(App);
}
