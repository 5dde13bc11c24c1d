use crate::types::{Event, Notification, Presenter, Properties};

/// Headless presenter: renders through the log facade and has no user input,
/// so it never reports actions or dismissals.
pub struct ConsolePresenter {
	current: Option<u32>,
}

impl Presenter for ConsolePresenter {
	const PROPERTIES: Properties = Properties {
		name: "tsuuchi",
		vendor: "tsuuchi",
		version: env!("CARGO_PKG_VERSION"),
		capabilities: &["body", "actions", "persistence"],
	};

	fn new(_events: glib::Sender<(u32, Event)>) -> ConsolePresenter {
		ConsolePresenter { current: None }
	}

	fn show(&mut self, id: u32, data: &Notification) {
		let urgency = data.hints.get("urgency").and_then(|a| u8::try_from(a).ok()).unwrap_or(1);
		if data.body.is_empty() {
			log::info!("[{}] {} <{}> (urgency {})", id, data.summary, data.app_name, urgency);
		} else {
			log::info!("[{}] {} <{}> (urgency {}): {}", id, data.summary, data.app_name, urgency, data.body);
		}
		for pair in data.actions.chunks_exact(2) {
			if let [key, label] = pair {
				log::info!("[{}]   action {:?}: {}", id, key, label);
			}
		}
		self.current = Some(id);
	}

	fn hide(&mut self) {
		if let Some(id) = self.current.take() {
			log::debug!("[{}] hidden", id);
		}
	}
}
