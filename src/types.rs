use std::collections::HashMap;
use std::time::Duration;

/// The raw `Notify` payload as it arrives off the wire.
#[derive(Debug)]
pub struct Request {
	pub app_name: String,
	pub replaces_id: u32,
	pub app_icon: String,
	pub summary: String,
	pub body: String,
	pub actions: Vec<String>,
	pub hints: HashMap<String, zbus::zvariant::OwnedValue>,
	pub expire_timeout: i32,
}

/// One requested or displayed notification. The payload is opaque to the
/// lifecycle core and handed to the presenter unmodified; `actions` keeps the
/// wire's alternating (key, label) layout without validating parity.
#[derive(Debug, Clone)]
pub struct Notification {
	pub id: u32,
	pub app_name: String,
	pub app_icon: String,
	pub summary: String,
	pub body: String,
	pub actions: Vec<String>,
	pub hints: HashMap<String, zbus::zvariant::OwnedValue>,
	pub expire_timeout: i32,
}

impl Notification {
	pub fn from_request(id: u32, req: Request) -> Notification {
		Notification {
			id,
			app_name: req.app_name,
			app_icon: req.app_icon,
			summary: req.summary,
			body: req.body,
			actions: req.actions,
			hints: req.hints,
			expire_timeout: req.expire_timeout,
		}
	}

	/// Duration until auto-expiry. `0` is persistent, `-1` takes the
	/// configured default, anything positive is milliseconds.
	pub fn timeout(&self, default: Duration) -> Option<Duration> {
		match self.expire_timeout {
			0 => None,
			t if t < 0 => Some(default),
			t => Some(Duration::from_millis(t as u64)),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
	Action(String),
	Close(CloseReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
	Expired = 1,
	Dismissed = 2,
	Closed = 3,
	Other = 4,
}

#[derive(Debug, Clone, Copy)]
pub struct Properties {
	pub name: &'static str,
	pub vendor: &'static str,
	pub version: &'static str,
	pub capabilities: &'static [&'static str],
}

pub trait Presenter {
	const PROPERTIES: Properties;
	fn new(events: glib::Sender<(u32, Event)>) -> Self;
	fn show(&mut self, id: u32, data: &Notification);
	fn hide(&mut self);
}
