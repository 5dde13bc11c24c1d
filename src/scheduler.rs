//! The lifecycle scheduler: one notification on screen at a time, the rest
//! queued FIFO. Every transition (notify, close, timer fire, presenter event)
//! is dispatched from the glib main context, so nothing here interleaves.

use std::time::Duration;

use futures::channel::oneshot;

use crate::queue::{Enqueued, IdAllocator, Removed, State, Store};
use crate::types::{CloseReason, Event, Presenter, Request};

pub enum Message {
	Notify(Request, oneshot::Sender<u32>),
	Close(u32),
	Presenter(u32, Event),
	Expired { id: u32, epoch: u64 },
}

/// Single-shot expiry timer for the visible record. Behind a trait so the
/// state machine runs under test without a main loop.
pub trait Timer {
	fn arm(&mut self, after: Duration, id: u32, epoch: u64);
	fn cancel(&mut self);
}

pub struct GlibTimer {
	sender: glib::Sender<Message>,
	source: Option<glib::SourceId>,
}

impl GlibTimer {
	pub fn new(sender: glib::Sender<Message>) -> GlibTimer {
		GlibTimer { sender, source: None }
	}
}

impl Timer for GlibTimer {
	fn arm(&mut self, after: Duration, id: u32, epoch: u64) {
		self.cancel();
		let sender = self.sender.clone();
		self.source = Some(glib::timeout_add_local(after, move || {
			sender.send(Message::Expired { id, epoch }).unwrap();
			// The source must stay installed until cancel() removes it;
			// returning Continue(false) frees it and a later remove() panics.
			glib::Continue(true)
		}));
	}

	fn cancel(&mut self) {
		if let Some(source) = self.source.take() {
			source.remove();
		}
	}
}

/// Where `close_request` found the record, so callers and tests can tell a
/// signalled close from a silent one from a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
	Visible,
	Queued,
	Unknown,
}

pub type Events = Box<dyn Fn(u32, Event)>;

pub struct Scheduler<P, T> {
	ids: IdAllocator,
	store: Store,
	presenter: P,
	timer: T,
	events: Events,
	epoch: u64,
	default_timeout: Duration,
}

impl<P: Presenter, T: Timer> Scheduler<P, T> {
	pub fn new(presenter: P, timer: T, events: Events, default_timeout: Duration) -> Scheduler<P, T> {
		Scheduler {
			ids: IdAllocator::new(),
			store: Store::new(),
			presenter,
			timer,
			events,
			epoch: 0,
			default_timeout,
		}
	}

	pub fn handle(&mut self, msg: Message) {
		match msg {
			Message::Notify(req, reply) => {
				let id = self.notify(req);
				let _ = reply.send(id);
			}
			Message::Close(id) => {
				self.close_request(id);
			}
			Message::Presenter(id, Event::Action(key)) => {
				self.action_invoked(id, &key);
			}
			Message::Presenter(id, Event::Close(reason)) => {
				self.dismissed(id, reason);
			}
			Message::Expired { id, epoch } => {
				self.expired(id, epoch);
			}
		}
	}

	/// Accepts a notification request and returns the effective id. Never
	/// fails; malformed payloads are passed through untouched.
	pub fn notify(&mut self, req: Request) -> u32 {
		let outcome = self.store.enqueue_or_replace(&mut self.ids, req);
		let id = outcome.id();
		match outcome {
			Enqueued::New(_) => log::debug!("notification {} queued ({} waiting)", id, self.store.queued()),
			Enqueued::ReplacedQueued(_) => log::debug!("notification {} replaced in queue", id),
			Enqueued::ReplacedVisible(_) => {
				// content swap of the record on screen: re-show in place,
				// restart its expiry, emit nothing
				log::debug!("notification {} replaced on screen", id);
				self.timer.cancel();
				self.show_visible(id);
			}
		}
		if self.store.visible_id().is_none() {
			self.show_next();
		}
		id
	}

	/// `CloseNotification` off the wire. A visible record closes with reason
	/// `Closed`; a queued one is dropped without a signal since it was never
	/// shown; unknown ids are a no-op.
	pub fn close_request(&mut self, id: u32) -> CloseOutcome {
		match self.store.remove_by_id(id) {
			Removed::Visible(_) => {
				self.timer.cancel();
				self.presenter.hide();
				(self.events)(id, Event::Close(CloseReason::Closed));
				self.show_next();
				CloseOutcome::Visible
			}
			Removed::Queued(_) => {
				log::debug!("notification {} closed before it was shown", id);
				CloseOutcome::Queued
			}
			Removed::NotFound => {
				log::debug!("close for unknown notification {} ignored", id);
				CloseOutcome::Unknown
			}
		}
	}

	/// Action reported by the presenter. Only honored while the id is on
	/// screen; the notification stays open either way.
	pub fn action_invoked(&mut self, id: u32, key: &str) -> bool {
		if self.store.state(id) != Some(State::Visible) {
			log::debug!("action {:?} for stale notification {} ignored", key, id);
			return false;
		}
		(self.events)(id, Event::Action(key.to_owned()));
		true
	}

	/// User dismissal reported by the presenter, with the same staleness
	/// guard as actions.
	pub fn dismissed(&mut self, id: u32, reason: CloseReason) -> bool {
		if self.store.state(id) != Some(State::Visible) {
			log::debug!("dismissal of stale notification {} ignored", id);
			return false;
		}
		self.timer.cancel();
		self.store.take_visible();
		self.presenter.hide();
		(self.events)(id, Event::Close(reason));
		self.show_next();
		true
	}

	/// Expiry timer delivery. The id and epoch must both still match: a fire
	/// that raced with a replace, dismissal or explicit close is stale and
	/// must not emit a second closure signal.
	pub fn expired(&mut self, id: u32, epoch: u64) -> bool {
		if epoch != self.epoch || self.store.state(id) != Some(State::Visible) {
			log::debug!("stale expiry for notification {} ignored", id);
			return false;
		}
		self.timer.cancel();
		self.store.take_visible();
		self.presenter.hide();
		(self.events)(id, Event::Close(CloseReason::Expired));
		self.show_next();
		true
	}

	fn show_next(&mut self) {
		if self.store.visible_id().is_some() {
			return;
		}
		if let Some(next) = self.store.dequeue_next() {
			let id = next.id;
			self.store.set_visible(next);
			self.show_visible(id);
		}
	}

	fn show_visible(&mut self, id: u32) {
		// every (re-)show is a new display generation, armed or not; a
		// replace keeps the id, so a stale fire is only recognizable by epoch
		self.epoch += 1;
		let timeout = match self.store.visible() {
			Some(n) => {
				self.presenter.show(id, n);
				n.timeout(self.default_timeout)
			}
			None => return,
		};
		if let Some(after) = timeout {
			self.timer.arm(after, id, self.epoch);
		}
	}
}
