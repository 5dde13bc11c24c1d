use std::collections::VecDeque;

use crate::types::{Notification, Request};

/// Issues notification ids. Monotonic, wraps past `u32::MAX` back to 1;
/// 0 is reserved on the wire for "no replacement" and is never returned.
#[derive(Debug, Default)]
pub struct IdAllocator {
	last: u32,
}

impl IdAllocator {
	pub fn new() -> IdAllocator {
		IdAllocator::default()
	}

	pub fn next(&mut self) -> u32 {
		self.last = self.last.checked_add(1).unwrap_or(1);
		self.last
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
	Queued,
	Visible,
}

/// How `enqueue_or_replace` disposed of a request. Carries the effective id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enqueued {
	/// Appended to the back of the queue, either under a fresh id or under
	/// the caller's `replaces_id` when it matched nothing known.
	New(u32),
	ReplacedQueued(u32),
	ReplacedVisible(u32),
}

impl Enqueued {
	pub fn id(self) -> u32 {
		match self {
			Enqueued::New(id) | Enqueued::ReplacedQueued(id) | Enqueued::ReplacedVisible(id) => id,
		}
	}
}

#[derive(Debug)]
pub enum Removed {
	Queued(Notification),
	Visible(Notification),
	NotFound,
}

/// FIFO of pending records plus the single visible slot. Records leave the
/// store the moment they close; a forgotten id reports no state at all.
#[derive(Debug, Default)]
pub struct Store {
	queue: VecDeque<Notification>,
	visible: Option<Notification>,
}

impl Store {
	pub fn new() -> Store {
		Store::default()
	}

	/// Replacement overwrites in place: a queued record keeps its queue
	/// position, the visible record keeps its slot. Everything else is
	/// appended to the back.
	pub fn enqueue_or_replace(&mut self, ids: &mut IdAllocator, req: Request) -> Enqueued {
		if req.replaces_id == 0 {
			let id = ids.next();
			self.queue.push_back(Notification::from_request(id, req));
			return Enqueued::New(id);
		}

		let id = req.replaces_id;
		if self.visible_id() == Some(id) {
			self.visible = Some(Notification::from_request(id, req));
			Enqueued::ReplacedVisible(id)
		} else if let Some(slot) = self.queue.iter_mut().find(|n| n.id == id) {
			*slot = Notification::from_request(id, req);
			Enqueued::ReplacedQueued(id)
		} else {
			self.queue.push_back(Notification::from_request(id, req));
			Enqueued::New(id)
		}
	}

	pub fn dequeue_next(&mut self) -> Option<Notification> {
		self.queue.pop_front()
	}

	pub fn remove_by_id(&mut self, id: u32) -> Removed {
		if let Some(n) = self.visible.take() {
			if n.id == id {
				return Removed::Visible(n);
			}
			self.visible = Some(n);
		}
		if let Some(pos) = self.queue.iter().position(|n| n.id == id) {
			return match self.queue.remove(pos) {
				Some(n) => Removed::Queued(n),
				None => Removed::NotFound,
			};
		}
		Removed::NotFound
	}

	pub fn set_visible(&mut self, n: Notification) {
		debug_assert!(self.visible.is_none());
		self.visible = Some(n);
	}

	pub fn take_visible(&mut self) -> Option<Notification> {
		self.visible.take()
	}

	pub fn visible(&self) -> Option<&Notification> {
		self.visible.as_ref()
	}

	pub fn visible_id(&self) -> Option<u32> {
		self.visible.as_ref().map(|n| n.id)
	}

	pub fn state(&self, id: u32) -> Option<State> {
		if self.visible_id() == Some(id) {
			Some(State::Visible)
		} else if self.queue.iter().any(|n| n.id == id) {
			Some(State::Queued)
		} else {
			None
		}
	}

	pub fn queued(&self) -> usize {
		self.queue.len()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn request(summary: &str, replaces_id: u32) -> Request {
		Request {
			app_name: "test".into(),
			replaces_id,
			app_icon: String::new(),
			summary: summary.into(),
			body: String::new(),
			actions: Vec::new(),
			hints: Default::default(),
			expire_timeout: -1,
		}
	}

	#[test]
	fn ids_are_distinct_and_increasing() {
		let mut ids = IdAllocator::new();
		assert_eq!(ids.next(), 1);
		assert_eq!(ids.next(), 2);
		assert_eq!(ids.next(), 3);
	}

	#[test]
	fn ids_wrap_past_max_skipping_zero() {
		let mut ids = IdAllocator { last: u32::MAX - 1 };
		assert_eq!(ids.next(), u32::MAX);
		assert_eq!(ids.next(), 1);
		assert_eq!(ids.next(), 2);
	}

	#[test]
	fn enqueue_is_fifo() {
		let mut ids = IdAllocator::new();
		let mut store = Store::new();
		assert_eq!(store.enqueue_or_replace(&mut ids, request("a", 0)), Enqueued::New(1));
		assert_eq!(store.enqueue_or_replace(&mut ids, request("b", 0)), Enqueued::New(2));
		assert_eq!(store.dequeue_next().map(|n| n.id), Some(1));
		assert_eq!(store.dequeue_next().map(|n| n.id), Some(2));
		assert!(store.dequeue_next().is_none());
	}

	#[test]
	fn replace_of_queued_preserves_position() {
		let mut ids = IdAllocator::new();
		let mut store = Store::new();
		store.enqueue_or_replace(&mut ids, request("a", 0));
		store.enqueue_or_replace(&mut ids, request("b", 0));
		store.enqueue_or_replace(&mut ids, request("c", 0));

		assert_eq!(store.enqueue_or_replace(&mut ids, request("b2", 2)), Enqueued::ReplacedQueued(2));
		assert_eq!(store.queued(), 3);

		let order: Vec<_> = std::iter::from_fn(|| store.dequeue_next())
			.map(|n| (n.id, n.summary))
			.collect();
		assert_eq!(order, vec![
			(1, "a".to_owned()),
			(2, "b2".to_owned()),
			(3, "c".to_owned()),
		]);
	}

	#[test]
	fn replace_of_visible_overwrites_slot() {
		let mut ids = IdAllocator::new();
		let mut store = Store::new();
		store.enqueue_or_replace(&mut ids, request("a", 0));
		let n = store.dequeue_next().unwrap();
		store.set_visible(n);

		assert_eq!(store.enqueue_or_replace(&mut ids, request("a2", 1)), Enqueued::ReplacedVisible(1));
		assert_eq!(store.visible().map(|n| n.summary.as_str()), Some("a2"));
		assert_eq!(store.queued(), 0);
	}

	#[test]
	fn replace_of_unknown_id_is_a_passthrough() {
		let mut ids = IdAllocator::new();
		let mut store = Store::new();
		assert_eq!(store.enqueue_or_replace(&mut ids, request("a", 42)), Enqueued::New(42));
		assert_eq!(store.state(42), Some(State::Queued));
		// the allocator was not consulted for the passthrough id
		assert_eq!(store.enqueue_or_replace(&mut ids, request("b", 0)), Enqueued::New(1));
	}

	#[test]
	fn remove_by_id_reports_where_the_record_was() {
		let mut ids = IdAllocator::new();
		let mut store = Store::new();
		store.enqueue_or_replace(&mut ids, request("a", 0));
		store.enqueue_or_replace(&mut ids, request("b", 0));
		let n = store.dequeue_next().unwrap();
		store.set_visible(n);

		assert!(matches!(store.remove_by_id(2), Removed::Queued(n) if n.id == 2));
		assert!(matches!(store.remove_by_id(1), Removed::Visible(n) if n.id == 1));
		assert!(matches!(store.remove_by_id(1), Removed::NotFound));
		assert!(matches!(store.remove_by_id(7), Removed::NotFound));
	}

	#[test]
	fn state_tracks_queue_and_visible_slot() {
		let mut ids = IdAllocator::new();
		let mut store = Store::new();
		store.enqueue_or_replace(&mut ids, request("a", 0));
		assert_eq!(store.state(1), Some(State::Queued));

		let n = store.dequeue_next().unwrap();
		store.set_visible(n);
		assert_eq!(store.state(1), Some(State::Visible));

		store.take_visible();
		assert_eq!(store.state(1), None);
	}
}
