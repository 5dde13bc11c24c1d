use std::{cell::RefCell, collections::HashMap, rc::Rc};

use futures::channel::oneshot;

use crate::config::Config;
use crate::scheduler::{GlibTimer, Message, Scheduler};
use crate::types::{Event, Presenter, Properties, Request};

pub const BUS_NAME: &str = "org.freedesktop.Notifications";
pub const OBJECT_PATH: &str = "/org/freedesktop/Notifications";

struct NotificationServer {
	sender: glib::Sender<Message>,
	props: Properties,
}

#[zbus::dbus_interface(name = "org.freedesktop.Notifications")]
impl NotificationServer {
	async fn get_server_information(&self) -> (&str, &str, &str, &str) {
		(self.props.name, self.props.vendor, self.props.version, "1.2")
	}

	async fn get_capabilities(&self) -> &[&str] {
		self.props.capabilities
	}

	async fn notify(
		&self,
		app_name: String,
		replaces_id: u32,
		app_icon: String,
		summary: String,
		body: String,
		actions: Vec<String>,
		hints: HashMap<String, zbus::zvariant::OwnedValue>,
		expire_timeout: i32,
	) -> u32 {
		let (reply_tx, reply_rx) = oneshot::channel();
		self.sender.send(Message::Notify(Request {
			app_name,
			replaces_id,
			app_icon,
			summary,
			body,
			actions,
			hints,
			expire_timeout,
		}, reply_tx)).unwrap();
		reply_rx.await.unwrap()
	}

	async fn close_notification(&self, id: u32) {
		self.sender.send(Message::Close(id)).unwrap();
	}

	#[dbus_interface(signal)]
	async fn notification_closed(&self, ctx: &zbus::SignalContext<'_>, id: u32, reason: u32) -> zbus::Result<()>;

	#[dbus_interface(signal)]
	async fn action_invoked(&self, ctxt: &zbus::SignalContext<'_>, id: u32, action: &str) -> zbus::Result<()>;
}

pub async fn run<P: Presenter + 'static>(config: Config) -> Result<(), Box<dyn std::error::Error>> {
	let main_context = glib::MainContext::default();
	let _context = main_context.acquire()?;

	let (msg_tx, msg_rx) = glib::MainContext::channel::<Message>(glib::PRIORITY_DEFAULT);
	let (ui_tx, ui_rx) = glib::MainContext::channel::<(u32, Event)>(glib::PRIORITY_DEFAULT);
	let (signal_tx, signal_rx) = glib::MainContext::channel::<(u32, Event)>(glib::PRIORITY_DEFAULT);

	let server = NotificationServer { sender: msg_tx.clone(), props: P::PROPERTIES };

	let conn = zbus::ConnectionBuilder::session()?
		.name(BUS_NAME)?
		.serve_at(OBJECT_PATH, server)?
		.build().await?;

	signal_rx.attach(Some(&main_context), move |(id, event)| {
		let conn = conn.clone();
		gidle_future::spawn(async move {
			let server_ref = conn
				.object_server()
				.interface::<_, NotificationServer>(OBJECT_PATH).await.unwrap();
			let server = server_ref.get().await;
			let ctx = server_ref.signal_context();
			log::debug!("emitting {:?} for notification {}", event, id);
			let emitted = match &event {
				Event::Action(key) => server.action_invoked(ctx, id, key).await,
				Event::Close(reason) => server.notification_closed(ctx, id, *reason as u32).await,
			};
			if let Err(e) = emitted {
				log::warn!("failed to emit {:?} for notification {}: {}", event, id, e);
			}
		});
		glib::Continue(true)
	});

	let presenter = P::new(ui_tx);
	let timer = GlibTimer::new(msg_tx);
	let events: crate::scheduler::Events = Box::new(move |id, event| {
		signal_tx.send((id, event)).unwrap();
	});
	let scheduler = Rc::new(RefCell::new(Scheduler::new(
		presenter,
		timer,
		events,
		config.default_timeout(),
	)));

	msg_rx.attach(Some(&main_context), {
		let scheduler = scheduler.clone();
		move |msg| {
			scheduler.borrow_mut().handle(msg);
			glib::Continue(true)
		}
	});

	ui_rx.attach(Some(&main_context), move |(id, event)| {
		scheduler.borrow_mut().handle(Message::Presenter(id, event));
		glib::Continue(true)
	});

	log::info!("serving {} on the session bus", BUS_NAME);
	glib::MainLoop::new(Some(&main_context), false).run();
	Ok(())
}
