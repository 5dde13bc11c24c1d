mod config;
mod console;
mod queue;
mod scheduler;
mod server;
mod types;

use config::Config;
use console::ConsolePresenter;

#[async_std::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
	let config = Config::load()?;
	server::run::<ConsolePresenter>(config).await
}
