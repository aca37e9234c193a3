//! Option-chain proxy server.

// crates.io
use clap::Parser;
use color_eyre::Result;
use tokio::net::TcpListener;
// self
use option_chain_proxy::{config::Config, obs, server};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;
	obs::init_subscriber();

	let config = Config::parse();
	let app = config.app()?;
	let listener = TcpListener::bind(config.bind_addr()).await?;

	server::serve(listener, app).await?;

	Ok(())
}
