// bookstore order api

use tracing::{error, info};

use bookshop::{logging, routes, sql, Config, Result};

#[tokio::main]
async fn main() -> Result<()> {
	// a missing .env is fine, the defaults cover everything
	dotenvy::dotenv().ok();
	let config = Config::from_env()?;
	let _guard = logging::init(&config);

	info!(
		database = config.database_url.as_str(),
		bind_address = config.bind_address.as_str(),
		"starting bookshop"
	);

	let db = sql::open(&config.database_url).await?;
	if config.seed_on_start {
		if sql::ensure_seeded(&db).await? {
			info!("empty store seeded with sample rows");
		}
	} else {
		sql::create_schema(&db).await?;
	}

	let app = routes::app(db.clone());
	let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
	info!(bind_address = config.bind_address.as_str(), "listening");

	axum::serve(listener, app)
		.with_graceful_shutdown(shutdown())
		.await?;

	db.close().await;
	info!("bookshop stopped");
	Ok(())
}

async fn shutdown() {
	if let Err(e) = tokio::signal::ctrl_c().await {
		error!("can't listen for ctrl-c: {e}");
		std::future::pending::<()>().await;
	}
	info!("shutdown signal received");
}
