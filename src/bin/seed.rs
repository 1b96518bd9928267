// rebuilds the store from scratch with the sample rows

use tracing::info;

use bookshop::{logging, sql, Config, Result};

#[tokio::main]
async fn main() -> Result<()> {
	dotenvy::dotenv().ok();
	let config = Config::from_env()?;
	let _guard = logging::init(&config);

	let db = sql::open(&config.database_url).await?;
	sql::reset(&db).await?;
	db.close().await;

	info!(database = config.database_url.as_str(), "store recreated");
	Ok(())
}
