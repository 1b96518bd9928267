use axum::{
	extract::{rejection::JsonRejection, Path, State},
	routing::{get, post},
	Json, Router,
};
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::store;
use crate::types::{join_warnings, Info, Inserted, Lookup, NewOrder};

pub fn app(db: SqlitePool) -> Router {
	Router::new()
		.route("/", get(root))
		.route("/:section/:item_id", get(get_data))
		.route("/new/", post(add_data))
		.route("/new", post(add_data))
		.layer(TraceLayer::new_for_http())
		.with_state(db)
}

pub async fn root() -> Json<Info<&'static str>> {
	Json(Info::new("application is running"))
}

pub async fn get_data(
	State(db): State<SqlitePool>,
	Path((section, item_id)): Path<(String, i64)>,
) -> Json<Info<Lookup>> {
	info!("query: {section}/{item_id}");
	let found = store::lookup(&db, &section, item_id).await
		.unwrap_or_else(|e| {
			error!("{e}");
			Lookup::Messages(vec![e.to_string()])
		});
	Json(Info::new(found))
}

pub async fn add_data(
	State(db): State<SqlitePool>,
	body: Result<Json<NewOrder>, JsonRejection>,
) -> Json<Info<Inserted>> {
	let order = match body {
		Ok(Json(order)) => order,
		Err(rejection) => {
			let text = rejection.body_text();
			error!("{text}");
			return Json(Info::new(Inserted::Failed(vec![text])));
		},
	};
	info!(?order, "inserting");
	let reply = match store::insert_order(&db, &order).await {
		Ok(warnings) if warnings.is_empty() => {
			Inserted::Message("successfully inserted".to_string())
		},
		Ok(warnings) => {
			let joined = join_warnings(&warnings);
			warn!("{joined}");
			Inserted::Message(joined)
		},
		Err(e) => {
			error!("{e}");
			Inserted::Failed(vec![e.to_string()])
		},
	};
	Json(Info::new(reply))
}
