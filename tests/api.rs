//! End-to-end tests of the HTTP routes over an in-memory store.

use axum::{
	body::Body,
	http::{header, Method, Request, StatusCode},
	Router,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::ServiceExt;

use bookshop::{routes, sql};

async fn test_app() -> (Router, SqlitePool) {
	let db = sql::open_in_memory().await.unwrap();
	sql::ensure_seeded(&db).await.unwrap();
	(routes::app(db.clone()), db)
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
	let res = app.oneshot(req).await.unwrap();
	let status = res.status();
	let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
	(status, serde_json::from_slice(&bytes).unwrap())
}

fn get(uri: &str) -> Request<Body> {
	Request::builder()
		.uri(uri)
		.body(Body::empty())
		.unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
	Request::builder()
		.method(Method::POST)
		.uri(uri)
		.header(header::CONTENT_TYPE, "application/json")
		.body(Body::from(body.to_string()))
		.unwrap()
}

async fn count(db: &SqlitePool, table: &str) -> i64 {
	sqlx::query_scalar(&format!(r#"SELECT COUNT(*) FROM "{table}""#))
		.fetch_one(db)
		.await
		.unwrap()
}

#[tokio::test]
async fn test_root_reports_running() {
	let (app, _db) = test_app().await;
	let (status, body) = send(app, get("/")).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body, json!({"info": "application is running"}));
}

#[tokio::test]
async fn test_user_lookup() {
	let (app, _db) = test_app().await;
	let (status, body) = send(app, get("/users/1")).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(
		body,
		json!({"info": {
			"user_id": 1,
			"last_name": "Dorian",
			"first_name": "John",
			"email": "dr.acula@scrubs.com"
		}})
	);
}

#[tokio::test]
async fn test_missing_user_is_embedded_error() {
	let (app, _db) = test_app().await;
	let (status, body) = send(app, get("/users/77")).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body, json!({"info": ["no user with id 77"]}));
}

#[tokio::test]
async fn test_history_lookup() {
	let (app, _db) = test_app().await;
	let (_, body) = send(app, get("/history/1")).await;
	assert_eq!(
		body,
		json!({"info": [
			{"order_id": 1, "reg_date": "2021-01-01", "user_id": 1},
			{"order_id": 3, "reg_date": "2021-08-04", "user_id": 1}
		]})
	);
}

#[tokio::test]
async fn test_history_of_unknown_user_is_empty() {
	let (app, _db) = test_app().await;
	let (_, body) = send(app, get("/history/50")).await;
	assert_eq!(body, json!({"info": []}));
}

#[tokio::test]
async fn test_order_lookup() {
	let (app, _db) = test_app().await;
	let (_, body) = send(app, get("/order/3")).await;
	assert_eq!(
		body,
		json!({"info": [{
			"order_item_id": 3,
			"order_id": 3,
			"book_id": 1,
			"book_name": "War and peace",
			"author": "L. Tolstoy",
			"release_date": "2020-01-01",
			"shop_id": 2,
			"shop_name": "Books",
			"address": "LA",
			"quantity": 3
		}]})
	);
}

#[tokio::test]
async fn test_wrong_section() {
	let (app, _db) = test_app().await;
	let (status, body) = send(app, get("/books/1")).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body, json!({"info": ["Wrong section: books"]}));
}

#[tokio::test]
async fn test_non_numeric_id_is_rejected() {
	let (app, _db) = test_app().await;
	let res = app.oneshot(get("/users/abc")).await.unwrap();
	assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_insert_valid_order() {
	let (app, db) = test_app().await;
	let order = json!({
		"user_id": 1,
		"data": [
			{"book_id": 3, "shop_id": 2, "quantity": 3},
			{"book_id": 4, "shop_id": 1, "quantity": 1}
		]
	});

	let (status, body) = send(app.clone(), post_json("/new/", order)).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body, json!({"info": "successfully inserted"}));
	assert_eq!(count(&db, "order").await, 5);
	assert_eq!(count(&db, "order_item").await, 8);

	let (_, body) = send(app, get("/order/5")).await;
	let items = body["info"].as_array().unwrap();
	assert_eq!(items.len(), 2);
	assert_eq!(items[0]["book_name"], "The Lord of the rings");
	assert_eq!(items[1]["book_name"], "The adventures of Sherlock Holmes");
}

#[tokio::test]
async fn test_insert_unknown_user() {
	let (app, db) = test_app().await;
	let order = json!({"user_id": 9, "data": [{"book_id": 1, "shop_id": 1, "quantity": 1}]});

	let (_, body) = send(app, post_json("/new/", order)).await;
	assert_eq!(body, json!({"info": "Invalid user id: 9"}));
	assert_eq!(count(&db, "order").await, 4);
	assert_eq!(count(&db, "order_item").await, 6);
}

#[tokio::test]
async fn test_insert_with_bad_items() {
	let (app, db) = test_app().await;
	let order = json!({
		"user_id": 2,
		"data": [
			{"book_id": 10, "shop_id": 1, "quantity": 1},
			{"book_id": 2, "shop_id": 5, "quantity": 1},
			{"book_id": 2, "shop_id": 2, "quantity": 4}
		]
	});

	let (_, body) = send(app, post_json("/new", order)).await;
	assert_eq!(body, json!({"info": "Invalid book id: 10; Invalid shop id: 5"}));
	assert_eq!(count(&db, "order").await, 5);
	assert_eq!(count(&db, "order_item").await, 7);
}

#[tokio::test]
async fn test_insert_without_data_is_embedded_error() {
	let (app, db) = test_app().await;

	let (status, body) = send(app, post_json("/new/", json!({"user_id": 1}))).await;
	assert_eq!(status, StatusCode::OK);
	let info = body["info"].as_array().unwrap();
	assert_eq!(info.len(), 1);
	assert!(info[0].as_str().unwrap().contains("missing field `data`"));
	assert_eq!(count(&db, "order").await, 4);
}

#[tokio::test]
async fn test_insert_with_wrong_types_is_embedded_error() {
	let (app, _db) = test_app().await;

	let (status, body) = send(app, post_json("/new/", json!({"user_id": "x", "data": []}))).await;
	assert_eq!(status, StatusCode::OK);
	let info = body["info"].as_array().unwrap();
	assert_eq!(info.len(), 1);
	assert!(info[0].as_str().unwrap().contains("invalid type"));
}

#[tokio::test]
async fn test_insert_failure_is_embedded_and_rolled_back() {
	let (app, db) = test_app().await;
	sqlx::query("DROP TABLE order_item")
		.execute(&db)
		.await
		.unwrap();

	let order = json!({"user_id": 1, "data": [{"book_id": 1, "shop_id": 1, "quantity": 1}]});
	let (status, body) = send(app, post_json("/new/", order)).await;
	assert_eq!(status, StatusCode::OK);
	let info = body["info"].as_array().unwrap();
	assert_eq!(info.len(), 1);
	assert!(info[0].as_str().unwrap().starts_with("database error"));
	assert_eq!(count(&db, "order").await, 4);
}
