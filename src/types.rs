use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type Uid = i64;
pub type Oid = i64;
pub type Bid = i64;
pub type Sid = i64;

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct User {
	pub user_id: Uid,
	pub last_name: String,
	pub first_name: String,
	pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Order {
	pub order_id: Oid,
	pub reg_date: NaiveDate,
	pub user_id: Uid,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct OrderItem {
	pub order_item_id: i64,
	pub order_id: Oid,
	pub book_id: Bid,
	pub shop_id: Sid,
	pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Book {
	pub book_id: Bid,
	pub book_name: String,
	pub author: String,
	pub release_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Shop {
	pub shop_id: Sid,
	pub shop_name: String,
	pub address: String,
}

/// One line of an order joined with its book and shop.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct OrderItemDetail {
	pub order_item_id: i64,
	pub order_id: Oid,
	pub book_id: Bid,
	pub book_name: String,
	pub author: String,
	pub release_date: NaiveDate,
	pub shop_id: Sid,
	pub shop_name: String,
	pub address: String,
	pub quantity: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewOrderItem {
	pub book_id: Bid,
	pub shop_id: Sid,
	pub quantity: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewOrder {
	pub user_id: Uid,
	#[serde(alias = "items")]
	pub data: Vec<NewOrderItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
	Users,
	History,
	Order,
}

impl FromStr for Section {
	type Err = Warning;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"users" => Ok(Section::Users),
			"history" => Ok(Section::History),
			"order" => Ok(Section::Order),
			other => Err(Warning::Section(other.to_owned())),
		}
	}
}

/// Non-fatal validation failure handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
	Section(String),
	User(Uid),
	Book(Bid),
	Shop(Sid),
}

impl fmt::Display for Warning {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Warning::Section(section) => write!(f, "Wrong section: {section}"),
			Warning::User(id) => write!(f, "Invalid user id: {id}"),
			Warning::Book(id) => write!(f, "Invalid book id: {id}"),
			Warning::Shop(id) => write!(f, "Invalid shop id: {id}"),
		}
	}
}

pub fn join_warnings(warnings: &[Warning]) -> String {
	warnings.iter()
		.map(ToString::to_string)
		.collect::<Vec<_>>()
		.join("; ")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Lookup {
	User(User),
	History(Vec<Order>),
	Order(Vec<OrderItemDetail>),
	Messages(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Inserted {
	Message(String),
	Failed(Vec<String>),
}

// every reply is wrapped as {"info": ...}
#[derive(Debug, Clone, Serialize)]
pub struct Info<T> {
	pub info: T,
}

impl<T> Info<T> {
	pub fn new(info: T) -> Self {
		Info{ info }
	}
}
