//! Data models shared by the client, the services and the dashboard

pub mod transaction;

pub use transaction::{Transaction, TransactionId, TransactionType};
