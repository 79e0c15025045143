//! Notification ledger access.

pub mod service;

pub use service::NotificationService;
