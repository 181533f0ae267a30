//! Outbound notification delivery

pub mod telegram;

pub use telegram::TelegramNotifier;
