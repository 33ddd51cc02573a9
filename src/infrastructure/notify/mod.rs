//! Notification delivery.

mod silent;
mod telegram;

pub use silent::SilentNotifier;
pub use telegram::TelegramNotifier;
