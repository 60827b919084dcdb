pub mod discord_delivery;
pub mod telegram_delivery;

pub use discord_delivery::DiscordDelivery;
pub use telegram_delivery::TelegramDelivery;
