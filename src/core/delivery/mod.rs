pub mod chat_delivery;

pub use chat_delivery::{split_message, ChatDelivery, DeliveryError};
