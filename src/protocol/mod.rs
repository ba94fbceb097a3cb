pub mod codec;
pub mod joiner;
pub mod message;
pub mod messages;
pub mod record;
pub mod state;
pub mod transcript;
pub mod types;
