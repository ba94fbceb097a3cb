pub mod exchange;
pub mod finished;
pub mod prf;
pub mod secret;

pub use exchange::PremasterExchange;
pub use secret::MasterSecret;
