//! An SSLv3 / TLS 1.0 handshake engine.
//!
//! Messages are framed, hashed into an MD5 + SHA1 transcript and processed
//! along the negotiated protocol dialect. The typestate drivers in
//! [`handshake`] run full and resumed handshakes over in-memory flights.
//!
//! SSLv3 / TLS 1.0 握手引擎。

pub mod config;
pub mod context;
pub mod crypto;
pub mod error;
pub mod handshake;
pub mod protocol;
pub mod session;

pub use bincode;
