//! Defines the states of the handshake drivers.
//!
//! These are zero-sized marker structs used to enforce the message order at
//! compile time. Each state is a point where a driver waits for the peer's
//! next flight, and only the valid transitions are exposed in the API.
//!
//! 定义握手驱动的各个状态。
//!
//! 这些是零大小的标记结构体，用于在编译时强制消息顺序。每个状态都是驱动等待对端下一批消息的位置，
//! API 中只暴露合法的状态转换。

/// The initial state of a handshake, client or server.
#[derive(Debug)]
pub struct Ready;

// --- Client States ---

/// The client has sent ClientHello.
#[derive(Debug)]
pub struct AwaitingServerHello;

/// The client has sent ClientKeyExchange and Finished on a full handshake.
#[derive(Debug)]
pub struct AwaitingServerFinished;

// --- Server States ---

/// The server has sent ServerHello through ServerHelloDone.
#[derive(Debug)]
pub struct AwaitingKeyExchange;

/// The server resumed a session and has sent its Finished first.
#[derive(Debug)]
pub struct AwaitingClientFinished;

/// The final state of a successful handshake.
#[derive(Debug)]
pub struct Established;
