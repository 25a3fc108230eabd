pub mod tcp_connect;

/// How a target proved reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reachability {
    /// The TCP handshake completed.
    Connected,
    /// The host answered with a reset: nothing listens on the port, but the
    /// network path to the host works.
    Refused,
}
