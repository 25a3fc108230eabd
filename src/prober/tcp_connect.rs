use std::io;
use std::net::SocketAddrV4;

use tokio::net::TcpStream;
use tokio::time::Instant;
use tracing::debug;

use crate::error::Failure;
use crate::prober::Reachability;

/// Dial `addr` once. There is no timeout here; the caller bounds the whole
/// batch instead.
pub async fn probe_tcp(addr: SocketAddrV4) -> Result<Reachability, Failure> {
    debug!("tcp connect {} started", addr);
    let start = Instant::now();
    let result = TcpStream::connect(addr).await;
    let elapsed = start.elapsed();

    match result {
        Ok(conn) => {
            drop(conn);
            debug!("tcp connect {} success: {:?}", addr, elapsed);
            Ok(Reachability::Connected)
        }
        Err(e) => classify(addr, e).inspect(|_| {
            debug!("tcp connect {} refused after {:?}, host is reachable", addr, elapsed)
        }),
    }
}

/// A refusal means the host answered, so it counts as reachable. Every other
/// connect error is a failure.
fn classify(addr: SocketAddrV4, err: io::Error) -> Result<Reachability, Failure> {
    match err.kind() {
        io::ErrorKind::ConnectionRefused => Ok(Reachability::Refused),
        _ => Err(Failure::Connect {
            addr: addr.to_string(),
            source: err,
        }),
    }
}
