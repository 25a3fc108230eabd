use thiserror::Error;

/// Why a single target failed its check. `Display` is the reason printed
/// after `fail:` in the report line.
#[derive(Debug, Error)]
pub enum Failure {
    #[error("bad server, must be <ip> or <ip>:<port>")]
    BadServer,

    #[error("dial tcp {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("timeout")]
    Timeout,
}
