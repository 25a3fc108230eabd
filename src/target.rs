use std::net::SocketAddrV4;

use crate::error::Failure;

/// Port appended to targets given without one (discard service).
pub const DEFAULT_PORT: u16 = 9;

/// Append `default_port` when the target carries no port at all.
pub fn with_default_port(raw: &str, default_port: u16) -> String {
    if raw.contains(':') {
        raw.to_string()
    } else {
        format!("{}:{}", raw, default_port)
    }
}

/// Turn a raw target into the address to dial. Anything that is not a
/// dotted-quad IPv4 address with an optional numeric port is rejected
/// before a connection is attempted.
pub fn normalize(raw: &str, default_port: u16) -> Result<SocketAddrV4, Failure> {
    with_default_port(raw, default_port)
        .parse::<SocketAddrV4>()
        .map_err(|_| Failure::BadServer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn full_address_is_left_unchanged() {
        for raw in ["127.0.0.1:1", "10.0.0.1:22", "192.168.1.254:65535", "0.0.0.0:0"] {
            assert_eq!(with_default_port(raw, DEFAULT_PORT), raw);
            assert_eq!(normalize(raw, DEFAULT_PORT).unwrap().to_string(), raw);
        }
    }

    #[test]
    fn bare_ip_gets_default_port() {
        assert_eq!(with_default_port("127.0.0.1", DEFAULT_PORT), "127.0.0.1:9");
        let addr = normalize("10.255.255.1", DEFAULT_PORT).unwrap();
        assert_eq!(addr, SocketAddrV4::new(Ipv4Addr::new(10, 255, 255, 1), 9));
    }

    #[test]
    fn configured_default_port_is_used() {
        let addr = normalize("127.0.0.1", 7).unwrap();
        assert_eq!(addr.port(), 7);
    }

    #[test]
    fn malformed_targets_are_bad_servers() {
        for raw in [
            "",
            "localhost",
            "example.com:80",
            "127.0.0.1:",
            "127.0.0.1:http",
            "127.0.0:80",
            "1.2.3.4.5",
            "::1",
            "[::1]:80",
            "300.1.1.1:80",
            "127.0.0.1:70000",
            "127.0.0.1:80:80",
        ] {
            assert!(
                matches!(normalize(raw, DEFAULT_PORT), Err(Failure::BadServer)),
                "{raw:?} should be rejected"
            );
        }
    }
}
