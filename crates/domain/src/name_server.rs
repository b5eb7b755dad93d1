use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// An upstream nameserver, identified by its socket address.
///
/// The hostname is advisory (diagnostics only); equality and cache scoping
/// go by the address, so two servers behind one name stay distinct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameServer {
    pub socket: SocketAddr,

    /// Hostname the address was learned from, when known.
    #[serde(default)]
    pub name: Option<String>,
}

impl NameServer {
    pub fn new(socket: SocketAddr) -> Self {
        Self { socket, name: None }
    }

    pub fn with_name(socket: SocketAddr, name: &str) -> Self {
        Self {
            socket,
            name: Some(name.to_string()),
        }
    }
}

impl fmt::Display for NameServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.socket)
    }
}

impl FromStr for NameServer {
    type Err = DomainError;

    /// Parse `ip:port` (e.g. "192.0.2.1:53", "[2001:db8::1]:53").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let socket = s
            .parse::<SocketAddr>()
            .map_err(|_| DomainError::InvalidNameServer(s.to_string()))?;
        Ok(Self::new(socket))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let ns: NameServer = "192.0.2.1:53".parse().unwrap();
        assert_eq!(ns.to_string(), "192.0.2.1:53");

        let ns6: NameServer = "[2001:db8::1]:53".parse().unwrap();
        assert_eq!(ns6.socket.port(), 53);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("not-an-address".parse::<NameServer>().is_err());
        assert!("192.0.2.1".parse::<NameServer>().is_err());
    }
}
