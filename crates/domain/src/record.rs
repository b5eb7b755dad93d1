use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::name::normalize_name;
use crate::question::Question;

/// DNS record types the resolver understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordType {
    A,
    AAAA,
    NS,
    CNAME,
    DNAME,
    MX,
    TXT,
    PTR,
    SOA,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::AAAA => "AAAA",
            RecordType::NS => "NS",
            RecordType::CNAME => "CNAME",
            RecordType::DNAME => "DNAME",
            RecordType::MX => "MX",
            RecordType::TXT => "TXT",
            RecordType::PTR => "PTR",
            RecordType::SOA => "SOA",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_uppercase().as_str() {
            "A" => RecordType::A,
            "AAAA" => RecordType::AAAA,
            "NS" => RecordType::NS,
            "CNAME" => RecordType::CNAME,
            "DNAME" => RecordType::DNAME,
            "MX" => RecordType::MX,
            "TXT" => RecordType::TXT,
            "PTR" => RecordType::PTR,
            "SOA" => RecordType::SOA,
            other => return Err(DomainError::InvalidRecordType(other.to_string())),
        })
    }
}

/// Type-specific record data as a closed tagged union.
///
/// Discriminated once when a response is parsed, so a stored answer can
/// never turn out to be an unrecognized shape later.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordData {
    A(Ipv4Addr),
    Aaaa(Ipv6Addr),
    Ns(String),
    Cname(String),
    Dname(String),
    Mx { preference: u16, exchange: String },
    Txt(String),
    Ptr(String),
}

impl RecordData {
    pub fn record_type(&self) -> RecordType {
        match self {
            RecordData::A(_) => RecordType::A,
            RecordData::Aaaa(_) => RecordType::AAAA,
            RecordData::Ns(_) => RecordType::NS,
            RecordData::Cname(_) => RecordType::CNAME,
            RecordData::Dname(_) => RecordType::DNAME,
            RecordData::Mx { .. } => RecordType::MX,
            RecordData::Txt(_) => RecordType::TXT,
            RecordData::Ptr(_) => RecordType::PTR,
        }
    }
}

/// A single DNS resource record obtained from a query response.
///
/// TTL is signed so that a non-positive TTL (already expired at receipt)
/// stays representable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Answer {
    /// Owner name, normalized (lowercase, no trailing dot).
    pub name: String,

    /// Remaining time-to-live in seconds at the moment of receipt.
    pub ttl: i64,

    /// Type-specific payload; also determines the record type.
    pub data: RecordData,
}

impl Answer {
    pub fn new(name: &str, ttl: i64, data: RecordData) -> Self {
        Self {
            name: normalize_name(name),
            ttl,
            data,
        }
    }

    pub fn record_type(&self) -> RecordType {
        self.data.record_type()
    }

    /// The question this answer responds to.
    pub fn question(&self) -> Question {
        Question::new(&self.name, self.record_type())
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {:?}", self.name, self.record_type(), self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_type_round_trip() {
        for s in ["A", "AAAA", "NS", "CNAME", "DNAME", "MX", "TXT", "PTR", "SOA"] {
            let rt: RecordType = s.parse().unwrap();
            assert_eq!(rt.as_str(), s);
        }
        assert!("SPF".parse::<RecordType>().is_err());
    }

    #[test]
    fn test_data_determines_type() {
        let a = Answer::new("Example.COM.", 300, RecordData::A("1.2.3.4".parse().unwrap()));
        assert_eq!(a.record_type(), RecordType::A);
        assert_eq!(a.name, "example.com");
        assert_eq!(a.question(), Question::new("example.com", RecordType::A));
    }

    #[test]
    fn test_negative_ttl_representable() {
        let a = Answer::new("example.com", -5, RecordData::Ns("ns1.example.com".into()));
        assert!(a.ttl < 0);
    }
}
