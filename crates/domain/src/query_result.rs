use serde::{Deserialize, Serialize};

use crate::record::Answer;

/// Header flags of a query response, as far as the cache cares about them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseFlags {
    /// The answer came from a server authoritative for the zone.
    pub authoritative: bool,

    /// The response was truncated in transit.
    pub truncated: bool,
}

/// The result of a single query, or of a cache read.
///
/// Sections mirror a DNS response: answers, authorities (NS records of the
/// delegated zone), and additional (typically glue addresses).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryResult {
    pub answers: Vec<Answer>,
    pub authorities: Vec<Answer>,
    pub additional: Vec<Answer>,
    pub flags: ResponseFlags,

    /// The nameserver this result is scoped to, when it was obtained from
    /// (or cached for) one specific server. Display form `ip:port`.
    pub resolver: Option<String>,
}

impl QueryResult {
    /// True when no section carries any record.
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty() && self.authorities.is_empty() && self.additional.is_empty()
    }
}
