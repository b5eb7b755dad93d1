use std::net::SocketAddr;

use oxidns_domain::{NameServer, Question, RecordType};

/// What a cache entry is scoped by: the question, optionally the upstream
/// server the answer came from, and whether the entry is a zone's
/// delegation snapshot rather than an ordinary answer set.
///
/// Server-scoped entries keep answers from different (possibly
/// untrustworthy) servers apart; the scope is the server's socket address,
/// so the same address is one scope regardless of the hostname it was
/// learned from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub question: Question,
    pub name_server: Option<SocketAddr>,
    pub is_authority: bool,
}

impl CacheKey {
    /// Key for an ordinary answer entry.
    pub fn answer(question: Question, ns: Option<&NameServer>) -> Self {
        Self {
            question,
            name_server: ns.map(|n| n.socket),
            is_authority: false,
        }
    }

    /// Key for a zone's delegation snapshot. Always server-agnostic: the
    /// snapshot is the zone's current truth, whoever supplied it.
    pub fn authority(zone_layer: &str) -> Self {
        Self {
            question: Question::new(zone_layer, RecordType::NS),
            name_server: None,
            is_authority: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoping_distinguishes_servers() {
        let q = Question::new("example.com", RecordType::A);
        let ns1: NameServer = "192.0.2.1:53".parse().unwrap();
        let ns2: NameServer = "192.0.2.2:53".parse().unwrap();

        let unscoped = CacheKey::answer(q.clone(), None);
        let scoped1 = CacheKey::answer(q.clone(), Some(&ns1));
        let scoped2 = CacheKey::answer(q, Some(&ns2));

        assert_ne!(unscoped, scoped1);
        assert_ne!(scoped1, scoped2);
    }

    #[test]
    fn test_authority_key_is_distinct_from_answer_key() {
        let q = Question::new("example.com", RecordType::NS);
        let answer_key = CacheKey::answer(q, None);
        let authority_key = CacheKey::authority("example.com");

        assert_eq!(answer_key.question, authority_key.question);
        assert_ne!(answer_key, authority_key);
    }

    #[test]
    fn test_name_normalization_in_authority_key() {
        assert_eq!(
            CacheKey::authority("Example.COM."),
            CacheKey::authority("example.com")
        );
    }
}
