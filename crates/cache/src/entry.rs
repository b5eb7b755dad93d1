use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;

use oxidns_domain::{Answer, RecordData, RecordType};

/// Canonical identity of an answer: the fields that define "the same
/// record" for deduplication. TTL is deliberately excluded so that
/// re-learning a record refreshes its expiry instead of duplicating it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnswerIdentity {
    pub name: String,
    pub record_type: RecordType,
    pub data: RecordData,
}

impl AnswerIdentity {
    pub fn of(answer: &Answer) -> Self {
        Self {
            name: answer.name.clone(),
            record_type: answer.record_type(),
            data: answer.data.clone(),
        }
    }
}

/// An answer plus the absolute instant it stops being valid, computed once
/// at insertion as `now + TTL`. A non-positive TTL yields `expires_at =
/// now`, i.e. an entry that is already stale on arrival.
#[derive(Debug, Clone)]
pub struct TimedAnswer {
    pub answer: Answer,
    pub expires_at: Instant,
}

impl TimedAnswer {
    pub fn new(answer: Answer, now: Instant) -> Self {
        let ttl_secs = answer.ttl.max(0) as u64;
        Self {
            expires_at: now + Duration::from_secs(ttl_secs),
            answer,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// The value stored under one [`CacheKey`](crate::CacheKey): every
/// currently-known answer for that key, indexed by canonical identity.
///
/// The `authority` tag records which key category the entry was written
/// under; a read that finds the tag disagreeing with its key has hit a
/// corrupted entry and must evict it rather than trust it.
#[derive(Debug, Clone)]
pub struct CachedEntry {
    pub authority: bool,
    answers: FxHashMap<AnswerIdentity, TimedAnswer>,
}

impl CachedEntry {
    pub fn new(authority: bool) -> Self {
        Self {
            authority,
            answers: FxHashMap::default(),
        }
    }

    /// Insert or overwrite by canonical identity. Re-adding the same
    /// record refreshes its expiry; it never duplicates.
    pub fn upsert(&mut self, timed: TimedAnswer) {
        self.answers.insert(AnswerIdentity::of(&timed.answer), timed);
    }

    /// Drop every answer whose expiry has passed. Two passes: collect the
    /// stale identities while scanning, then remove them.
    pub fn remove_expired(&mut self, now: Instant) -> usize {
        let stale: Vec<AnswerIdentity> = self
            .answers
            .iter()
            .filter(|(_, timed)| timed.is_expired(now))
            .map(|(identity, _)| identity.clone())
            .collect();

        for identity in &stale {
            self.answers.remove(identity);
        }
        stale.len()
    }

    pub fn answers(&self) -> impl Iterator<Item = &TimedAnswer> {
        self.answers.values()
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a_record(name: &str, ttl: i64, ip: &str) -> Answer {
        Answer::new(name, ttl, RecordData::A(ip.parse().unwrap()))
    }

    #[test]
    fn test_distinct_answers_coexist() {
        let now = Instant::now();
        let mut entry = CachedEntry::new(false);
        entry.upsert(TimedAnswer::new(a_record("example.com", 300, "1.2.3.4"), now));
        entry.upsert(TimedAnswer::new(a_record("example.com", 300, "5.6.7.8"), now));
        assert_eq!(entry.len(), 2);
    }

    #[test]
    fn test_upsert_same_identity_refreshes() {
        let now = Instant::now();
        let mut entry = CachedEntry::new(false);
        entry.upsert(TimedAnswer::new(a_record("example.com", 1, "1.2.3.4"), now));
        // Same record re-learned with a longer TTL.
        entry.upsert(TimedAnswer::new(a_record("example.com", 600, "1.2.3.4"), now));

        assert_eq!(entry.len(), 1);
        let timed = entry.answers().next().unwrap();
        assert_eq!(timed.expires_at, now + Duration::from_secs(600));
    }

    #[test]
    fn test_remove_expired_is_idempotent() {
        let now = Instant::now();
        let mut entry = CachedEntry::new(false);
        entry.upsert(TimedAnswer::new(a_record("stale.example.com", 0, "1.1.1.1"), now));
        entry.upsert(TimedAnswer::new(a_record("live.example.com", 300, "2.2.2.2"), now));

        assert_eq!(entry.remove_expired(now), 1);
        assert_eq!(entry.remove_expired(now), 0);
        assert_eq!(entry.len(), 1);
    }

    #[test]
    fn test_negative_ttl_expires_immediately() {
        let now = Instant::now();
        let timed = TimedAnswer::new(a_record("example.com", -30, "1.1.1.1"), now);
        assert!(timed.is_expired(now));
    }

    #[test]
    fn test_ttl_boundary_is_exclusive() {
        let now = Instant::now();
        let timed = TimedAnswer::new(a_record("example.com", 300, "1.1.1.1"), now);
        assert!(!timed.is_expired(now));
        assert!(!timed.is_expired(now + Duration::from_secs(299)));
        assert!(timed.is_expired(now + Duration::from_secs(300)));
    }
}
