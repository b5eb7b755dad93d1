use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, warn};

use oxidns_domain::{name_is_beneath, Answer, NameServer, Question, QueryResult, RecordType};

use crate::config::{CacheConfig, CacheConfigError};
use crate::entry::{CachedEntry, TimedAnswer};
use crate::key::CacheKey;
use crate::stats::CacheStatistics;
use crate::store::ShardedStore;

/// Which response section a record came from. Diagnostic only; the
/// poisoning check is identical for all three.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Answer,
    Authority,
    Additional,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Answer => "answer",
            Section::Authority => "authority",
            Section::Additional => "additional",
        }
    }
}

/// Policy-enforcing front end over the sharded store, shared by every
/// resolution worker.
///
/// Constructed once at resolver setup and referenced by workers for the
/// resolver's lifetime. All operations are synchronous and only ever block
/// briefly on an in-memory shard lock; a cold or fully evicted cache never
/// prevents resolution, it only makes it slower.
pub struct Cache {
    store: ShardedStore<CacheKey, CachedEntry>,
    stats: Arc<CacheStatistics>,
}

impl Cache {
    pub fn new(config: CacheConfig) -> Result<Self, CacheConfigError> {
        config.validate()?;
        let shard_count = config.effective_shard_count();

        info!(
            capacity = config.capacity,
            shard_count = shard_count,
            capture_statistics = config.capture_statistics,
            "Initializing resolver cache"
        );

        Ok(Self {
            store: ShardedStore::new(config.capacity, shard_count),
            stats: Arc::new(CacheStatistics::new(config.capture_statistics)),
        })
    }

    /// Handle to the shared counters, for reporting at shutdown.
    pub fn stats(&self) -> Arc<CacheStatistics> {
        Arc::clone(&self.stats)
    }

    /// Only record types that can shorten a future delegation walk are
    /// admitted. Caching leaf types (TXT, MX, ...) unboundedly would spend
    /// capacity on entries that never help iteration.
    fn is_cacheable(record_type: RecordType) -> bool {
        matches!(
            record_type,
            RecordType::A
                | RecordType::AAAA
                | RecordType::NS
                | RecordType::CNAME
                | RecordType::DNAME
        )
    }

    /// Insert one answer under its question's key, scoped to `ns` when the
    /// answer is only trusted from that server.
    pub fn add_cached_answer(&self, answer: Answer, ns: Option<&NameServer>, depth: usize) {
        let record_type = answer.record_type();
        if !Self::is_cacheable(record_type) {
            debug!(
                depth = depth,
                name = %answer.name,
                record_type = %record_type,
                "Skipping record type that cannot help future iteration"
            );
            return;
        }

        let question = answer.question();
        let key = CacheKey::answer(question.clone(), ns);
        let timed = TimedAnswer::new(answer, Instant::now());

        let mut shard = self.store.lock(&key);
        if matches!(shard.get_no_move(&key), Some(existing) if existing.authority != key.is_authority)
        {
            error!(
                question = %question,
                "Corrupt cache entry: stored category does not match key; evicting"
            );
            shard.remove(&key);
        }
        // Read without promoting recency: the insert below promotes the
        // entry anyway.
        let mut entry = shard
            .get_no_move(&key)
            .cloned()
            .unwrap_or_else(|| CachedEntry::new(key.is_authority));
        entry.upsert(timed);

        if let Some((evicted_key, _)) = shard.insert(key, entry) {
            self.stats.increment_evictions();
            debug!(evicted = ?evicted_key.question, "Evicted entry to make room");
        }
        drop(shard);

        self.stats.increment_adds();
        debug!(depth = depth + 1, question = %question, "Upserted cached answer");
    }

    /// Look up the answers cached for `question`, dropping any that have
    /// expired. An entry whose answers have all expired reads as a miss.
    pub fn get_cached_result(
        &self,
        question: &Question,
        ns: Option<&NameServer>,
        depth: usize,
    ) -> Option<QueryResult> {
        let key = CacheKey::answer(question.clone(), ns);
        match ns {
            Some(ns) => debug!(depth = depth + 1, question = %question, ns = %ns, "Cache request"),
            None => debug!(depth = depth + 1, question = %question, "Cache request"),
        }

        let mut shard = self.store.lock(&key);
        if matches!(shard.get_no_move(&key), Some(existing) if existing.authority != key.is_authority)
        {
            error!(
                question = %question,
                "Corrupt cache entry: stored category does not match key; evicting"
            );
            shard.remove(&key);
            drop(shard);
            self.stats.increment_misses();
            return None;
        }

        let answers: Vec<Answer> = match shard.get_mut(&key) {
            Some(entry) => {
                let expired = entry.remove_expired(Instant::now());
                if expired > 0 {
                    debug!(
                        depth = depth + 2,
                        question = %question,
                        expired = expired,
                        "Expired cache entries"
                    );
                }
                entry.answers().map(|timed| timed.answer.clone()).collect()
            }
            None => {
                self.stats.increment_misses();
                debug!(depth = depth + 2, question = %question, "No entry found in cache");
                return None;
            }
        };
        drop(shard);

        if answers.is_empty() {
            self.stats.increment_misses();
            debug!(
                depth = depth + 2,
                question = %question,
                "No entry found in cache after expiration"
            );
            return None;
        }

        self.stats.increment_hits();
        debug!(depth = depth + 2, question = %question, count = answers.len(), "Cache hit");
        Some(QueryResult {
            answers,
            resolver: ns.map(|n| n.to_string()),
            ..QueryResult::default()
        })
    }

    /// Poison guard in front of [`Cache::add_cached_answer`]: the answer's
    /// owner name must sit at or below `zone_layer`, the zone currently
    /// being delegated from. Anything else is off-path and dropped.
    pub fn safe_add_cached_answer(
        &self,
        answer: Answer,
        ns: Option<&NameServer>,
        zone_layer: &str,
        kind: Section,
        depth: usize,
    ) {
        if !name_is_beneath(&answer.name, zone_layer) {
            warn!(
                depth = depth,
                kind = kind.as_str(),
                name = %answer.name,
                record_type = %answer.record_type(),
                zone_layer = zone_layer,
                "Detected poison record; dropping"
            );
            return;
        }
        self.add_cached_answer(answer, ns, depth);
    }

    /// Replace the delegation snapshot for `zone_layer` with the NS and
    /// glue records of `result`. The previous snapshot is discarded
    /// wholesale so records from two different delegation responses are
    /// never mixed.
    pub fn safe_add_layer_name_servers(
        &self,
        zone_layer: &str,
        result: &QueryResult,
        ns: Option<&NameServer>,
        depth: usize,
        _include_non_authoritative: bool,
    ) {
        let now = Instant::now();
        let mut entry = CachedEntry::new(true);

        for answer in result.authorities.iter().chain(result.additional.iter()) {
            match answer.record_type() {
                RecordType::NS | RecordType::A | RecordType::AAAA => {
                    entry.upsert(TimedAnswer::new(answer.clone(), now));
                }
                record_type => {
                    info!(
                        depth = depth,
                        zone_layer = zone_layer,
                        name = %answer.name,
                        record_type = %record_type,
                        "Ignoring unexpected record type in delegation snapshot"
                    );
                }
            }
        }

        let key = CacheKey::authority(zone_layer);
        let mut shard = self.store.lock(&key);
        if let Some((evicted_key, _)) = shard.insert(key, entry) {
            self.stats.increment_evictions();
            debug!(evicted = ?evicted_key.question, "Evicted entry to make room");
        }
        drop(shard);

        self.stats.increment_adds();
        match ns {
            Some(ns) => {
                debug!(depth = depth, zone_layer = zone_layer, ns = %ns, "Replaced delegation snapshot")
            }
            None => debug!(depth = depth, zone_layer = zone_layer, "Replaced delegation snapshot"),
        }
    }

    /// Current delegation snapshot for `zone_layer`: surviving NS records
    /// in `authorities`, glue addresses in `additional`.
    pub fn get_layer_name_servers(&self, zone_layer: &str) -> Option<QueryResult> {
        let key = CacheKey::authority(zone_layer);

        let mut shard = self.store.lock(&key);
        if matches!(shard.get_no_move(&key), Some(existing) if !existing.authority) {
            error!(
                zone_layer = zone_layer,
                "Corrupt cache entry: answer entry stored under authority key; evicting"
            );
            shard.remove(&key);
            drop(shard);
            self.stats.increment_misses();
            return None;
        }

        let mut authorities = Vec::new();
        let mut additional = Vec::new();
        match shard.get_mut(&key) {
            Some(entry) => {
                entry.remove_expired(Instant::now());
                for timed in entry.answers() {
                    match timed.answer.record_type() {
                        RecordType::NS => authorities.push(timed.answer.clone()),
                        RecordType::A | RecordType::AAAA => additional.push(timed.answer.clone()),
                        record_type => {
                            info!(
                                zone_layer = zone_layer,
                                name = %timed.answer.name,
                                record_type = %record_type,
                                "Ignoring unexpected record type in delegation snapshot"
                            );
                        }
                    }
                }
            }
            None => {
                self.stats.increment_misses();
                return None;
            }
        }
        drop(shard);

        if authorities.is_empty() && additional.is_empty() {
            self.stats.increment_misses();
            return None;
        }

        self.stats.increment_hits();
        Some(QueryResult {
            authorities,
            additional,
            ..QueryResult::default()
        })
    }

    /// Ingest a full query response after every resolution step.
    ///
    /// Authority and Additional records are always run through the poison
    /// guard. Answer-section records are cached only when the response was
    /// authoritative, or when the caller explicitly opted in; answers from
    /// non-authoritative servers are untrusted by default.
    pub fn cache_update(
        &self,
        zone_layer: &str,
        result: &QueryResult,
        ns: Option<&NameServer>,
        depth: usize,
        include_non_authoritative: bool,
    ) {
        for answer in &result.additional {
            self.safe_add_cached_answer(answer.clone(), ns, zone_layer, Section::Additional, depth);
        }
        for answer in &result.authorities {
            self.safe_add_cached_answer(answer.clone(), ns, zone_layer, Section::Authority, depth);
        }
        if result.flags.authoritative || include_non_authoritative {
            for answer in &result.answers {
                self.safe_add_cached_answer(answer.clone(), ns, zone_layer, Section::Answer, depth);
            }
        }
    }
}
