//! The aggregation store

use super::dedup::{DedupSet, FrequencyKey, SentimentKey};
use super::{FREQUENCY_KEY, SCHEMA_KEY, SCHEMA_VERSION, SENTIMENT_KEY};
use crate::error::{Result, SentiviewError};
use crate::storage::KeyValueStore;
use crate::types::{SentimentLabel, SentimentTally, WordCount, WordFrequencyMap};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// How a word's cumulative count grows per ingested submission
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyPolicy {
    /// +1 per submission containing the word, whatever the per-text count.
    /// Matches the data written by earlier releases.
    #[default]
    Submissions,

    /// + the per-text occurrence count reported by the service
    Occurrences,
}

impl std::fmt::Display for FrequencyPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrequencyPolicy::Submissions => write!(f, "submissions"),
            FrequencyPolicy::Occurrences => write!(f, "occurrences"),
        }
    }
}

/// Whether an ingest call changed the aggregates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    Applied,
    /// Identifier already folded in this session; nothing changed
    Duplicate,
}

/// Read-only copy of both aggregates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateSnapshot {
    pub tally: SentimentTally,
    pub frequencies: WordFrequencyMap,
}

/// Owner of the sentiment tally, the word-frequency map and the session's
/// deduplication identifiers
pub struct AggregationStore<S: KeyValueStore> {
    storage: S,
    tally: SentimentTally,
    frequencies: WordFrequencyMap,
    seen: DedupSet,
    policy: FrequencyPolicy,
}

impl<S: KeyValueStore> AggregationStore<S> {
    /// Restore aggregates from `storage` with the default frequency policy
    pub fn initialize(storage: S) -> Self {
        Self::with_policy(storage, FrequencyPolicy::default())
    }

    /// Restore aggregates from `storage`
    ///
    /// Never fails: each record that is missing or corrupt is replaced by its
    /// empty aggregate independently of the other.
    pub fn with_policy(storage: S, policy: FrequencyPolicy) -> Self {
        check_schema(&storage);

        let tally = match load_tally(&storage) {
            Ok(Some(tally)) => tally,
            Ok(None) => SentimentTally::default(),
            Err(e) => {
                warn!("{}; using empty sentiment tally", e);
                SentimentTally::default()
            }
        };

        let frequencies = match load_frequencies(&storage) {
            Ok(Some(map)) => map,
            Ok(None) => WordFrequencyMap::new(),
            Err(e) => {
                warn!("{}; using empty word frequencies", e);
                WordFrequencyMap::new()
            }
        };

        debug!(
            "Aggregates restored: tally {:?}, {} distinct words, policy {}",
            tally.as_array(),
            frequencies.len(),
            policy
        );

        Self {
            storage,
            tally,
            frequencies,
            seen: DedupSet::new(),
            policy,
        }
    }

    /// Fold one sentiment observation into the tally
    ///
    /// Keyed on `(label, source_text)`. The tally is persisted before this
    /// returns; if persisting fails the in-memory tally keeps the increment
    /// and the error is returned.
    pub fn ingest_sentiment(
        &mut self,
        label: SentimentLabel,
        source_text: &str,
    ) -> Result<IngestOutcome> {
        if !self
            .seen
            .insert_sentiment(SentimentKey::derive(label, source_text))
        {
            debug!("Skipping duplicate sentiment observation ({})", label);
            return Ok(IngestOutcome::Duplicate);
        }

        self.tally.increment(label);
        debug!("Tally now {:?}", self.tally.as_array());

        self.persist_tally()?;
        Ok(IngestOutcome::Applied)
    }

    /// Fold one text's word counts into the frequency map
    ///
    /// Keyed on `source_text` alone; the batch is merged entirely or not at
    /// all. Zero-length words are skipped. Repeated words in the batch are
    /// applied one by one, so the first inserts and later ones increment.
    pub fn ingest_word_frequency(
        &mut self,
        source_text: &str,
        counts: &[WordCount],
    ) -> Result<IngestOutcome> {
        if !self
            .seen
            .insert_frequency(FrequencyKey::derive(source_text))
        {
            debug!("Skipping duplicate word-frequency batch");
            return Ok(IngestOutcome::Duplicate);
        }

        let mut inserted = 0;
        for pair in counts {
            if pair.word.is_empty() {
                continue;
            }
            let amount = match self.policy {
                FrequencyPolicy::Submissions => 1,
                FrequencyPolicy::Occurrences => pair.count.max(1),
            };
            if self.frequencies.add(&pair.word, amount) {
                inserted += 1;
            }
        }
        debug!(
            "Merged {} words ({} new), {} distinct",
            counts.len(),
            inserted,
            self.frequencies.len()
        );

        self.persist_frequencies()?;
        Ok(IngestOutcome::Applied)
    }

    /// Copy of the current aggregates
    pub fn snapshot(&self) -> AggregateSnapshot {
        AggregateSnapshot {
            tally: self.tally,
            frequencies: self.frequencies.clone(),
        }
    }

    pub fn tally(&self) -> SentimentTally {
        self.tally
    }

    pub fn frequencies(&self) -> &WordFrequencyMap {
        &self.frequencies
    }

    pub fn policy(&self) -> FrequencyPolicy {
        self.policy
    }

    pub fn dedup(&self) -> &DedupSet {
        &self.seen
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Empty both aggregates and the session identifiers, and delete the
    /// durable records
    pub fn clear(&mut self) -> Result<()> {
        self.tally = SentimentTally::default();
        self.frequencies = WordFrequencyMap::new();
        self.seen.clear();

        self.storage.remove(SENTIMENT_KEY)?;
        self.storage.remove(FREQUENCY_KEY)?;
        self.storage.remove(SCHEMA_KEY)?;

        info!("Cleared stored aggregates");
        Ok(())
    }

    fn persist_tally(&mut self) -> Result<()> {
        let value = serde_json::to_string(&self.tally)?;
        self.storage
            .set_many(vec![(SENTIMENT_KEY, value), (SCHEMA_KEY, SCHEMA_VERSION.to_string())])
    }

    fn persist_frequencies(&mut self) -> Result<()> {
        let value = serde_json::to_string(&self.frequencies)?;
        self.storage
            .set_many(vec![(FREQUENCY_KEY, value), (SCHEMA_KEY, SCHEMA_VERSION.to_string())])
    }
}

fn corrupt(key: &str, reason: impl std::fmt::Display) -> SentiviewError {
    SentiviewError::StorageCorrupt {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn read_raw<S: KeyValueStore>(storage: &S, key: &str) -> Result<Option<String>> {
    storage.get(key).map_err(|e| corrupt(key, e))
}

fn load_tally<S: KeyValueStore>(storage: &S) -> Result<Option<SentimentTally>> {
    let Some(raw) = read_raw(storage, SENTIMENT_KEY)? else {
        return Ok(None);
    };
    let counts: [u64; 3] = serde_json::from_str(&raw).map_err(|e| corrupt(SENTIMENT_KEY, e))?;
    Ok(Some(SentimentTally(counts)))
}

fn load_frequencies<S: KeyValueStore>(storage: &S) -> Result<Option<WordFrequencyMap>> {
    let Some(raw) = read_raw(storage, FREQUENCY_KEY)? else {
        return Ok(None);
    };
    let pairs: Vec<WordCount> =
        serde_json::from_str(&raw).map_err(|e| corrupt(FREQUENCY_KEY, e))?;
    Ok(Some(WordFrequencyMap::from(pairs)))
}

fn check_schema<S: KeyValueStore>(storage: &S) {
    match read_raw(storage, SCHEMA_KEY) {
        Ok(None) => {}
        Ok(Some(raw)) => match raw.trim().parse::<u32>() {
            Ok(version) if version > SCHEMA_VERSION => warn!(
                "Stored aggregates use schema {} (this build writes {}); loading anyway",
                version, SCHEMA_VERSION
            ),
            Ok(_) => {}
            Err(_) => warn!("Unreadable schema marker {:?}; assuming {}", raw, SCHEMA_VERSION),
        },
        Err(e) => warn!("{}", e),
    }
}
