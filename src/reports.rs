use crate::filter::Snapshot;
use crate::types::{Direction, DirectionCounts, InvitationRecord, MonthCount, RankedEntry};
use crate::util::{month_label, tokenize};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tracing::{debug, warn};

/// How months without any connection appear in the monthly series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum MonthFill {
    /// Only months that have at least one record.
    #[default]
    Sparse,
    /// Always twelve entries, January to December, absent months at zero.
    ZeroFilled,
}

/// Optional normalization applied to tokens before they are counted.
/// The default policy counts every token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordPolicy {
    pub stopwords: BTreeSet<String>,
    pub min_token_len: usize,
}

const ENGLISH_STOPWORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "an", "and", "any", "are", "as", "at", "be", "been",
    "but", "by", "can", "de", "do", "for", "from", "had", "has", "have", "he", "her", "his",
    "how", "i", "if", "in", "into", "is", "it", "its", "me", "more", "my", "no", "not", "of",
    "on", "or", "our", "out", "she", "so", "than", "that", "the", "their", "them", "then",
    "there", "these", "they", "this", "to", "up", "us", "was", "we", "were", "what", "when",
    "which", "who", "will", "with", "you", "your",
];

impl WordPolicy {
    /// Common English function words, the way a word cloud drops them.
    pub fn english() -> Self {
        Self {
            stopwords: ENGLISH_STOPWORDS.iter().map(|w| w.to_string()).collect(),
            min_token_len: 0,
        }
    }

    fn keeps(&self, token: &str) -> bool {
        token.chars().count() >= self.min_token_len && !self.stopwords.contains(token)
    }
}

pub fn count<R>(snapshot: &Snapshot<'_, R>) -> usize {
    snapshot.len()
}

/// Number of distinct keys. Keys compare exactly, case included, and a
/// blank key counts as one value of its own.
pub fn distinct_count<R, F>(snapshot: &Snapshot<'_, R>, key_of: F) -> usize
where
    F: Fn(&R) -> &str,
{
    let keys: HashSet<&str> = snapshot.iter().map(|r| key_of(r)).collect();
    keys.len()
}

/// Split invitations into incoming and outgoing. The second value is the
/// number of records whose direction was not recognized at load time.
pub fn count_by_direction(snapshot: &Snapshot<'_, InvitationRecord>) -> (DirectionCounts, usize) {
    let mut counts = DirectionCounts::default();
    let mut unrecognized = 0usize;
    for r in snapshot.iter() {
        match r.direction {
            Some(Direction::Incoming) => counts.incoming += 1,
            Some(Direction::Outgoing) => counts.outgoing += 1,
            None => unrecognized += 1,
        }
    }
    if unrecognized > 0 {
        warn!("{} invitations skipped: unrecognized direction", unrecognized);
    }
    (counts, unrecognized)
}

/// Connections per calendar month, January first.
///
/// Buckets are indexed by `month - 1`, so the output follows calendar order
/// no matter how the records or labels are ordered. Years are merged.
pub fn monthly_counts<R, F>(snapshot: &Snapshot<'_, R>, date_of: F, fill: MonthFill) -> Vec<MonthCount>
where
    F: Fn(&R) -> Option<NaiveDate>,
{
    let mut buckets = [0usize; 12];
    for date in snapshot.iter().filter_map(|r| date_of(r)) {
        buckets[date.month0() as usize] += 1;
    }

    let series: Vec<MonthCount> = buckets
        .iter()
        .enumerate()
        .map(|(idx, &count)| {
            let month = idx as u32 + 1;
            MonthCount {
                month,
                label: month_label(month),
                count,
            }
        })
        .filter(|m| fill == MonthFill::ZeroFilled || m.count > 0)
        .collect();
    debug!("Monthly series has {} buckets", series.len());
    series
}

/// Order `(key, count)` pairs by count descending, then key ascending, and
/// keep the first `n`.
pub fn rank_counts<'k, I>(counts: I, n: usize) -> Vec<RankedEntry>
where
    I: IntoIterator<Item = (&'k str, usize)>,
{
    if n == 0 {
        return Vec::new();
    }
    let mut entries: Vec<(&str, usize)> = counts.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    entries
        .into_iter()
        .take(n)
        .map(|(key, count)| RankedEntry {
            key: key.to_string(),
            count,
        })
        .collect()
}

/// The `n` most frequent non-blank keys, ties broken by key.
pub fn top_n<R, F>(snapshot: &Snapshot<'_, R>, key_of: F, n: usize) -> Vec<RankedEntry>
where
    F: Fn(&R) -> &str,
{
    let mut groups: HashMap<&str, usize> = HashMap::new();
    for key in snapshot.iter().map(|r| key_of(r)).filter(|k| !k.is_empty()) {
        *groups.entry(key).or_insert(0) += 1;
    }
    let ranked = rank_counts(groups, n);
    debug!("Top {} of {} groups ranked", ranked.len(), n);
    ranked
}

/// Token frequencies over a free-text field of every selected record.
pub fn word_frequencies<R, F>(
    snapshot: &Snapshot<'_, R>,
    text_of: F,
    policy: &WordPolicy,
) -> BTreeMap<String, usize>
where
    F: Fn(&R) -> &str,
{
    let mut freq: BTreeMap<String, usize> = BTreeMap::new();
    for record in snapshot.iter() {
        for token in tokenize(text_of(record)).filter(|t| policy.keeps(t)) {
            *freq.entry(token).or_insert(0) += 1;
        }
    }
    debug!("{} distinct tokens counted", freq.len());
    freq
}

/// The `n` most frequent tokens, ties broken lexically.
pub fn ranked_words(frequencies: &BTreeMap<String, usize>, n: usize) -> Vec<RankedEntry> {
    rank_counts(frequencies.iter().map(|(w, c)| (w.as_str(), *c)), n)
}
