//! Cross-source deduplication.
//!
//! Two records describe the same publication when they share any
//! identifier: PMID, DOI, or source-native id. Records with neither PMID nor
//! DOI are also matched to each other on their normalized title. Two copies
//! of one paper whose only shared identity is a title that one source
//! reworded will not merge; no fuzzy matching is attempted beyond title
//! normalization.

use std::cmp::Ordering;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use evidex_core::{LiteratureRecord, RecordKey, SourceId};

/// Ordered source names used to resolve conflicting metadata.
///
/// Sources not in the ranking rank below every listed source and among
/// themselves by name, so precedence is total and independent of input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePriority {
    ranking: Vec<String>,
}

impl Default for SourcePriority {
    fn default() -> Self {
        Self::new(["pubmed", "europe_pmc", "semantic_scholar", "biorxiv"])
    }
}

impl SourcePriority {
    #[must_use]
    pub fn new<I, S>(ranking: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ranking: ranking.into_iter().map(Into::into).collect(),
        }
    }

    /// Sort key of a single source name; lower sorts first.
    #[must_use]
    pub fn rank<'a>(&self, source: &'a str) -> (usize, &'a str) {
        match self.ranking.iter().position(|known| known == source) {
            Some(position) => (position, ""),
            None => (self.ranking.len(), source),
        }
    }

    /// Best rank among the sources that returned `record`.
    fn record_rank<'a>(&self, record: &'a LiteratureRecord) -> (usize, &'a str) {
        record
            .origin_sources
            .iter()
            .map(|source| self.rank(source))
            .min()
            .unwrap_or((usize::MAX, ""))
    }

    /// Precedence between two members of one group.
    ///
    /// Equal-rank members are ordered by content so the winner never depends
    /// on which batch was read first.
    fn compare(&self, a: &LiteratureRecord, b: &LiteratureRecord) -> Ordering {
        self.record_rank(a)
            .cmp(&self.record_rank(b))
            .then_with(|| content_key(a).cmp(&content_key(b)))
    }
}

type ContentKey<'a> = (
    Option<&'a str>,
    Option<&'a str>,
    Option<i32>,
    Option<&'a str>,
    &'a [String],
    Option<&'a str>,
    Option<&'a str>,
    Option<&'a str>,
    Option<&'a SourceId>,
    &'a BTreeSet<String>,
    bool,
    usize,
);

fn content_key(record: &LiteratureRecord) -> ContentKey<'_> {
    (
        record.title.as_deref(),
        record.abstract_text.as_deref(),
        record.year,
        record.journal.as_deref(),
        &record.authors,
        record.pmid.as_deref(),
        record.doi.as_deref(),
        record.full_text.as_deref(),
        record.source_id.as_ref(),
        &record.origin_sources,
        record.is_open_access,
        record.tables.len(),
    )
}

/// Merge records describing the same publication.
///
/// Metadata (title, abstract, year, journal, authors) comes from the
/// highest-priority member of each group. Identifiers, full text and tables
/// come from the highest-priority member that has them. `is_open_access` is
/// true if any member says so; `origin_sources` is the union.
///
/// The output is sorted by identity key. Records without an identity key are
/// dropped; the normalizer never produces them.
#[must_use]
pub fn deduplicate<I>(records: I, priority: &SourcePriority) -> Vec<LiteratureRecord>
where
    I: IntoIterator<Item = LiteratureRecord>,
{
    let records: Vec<LiteratureRecord> = records
        .into_iter()
        .filter(|record| {
            let identified = record.identity_key().is_some();
            if !identified {
                tracing::debug!(record = %record.label(), "dropping record without identity");
            }
            identified
        })
        .collect();
    let input = records.len();

    let links = link(&records);
    let mut groups: BTreeMap<usize, Vec<LiteratureRecord>> = BTreeMap::new();
    for (index, record) in records.into_iter().enumerate() {
        groups.entry(links.find(index)).or_default().push(record);
    }

    let mut merged: Vec<LiteratureRecord> = groups
        .into_values()
        .filter_map(|mut members| {
            members.sort_by(|a, b| priority.compare(a, b));
            let mut members = members.into_iter();
            let canonical = members.next()?;
            Some(merge_group(canonical, members))
        })
        .collect();
    merged.sort_by_cached_key(LiteratureRecord::identity_key);

    tracing::debug!(input, unique = merged.len(), "deduplicated records");
    merged
}

/// Disjoint sets over record indices.
struct Links {
    parent: Vec<usize>,
}

impl Links {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    fn find(&self, mut index: usize) -> usize {
        while self.parent[index] != index {
            index = self.parent[index];
        }
        index
    }

    /// Joins two sets under the smaller root.
    fn union(&mut self, a: usize, b: usize) {
        let (a, b) = (self.find(a), self.find(b));
        if a != b {
            self.parent[a.max(b)] = a.min(b);
        }
    }
}

/// Group records that share an identifier, then title-only records that
/// share a normalized title.
///
/// Title-only records are never joined to an identified record: the
/// identified copy's title may be replaced by a higher-priority member's
/// wording during the merge, and deduplicating the output again must not
/// change it.
fn link(records: &[LiteratureRecord]) -> Links {
    let mut links = Links::new(records.len());
    let mut holders: BTreeMap<RecordKey, usize> = BTreeMap::new();
    for (index, record) in records.iter().enumerate() {
        let identifiers = record.identifier_keys();
        let title = identifiers.is_empty().then(|| record.title_key()).flatten();
        for key in identifiers.into_iter().chain(record.source_key()).chain(title) {
            match holders.entry(key) {
                Entry::Occupied(holder) => links.union(*holder.get(), index),
                Entry::Vacant(slot) => {
                    slot.insert(index);
                }
            }
        }
    }
    links
}

/// Fold the remaining members of a group, in precedence order, into its
/// highest-priority member.
fn merge_group(
    mut canonical: LiteratureRecord,
    rest: impl Iterator<Item = LiteratureRecord>,
) -> LiteratureRecord {
    for member in rest {
        if canonical.pmid.is_none() {
            canonical.pmid = member.pmid;
        }
        if canonical.doi.is_none() {
            canonical.doi = member.doi;
        }
        if canonical.source_id.is_none() {
            canonical.source_id = member.source_id;
        }
        if canonical.full_text.is_none() {
            canonical.full_text = member.full_text;
        }
        if canonical.tables.is_empty() {
            canonical.tables = member.tables;
        }
        canonical.is_open_access |= member.is_open_access;
        canonical.origin_sources.extend(member.origin_sources);
    }
    canonical.sync_table_flag();
    canonical
}
