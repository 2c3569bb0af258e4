//! Fuzzy entity resolution against the endorser registry.
//!
//! The resolver is an explicit ordered list of match tiers, each returning
//! zero, one, or many candidates. The first tier yielding exactly one wins.
//! A tier with several candidates is ambiguous: it falls through and is
//! never silently resolved.

use tracing::debug;

use endorsetrack_shared::{EndorserId, EndorserRecord, MatchResult, ResolverPolicy};

/// Leading article handled by the second tier.
const ARTICLE_PREFIX: &str = "the ";

/// The one capability consumed from the registry collaborator:
/// case-insensitive exact and prefix+suffix name lookup. Read-only.
pub trait EndorserRegistry {
    /// Entries whose name equals `name`, case-insensitively.
    fn find_exact(&self, name: &str) -> Vec<EndorserId>;

    /// Entries whose name starts with `prefix` and ends with `suffix`,
    /// case-insensitively.
    fn find_affix(&self, prefix: &str, suffix: &str) -> Vec<EndorserId>;
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Cascading matcher configured by a [`ResolverPolicy`].
#[derive(Debug, Clone)]
pub struct Resolver {
    policy: ResolverPolicy,
}

impl Resolver {
    pub fn new(policy: ResolverPolicy) -> Self {
        Self { policy }
    }

    /// Resolve a candidate name, stopping at the first tier that yields
    /// exactly one registry entry.
    pub fn resolve(&self, name: &str, registry: &dyn EndorserRegistry) -> MatchResult {
        let candidate = name.trim().to_lowercase();
        if candidate.is_empty() {
            return MatchResult::NoMatch;
        }

        type Tier = fn(&Resolver, &str, &dyn EndorserRegistry) -> Vec<EndorserId>;
        const TIERS: [(&str, Tier); 3] = [
            ("exact", Resolver::tier_exact),
            ("article", Resolver::tier_article),
            ("first-last", Resolver::tier_first_last),
        ];

        for (label, tier) in TIERS {
            let candidates = tier(self, &candidate, registry);
            match candidates.as_slice() {
                [only] => {
                    debug!(tier = label, candidate = %candidate, "resolved");
                    return MatchResult::Resolved(*only);
                }
                [] => {}
                _ => {
                    debug!(
                        tier = label,
                        candidate = %candidate,
                        count = candidates.len(),
                        "ambiguous tier, falling through"
                    );
                }
            }
        }

        MatchResult::NoMatch
    }

    /// Tier (a): exact case-insensitive match.
    fn tier_exact(&self, candidate: &str, registry: &dyn EndorserRegistry) -> Vec<EndorserId> {
        registry.find_exact(candidate)
    }

    /// Tier (b): strip a leading "the ", or prepend one.
    fn tier_article(&self, candidate: &str, registry: &dyn EndorserRegistry) -> Vec<EndorserId> {
        match candidate.strip_prefix(ARTICLE_PREFIX) {
            Some(stripped) => registry.find_exact(stripped),
            None => registry.find_exact(&format!("{ARTICLE_PREFIX}{candidate}")),
        }
    }

    /// Tier (c): last token as a suffix plus a short prefix of the first
    /// token, for person names ("jd vance" → entries `jd…vance`).
    fn tier_first_last(&self, candidate: &str, registry: &dyn EndorserRegistry) -> Vec<EndorserId> {
        if !candidate.contains(' ') {
            return Vec::new();
        }
        let mut tokens = candidate.split(' ');
        let first = tokens.next().unwrap_or("");
        let last = tokens.last().unwrap_or("");
        if last.len() < self.policy.min_last_token_len {
            return Vec::new();
        }
        let prefix: String = first
            .chars()
            .take(self.policy.first_token_prefix_len)
            .collect();
        registry.find_affix(&prefix, last)
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(ResolverPolicy::default())
    }
}

// ---------------------------------------------------------------------------
// In-memory registry snapshot
// ---------------------------------------------------------------------------

/// Registry implementation over an in-memory snapshot of endorser records.
///
/// Names are lower-cased once at construction so lookups stay allocation-free
/// on the hot path. The snapshot is read-only and safe to share across
/// concurrent imports.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    entries: Vec<(String, EndorserId)>,
}

impl InMemoryRegistry {
    pub fn new(records: impl IntoIterator<Item = EndorserRecord>) -> Self {
        Self {
            entries: records
                .into_iter()
                .map(|r| (r.name.to_lowercase(), r.id))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl EndorserRegistry for InMemoryRegistry {
    fn find_exact(&self, name: &str) -> Vec<EndorserId> {
        let needle = name.to_lowercase();
        self.entries
            .iter()
            .filter(|(stored, _)| *stored == needle)
            .map(|(_, id)| *id)
            .collect()
    }

    fn find_affix(&self, prefix: &str, suffix: &str) -> Vec<EndorserId> {
        let prefix = prefix.to_lowercase();
        let suffix = suffix.to_lowercase();
        self.entries
            .iter()
            .filter(|(stored, _)| stored.starts_with(&prefix) && stored.ends_with(&suffix))
            .map(|(_, id)| *id)
            .collect()
    }
}
