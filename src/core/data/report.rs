use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CanonicalComponent, UsageRecord};
use crate::config::Config;

/// Number of entries kept in every ranked list.
pub const TOP_LIMIT: usize = 10;

/// Sentinel recorded when an optional lookup (e.g. a library version) fails.
pub const NOT_FOUND: &str = "not found";

/// A name with an occurrence count, used by all ranked lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedCount {
    pub name: String,
    pub count: usize,
}

impl NamedCount {
    pub fn new(name: impl Into<String>, count: usize) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

/// Rank `(name, count)` pairs by descending count, truncated to [`TOP_LIMIT`].
///
/// The sort is stable, so ties keep the order of `counts`. Callers pass
/// pairs in first-seen order.
pub fn rank_first_seen(counts: Vec<(String, usize)>) -> Vec<NamedCount> {
    let mut ranked: Vec<NamedCount> = counts
        .into_iter()
        .map(|(name, count)| NamedCount { name, count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(TOP_LIMIT);
    ranked
}

/// Rank by descending count, ties broken by name.
fn rank_by_name(counts: impl IntoIterator<Item = (String, usize)>) -> Vec<NamedCount> {
    let mut ranked: Vec<NamedCount> = counts
        .into_iter()
        .map(|(name, count)| NamedCount { name, count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    ranked.truncate(TOP_LIMIT);
    ranked
}

/// Customization counters for one component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomizationStats {
    pub wrapped_count: usize,
    pub override_count: usize,
    #[serde(default)]
    pub overridden_property_counts: BTreeMap<String, usize>,
}

impl CustomizationStats {
    /// Add another set of counters key by key.
    pub fn absorb(&mut self, other: &CustomizationStats) {
        self.wrapped_count += other.wrapped_count;
        self.override_count += other.override_count;
        for (property, count) in &other.overridden_property_counts {
            *self
                .overridden_property_counts
                .entry(property.clone())
                .or_default() += count;
        }
    }
}

/// Statistics for one canonical component.
///
/// Always derived from usage records (or from other stats by the merger);
/// never edited in place by consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentStats {
    pub component_name: String,
    pub total_usages: usize,
    pub usages_by_host_codebase: BTreeMap<String, usize>,
    /// Most frequent attribute names, at most [`TOP_LIMIT`].
    pub common_props: Vec<NamedCount>,
    /// Files containing at least one usage, sorted.
    pub files: Vec<String>,
    pub customization: CustomizationStats,
}

/// Report-wide summary. A pure function of `componentStats` and `unusedComponents`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallStats {
    pub total_usages: usize,
    pub components_used: usize,
    pub top_components: Vec<NamedCount>,
    pub top_props: Vec<NamedCount>,
    pub usages_by_host_codebase: BTreeMap<String, usize>,
    pub unused_count: usize,
}

impl OverallStats {
    pub fn compute(stats: &[ComponentStats], unused: &[CanonicalComponent]) -> Self {
        let mut usages_by_host_codebase: BTreeMap<String, usize> = BTreeMap::new();
        let mut prop_totals: HashMap<&str, usize> = HashMap::new();

        for component in stats {
            for (host, count) in &component.usages_by_host_codebase {
                *usages_by_host_codebase.entry(host.clone()).or_default() += count;
            }
            for prop in &component.common_props {
                *prop_totals.entry(prop.name.as_str()).or_default() += prop.count;
            }
        }

        Self {
            total_usages: stats.iter().map(|s| s.total_usages).sum(),
            components_used: stats.len(),
            top_components: rank_by_name(
                stats
                    .iter()
                    .map(|s| (s.component_name.clone(), s.total_usages)),
            ),
            top_props: rank_by_name(
                prop_totals
                    .into_iter()
                    .map(|(name, count)| (name.to_string(), count)),
            ),
            usages_by_host_codebase,
            unused_count: unused.len(),
        }
    }
}

/// The output of one analysis run, or of a merge of several.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedReport {
    pub generated_at: DateTime<Utc>,
    pub config: Config,
    #[serde(default)]
    pub library_versions_by_host_codebase: BTreeMap<String, String>,
    pub component_stats: Vec<ComponentStats>,
    pub unused_components: Vec<CanonicalComponent>,
    #[serde(default)]
    pub unused_components_by_host_codebase: BTreeMap<String, Vec<String>>,
    pub overall_stats: OverallStats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_usages: Option<Vec<UsageRecord>>,
}

impl UnifiedReport {
    pub fn component(&self, name: &str) -> Option<&ComponentStats> {
        self.component_stats
            .iter()
            .find(|stats| stats.component_name == name)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Order component stats by usage, most used first, ties by name.
pub fn sort_component_stats(stats: &mut [ComponentStats]) {
    stats.sort_by(|a, b| {
        b.total_usages
            .cmp(&a.total_usages)
            .then_with(|| a.component_name.cmp(&b.component_name))
    });
}
