//! Merger: combines independently produced reports into one.
//!
//! Counters add up, sets are unioned, and every ranked list is recomputed
//! from the merged counts. `overallStats` is rebuilt from scratch.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::core::data::report::{rank_first_seen, sort_component_stats};
use crate::core::data::{
    CanonicalComponent, ComponentStats, CustomizationStats, OverallStats, UnifiedReport,
    UsageRecord,
};
use crate::error::{Error, Result};

/// Merge two or more reports, stamped with the current time.
///
/// `config.hostCodebases` is the union of all inputs in first-seen order.
/// Every other config field is taken from the first report.
pub fn merge(reports: &[UnifiedReport]) -> Result<UnifiedReport> {
    merge_at(reports, Utc::now())
}

pub fn merge_at(reports: &[UnifiedReport], generated_at: DateTime<Utc>) -> Result<UnifiedReport> {
    let [first, rest @ ..] = reports else {
        return Err(Error::NotEnoughReports(0));
    };
    if rest.is_empty() {
        return Err(Error::NotEnoughReports(1));
    }

    let mut state = MergeState::new(first);
    for report in rest {
        state.absorb(report);
    }
    Ok(state.finish(generated_at))
}

struct MergedComponent {
    total_usages: usize,
    usages_by_host_codebase: BTreeMap<String, usize>,
    /// Prop counts in first-seen order across inputs.
    prop_counts: Vec<(String, usize)>,
    files: BTreeSet<String>,
    customization: CustomizationStats,
}

impl MergedComponent {
    fn new() -> Self {
        Self {
            total_usages: 0,
            usages_by_host_codebase: BTreeMap::new(),
            prop_counts: Vec::new(),
            files: BTreeSet::new(),
            customization: CustomizationStats::default(),
        }
    }

    fn absorb(&mut self, stats: &ComponentStats) {
        self.total_usages += stats.total_usages;
        for (host, count) in &stats.usages_by_host_codebase {
            *self.usages_by_host_codebase.entry(host.clone()).or_default() += count;
        }
        for prop in &stats.common_props {
            match self.prop_counts.iter_mut().find(|(name, _)| *name == prop.name) {
                Some((_, count)) => *count += prop.count,
                None => self.prop_counts.push((prop.name.clone(), prop.count)),
            }
        }
        self.files.extend(stats.files.iter().cloned());
        self.customization.absorb(&stats.customization);
    }

    fn finish(self, component_name: String) -> ComponentStats {
        ComponentStats {
            component_name,
            total_usages: self.total_usages,
            usages_by_host_codebase: self.usages_by_host_codebase,
            common_props: rank_first_seen(self.prop_counts),
            files: self.files.into_iter().collect(),
            customization: self.customization,
        }
    }
}

/// Left-fold accumulator.
struct MergeState {
    config: Config,
    library_versions: BTreeMap<String, String>,
    /// Component names in first-seen order.
    order: Vec<String>,
    components: HashMap<String, MergedComponent>,
    unused: BTreeSet<CanonicalComponent>,
    unused_by_host: BTreeMap<String, BTreeSet<String>>,
    raw_usages: Option<Vec<UsageRecord>>,
}

impl MergeState {
    fn new(first: &UnifiedReport) -> Self {
        let mut state = Self {
            config: first.config.clone(),
            library_versions: BTreeMap::new(),
            order: Vec::new(),
            components: HashMap::new(),
            unused: BTreeSet::new(),
            unused_by_host: BTreeMap::new(),
            raw_usages: None,
        };
        state.config.host_codebases.clear();
        state.absorb(first);
        state
    }

    fn absorb(&mut self, report: &UnifiedReport) {
        for host in &report.config.host_codebases {
            if !self.config.host_codebases.contains(host) {
                self.config.host_codebases.push(host.clone());
            }
        }

        self.library_versions.extend(
            report
                .library_versions_by_host_codebase
                .iter()
                .map(|(host, version)| (host.clone(), version.clone())),
        );

        for stats in &report.component_stats {
            if !self.components.contains_key(&stats.component_name) {
                self.order.push(stats.component_name.clone());
            }
            self.components
                .entry(stats.component_name.clone())
                .or_insert_with(MergedComponent::new)
                .absorb(stats);
        }

        self.unused.extend(report.unused_components.iter().cloned());
        for (host, names) in &report.unused_components_by_host_codebase {
            self.unused_by_host
                .entry(host.clone())
                .or_default()
                .extend(names.iter().cloned());
        }

        if let Some(raw) = &report.raw_usages {
            self.raw_usages
                .get_or_insert_with(Vec::new)
                .extend(raw.iter().cloned());
        }
    }

    fn finish(mut self, generated_at: DateTime<Utc>) -> UnifiedReport {
        let mut component_stats: Vec<ComponentStats> = self
            .order
            .into_iter()
            .filter_map(|name| {
                let merged = self.components.remove(&name)?;
                Some(merged.finish(name))
            })
            .collect();
        sort_component_stats(&mut component_stats);

        // A component unused in one input may be used in another.
        let unused_components: Vec<CanonicalComponent> = self
            .unused
            .into_iter()
            .filter(|component| {
                !component_stats
                    .iter()
                    .any(|s| s.component_name == component.name)
            })
            .collect();

        let unused_components_by_host_codebase: BTreeMap<String, Vec<String>> = self
            .unused_by_host
            .into_iter()
            .map(|(host, names)| {
                let names: Vec<String> = names
                    .into_iter()
                    .filter(|name| {
                        !component_stats.iter().any(|s| {
                            s.component_name == *name
                                && s.usages_by_host_codebase.get(&host).copied().unwrap_or(0) > 0
                        })
                    })
                    .collect();
                (host, names)
            })
            .collect();

        let overall_stats = OverallStats::compute(&component_stats, &unused_components);

        UnifiedReport {
            generated_at,
            config: self.config,
            library_versions_by_host_codebase: self.library_versions,
            component_stats,
            unused_components,
            unused_components_by_host_codebase,
            overall_stats,
            raw_usages: self.raw_usages,
        }
    }
}
