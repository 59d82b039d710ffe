//! Aggregator: folds usage records into a [`UnifiedReport`].

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::config::Config;
use crate::core::data::report::{rank_first_seen, sort_component_stats};
use crate::core::data::{
    CanonicalComponent, ComponentStats, CustomizationStats, OverallStats, UnifiedReport,
    UsageRecord,
};

/// Running totals for one component while records are folded in.
#[derive(Default)]
struct ComponentAccumulator {
    total_usages: usize,
    usages_by_host_codebase: BTreeMap<String, usize>,
    /// Prop counts in first-seen order.
    prop_counts: Vec<(String, usize)>,
    prop_index: HashMap<String, usize>,
    files: BTreeSet<String>,
    customization: CustomizationStats,
}

impl ComponentAccumulator {
    fn add(&mut self, record: &UsageRecord) {
        self.total_usages += 1;
        *self
            .usages_by_host_codebase
            .entry(record.host_codebase.clone())
            .or_default() += 1;
        self.files.insert(record.file_path.clone());

        for prop in &record.props {
            match self.prop_index.get(&prop.name) {
                Some(&index) => self.prop_counts[index].1 += 1,
                None => {
                    self.prop_index
                        .insert(prop.name.clone(), self.prop_counts.len());
                    self.prop_counts.push((prop.name.clone(), 1));
                }
            }
        }

        if let Some(customization) = &record.customization {
            if customization.wrapped_in_style_extension {
                self.customization.wrapped_count += 1;
            }
            if customization.has_inline_style_override {
                self.customization.override_count += 1;
            }
            for property in &customization.overridden_properties {
                *self
                    .customization
                    .overridden_property_counts
                    .entry(property.clone())
                    .or_default() += 1;
            }
        }
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

/// Aggregate usage records into a report stamped with the current time.
pub fn aggregate(
    records: Vec<UsageRecord>,
    config: &Config,
    components: &[CanonicalComponent],
    library_versions: BTreeMap<String, String>,
) -> UnifiedReport {
    aggregate_at(records, config, components, library_versions, Utc::now())
}

/// Aggregate usage records into a report.
///
/// Records whose component is not in `components` are dropped. Every
/// configured host and every host seen in `records` gets an entry in
/// `unused_components_by_host_codebase`.
pub fn aggregate_at(
    records: Vec<UsageRecord>,
    config: &Config,
    components: &[CanonicalComponent],
    library_versions: BTreeMap<String, String>,
    generated_at: DateTime<Utc>,
) -> UnifiedReport {
    let known: HashSet<&str> = components.iter().map(|c| c.name.as_str()).collect();

    let mut accumulators: HashMap<String, ComponentAccumulator> = HashMap::new();
    let mut hosts: Vec<String> = config.host_labels();
    let mut kept = Vec::with_capacity(records.len());

    for record in records {
        if !known.contains(record.component_name.as_str()) {
            debug!(
                component = %record.component_name,
                file = %record.file_path,
                "dropping usage of unknown component"
            );
            continue;
        }
        if !hosts.contains(&record.host_codebase) {
            hosts.push(record.host_codebase.clone());
        }
        accumulators
            .entry(record.component_name.clone())
            .or_default()
            .add(&record);
        kept.push(record);
    }

    let mut component_stats: Vec<ComponentStats> = accumulators
        .into_iter()
        .map(|(name, accumulator)| accumulator.finish(name))
        .collect();
    sort_component_stats(&mut component_stats);

    let unused_components = unused_components(components, &component_stats);
    let unused_components_by_host_codebase =
        unused_components_by_host(components, &component_stats, hosts);
    let overall_stats = OverallStats::compute(&component_stats, &unused_components);

    UnifiedReport {
        generated_at,
        config: config.clone(),
        library_versions_by_host_codebase: library_versions,
        component_stats,
        unused_components,
        unused_components_by_host_codebase,
        overall_stats,
        raw_usages: config.keep_raw_usages.then_some(kept),
    }
}

/// Canonical components with no usage at all, sorted by name.
pub(crate) fn unused_components(
    components: &[CanonicalComponent],
    stats: &[ComponentStats],
) -> Vec<CanonicalComponent> {
    let used: HashSet<&str> = stats.iter().map(|s| s.component_name.as_str()).collect();
    let mut unused: Vec<CanonicalComponent> = components
        .iter()
        .filter(|c| !used.contains(c.name.as_str()))
        .cloned()
        .collect();
    unused.sort();
    unused
}

fn unused_components_by_host(
    components: &[CanonicalComponent],
    stats: &[ComponentStats],
    hosts: Vec<String>,
) -> BTreeMap<String, Vec<String>> {
    hosts
        .into_iter()
        .map(|host| {
            let mut unused: Vec<String> = components
                .iter()
                .filter(|component| {
                    !stats.iter().any(|s| {
                        s.component_name == component.name
                            && s.usages_by_host_codebase.get(&host).copied().unwrap_or(0) > 0
                    })
                })
                .map(|component| component.name.clone())
                .collect();
            unused.sort();
            unused.dedup();
            (host, unused)
        })
        .collect()
}
