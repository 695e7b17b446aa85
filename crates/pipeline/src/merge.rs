//! Merger: deterministic ordering, grouping, and capping.
//!
//! Turns the surviving channels into per-category ordered lists. Ordering is
//! established here, never by probe completion order: given the same set of
//! survivors in any order, the merged output is identical.

use crate::channel::{name_prefix, numeric_token, Channel, RankedChannel};
use crate::classify::{classify_name, Category};
use itv_curator_config::{CapsConfig, SortConfig};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// Per-category caps on channels sharing one name prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCaps {
    pub central: usize,
    pub satellite: usize,
    pub other: usize,
}

impl CategoryCaps {
    pub fn for_category(&self, category: Category) -> usize {
        match category {
            Category::Central => self.central,
            Category::Satellite => self.satellite,
            Category::Other => self.other,
        }
    }
}

impl Default for CategoryCaps {
    fn default() -> Self {
        Self {
            central: 7,
            satellite: 7,
            other: 4,
        }
    }
}

impl From<&CapsConfig> for CategoryCaps {
    fn from(cfg: &CapsConfig) -> Self {
        Self {
            central: cfg.central,
            satellite: cfg.satellite,
            other: cfg.other,
        }
    }
}

/// Options controlling the merge ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOptions {
    /// Flagship name sorted first among same-number central ties.
    pub primary_name: String,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            primary_name: "CCTV5".to_string(),
        }
    }
}

impl From<&SortConfig> for MergeOptions {
    fn from(cfg: &SortConfig) -> Self {
        Self {
            primary_name: cfg.primary_name.clone(),
        }
    }
}

/// Category-ordered channel lists.
///
/// Within each category, entries are grouped by name prefix; the per-prefix
/// occurrence cap is enforced by [`apply_caps`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MergedList {
    pub central: Vec<Channel>,
    pub satellite: Vec<Channel>,
    pub other: Vec<Channel>,
}

impl MergedList {
    pub fn category(&self, category: Category) -> &[Channel] {
        match category {
            Category::Central => &self.central,
            Category::Satellite => &self.satellite,
            Category::Other => &self.other,
        }
    }

    /// Iterate all channels in fixed category order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &Channel)> {
        Category::ALL
            .into_iter()
            .flat_map(move |category| self.category(category).iter().map(move |c| (category, c)))
    }

    pub fn len(&self) -> usize {
        self.central.len() + self.satellite.len() + self.other.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Establishes the speed-rank order over the survivors.
///
/// Primary stable sort keys on `(name asc, speed desc)` so same-named
/// duplicates stay together with the fastest first; the url breaks exact
/// ties so the order is a total one. A second stable sort keys on the
/// numeric name token, with unnumbered names pushed to the end.
pub fn speed_rank(channels: &mut [RankedChannel]) {
    channels.sort_by(|a, b| {
        a.channel
            .name
            .cmp(&b.channel.name)
            .then_with(|| {
                b.speed
                    .partial_cmp(&a.speed)
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| a.channel.url.cmp(&b.channel.url))
    });
    channels.sort_by_key(|c| numeric_token(&c.channel.name).unwrap_or(u64::MAX));
}

/// Merges the survivors into category-ordered lists.
///
/// The survivors are speed-ranked, partitioned by category, and each
/// category is put into its final order: the central category sorts by
/// numeric token with the primary name winning ties; satellite and other
/// group by name prefix with prefixes in lexicographic order.
pub fn merge(mut survivors: Vec<RankedChannel>, options: &MergeOptions) -> MergedList {
    speed_rank(&mut survivors);

    let mut central = Vec::new();
    let mut satellite = Vec::new();
    let mut other = Vec::new();

    for ranked in survivors {
        match classify_name(&ranked.channel.name) {
            Category::Central => central.push(ranked.channel),
            Category::Satellite => satellite.push(ranked.channel),
            Category::Other => other.push(ranked.channel),
        }
    }

    order_central(&mut central, &options.primary_name);

    MergedList {
        central,
        satellite: order_by_prefix(satellite),
        other: order_by_prefix(other),
    }
}

/// Central ordering: numeric token ascending, the primary name first among
/// ties, prior speed-rank order otherwise preserved.
fn order_central(channels: &mut [Channel], primary_name: &str) {
    channels.sort_by_key(|c| {
        (
            numeric_token(&c.name).unwrap_or(u64::MAX),
            c.name != primary_name,
        )
    });
}

/// Groups channels by name prefix and concatenates groups in lexicographic
/// prefix order, preserving each group's internal order.
fn order_by_prefix(channels: Vec<Channel>) -> Vec<Channel> {
    let mut groups: BTreeMap<String, Vec<Channel>> = BTreeMap::new();
    for channel in channels {
        groups
            .entry(name_prefix(&channel.name).to_string())
            .or_default()
            .push(channel);
    }
    groups.into_values().flatten().collect()
}

/// Enforces the per-prefix occurrence cap within each category.
///
/// Keeps the first `cap` occurrences of each name prefix in order; the
/// order itself is untouched.
pub fn apply_caps(list: &MergedList, caps: &CategoryCaps) -> MergedList {
    MergedList {
        central: cap_category(&list.central, caps.central),
        satellite: cap_category(&list.satellite, caps.satellite),
        other: cap_category(&list.other, caps.other),
    }
}

fn cap_category(channels: &[Channel], cap: usize) -> Vec<Channel> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut kept = Vec::new();
    for channel in channels {
        let count = counts.entry(name_prefix(&channel.name)).or_insert(0);
        *count += 1;
        if *count <= cap {
            kept.push(channel.clone());
        }
    }
    kept
}
