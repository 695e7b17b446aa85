//! Classifier for channel categories and playlist groups.
//!
//! Category assignment is a pure function of the channel name: an ordered
//! list of keyword rules is evaluated against the name prefix, first match
//! wins, and names matching nothing land in the catch-all category.

use crate::channel::name_prefix;
use serde::{Deserialize, Serialize};

/// Coarse grouping of channels by name pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Central (CCTV) channels.
    Central,
    /// Provincial satellite channels.
    Satellite,
    /// Everything else.
    Other,
}

impl Category {
    /// All categories in fixed output order.
    pub const ALL: [Category; 3] = [Category::Central, Category::Satellite, Category::Other];

    /// Header name used in delimited-text output.
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Central => "央视频道",
            Category::Satellite => "卫视频道",
            Category::Other => "其它",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Ordered category rules evaluated against the name prefix; first match wins.
const CATEGORY_RULES: &[(&str, Category)] =
    &[("CCTV", Category::Central), ("卫视", Category::Satellite)];

/// Ordered playlist group-title rules evaluated against the full name.
const GROUP_RULES: &[(&str, &str)] = &[
    ("CCTV", "央视频道"),
    ("卫视", "卫视频道"),
    ("测试", "测试频道"),
];

/// Group title for names matching no rule.
pub const FALLBACK_GROUP: &str = "其他频道";

/// Assigns a channel name to its category.
pub fn classify_name(name: &str) -> Category {
    let prefix = name_prefix(name);
    for (keyword, category) in CATEGORY_RULES {
        if prefix.contains(keyword) {
            return *category;
        }
    }
    Category::Other
}

/// Resolves the playlist group title for a channel name.
pub fn group_title(name: &str) -> &'static str {
    for (keyword, group) in GROUP_RULES {
        if name.contains(keyword) {
            return group;
        }
    }
    FALLBACK_GROUP
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_classify_central() {
        assert_eq!(classify_name("CCTV1"), Category::Central);
        assert_eq!(classify_name("CCTV13 新闻"), Category::Central);
        assert_eq!(classify_name("CCTV5+ 体育赛事"), Category::Central);
    }

    #[test]
    fn test_classify_satellite() {
        assert_eq!(classify_name("湖南卫视"), Category::Satellite);
        assert_eq!(classify_name("北京卫视 1080"), Category::Satellite);
        assert_eq!(classify_name("卫视测试 A"), Category::Satellite);
        assert_eq!(classify_name("卫视测试 B"), Category::Satellite);
    }

    #[test]
    fn test_classify_other() {
        assert_eq!(classify_name("凤凰中文"), Category::Other);
        assert_eq!(classify_name(""), Category::Other);
    }

    #[test]
    fn test_keyword_outside_prefix_does_not_match() {
        // Categorization looks only at the leading token
        assert_eq!(classify_name("新闻 CCTV"), Category::Other);
    }

    #[test]
    fn test_central_rule_wins_over_satellite() {
        // First matching rule decides
        assert_eq!(classify_name("CCTV卫视"), Category::Central);
    }

    #[test]
    fn test_group_title_rules() {
        assert_eq!(group_title("CCTV1"), "央视频道");
        assert_eq!(group_title("湖南卫视"), "卫视频道");
        assert_eq!(group_title("信号测试 3"), "测试频道");
        assert_eq!(group_title("凤凰中文"), FALLBACK_GROUP);
    }

    #[test]
    fn test_group_title_checks_full_name() {
        // Unlike categories, group titles match anywhere in the name
        assert_eq!(group_title("新闻 CCTV"), "央视频道");
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Category::Central.display_name(), "央视频道");
        assert_eq!(Category::Satellite.display_name(), "卫视频道");
        assert_eq!(Category::Other.display_name(), "其它");
    }

    // **Feature: itv-curator, Property: Classification Consistency**
    //
    // *For any* name, the classifier SHALL return exactly one category,
    // deterministically; names whose prefix contains "CCTV" SHALL be Central
    // and names whose prefix contains "卫视" (without "CCTV") SHALL be
    // Satellite.
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_classification_deterministic(
            name in "[a-zA-Z0-9卫视频道测试 ]{0,24}",
        ) {
            let first = classify_name(&name);
            let second = classify_name(&name);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_cctv_prefix_is_central(
            suffix in "[0-9]{0,2}",
            tail in "[a-z 高清]{0,8}",
        ) {
            let name = format!("CCTV{}{}", suffix, tail);
            prop_assert_eq!(classify_name(&name), Category::Central);
        }

        #[test]
        fn prop_satellite_keyword_in_prefix_is_satellite(
            head in "[a-z]{0,6}",
            tail in " [a-z0-9]{0,6}",
        ) {
            let name = format!("{}卫视{}", head, tail);
            prop_assert_eq!(classify_name(&name), Category::Satellite);
        }
    }
}
