//! Output formatters.
//!
//! Pure, deterministic projections of the merged channel lists into the
//! delimited-text and extended-M3U formats. No probing, no state.

use crate::channel::RankedChannel;
use crate::classify::{group_title, Category};
use crate::merge::MergedList;
use crate::source::GENRE_HEADER_SUFFIX;

/// First line of every playlist file.
pub const M3U_HEADER: &str = "#EXTM3U";

/// Renders the full delimited-text form.
///
/// One `<display>,#genre#` header per category in fixed order, one
/// `name,url` line per channel, and a blank line between categories.
/// Headers are written even for empty categories.
pub fn render_text(list: &MergedList) -> String {
    let mut out = String::new();
    for (i, category) in Category::ALL.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        push_category_text(&mut out, list, *category);
    }
    out
}

/// Renders one category in delimited-text form.
pub fn render_category_text(list: &MergedList, category: Category) -> String {
    let mut out = String::new();
    push_category_text(&mut out, list, category);
    out
}

fn push_category_text(out: &mut String, list: &MergedList, category: Category) {
    out.push_str(category.display_name());
    out.push_str(GENRE_HEADER_SUFFIX);
    out.push('\n');
    for channel in list.category(category) {
        out.push_str(&channel.name);
        out.push(',');
        out.push_str(&channel.url);
        out.push('\n');
    }
}

/// Renders the full playlist form.
///
/// A fixed header, then per channel an info line carrying the resolved
/// group title and the name, followed by the URL line.
pub fn render_m3u(list: &MergedList) -> String {
    let mut out = String::from(M3U_HEADER);
    out.push('\n');
    for (_, channel) in list.iter() {
        push_m3u_entry(&mut out, &channel.name, &channel.url);
    }
    out
}

/// Renders one category in playlist form.
pub fn render_category_m3u(list: &MergedList, category: Category) -> String {
    let mut out = String::from(M3U_HEADER);
    out.push('\n');
    for channel in list.category(category) {
        push_m3u_entry(&mut out, &channel.name, &channel.url);
    }
    out
}

fn push_m3u_entry(out: &mut String, name: &str, url: &str) {
    out.push_str(&format!(
        "#EXTINF:-1 group-title=\"{}\",{}\n{}\n",
        group_title(name),
        name,
        url
    ));
}

/// Renders the ranked results with their measured speed.
///
/// One `name,url,<speed> MB/s` line per entry; entries without a measured
/// speed render as plain `name,url`.
pub fn render_ranked(results: &[RankedChannel]) -> String {
    let mut out = String::new();
    for ranked in results {
        match ranked.speed {
            Some(speed) => out.push_str(&format!(
                "{},{},{:.3} MB/s\n",
                ranked.channel.name, ranked.channel.url, speed
            )),
            None => out.push_str(&format!("{},{}\n", ranked.channel.name, ranked.channel.url)),
        }
    }
    out
}

/// Renders a plain `name,url` list, the hand-off form between stages.
pub fn render_survivor_list(results: &[RankedChannel]) -> String {
    let mut out = String::new();
    for ranked in results {
        out.push_str(&ranked.channel.name);
        out.push(',');
        out.push_str(&ranked.channel.url);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::Channel;
    use crate::merge::{merge, MergeOptions};
    use crate::source::parse_channel_list;
    use proptest::prelude::*;

    fn sample_list() -> MergedList {
        MergedList {
            central: vec![
                Channel::new("CCTV1", "http://one"),
                Channel::new("CCTV5", "http://five"),
            ],
            satellite: vec![Channel::new("湖南卫视", "http://hn")],
            other: vec![Channel::new("凤凰中文", "http://fh")],
        }
    }

    #[test]
    fn test_render_text_layout() {
        let text = render_text(&sample_list());
        assert_eq!(
            text,
            "央视频道,#genre#\n\
             CCTV1,http://one\n\
             CCTV5,http://five\n\
             \n\
             卫视频道,#genre#\n\
             湖南卫视,http://hn\n\
             \n\
             其它,#genre#\n\
             凤凰中文,http://fh\n"
        );
    }

    #[test]
    fn test_render_text_writes_headers_for_empty_categories() {
        let text = render_text(&MergedList::default());
        assert_eq!(text, "央视频道,#genre#\n\n卫视频道,#genre#\n\n其它,#genre#\n");
    }

    #[test]
    fn test_render_m3u_layout() {
        let m3u = render_m3u(&sample_list());
        let lines: Vec<&str> = m3u.lines().collect();

        assert_eq!(lines[0], "#EXTM3U");
        assert_eq!(lines[1], "#EXTINF:-1 group-title=\"央视频道\",CCTV1");
        assert_eq!(lines[2], "http://one");
        assert_eq!(lines[5], "#EXTINF:-1 group-title=\"卫视频道\",湖南卫视");
        // Names matching no group rule fall back to the generic group
        assert_eq!(lines[7], "#EXTINF:-1 group-title=\"其他频道\",凤凰中文");
        assert_eq!(lines[8], "http://fh");
    }

    #[test]
    fn test_render_category_text_is_single_section() {
        let text = render_category_text(&sample_list(), Category::Central);
        assert_eq!(text, "央视频道,#genre#\nCCTV1,http://one\nCCTV5,http://five\n");
    }

    #[test]
    fn test_render_category_m3u_only_that_category() {
        let m3u = render_category_m3u(&sample_list(), Category::Central);
        assert!(m3u.starts_with("#EXTM3U\n"));
        assert!(m3u.contains("CCTV1"));
        assert!(!m3u.contains("湖南卫视"));
        assert!(!m3u.contains("凤凰中文"));
    }

    #[test]
    fn test_render_ranked_formats_speed() {
        let results = vec![
            RankedChannel::new(Channel::new("CCTV1", "http://a"), Some(1.23456)),
            RankedChannel::new(Channel::new("CCTV2", "http://b"), None),
        ];
        assert_eq!(
            render_ranked(&results),
            "CCTV1,http://a,1.235 MB/s\nCCTV2,http://b\n"
        );
    }

    #[test]
    fn test_render_survivor_list_round_trips() {
        let results = vec![
            RankedChannel::new(Channel::new("CCTV1", "http://a"), Some(1.0)),
            RankedChannel::new(Channel::new("湖南卫视", "http://b"), Some(2.0)),
        ];
        let text = render_survivor_list(&results);
        let parsed = parse_channel_list(&text);
        assert_eq!(
            parsed,
            vec![
                Channel::new("CCTV1", "http://a"),
                Channel::new("湖南卫视", "http://b"),
            ]
        );
    }

    fn survivor_strategy() -> impl Strategy<Value = Vec<RankedChannel>> {
        let name = prop_oneof![
            Just("CCTV1".to_string()),
            Just("CCTV5".to_string()),
            Just("湖南卫视".to_string()),
            Just("卫视测试 A".to_string()),
            Just("凤凰中文".to_string()),
        ];
        prop::collection::vec(
            (name, "[a-z0-9]{1,8}", 0.001f64..100.0).prop_map(|(name, path, speed)| {
                RankedChannel::new(Channel::new(name, format!("http://{}", path)), Some(speed))
            }),
            0..20,
        )
    }

    // **Feature: itv-curator, Property: Text Round-Trip**
    //
    // *For any* merged list, re-parsing the rendered delimited text SHALL
    // reproduce the same ordered channel sequence, with header and blank
    // lines dropped.
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_text_round_trip(survivors in survivor_strategy()) {
            let merged = merge(survivors, &MergeOptions::default());
            let text = render_text(&merged);
            let parsed = parse_channel_list(&text);

            let expected: Vec<Channel> =
                merged.iter().map(|(_, c)| c.clone()).collect();
            prop_assert_eq!(parsed, expected);
        }
    }
}
