//! Source list parsing.
//!
//! Reads delimited channel lists of the form `name,url`, one per line.
//! The parse is tolerant, not a validation pass: malformed lines are skipped
//! silently, and category header lines from previously produced files
//! (`<display>,#genre#`) are recognized and dropped rather than parsed as
//! channels.

use crate::channel::Channel;
use std::path::Path;
use thiserror::Error;

/// Suffix marking a category header line in delimited-text files.
pub const GENRE_HEADER_SUFFIX: &str = ",#genre#";

/// Error type for source list reading.
#[derive(Debug, Error)]
pub enum SourceError {
    /// IO error reading the source file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Parses a channel list from text.
///
/// A line produces a channel iff it contains exactly one comma and is not a
/// `,#genre#` header. Name and url fields are whitespace-trimmed. Everything
/// else (blank lines, missing comma, extra commas) is skipped.
pub fn parse_channel_list(content: &str) -> Vec<Channel> {
    content.lines().filter_map(parse_channel_line).collect()
}

/// Parses a single line into a channel, if it is one.
pub fn parse_channel_line(line: &str) -> Option<Channel> {
    let line = line.trim();
    if line.is_empty() || line.ends_with(GENRE_HEADER_SUFFIX) {
        return None;
    }
    if line.matches(',').count() != 1 {
        return None;
    }
    let (name, url) = line.split_once(',')?;
    let name = name.trim();
    let url = url.trim();
    if name.is_empty() || url.is_empty() {
        return None;
    }
    Some(Channel::new(name, url))
}

/// Reads and parses a channel list file.
///
/// Legacy lists are not always UTF-8; the bytes are decoded as UTF-8 first,
/// then GBK, then lossy UTF-8 as a last resort.
pub fn read_channel_list<P: AsRef<Path>>(path: P) -> Result<Vec<Channel>, SourceError> {
    let bytes = std::fs::read(path)?;
    Ok(parse_channel_list(&decode_text(&bytes)))
}

/// Decodes raw file bytes with a UTF-8 -> GBK -> lossy fallback chain.
pub fn decode_text(bytes: &[u8]) -> String {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return text.to_string();
    }
    let (decoded, _, had_errors) = encoding_rs::GBK.decode(bytes);
    if !had_errors {
        return decoded.into_owned();
    }
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_lines() {
        let content = "CCTV1,http://a\nCCTV2,http://b\n";
        let channels = parse_channel_list(content);
        assert_eq!(
            channels,
            vec![
                Channel::new("CCTV1", "http://a"),
                Channel::new("CCTV2", "http://b"),
            ]
        );
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let channels = parse_channel_list("  CCTV1 , http://a  \n");
        assert_eq!(channels, vec![Channel::new("CCTV1", "http://a")]);
    }

    #[test]
    fn test_parse_skips_malformed_lines() {
        let content = "no comma here\nCCTV1,http://a\ntoo,many,commas\n\n,\nname,\n,url\n";
        let channels = parse_channel_list(content);
        assert_eq!(channels, vec![Channel::new("CCTV1", "http://a")]);
    }

    #[test]
    fn test_parse_skips_genre_headers() {
        let content = "央视频道,#genre#\nCCTV1,http://a\n\n卫视频道,#genre#\n湖南卫视,http://b\n";
        let channels = parse_channel_list(content);
        assert_eq!(
            channels,
            vec![
                Channel::new("CCTV1", "http://a"),
                Channel::new("湖南卫视", "http://b"),
            ]
        );
    }

    #[test]
    fn test_decode_utf8() {
        let text = "湖南卫视,http://b\n";
        assert_eq!(decode_text(text.as_bytes()), text);
    }

    #[test]
    fn test_decode_gbk_fallback() {
        // "央视" encoded as GBK is not valid UTF-8
        let (gbk_bytes, _, _) = encoding_rs::GBK.encode("央视,http://a");
        assert!(std::str::from_utf8(&gbk_bytes).is_err());
        assert_eq!(decode_text(&gbk_bytes), "央视,http://a");
    }

    #[test]
    fn test_read_channel_list_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "CCTV1,http://a\nbad line\nCCTV2,http://b\n").unwrap();

        let channels = read_channel_list(file.path()).unwrap();
        assert_eq!(
            channels,
            vec![
                Channel::new("CCTV1", "http://a"),
                Channel::new("CCTV2", "http://b"),
            ]
        );
    }

    // **Feature: itv-curator, Property: Tolerant Line Parsing**
    //
    // *For any* name without commas and url without commas, the rendered line
    // parses back to the same channel; lines with zero or multiple commas
    // never produce a channel.
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_single_comma_lines_round_trip(
            name in "[a-zA-Z0-9卫视 ]{1,20}",
            url in "[a-z0-9:/._-]{1,40}",
        ) {
            prop_assume!(!name.trim().is_empty());
            prop_assume!(!url.trim().is_empty());

            let line = format!("{},{}", name, url);
            let parsed = parse_channel_line(&line);

            prop_assert_eq!(
                parsed,
                Some(Channel::new(name.trim(), url.trim()))
            );
        }

        #[test]
        fn prop_multi_comma_lines_are_skipped(
            a in "[a-zA-Z0-9]{1,10}",
            b in "[a-zA-Z0-9]{1,10}",
            c in "[a-zA-Z0-9]{1,10}",
        ) {
            let line = format!("{},{},{}", a, b, c);
            prop_assert_eq!(parse_channel_line(&line), None);
        }

        #[test]
        fn prop_commaless_lines_are_skipped(
            line in "[a-zA-Z0-9 ]{0,30}",
        ) {
            prop_assert_eq!(parse_channel_line(&line), None);
        }
    }
}
