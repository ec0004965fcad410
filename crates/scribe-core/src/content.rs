//! Blog post quality heuristics.
//!
//! Word counts, heading counts and a few structural checks. All of them look
//! at the body only, after the front matter block has been removed.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::posts::strip_front_matter;

pub const MIN_WORD_COUNT: usize = 200;
pub const MAX_WORD_COUNT: usize = 5000;
pub const MIN_HEADING_COUNT: usize = 2;

/// Words per minute used for the reading time estimate.
const READING_WORDS_PER_MINUTE: usize = 200;

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^#{1,6}\s+.+$").expect("heading pattern is valid")
});
static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[.*?\]\(.*?\)").expect("link pattern is valid")
});
static IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!\[.*?\]\(.*?\)").expect("image pattern is valid")
});

/// Statistics about a post body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentStats {
    pub word_count: usize,
    pub heading_count: usize,
    pub paragraph_count: usize,
    pub code_blocks: usize,
    pub links: usize,
    pub images: usize,
    pub character_count: usize,
    /// Minutes, rounded down.
    pub estimated_reading_time: usize,
}

/// Count words in the body of a post.
pub fn count_words(text: &str) -> usize {
    strip_front_matter(text).split_whitespace().count()
}

/// Count markdown headings in the body of a post.
pub fn count_headings(text: &str) -> usize {
    HEADING_RE.find_iter(strip_front_matter(text)).count()
}

/// Compute statistics for a post, front matter excluded.
pub fn stats(text: &str) -> ContentStats {
    let body = strip_front_matter(text);
    let word_count = body.split_whitespace().count();

    ContentStats {
        word_count,
        heading_count: HEADING_RE.find_iter(body).count(),
        paragraph_count: body.split("\n\n").filter(|p| !p.trim().is_empty()).count(),
        code_blocks: body.matches("```").count() / 2,
        links: LINK_RE.find_iter(body).count(),
        images: IMAGE_RE.find_iter(body).count(),
        character_count: body.chars().count(),
        estimated_reading_time: word_count / READING_WORDS_PER_MINUTE,
    }
}

/// Run the quality checks and return every issue found.
///
/// An empty list means the post passed.
pub fn validate(text: &str) -> Vec<String> {
    let body = strip_front_matter(text);
    let mut issues = Vec::new();

    let words = body.split_whitespace().count();
    if words < MIN_WORD_COUNT {
        issues.push(format!(
            "Content too short: {words} words (minimum: {MIN_WORD_COUNT})"
        ));
    } else if words > MAX_WORD_COUNT {
        issues.push(format!(
            "Content too long: {words} words (maximum: {MAX_WORD_COUNT})"
        ));
    }

    let headings = HEADING_RE.find_iter(body).count();
    if headings < MIN_HEADING_COUNT {
        issues.push(format!(
            "Not enough headings: {headings} (minimum: {MIN_HEADING_COUNT})"
        ));
    }

    if body.trim().is_empty() {
        issues.push("No content found after frontmatter".to_string());
    }

    if !body.contains("```") {
        issues.push("Consider adding code examples for better technical content".to_string());
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    fn headings(n: usize) -> String {
        (1..=n).map(|i| format!("## Section {i}\n")).collect()
    }

    const CODE: &str = "```rust\nfn main() {}\n```\n";

    #[test]
    fn test_short_post_with_headings() {
        let text = format!("{}\n{}", headings(3), words(150));
        let issues = validate(&text);
        assert!(issues.iter().any(|i| i.starts_with("Content too short")));
        assert!(!issues.iter().any(|i| i.starts_with("Not enough headings")));
    }

    #[test]
    fn test_long_enough_but_one_heading() {
        let text = format!("{}\n{}", headings(1), words(300));
        let issues = validate(&text);
        assert!(issues.iter().any(|i| i.starts_with("Not enough headings: 1")));
        assert!(!issues.iter().any(|i| i.starts_with("Content too")));
    }

    #[test]
    fn test_complete_post_has_no_issues() {
        let text = format!("{}\n{}\n\n{CODE}", headings(3), words(300));
        assert!(validate(&text).is_empty(), "{:?}", validate(&text));
    }

    #[test]
    fn test_too_long() {
        let text = format!("{}\n{}\n{CODE}", headings(2), words(5001));
        let issues = validate(&text);
        assert_eq!(issues.len(), 1, "{issues:?}");
        assert!(issues[0].starts_with("Content too long"));
    }

    #[test]
    fn test_front_matter_only() {
        let issues = validate("---\ntitle: \"x\"\n---\n");
        assert!(issues.contains(&"No content found after frontmatter".to_string()));
    }

    #[test]
    fn test_front_matter_is_not_counted() {
        let text = "---\ntitle: \"one two three\"\n---\n# Heading\nfour five";
        assert_eq!(count_words(text), 4);
        assert_eq!(count_headings(text), 1);
    }

    #[test]
    fn test_stats() {
        let text = "---\ntitle: t\n---\n# Title\n\nSee [docs](https://x.dev) and ![logo](a.png).\n\n```sh\nls\n```\n";
        let s = stats(text);
        assert_eq!(s.heading_count, 1);
        assert_eq!(s.paragraph_count, 3);
        assert_eq!(s.code_blocks, 1);
        // image syntax also matches the link pattern
        assert_eq!(s.links, 2);
        assert_eq!(s.images, 1);
        assert_eq!(s.estimated_reading_time, 0);
    }
}
