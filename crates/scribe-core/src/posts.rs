//! Post file helpers: slugs, front matter and collision-free writes.
//!
//! Every file this crate writes goes through [`write_unique`], so an existing
//! post is never overwritten. On a name collision the stem gets a numbered
//! suffix (`-1`, `-2`, ...).

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::CoreError;

/// Maximum slug length in characters.
pub const MAX_SLUG_LEN: usize = 50;

/// Slug used when a topic has no usable characters.
const FALLBACK_SLUG: &str = "untitled";

/// Give up looking for a free name after this many suffixes.
const MAX_COLLISION_SUFFIX: u32 = 10_000;

static UNSAFE_CHARS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9\s-]").expect("slug pattern is valid"));
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Derive a lowercase, hyphen-separated, filesystem-safe slug from a topic.
pub fn slugify(topic: &str) -> String {
    let lowered = topic.to_lowercase();
    let cleaned = UNSAFE_CHARS_RE.replace_all(&lowered, "");
    let hyphenated = WHITESPACE_RE.replace_all(cleaned.trim(), "-");
    let slug: String = hyphenated.chars().take(MAX_SLUG_LEN).collect();

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// `{date}-{slug}` file stem for a topic.
pub fn dated_stem(date: NaiveDate, topic: &str) -> String {
    format!("{}-{}", date.format("%Y-%m-%d"), slugify(topic))
}

/// Return the body of a post, skipping a leading `---` front matter block.
///
/// Text without a closed front matter block is returned unchanged.
pub fn strip_front_matter(text: &str) -> &str {
    let mut lines = text.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return text;
    };
    if first.trim() != "---" {
        return text;
    }

    let mut offset = first.len();
    for line in lines {
        offset += line.len();
        if line.trim() == "---" {
            return &text[offset..];
        }
    }
    text
}

fn yaml_quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Front matter for a generated draft post.
pub fn draft_front_matter(topic: &str, date: NaiveDate) -> String {
    format!(
        "---\ntitle: {}\ndescription: {}\nauthor: \"AI Assistant\"\ndate: \"{}\"\ncategories: [blog, ai, guide]\n---\n\n",
        yaml_quote(topic),
        yaml_quote(&format!("A comprehensive guide to {}", topic.to_lowercase())),
        date.format("%Y-%m-%d"),
    )
}

/// Front matter for a draft saved from a writing session.
pub fn session_front_matter(topic: &str, date: NaiveDate) -> String {
    format!(
        "---\ntitle: {}\ndate: \"{}\"\ndraft: true\n---\n\n",
        yaml_quote(topic),
        date.format("%Y-%m-%d"),
    )
}

/// First `max_chars` characters of `body`, with `...` appended when cut.
pub fn preview(body: &str, max_chars: usize) -> String {
    let mut chars = body.char_indices();
    match chars.nth(max_chars) {
        Some((cut, _)) => format!("{}...", &body[..cut]).trim().to_string(),
        None => body.trim().to_string(),
    }
}

/// Write `content` to `{dir}/{stem}.{extension}`, picking `{stem}-N.{extension}`
/// when the name is taken.
///
/// The directory is created if missing. Names are reserved with a create-new
/// open, so two concurrent writers never share a file.
pub async fn write_unique(
    dir: &Path,
    stem: &str,
    extension: &str,
    content: &str,
) -> Result<PathBuf, CoreError> {
    fs::create_dir_all(dir).await?;

    for attempt in 0..=MAX_COLLISION_SUFFIX {
        let filename = if attempt == 0 {
            format!("{stem}.{extension}")
        } else {
            format!("{stem}-{attempt}.{extension}")
        };
        let path = dir.join(&filename);

        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(mut file) => {
                file.write_all(content.as_bytes()).await?;
                file.flush().await?;
                debug!(path = %path.display(), "Wrote post file");
                return Ok(path);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
            Err(e) => return Err(e.into()),
        }
    }

    Err(CoreError::Internal(format!(
        "no free filename for '{stem}.{extension}' in {}",
        dir.display()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Test Topic!!"), "test-topic");
        assert_eq!(slugify("  Rust:  async   & await "), "rust-async-await");
        assert_eq!(slugify("already-hyphenated slug"), "already-hyphenated-slug");
        assert_eq!(slugify("!!!"), "untitled");
    }

    #[test]
    fn test_slugify_truncates() {
        let slug = slugify(&"word ".repeat(30));
        assert_eq!(slug.len(), MAX_SLUG_LEN);
    }

    #[test]
    fn test_dated_stem() {
        assert_eq!(dated_stem(date(), "Test Topic!!"), "2024-03-09-test-topic");
    }

    #[test]
    fn test_strip_front_matter() {
        assert_eq!(strip_front_matter("---\ntitle: x\n---\nbody"), "body");
        assert_eq!(strip_front_matter("---  \na: b\n  ---\n\nbody\n"), "\nbody\n");
        assert_eq!(strip_front_matter("no front matter"), "no front matter");
        // unclosed blocks are left alone
        assert_eq!(strip_front_matter("---\ntitle: x\n"), "---\ntitle: x\n");
        assert_eq!(strip_front_matter(""), "");
    }

    #[test]
    fn test_front_matter_blocks() {
        let fm = draft_front_matter("Say \"Hi\"", date());
        assert!(fm.starts_with("---\ntitle: \"Say \\\"Hi\\\"\"\n"));
        assert!(fm.contains("description: \"A comprehensive guide to say \\\"hi\\\"\""));
        assert!(fm.contains("date: \"2024-03-09\""));
        assert!(fm.ends_with("---\n\n"));

        let fm = session_front_matter("Rust", date());
        assert_eq!(fm, "---\ntitle: \"Rust\"\ndate: \"2024-03-09\"\ndraft: true\n---\n\n");
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview("short\n", 200), "short");
        let long = "é".repeat(250);
        let p = preview(&long, 200);
        assert_eq!(p.chars().count(), 203);
        assert!(p.ends_with("..."));
    }

    #[tokio::test]
    async fn test_write_unique_appends_suffix() {
        let dir = tempfile::tempdir().unwrap();

        let first = write_unique(dir.path(), "2024-03-09-post", "qmd", "one")
            .await
            .unwrap();
        let second = write_unique(dir.path(), "2024-03-09-post", "qmd", "two")
            .await
            .unwrap();
        let third = write_unique(dir.path(), "2024-03-09-post", "qmd", "three")
            .await
            .unwrap();

        assert_eq!(first.file_name().unwrap(), "2024-03-09-post.qmd");
        assert_eq!(second.file_name().unwrap(), "2024-03-09-post-1.qmd");
        assert_eq!(third.file_name().unwrap(), "2024-03-09-post-2.qmd");
        assert_eq!(std::fs::read_to_string(&first).unwrap(), "one");
        assert_eq!(std::fs::read_to_string(&second).unwrap(), "two");
    }

    #[tokio::test]
    async fn test_write_unique_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("blog").join("posts");

        let path = write_unique(&nested, "a", "md", "x").await.unwrap();
        assert!(path.starts_with(&nested));
        assert!(path.exists());
    }
}
