//! Article lifecycle rules: status and language enums, field validation,
//! slug handling, the publish-date latch and revision capture.
//!
//! Pure functions only. The repository layer calls these inside its
//! transactions so the rules stay testable without a database.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

pub const MAX_TITLE_LEN: usize = 300;
pub const MAX_SLUG_LEN: usize = 200;
pub const MAX_SUMMARY_LEN: usize = 500;
pub const MAX_CONTENT_LEN: usize = 200_000;
pub const MAX_TAGS: usize = 30;
pub const MAX_TAG_LEN: usize = 50;

/// Characters of body text used when an article has no summary.
pub const EXCERPT_CHARS: usize = 200;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

pub const STATUS_DRAFT: &str = "draft";
pub const STATUS_PUBLISHED: &str = "published";
pub const STATUS_ARCHIVED: &str = "archived";

pub const VALID_STATUSES: &[&str] = &[STATUS_DRAFT, STATUS_PUBLISHED, STATUS_ARCHIVED];

/// Publication status. Any status may move to any other; only the
/// editor-or-above gate applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl ArticleStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ArticleStatus::Draft => STATUS_DRAFT,
            ArticleStatus::Published => STATUS_PUBLISHED,
            ArticleStatus::Archived => STATUS_ARCHIVED,
        }
    }
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArticleStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            STATUS_DRAFT => Ok(ArticleStatus::Draft),
            STATUS_PUBLISHED => Ok(ArticleStatus::Published),
            STATUS_ARCHIVED => Ok(ArticleStatus::Archived),
            other => Err(CoreError::Validation(format!(
                "حالة غير صالحة '{other}'. الحالات المتاحة: {}",
                VALID_STATUSES.join(", ")
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Language
// ---------------------------------------------------------------------------

pub const LANGUAGE_ARABIC: &str = "ar";
pub const LANGUAGE_ENGLISH: &str = "en";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ar,
    En,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Ar => LANGUAGE_ARABIC,
            Language::En => LANGUAGE_ENGLISH,
        }
    }
}

// ---------------------------------------------------------------------------
// Slugs
// ---------------------------------------------------------------------------

/// Derive a slug from a title.
///
/// Lowercases, keeps letters and digits from any script (Arabic titles
/// yield Arabic slugs), turns everything else into single hyphens and trims
/// hyphens from both ends.
pub fn generate_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut prev_hyphen = true;
    for c in title.trim().chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            slug.push(c);
            prev_hyphen = false;
        } else if !prev_hyphen {
            slug.push('-');
            prev_hyphen = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// Trim and lowercase a caller-supplied slug before validation.
pub fn normalize_slug(slug: &str) -> String {
    slug.trim().to_lowercase()
}

/// Validate a slug: non-empty, lowercase letters/digits and inner hyphens.
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if slug.is_empty() {
        return Err(CoreError::Validation("الرابط مطلوب".into()));
    }
    if slug.chars().count() > MAX_SLUG_LEN {
        return Err(CoreError::Validation(format!(
            "يجب ألا يتجاوز الرابط {MAX_SLUG_LEN} حرفاً"
        )));
    }
    let valid_chars = slug
        .chars()
        .all(|c| c == '-' || (c.is_alphanumeric() && !c.is_uppercase()));
    if !valid_chars || slug.starts_with('-') || slug.ends_with('-') {
        return Err(CoreError::Validation(
            "يجب أن يحتوي الرابط على أحرف صغيرة وأرقام وشرطات فقط".into(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Field validation
// ---------------------------------------------------------------------------

pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("العنوان مطلوب".into()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "يجب ألا يتجاوز العنوان {MAX_TITLE_LEN} حرفاً"
        )));
    }
    Ok(())
}

pub fn validate_content(content: &str) -> Result<(), CoreError> {
    if content.trim().is_empty() {
        return Err(CoreError::Validation("المحتوى مطلوب".into()));
    }
    if content.chars().count() > MAX_CONTENT_LEN {
        return Err(CoreError::Validation(format!(
            "يجب ألا يتجاوز المحتوى {MAX_CONTENT_LEN} حرف"
        )));
    }
    Ok(())
}

/// Summaries may be empty (that is how a caller clears one).
pub fn validate_summary(summary: &str) -> Result<(), CoreError> {
    if summary.chars().count() > MAX_SUMMARY_LEN {
        return Err(CoreError::Validation(format!(
            "يجب ألا يتجاوز الملخص {MAX_SUMMARY_LEN} حرف"
        )));
    }
    Ok(())
}

/// Validate tags: at most [`MAX_TAGS`], each non-blank and at most
/// [`MAX_TAG_LEN`] characters.
pub fn validate_tags(tags: &[String]) -> Result<(), CoreError> {
    if tags.len() > MAX_TAGS {
        return Err(CoreError::Validation(format!(
            "الحد الأقصى للوسوم هو {MAX_TAGS}"
        )));
    }
    for tag in tags {
        if tag.trim().is_empty() {
            return Err(CoreError::Validation("لا يمكن أن يكون الوسم فارغاً".into()));
        }
        if tag.chars().count() > MAX_TAG_LEN {
            return Err(CoreError::Validation(format!(
                "يجب ألا يتجاوز الوسم {MAX_TAG_LEN} حرفاً"
            )));
        }
    }
    Ok(())
}

/// Trim every tag and drop duplicates, keeping first occurrence order.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Publish latch
// ---------------------------------------------------------------------------

/// Compute `published_at` after a save.
///
/// The timestamp is set the first time the article is saved as published
/// and never changes afterwards, even if the article is later archived and
/// republished.
pub fn published_at_after(
    current: Option<Timestamp>,
    new_status: ArticleStatus,
    now: Timestamp,
) -> Option<Timestamp> {
    match current {
        Some(ts) => Some(ts),
        None if new_status == ArticleStatus::Published => Some(now),
        None => None,
    }
}

// ---------------------------------------------------------------------------
// Revisions
// ---------------------------------------------------------------------------

/// A revision about to be appended to an article's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionDraft {
    pub content: String,
    pub summary: String,
    pub editor_id: DbId,
    pub edited_at: Timestamp,
}

/// Decide whether an update must append a revision.
///
/// A revision is recorded only when new content is supplied and differs
/// from the stored body. It snapshots the body being replaced but carries
/// the editor and time of the update doing the replacing, and its summary
/// is always empty.
pub fn revision_for_update(
    stored_content: &str,
    incoming_content: Option<&str>,
    editor_id: DbId,
    edited_at: Timestamp,
) -> Option<RevisionDraft> {
    let incoming = incoming_content?;
    if incoming == stored_content {
        return None;
    }
    Some(RevisionDraft {
        content: stored_content.to_string(),
        summary: String::new(),
        editor_id,
        edited_at,
    })
}

// ---------------------------------------------------------------------------
// Excerpts
// ---------------------------------------------------------------------------

/// First `max_chars` characters of `text`, cut on a char boundary.
pub fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{Duration, TimeZone, Utc};

    fn at(secs: i64) -> Timestamp {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    // -- slugs --

    #[test]
    fn slug_from_english_title() {
        assert_eq!(generate_slug("History of Sana'a"), "history-of-sana-a");
        assert_eq!(generate_slug("  --Hello,   World!-- "), "hello-world");
    }

    #[test]
    fn slug_from_arabic_title_keeps_script() {
        assert_eq!(generate_slug("تاريخ صنعاء"), "تاريخ-صنعاء");
    }

    #[test]
    fn slug_validation() {
        assert!(validate_slug("sanaa-history").is_ok());
        assert!(validate_slug("تاريخ-صنعاء").is_ok());
        assert!(validate_slug("").is_err());
        assert!(validate_slug("Upper").is_err());
        assert!(validate_slug("has space").is_err());
        assert!(validate_slug("-leading").is_err());
        assert!(validate_slug("trailing-").is_err());
    }

    #[test]
    fn normalize_slug_lowercases_and_trims() {
        assert_eq!(normalize_slug("  Sanaa-History "), "sanaa-history");
    }

    // -- fields --

    #[test]
    fn title_and_content_must_not_be_blank() {
        assert_matches!(validate_title("   "), Err(CoreError::Validation(_)));
        assert_matches!(validate_content(""), Err(CoreError::Validation(_)));
        assert!(validate_title("صنعاء").is_ok());
        assert!(validate_content("<p>نص</p>").is_ok());
    }

    #[test]
    fn summary_length_counts_characters_not_bytes() {
        let arabic = "ي".repeat(MAX_SUMMARY_LEN);
        assert!(validate_summary(&arabic).is_ok());
        assert!(validate_summary(&format!("{arabic}ي")).is_err());
        assert!(validate_summary("").is_ok());
    }

    #[test]
    fn tags_limits() {
        assert!(validate_tags(&["تاريخ".into(), "yemen".into()]).is_ok());
        assert!(validate_tags(&[" ".into()]).is_err());
        let too_many: Vec<String> = (0..=MAX_TAGS).map(|i| format!("t{i}")).collect();
        assert!(validate_tags(&too_many).is_err());
    }

    #[test]
    fn normalize_tags_dedupes_after_trim() {
        let tags = vec![" a".into(), "b".into(), "a ".into()];
        assert_eq!(normalize_tags(&tags), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn status_parse() {
        assert_eq!("published".parse::<ArticleStatus>().unwrap(), ArticleStatus::Published);
        assert_matches!("pending".parse::<ArticleStatus>(), Err(CoreError::Validation(_)));
    }

    // -- publish latch --

    #[test]
    fn published_at_set_on_first_publish() {
        assert_eq!(published_at_after(None, ArticleStatus::Published, at(0)), Some(at(0)));
        assert_eq!(published_at_after(None, ArticleStatus::Draft, at(0)), None);
    }

    #[test]
    fn published_at_never_moves_once_set() {
        let first = at(0);
        let later = first + Duration::days(3);
        assert_eq!(
            published_at_after(Some(first), ArticleStatus::Published, later),
            Some(first)
        );
        assert_eq!(
            published_at_after(Some(first), ArticleStatus::Archived, later),
            Some(first)
        );
    }

    // -- revisions --

    #[test]
    fn no_revision_without_new_content() {
        assert_eq!(revision_for_update("old", None, 1, at(0)), None);
    }

    #[test]
    fn no_revision_for_identical_content() {
        assert_eq!(revision_for_update("same", Some("same"), 1, at(0)), None);
    }

    #[test]
    fn revision_snapshots_old_body_with_new_editor() {
        let rev = revision_for_update("old body", Some("new body"), 7, at(60)).unwrap();
        assert_eq!(rev.content, "old body");
        assert_eq!(rev.summary, "");
        assert_eq!(rev.editor_id, 7);
        assert_eq!(rev.edited_at, at(60));
    }

    // -- excerpt --

    #[test]
    fn excerpt_is_char_safe() {
        assert_eq!(excerpt("صنعاء القديمة", 5), "صنعاء");
        assert_eq!(excerpt("short", 200), "short");
    }
}
