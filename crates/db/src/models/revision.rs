//! Article revision ledger rows.

use serde::Serialize;
use sqlx::FromRow;
use yemenpedia_core::types::{DbId, Timestamp};

/// A revision joined with its editor's public identity (if the editor
/// still exists).
#[derive(Debug, Clone, FromRow)]
pub struct RevisionRow {
    pub id: DbId,
    pub article_id: DbId,
    pub seq: i32,
    pub content: String,
    pub summary: String,
    pub editor_id: Option<DbId>,
    pub editor_username: Option<String>,
    pub editor_display_name: Option<String>,
    pub edited_at: Timestamp,
}

/// Editor identity as shown in revision history.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionEditor {
    pub id: DbId,
    pub username: String,
    pub display_name: String,
}

/// API representation of one revision.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionResponse {
    pub id: DbId,
    pub seq: i32,
    pub content: String,
    pub summary: String,
    pub editor: Option<RevisionEditor>,
    pub edited_at: Timestamp,
}

impl From<RevisionRow> for RevisionResponse {
    fn from(r: RevisionRow) -> Self {
        let editor = match (r.editor_id, r.editor_username, r.editor_display_name) {
            (Some(id), Some(username), Some(display_name)) => Some(RevisionEditor {
                id,
                username,
                display_name,
            }),
            _ => None,
        };
        Self {
            id: r.id,
            seq: r.seq,
            content: r.content,
            summary: r.summary,
            editor,
            edited_at: r.edited_at,
        }
    }
}
