//! Mapping from storage rows to the display view-model.
//!
//! This is the only place the two shapes meet; the mapping is total.

use crate::shared::wire::MessageView;

use super::db::MessageRow;

/// Render one stored message for the given viewer. `from_me` is
/// relative to the viewer, so the same row renders differently for
/// the two ends of a private conversation.
pub fn to_view(row: &MessageRow, viewer_id: i64) -> MessageView {
    MessageView {
        id: row.message_id.to_string(),
        text: row.content.clone(),
        time: row.sent_at.format("%H:%M:%S").to_string(),
        from_me: row.sender_id == viewer_id,
        sender_name: Some(row.sender_name.clone()),
    }
}

pub fn to_views(rows: &[MessageRow], viewer_id: i64) -> Vec<MessageView> {
    rows.iter().map(|row| to_view(row, viewer_id)).collect()
}
