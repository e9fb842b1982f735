//! Acceptability predicates for primary-source responses.
//!
//! Collections and artists are judged by different rules; the two are kept
//! separate on purpose and must not be merged.

use serde_json::Value;

/// Whether a primary response is usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Fallback,
}

impl Verdict {
    pub fn is_accept(self) -> bool {
        self == Verdict::Accept
    }
}

/// Keys under which the primary API lists a collection's tracks.
pub const COLLECTION_LIST_KEYS: [&str; 3] = ["list", "songs", "topSongs"];

/// Album/playlist rule: a non-empty list under any known key, unless the
/// response declares `list_count == "0"`.
pub fn collection_verdict(body: &Value) -> Verdict {
    if body.get("list_count").and_then(Value::as_str) == Some("0") {
        return Verdict::Fallback;
    }

    if COLLECTION_LIST_KEYS
        .iter()
        .any(|key| non_empty_array(body.get(key)))
    {
        Verdict::Accept
    } else {
        Verdict::Fallback
    }
}

/// Artist rule: `topSongs` holds at least one entry.
pub fn artist_verdict(body: &Value) -> Verdict {
    if non_empty_array(body.get("topSongs")) {
        Verdict::Accept
    } else {
        Verdict::Fallback
    }
}

/// Song rule: `songs` holds at least one entry.
pub fn song_verdict(body: &Value) -> Verdict {
    let accept = match body.get("songs") {
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(fields)) => !fields.is_empty(),
        _ => false,
    };
    if accept {
        Verdict::Accept
    } else {
        Verdict::Fallback
    }
}

fn non_empty_array(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Array(items)) if !items.is_empty())
}
