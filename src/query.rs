// Search and sort over the library. Both always start from the full
// repository; results are id lists so rows stay tied to their source entry.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::library::{Library, Track, TrackId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    ReleaseDate,
    Popularity,
    Duration,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::ReleaseDate, SortKey::Popularity, SortKey::Duration];

    pub fn label(self) -> &'static str {
        match self {
            Self::ReleaseDate => "By release date",
            Self::Popularity => "By popularity",
            Self::Duration => "By duration",
        }
    }

    /// Ascending comparison; callers reverse it for descending order.
    fn compare(self, a: &Track, b: &Track) -> Ordering {
        match self {
            Self::ReleaseDate => a.album.release_date.cmp(&b.album.release_date),
            Self::Popularity => a.popularity.cmp(&b.popularity),
            Self::Duration => a.duration_ms.cmp(&b.duration_ms),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Match predicate. `query` must already be lower-cased.
pub fn matches(track: &Track, query: &str, hide_explicit: bool) -> bool {
    if hide_explicit && track.is_explicit() {
        return false;
    }

    if query.is_empty() {
        return true;
    }

    track.name.to_lowercase().contains(query)
        || track
            .primary_artist()
            .map(|a| a.name.to_lowercase().contains(query))
            .unwrap_or(false)
        || track.album.name.to_lowercase().contains(query)
}

/// Ids of every track matching `query` (case-insensitive substring against
/// name, primary artist and album), in repository order.
pub fn search(library: &Library, query: &str, hide_explicit: bool) -> Vec<TrackId> {
    let q = query.to_lowercase();

    library
        .iter()
        .filter(|(_, track)| matches(track, &q, hide_explicit))
        .map(|(id, _)| id)
        .collect()
}

/// Order `ids` descending by `key`. Ties keep their input order.
/// Ids not present in the library are dropped.
pub fn sort(library: &Library, ids: &[TrackId], key: SortKey) -> Vec<TrackId> {
    let mut rows: Vec<(TrackId, &Track)> = ids
        .iter()
        .filter_map(|&id| library.get(id).map(|t| (id, t)))
        .collect();

    // slice::sort_by is stable, and reversing the comparator keeps equal
    // elements in place.
    rows.sort_by(|(_, a), (_, b)| key.compare(b, a));

    rows.into_iter().map(|(id, _)| id).collect()
}

/// Rows the table shows: the filtered set, sorted if a key is chosen.
pub fn visible_rows(
    library: &Library,
    query: &str,
    hide_explicit: bool,
    sort_key: Option<SortKey>,
) -> Vec<TrackId> {
    let found = search(library, query, hide_explicit);
    match sort_key {
        Some(key) => sort(library, &found, key),
        None => found,
    }
}
