// Track repository: payload model, stable ids, detail extraction.

use serde::Deserialize;

/// Stable row identifier: the entry's index in the repository at load time.
pub type TrackId = usize;

// ─────────────────────────────────────────────────────────────────────────────
//  Payload model
// ─────────────────────────────────────────────────────────────────────────────

/// One element of the remote JSON array.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackEntry {
    pub track: Track,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Track {
    pub name: String,
    pub artists: Vec<Artist>,
    pub album: Album,
    pub duration_ms: u64,
    pub popularity: i64,
    /// Absent or `null` in the payload means not explicit.
    #[serde(default)]
    pub explicit: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Artist {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Album {
    pub name: String,
    /// Usually `YYYY-MM-DD`; compared as a plain string.
    pub release_date: String,
    #[serde(default)]
    pub images: Vec<AlbumImage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlbumImage {
    pub url: String,
}

impl Track {
    pub fn is_explicit(&self) -> bool {
        self.explicit.unwrap_or(false)
    }

    pub fn primary_artist(&self) -> Option<&Artist> {
        self.artists.first()
    }

    /// Artist names joined the way the table shows them.
    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn cover_url(&self) -> Option<&str> {
        self.album.images.first().map(|i| i.url.as_str())
    }

    pub fn format_duration(&self) -> String {
        format_duration(self.duration_ms)
    }
}

/// `M:SS`, minutes unpadded.
pub fn format_duration(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{}:{:02}", secs / 60, secs % 60)
}

// ─────────────────────────────────────────────────────────────────────────────
//  Library
// ─────────────────────────────────────────────────────────────────────────────

/// The fetched track list. Built once per successful load and only read
/// afterwards; ids are positions in `entries`.
#[derive(Debug, Clone, Default)]
pub struct Library {
    entries: Vec<TrackEntry>,
}

impl Library {
    pub fn new(entries: Vec<TrackEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: TrackId) -> Option<&Track> {
        self.entries.get(id).map(|e| &e.track)
    }

    /// All tracks with their ids, in load order.
    pub fn iter(&self) -> impl Iterator<Item = (TrackId, &Track)> {
        self.entries.iter().map(|e| &e.track).enumerate()
    }
}

/// Find a track by the text shown in a table row.
///
/// First match wins, so two tracks sharing both name and artist string are
/// indistinguishable here. The UI keys rows by [`TrackId`] instead and never
/// calls this; it stays as the lookup the table tests check rendered rows
/// against.
#[cfg_attr(not(test), allow(dead_code))]
pub fn resolve_displayed<'a>(
    library: &'a Library,
    displayed_name: &str,
    displayed_artists: &str,
) -> Option<&'a Track> {
    library
        .iter()
        .map(|(_, t)| t)
        .find(|t| t.name == displayed_name && t.artist_names() == displayed_artists)
}

// ─────────────────────────────────────────────────────────────────────────────
//  Detail view
// ─────────────────────────────────────────────────────────────────────────────

/// Everything the detail pane renders for one track.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackDetails {
    pub name: String,
    pub artists: String,
    pub album: String,
    pub duration: String,
    pub popularity: i64,
    pub release_date: String,
    pub explicit: &'static str,
    pub cover_url: Option<String>,
}

impl TrackDetails {
    pub fn from_track(track: &Track) -> Self {
        Self {
            name: track.name.clone(),
            artists: track.artist_names(),
            album: track.album.name.clone(),
            duration: track.format_duration(),
            popularity: track.popularity,
            release_date: track.album.release_date.clone(),
            explicit: if track.is_explicit() { "Yes" } else { "No" },
            cover_url: track.cover_url().map(str::to_string),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Parse a raw payload the way the fetch layer does.
    fn parse(json: &str) -> Result<Library, serde_json::Error> {
        serde_json::from_str::<Vec<TrackEntry>>(json).map(Library::new)
    }

    /// Build an entry without going through JSON.
    pub(crate) fn entry(
        name: &str,
        artists: &[&str],
        album: &str,
        release_date: &str,
        duration_ms: u64,
        popularity: i64,
        explicit: bool,
    ) -> TrackEntry {
        TrackEntry {
            track: Track {
                name: name.to_string(),
                artists: artists
                    .iter()
                    .map(|a| Artist {
                        name: a.to_string(),
                    })
                    .collect(),
                album: Album {
                    name: album.to_string(),
                    release_date: release_date.to_string(),
                    images: Vec::new(),
                },
                duration_ms,
                popularity,
                explicit: Some(explicit),
            },
        }
    }

    const PAYLOAD: &str = r#"[
        {
            "added_at": "2024-01-01T00:00:00Z",
            "track": {
                "name": "Blinding Lights",
                "artists": [{ "name": "The Weeknd", "id": "1" }],
                "album": {
                    "name": "After Hours",
                    "release_date": "2020-03-20",
                    "images": [
                        { "url": "https://img.example/640.jpg", "width": 640 },
                        { "url": "https://img.example/300.jpg", "width": 300 }
                    ]
                },
                "duration_ms": 200040,
                "popularity": 91,
                "explicit": false
            }
        },
        {
            "track": {
                "name": "HUMBLE.",
                "artists": [{ "name": "Kendrick Lamar" }],
                "album": { "name": "DAMN.", "release_date": "2017-04-14", "images": [] },
                "duration_ms": 177000,
                "popularity": 84,
                "explicit": true
            }
        },
        {
            "track": {
                "name": "Untitled",
                "artists": [{ "name": "A" }, { "name": "B" }],
                "album": { "name": "Demo", "release_date": "2001" },
                "duration_ms": 0,
                "popularity": 0,
                "explicit": null
            }
        }
    ]"#;

    #[test]
    fn test_parse_payload() {
        let lib = parse(PAYLOAD).unwrap();
        assert_eq!(lib.len(), 3);

        let first = lib.get(0).unwrap();
        assert_eq!(first.name, "Blinding Lights");
        assert_eq!(first.cover_url(), Some("https://img.example/640.jpg"));
        assert!(!first.is_explicit());

        assert!(lib.get(1).unwrap().is_explicit());

        let third = lib.get(2).unwrap();
        assert!(!third.is_explicit());
        assert!(third.album.images.is_empty());
        assert_eq!(third.artist_names(), "A, B");

        assert!(lib.get(3).is_none());
    }

    #[test]
    fn test_missing_explicit_is_false() {
        let json = r#"[{"track": {"name": "x", "artists": [{"name": "y"}],
            "album": {"name": "z", "release_date": "2000-01-01", "images": []},
            "duration_ms": 1, "popularity": 1}}]"#;
        let lib = parse(json).unwrap();
        assert!(!lib.get(0).unwrap().is_explicit());
    }

    #[test]
    fn test_rejects_non_array_payload() {
        assert!(parse(r#"{"track": {}}"#).is_err());
        assert!(parse("not json").is_err());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(999), "0:00");
        assert_eq!(format_duration(65_000), "1:05");
        assert_eq!(format_duration(200_040), "3:20");
        assert_eq!(format_duration(3_600_000), "60:00");
        assert_eq!(format_duration(6_000_000), "100:00");
    }

    #[test]
    fn test_details() {
        let lib = parse(PAYLOAD).unwrap();

        let d = TrackDetails::from_track(lib.get(0).unwrap());
        assert_eq!(d.artists, "The Weeknd");
        assert_eq!(d.album, "After Hours");
        assert_eq!(d.duration, "3:20");
        assert_eq!(d.popularity, 91);
        assert_eq!(d.release_date, "2020-03-20");
        assert_eq!(d.explicit, "No");
        assert_eq!(d.cover_url.as_deref(), Some("https://img.example/640.jpg"));

        let d = TrackDetails::from_track(lib.get(1).unwrap());
        assert_eq!(d.explicit, "Yes");
        assert_eq!(d.cover_url, None);
    }

    #[test]
    fn test_resolve_displayed_first_match_wins() {
        let lib = Library::new(vec![
            entry("Song", &["A", "B"], "First", "2000-01-01", 1000, 1, false),
            entry("Song", &["A"], "Second", "2000-01-01", 1000, 1, false),
            entry("Song", &["A", "B"], "Third", "2000-01-01", 1000, 1, false),
        ]);

        let hit = resolve_displayed(&lib, "Song", "A, B").unwrap();
        assert_eq!(hit.album.name, "First");

        let hit = resolve_displayed(&lib, "Song", "A").unwrap();
        assert_eq!(hit.album.name, "Second");

        assert!(resolve_displayed(&lib, "Song", "B").is_none());
        assert!(resolve_displayed(&lib, "song", "A").is_none());
    }

    #[test]
    fn test_empty_artists_do_not_panic() {
        let mut e = entry("Solo", &[], "Alb", "2000-01-01", 1000, 1, false);
        e.track.artists.clear();
        assert!(e.track.primary_artist().is_none());
        assert_eq!(e.track.artist_names(), "");
    }
}
