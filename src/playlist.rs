//! Smart playlists: saved mood criteria and the derived-view filter.
//!
//! A smart playlist is a filter, not a concrete list of tracks. The active
//! view is recomputed from (catalog snapshot, registry, active id) on every
//! read, so there is no cached state to invalidate.

use crate::catalog::Track;

/// Mood vocabulary offered when creating playlists. The filter itself
/// accepts arbitrary mood strings for forward compatibility.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Mood {
    Energetic,
    Chill,
    Melancholic,
    Focus,
    Happy,
    Dark,
}

impl Mood {
    pub const ALL: [Mood; 6] = [
        Mood::Energetic,
        Mood::Chill,
        Mood::Melancholic,
        Mood::Focus,
        Mood::Happy,
        Mood::Dark,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Energetic => "Energetic",
            Mood::Chill => "Chill",
            Mood::Melancholic => "Melancholic",
            Mood::Focus => "Focus",
            Mood::Happy => "Happy",
            Mood::Dark => "Dark",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PlaylistId(u64);

/// Filter criteria. Only mood for now; a struct so new criteria can be
/// added without touching every call site.
#[derive(Debug, Clone, Default)]
pub struct Criteria {
    pub mood: Option<String>,
}

/// A named, immutable mood filter created by user action.
#[derive(Debug, Clone)]
pub struct SmartPlaylist {
    pub id: PlaylistId,
    pub name: String,
    pub criteria: Criteria,
}

/// Ordered registry of smart playlists.
pub struct PlaylistRegistry {
    playlists: Vec<SmartPlaylist>,
    next_id: u64,
}

impl PlaylistRegistry {
    pub fn new() -> Self {
        Self {
            playlists: Vec::new(),
            next_id: 1,
        }
    }

    /// Create a `"<mood> Vibes"` playlist filtering on `mood`.
    pub fn create(&mut self, mood: &str) -> PlaylistId {
        let id = PlaylistId(self.next_id);
        self.next_id += 1;
        self.playlists.push(SmartPlaylist {
            id,
            name: format!("{mood} Vibes"),
            criteria: Criteria {
                mood: Some(mood.to_string()),
            },
        });
        id
    }

    pub fn get(&self, id: PlaylistId) -> Option<&SmartPlaylist> {
        self.playlists.iter().find(|p| p.id == id)
    }

    /// Find an existing playlist for `mood` (case-insensitive).
    pub fn find_by_mood(&self, mood: &str) -> Option<PlaylistId> {
        self.playlists
            .iter()
            .find(|p| {
                p.criteria
                    .mood
                    .as_deref()
                    .is_some_and(|m| m.eq_ignore_ascii_case(mood))
            })
            .map(|p| p.id)
    }

    /// Not exercised by the UI yet, but the registry supports deletion.
    pub fn remove(&mut self, id: PlaylistId) {
        self.playlists.retain(|p| p.id != id);
    }

    pub fn iter(&self) -> impl Iterator<Item = &SmartPlaylist> {
        self.playlists.iter()
    }
}

impl Default for PlaylistRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Indices of `tracks` visible under the active playlist.
///
/// No active id, or an id that no longer resolves, yields the full catalog.
/// Mood matching is case-insensitive; tracks without insight never match a
/// mood filter. Catalog order is preserved.
pub fn active_view(
    tracks: &[Track],
    registry: &PlaylistRegistry,
    active: Option<PlaylistId>,
) -> Vec<usize> {
    let mood = active
        .and_then(|id| registry.get(id))
        .and_then(|p| p.criteria.mood.as_deref());

    let Some(mood) = mood else {
        return (0..tracks.len()).collect();
    };

    tracks
        .iter()
        .enumerate()
        .filter(|(_, t)| {
            t.insight
                .as_ref()
                .is_some_and(|i| i.mood.eq_ignore_ascii_case(mood))
        })
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Track, TrackId};
    use crate::insight::Insight;

    fn track(title: &str, mood: Option<&str>) -> Track {
        Track {
            id: TrackId::next(),
            path: std::path::PathBuf::new(),
            title: title.into(),
            artist: None,
            album: None,
            duration: None,
            artwork: String::new(),
            insight: mood.map(|m| Insight {
                mood: m.into(),
                fact: "fact".into(),
                vibe: "#abcdef".into(),
            }),
        }
    }

    #[test]
    fn no_active_playlist_passes_catalog_through() {
        let tracks = vec![track("A", Some("Chill")), track("B", None)];
        let registry = PlaylistRegistry::new();
        assert_eq!(active_view(&tracks, &registry, None), vec![0, 1]);
    }

    #[test]
    fn unknown_playlist_id_passes_catalog_through() {
        let tracks = vec![track("A", Some("Chill"))];
        let mut registry = PlaylistRegistry::new();
        let id = registry.create("Chill");
        registry.remove(id);
        assert_eq!(active_view(&tracks, &registry, Some(id)), vec![0]);
    }

    #[test]
    fn mood_filter_excludes_unenriched_and_preserves_order() {
        // Catalog = [A(Chill), B(no insight), C(Chill)] -> view = [A, C].
        let tracks = vec![
            track("A", Some("Chill")),
            track("B", None),
            track("C", Some("Chill")),
        ];
        let mut registry = PlaylistRegistry::new();
        let id = registry.create("Chill");

        assert_eq!(active_view(&tracks, &registry, Some(id)), vec![0, 2]);
    }

    #[test]
    fn mood_matching_is_case_insensitive() {
        let tracks = vec![track("A", Some("cHiLL"))];
        let mut registry = PlaylistRegistry::new();
        let id = registry.create("Chill");

        assert_eq!(active_view(&tracks, &registry, Some(id)), vec![0]);
    }

    #[test]
    fn arbitrary_mood_strings_are_accepted() {
        let tracks = vec![track("A", Some("liminal"))];
        let mut registry = PlaylistRegistry::new();
        let id = registry.create("Liminal");

        assert_eq!(registry.get(id).unwrap().name, "Liminal Vibes");
        assert_eq!(active_view(&tracks, &registry, Some(id)), vec![0]);
    }

    #[test]
    fn find_by_mood_reuses_existing_playlist() {
        let mut registry = PlaylistRegistry::new();
        let id = registry.create("Dark");
        assert_eq!(registry.find_by_mood("dark"), Some(id));
        assert_eq!(registry.find_by_mood("Focus"), None);
    }
}
