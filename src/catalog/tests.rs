use std::fs;
use std::path::Path;
use std::time::Duration;

use tempfile::tempdir;

use super::*;
use crate::config::LibrarySettings;
use crate::insight::Insight;

fn t(title: &str) -> Track {
    Track {
        id: TrackId::next(),
        path: std::path::PathBuf::new(),
        title: title.into(),
        artist: None,
        album: None,
        duration: None,
        artwork: String::new(),
        insight: None,
    }
}

fn chill() -> Insight {
    Insight {
        mood: "Chill".into(),
        fact: "recorded in one take".into(),
        vibe: "#4a90d9".into(),
    }
}

#[test]
fn append_preserves_insertion_order() {
    let mut cat = Catalog::new();
    cat.append(vec![t("Alpha"), t("Beta")]);
    cat.append(vec![t("Gamma")]);

    let snap = cat.snapshot();
    let titles: Vec<&str> = snap.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Alpha", "Beta", "Gamma"]);
}

#[test]
fn update_is_noop_for_unknown_id() {
    let mut cat = Catalog::new();
    cat.append(vec![t("Alpha")]);
    let before = cat.snapshot();

    cat.update(TrackId::next(), TrackPatch::duration(Duration::from_secs(9)));

    // Unknown id must not even produce a new snapshot.
    assert!(std::sync::Arc::ptr_eq(&before, &cat.snapshot()));
}

#[test]
fn update_backfills_duration() {
    let mut cat = Catalog::new();
    let track = t("Alpha");
    let id = track.id;
    cat.append(vec![track]);

    cat.update(id, TrackPatch::duration(Duration::from_secs(181)));

    let snap = cat.snapshot();
    assert_eq!(snap[0].duration, Some(Duration::from_secs(181)));
}

#[test]
fn insight_is_written_at_most_once() {
    let mut cat = Catalog::new();
    let track = t("Alpha");
    let id = track.id;
    cat.append(vec![track]);

    cat.update(id, TrackPatch::insight(chill()));
    let second = Insight {
        mood: "Dark".into(),
        fact: "other".into(),
        vibe: "#000000".into(),
    };
    cat.update(id, TrackPatch::insight(second));

    let snap = cat.snapshot();
    assert_eq!(snap[0].insight.as_ref().unwrap().mood, "Chill");
}

#[test]
fn readers_keep_their_snapshot_across_updates() {
    let mut cat = Catalog::new();
    let track = t("Alpha");
    let id = track.id;
    cat.append(vec![track]);

    let old = cat.snapshot();
    cat.update(id, TrackPatch::duration(Duration::from_secs(10)));

    assert_eq!(old[0].duration, None);
    assert_eq!(cat.snapshot()[0].duration, Some(Duration::from_secs(10)));
}

#[test]
fn find_scans_in_insertion_order() {
    let mut cat = Catalog::new();
    let mut a = t("Alpha");
    a.insight = Some(chill());
    let b = t("Beta");
    let c = t("Gamma");
    let b_id = b.id;
    cat.append(vec![a, b, c]);

    let first_unenriched = cat.find(|t| t.insight.is_none()).unwrap();
    assert_eq!(first_unenriched.id, b_id);
}

#[test]
fn display_prefers_artist_dash_title() {
    let mut track = t("Song");
    assert_eq!(track.display(), "Song");
    track.artist = Some("  Artist  ".into());
    assert_eq!(track.display(), "Artist - Song");
}

#[test]
fn ingest_leaves_duration_unknown() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("a.mp3");
    fs::write(&file, b"not a real mp3").unwrap();

    let track = ingest_file(&file);
    assert_eq!(track.title, "a");
    assert_eq!(track.duration, None);
    assert!(track.insight.is_none());
    assert!(track.artwork.contains("a"));
}

#[test]
fn scan_filters_non_audio_and_sorts_by_display_case_insensitive() {
    let dir = tempdir().unwrap();

    fs::write(dir.path().join("b.MP3"), b"not a real mp3").unwrap();
    fs::write(dir.path().join("A.ogg"), b"not a real ogg").unwrap();
    fs::write(dir.path().join("c.txt"), b"ignore me").unwrap();

    let tracks = scan(dir.path(), &LibrarySettings::default());
    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].title, "A");
    assert_eq!(tracks[1].title, "b");
}

#[test]
fn scan_respects_non_recursive_setting() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("nested");
    fs::create_dir(&sub).unwrap();
    fs::write(dir.path().join("top.mp3"), b"x").unwrap();
    fs::write(sub.join("deep.mp3"), b"x").unwrap();

    let settings = LibrarySettings {
        recursive: false,
        ..LibrarySettings::default()
    };
    let tracks = scan(dir.path(), &settings);
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].title, "top");
}

#[test]
fn scan_can_skip_hidden_files() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".hidden.mp3"), b"x").unwrap();
    fs::write(dir.path().join("shown.mp3"), b"x").unwrap();

    let settings = LibrarySettings {
        include_hidden: false,
        ..LibrarySettings::default()
    };
    let tracks = scan(dir.path(), &settings);
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].title, "shown");
}

#[test]
fn ingest_ids_are_unique() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("a.mp3");
    fs::write(&file, b"x").unwrap();

    let one = ingest_file(Path::new(&file));
    let two = ingest_file(Path::new(&file));
    assert_ne!(one.id, two.id);
}
