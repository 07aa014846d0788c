use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::audio::{AnalysisFeed, AudioEvent, AudioPlayer, BIN_COUNT};
use crate::catalog::{CatalogHandle, Track, TrackPatch};
use crate::config;
use crate::insight::Enricher;
use crate::playlist::{self, PlaylistId, PlaylistRegistry};
use crate::transport::Transport;
use crate::ui;

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// Cursor position within the active view.
    pub selected: usize,
    /// Currently active smart playlist, if any.
    pub active_playlist: Option<PlaylistId>,
    /// Last catalog snapshot seen; identity comparison detects changes.
    last_snapshot: Arc<Vec<Track>>,
    /// Analysis feed, created on the first user-initiated playback.
    feed: Option<AnalysisFeed>,
    spectrum: [u8; BIN_COUNT],
}

impl EventLoopState {
    pub fn new(catalog: &CatalogHandle) -> Self {
        let snapshot = catalog
            .lock()
            .map(|c| c.snapshot())
            .unwrap_or_else(|_| Arc::new(Vec::new()));
        Self {
            selected: 0,
            active_playlist: None,
            last_snapshot: snapshot,
            feed: None,
            spectrum: [0; BIN_COUNT],
        }
    }

    /// The feed is built once; later plays reuse it, only the tapped source
    /// changes underneath the shared ring.
    fn ensure_feed(&mut self, player: &AudioPlayer) {
        if self.feed.is_none() {
            self.feed = Some(AnalysisFeed::new(player.sample_ring()));
        }
    }
}

/// Main terminal event loop: handles input, UI drawing and sync with the
/// audio thread. Returns `Ok(())` when shutdown is requested.
#[allow(clippy::too_many_arguments)]
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    catalog: &CatalogHandle,
    registry: &mut PlaylistRegistry,
    transport: &mut Transport,
    player: &AudioPlayer,
    enricher: Option<&Enricher>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        // Pick up catalog changes (enrichment, duration back-fill) and nudge
        // the enrichment worker whenever the snapshot identity moved.
        let snapshot = match catalog.lock() {
            Ok(c) => c.snapshot(),
            Err(_) => state.last_snapshot.clone(),
        };
        if !Arc::ptr_eq(&snapshot, &state.last_snapshot) {
            state.last_snapshot = snapshot.clone();
            if let Some(e) = enricher {
                e.notify();
            }
        }

        // The view is recomputed every tick so device events are always
        // processed against live state, never a captured closure.
        let view = playlist::active_view(&snapshot, registry, state.active_playlist);
        let view_tracks: Vec<Track> = view.iter().map(|&i| snapshot[i].clone()).collect();
        if state.selected >= view.len() {
            state.selected = view.len().saturating_sub(1);
        }

        // Drain device events before drawing.
        while let Some(ev) = player.poll_event() {
            if let AudioEvent::DurationKnown { id, duration } = ev {
                if let Ok(mut c) = catalog.lock() {
                    c.update(id, TrackPatch::duration(duration));
                }
            }
            transport.handle_event(ev, &view_tracks);
        }

        if let Some(feed) = state.feed.as_mut() {
            state.spectrum = feed.snapshot();
        }

        let playlist_name = state
            .active_playlist
            .and_then(|id| registry.get(id))
            .map(|p| p.name.clone());
        let frame_data = ui::FrameData {
            tracks: &snapshot,
            view: &view,
            selected: state.selected,
            state: transport.state(),
            playlist_name: playlist_name.as_deref(),
            spectrum: &state.spectrum,
            enriching: enricher.is_some_and(|e| e.in_flight()),
        };
        terminal.draw(|f| ui::draw(f, &frame_data, &settings.ui))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, registry, transport, player, &view_tracks, state)
                {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Handle one key press. Returns `true` when the app should quit.
fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    registry: &mut PlaylistRegistry,
    transport: &mut Transport,
    player: &AudioPlayer,
    view_tracks: &[Track],
    state: &mut EventLoopState,
) -> bool {
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('j') => {
            if state.selected + 1 < view_tracks.len() {
                state.selected += 1;
            }
        }
        KeyCode::Char('k') => {
            state.selected = state.selected.saturating_sub(1);
        }
        KeyCode::Enter => {
            state.ensure_feed(player);
            transport.select_track(view_tracks, state.selected);
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            state.ensure_feed(player);
            transport.toggle_play(view_tracks);
        }
        KeyCode::Char('l') => {
            state.ensure_feed(player);
            transport.advance(view_tracks);
        }
        KeyCode::Char('h') => {
            state.ensure_feed(player);
            transport.retreat(view_tracks);
        }
        KeyCode::Char('L') => {
            let scrub = Duration::from_secs(settings.ui.scrub_seconds);
            let target = transport.state().position.saturating_add(scrub);
            transport.seek(target);
        }
        KeyCode::Char('H') => {
            let scrub = Duration::from_secs(settings.ui.scrub_seconds);
            let target = transport.state().position.saturating_sub(scrub);
            transport.seek(target);
        }
        KeyCode::Char('r') => {
            transport.cycle_repeat();
        }
        KeyCode::Char('s') => {
            transport.toggle_shuffle();
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            let v = transport.state().volume + 0.05;
            transport.set_volume(v);
        }
        KeyCode::Char('-') => {
            let v = transport.state().volume - 0.05;
            transport.set_volume(v);
        }
        KeyCode::Char('0') => {
            state.active_playlist = None;
            state.selected = 0;
        }
        KeyCode::Char(c @ '1'..='6') => {
            if let Some(mood) = ui::mood_for_key(c as u8 - b'0') {
                let id = registry
                    .find_by_mood(mood.as_str())
                    .unwrap_or_else(|| registry.create(mood.as_str()));
                state.active_playlist = Some(id);
                state.selected = 0;
            }
        }
        _ => {}
    }

    false
}
