//! Application runtime: wires the catalog, transport, audio worker,
//! enrichment pipeline and terminal UI together and owns the main loop.

use std::env;
use std::path::Path;
use std::sync::Arc;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::warn;

use crate::audio::AudioPlayer;
use crate::catalog::{self, Catalog, catalog_handle};
use crate::insight::{Enricher, HttpInsightClient, InsightSource, spawn_enricher};
use crate::playlist::PlaylistRegistry;
use crate::transport::Transport;

mod event_loop;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();

    let dir = env::args().nth(1).unwrap_or_else(|| {
        std::env::current_dir()
            .ok()
            .and_then(|p| p.to_str().map(|s| s.to_string()))
            .unwrap_or_else(|| "Music".to_string())
    });

    let tracks = catalog::scan(Path::new(&dir), &settings.library);
    let mut catalog = Catalog::new();
    catalog.append(tracks);
    let catalog = catalog_handle(catalog);

    let player = AudioPlayer::new();
    let mut transport = Transport::new(player.command_sender());
    let mut registry = PlaylistRegistry::new();

    let enricher = spawn_insight_worker(&settings, &catalog);

    startup::apply_playback_defaults(&mut transport, &settings);
    if let Some(e) = &enricher {
        e.notify();
    }

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = {
        let mut state = event_loop::EventLoopState::new(&catalog);
        event_loop::run(
            &mut terminal,
            &settings,
            &catalog,
            &mut registry,
            &mut transport,
            &player,
            enricher.as_ref(),
            &mut state,
        )
    };

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    player.quit();
    if let Some(e) = enricher {
        e.shutdown();
    }

    run_result
}

/// Start the enrichment worker when the insight service is enabled. An HTTP
/// client construction failure degrades the session to "no insights".
fn spawn_insight_worker(
    settings: &crate::config::Settings,
    catalog: &crate::catalog::CatalogHandle,
) -> Option<Enricher> {
    if !settings.insight.enabled {
        return None;
    }

    match HttpInsightClient::new(&settings.insight) {
        Ok(client) => {
            let source: Arc<dyn InsightSource> = Arc::new(client);
            Some(spawn_enricher(catalog.clone(), source))
        }
        Err(e) => {
            warn!(error = %e, "insight client unavailable, running without enrichment");
            None
        }
    }
}
