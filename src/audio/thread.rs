use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::warn;

use crate::catalog::TrackId;

use super::analysis::SampleRing;
use super::sink::create_sink_at;
use super::types::{AudioCmd, AudioEvent, PlaybackError};

const TICK: Duration = Duration::from_millis(200);

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    events: Sender<AudioEvent>,
    ring: SampleRing,
) -> JoinHandle<()> {
    thread::spawn(move || {
        // The output stream is created lazily on the first Play command.
        // Opening it at startup would claim the device before the user has
        // asked for any sound; re-ensuring it later is idempotent.
        let mut stream: Option<OutputStream> = None;

        let mut sink: Option<Sink> = None;
        let mut current: Option<(TrackId, PathBuf)> = None;
        let mut paused = true;
        let mut volume: f32 = 1.0;

        // Track start time and accumulated elapsed when paused.
        let mut started_at: Option<Instant> = None;
        let mut accumulated = Duration::ZERO;

        fn ensure_stream(
            stream: &mut Option<OutputStream>,
        ) -> Result<&OutputStream, PlaybackError> {
            if stream.is_none() {
                let mut s = OutputStreamBuilder::open_default_stream()?;
                // rodio logs to stderr when OutputStream is dropped. That's
                // useful in debugging, but noisy for a TUI app.
                s.log_on_drop(false);
                *stream = Some(s);
            }
            Ok(stream.as_ref().unwrap())
        }

        loop {
            match rx.recv_timeout(TICK) {
                Ok(cmd) => match cmd {
                    AudioCmd::Play { id, path } => {
                        if let Some(s) = sink.as_ref() {
                            s.stop();
                        }
                        sink = None;

                        let built = ensure_stream(&mut stream).and_then(|stream| {
                            create_sink_at(stream, &path, Duration::ZERO, &ring)
                        });

                        match built {
                            Ok((new_sink, duration)) => {
                                new_sink.set_volume(volume);
                                new_sink.play();
                                sink = Some(new_sink);
                                current = Some((id, path));
                                paused = false;
                                started_at = Some(Instant::now());
                                accumulated = Duration::ZERO;

                                if let Some(duration) = duration {
                                    let _ = events.send(AudioEvent::DurationKnown { id, duration });
                                }
                            }
                            Err(e) => {
                                warn!(?path, error = %e, "playback start failed");
                                current = None;
                                paused = true;
                                started_at = None;
                                accumulated = Duration::ZERO;
                                let _ = events.send(AudioEvent::PlaybackFailed { id });
                            }
                        }
                    }

                    AudioCmd::Pause => {
                        if let Some(ref s) = sink {
                            if !paused {
                                s.pause();
                                if let Some(st) = started_at {
                                    accumulated += Instant::now() - st;
                                }
                                started_at = None;
                                paused = true;
                            }
                        }
                    }

                    AudioCmd::Resume => {
                        if let Some(ref s) = sink {
                            if paused {
                                s.play();
                                started_at = Some(Instant::now());
                                paused = false;
                            }
                        }
                    }

                    AudioCmd::SeekTo(position) => {
                        // Scrubbing: rebuild the sink and skip into the file.
                        let Some((id, ref path)) = current else {
                            continue;
                        };
                        if sink.is_none() {
                            continue;
                        }

                        if let Some(s) = sink.as_ref() {
                            s.stop();
                        }

                        let built = ensure_stream(&mut stream)
                            .and_then(|stream| create_sink_at(stream, path, position, &ring));

                        match built {
                            Ok((new_sink, _)) => {
                                new_sink.set_volume(volume);
                                if paused {
                                    new_sink.pause();
                                    started_at = None;
                                } else {
                                    new_sink.play();
                                    started_at = Some(Instant::now());
                                }
                                sink = Some(new_sink);
                                accumulated = position;
                                let _ = events.send(AudioEvent::Position(position));
                            }
                            Err(e) => {
                                warn!(?path, error = %e, "seek failed");
                                sink = None;
                                paused = true;
                                let _ = events.send(AudioEvent::PlaybackFailed { id });
                            }
                        }
                    }

                    AudioCmd::SetVolume(v) => {
                        volume = v;
                        if let Some(ref s) = sink {
                            s.set_volume(v);
                        }
                    }

                    AudioCmd::Quit => {
                        if let Some(ref s) = sink {
                            s.stop();
                        }
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {
                    // Periodic tick: report position and detect natural end.
                    if let Some(ref s) = sink {
                        if !paused && s.empty() {
                            if let Some((id, _)) = current {
                                let _ = events.send(AudioEvent::Ended { id });
                            }
                            // The transport decides what plays next.
                            sink = None;
                            paused = true;
                            started_at = None;
                            accumulated = Duration::ZERO;
                        } else if !paused {
                            let elapsed =
                                accumulated + started_at.map_or(Duration::ZERO, |st| st.elapsed());
                            let _ = events.send(AudioEvent::Position(elapsed));
                        }
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}
