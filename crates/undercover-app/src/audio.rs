//! Background-music lifecycle.
//!
//! An owned handle with explicit start/stop and teardown on drop, instead
//! of a module-level singleton holding a live reference. Actual decoding
//! and playback belong to the host platform and are out of scope here;
//! the handle owns the state and the logs that the old singleton hid.

use tracing::info;

#[derive(Debug)]
pub struct BackgroundMusic {
    track: String,
    playing: bool,
}

impl BackgroundMusic {
    /// Acquires the handle and starts the loop. Call once per UI
    /// lifetime, on mount.
    pub fn start(track: impl Into<String>) -> Self {
        let track = track.into();
        info!(%track, "background music started");
        Self {
            track,
            playing: true,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn stop(&mut self) {
        if self.playing {
            info!(track = %self.track, "background music stopped");
            self.playing = false;
        }
    }
}

impl Drop for BackgroundMusic {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_playing_and_stop_is_idempotent() {
        let mut music = BackgroundMusic::start("bgmusic.mp3");
        assert!(music.is_playing());
        music.stop();
        music.stop();
        assert!(!music.is_playing());
    }
}
