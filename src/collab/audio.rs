// File: src/collab/audio.rs
use std::process::{Child, Command, Stdio};

const WORD_PLACEHOLDER: &str = "{word}";

/// Pronounces a headword. Fire-and-forget: implementations must not block
/// until playback ends, and starting a word stops whatever was playing.
pub trait AudioPlayer {
    fn play(&mut self, word: &str);
}

impl<T: AudioPlayer + ?Sized> AudioPlayer for Box<T> {
    fn play(&mut self, word: &str) {
        (**self).play(word);
    }
}

pub fn pronunciation_url(template: &str, word: &str) -> String {
    template.replace(WORD_PLACEHOLDER, &urlencoding::encode(word))
}

/// Hands the pronunciation URL to an external program (`mpv`, `ffplay`, ...).
pub struct CommandPlayer {
    program: String,
    args: Vec<String>,
    url_template: String,
    active: Option<Child>,
}

impl CommandPlayer {
    pub fn new(program: impl Into<String>, args: Vec<String>, url_template: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args,
            url_template: url_template.into(),
            active: None,
        }
    }

    /// Kills and reaps the previous playback if it is still running.
    pub fn stop(&mut self) {
        let Some(mut child) = self.active.take() else {
            return;
        };
        if let Ok(Some(_)) = child.try_wait() {
            return;
        }
        if let Err(e) = child.kill() {
            tracing::debug!(error = %e, "Player already gone");
        }
        if let Err(e) = child.wait() {
            tracing::debug!(error = %e, "Could not reap player");
        }
    }

    pub fn is_active(&mut self) -> bool {
        match self.active.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }
}

impl AudioPlayer for CommandPlayer {
    fn play(&mut self, word: &str) {
        self.stop();
        let url = pronunciation_url(&self.url_template, word);
        let spawned = Command::new(&self.program)
            .args(&self.args)
            .arg(&url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        match spawned {
            Ok(child) => {
                tracing::debug!(word, %url, pid = child.id(), "Started playback");
                self.active = Some(child);
            }
            Err(e) => tracing::warn!(program = %self.program, error = %e, "Could not start audio player"),
        }
    }
}

impl Drop for CommandPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Logs what would have been played.
pub struct SilentPlayer {
    url_template: String,
}

impl SilentPlayer {
    pub fn new(url_template: impl Into<String>) -> Self {
        Self { url_template: url_template.into() }
    }
}

impl AudioPlayer for SilentPlayer {
    fn play(&mut self, word: &str) {
        let url = pronunciation_url(&self.url_template, word);
        tracing::debug!(word, %url, "Playback skipped, no player configured");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_AUDIO_URL_TEMPLATE;

    #[test]
    fn test_pronunciation_url_encodes_word() {
        assert_eq!(
            pronunciation_url(DEFAULT_AUDIO_URL_TEMPLATE, "ice cream"),
            "https://dict.youdao.com/dictvoice?audio=ice%20cream&type=1"
        );
        assert_eq!(pronunciation_url("x/{word}", "a&b"), "x/a%26b");
    }

    #[cfg(unix)]
    #[test]
    fn test_new_playback_cancels_previous() {
        let mut player = CommandPlayer::new("sleep", Vec::new(), "5{word}");
        player.play("");
        assert!(player.is_active());
        let first = player.active.as_ref().map(Child::id);

        player.play("");
        let second = player.active.as_ref().map(Child::id);
        assert_ne!(first, second);
        assert!(player.is_active());

        player.stop();
        assert!(!player.is_active());
    }

    #[test]
    fn test_missing_program_does_not_panic() {
        let mut player = CommandPlayer::new("definitely-not-a-player-binary", Vec::new(), "{word}");
        player.play("word");
        assert!(!player.is_active());
    }
}
