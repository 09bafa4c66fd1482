// File: src/config.rs
use std::path::PathBuf;

pub const DEFAULT_SOURCE: &str = "words.txt";
pub const DEFAULT_AUDIO_URL_TEMPLATE: &str = "https://dict.youdao.com/dictvoice?audio={word}&type=1";
pub const DEFAULT_VISIBLE_ROWS: usize = 12;
const APP_DIR: &str = "root-drill";
const SESSION_FILE: &str = "session.json";

/// Where the word list comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    File(PathBuf),
    Url(String),
}

impl SourceLocation {
    /// `http://` and `https://` select a URL, anything else is a file path.
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Self::Url(raw.to_string())
        } else {
            Self::File(PathBuf::from(raw))
        }
    }
}

#[derive(Debug, Clone)]
pub struct DrillConfig {
    pub source: SourceLocation,
    pub state_path: PathBuf,
    /// `{word}` is replaced by the URL-encoded headword.
    pub audio_url_template: String,
    /// External player program and its leading arguments. The URL is passed
    /// last. `None` keeps the drill silent.
    pub player_command: Option<Vec<String>>,
    /// Fixed seed for the shuffle on reset.
    pub seed: Option<u64>,
    pub visible_rows: usize,
}

impl Default for DrillConfig {
    fn default() -> Self {
        Self {
            source: SourceLocation::parse(DEFAULT_SOURCE),
            state_path: default_state_path(),
            audio_url_template: DEFAULT_AUDIO_URL_TEMPLATE.to_string(),
            player_command: None,
            seed: None,
            visible_rows: DEFAULT_VISIBLE_ROWS,
        }
    }
}

/// `<config dir>/root-drill/session.json`, or `./session.json` when the
/// platform has no config directory.
pub fn default_state_path() -> PathBuf {
    match dirs::config_dir() {
        Some(mut path) => {
            path.push(APP_DIR);
            path.push(SESSION_FILE);
            path
        }
        None => PathBuf::from(SESSION_FILE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_location_parse() {
        assert_eq!(
            SourceLocation::parse("https://example.com/words.txt"),
            SourceLocation::Url("https://example.com/words.txt".into())
        );
        assert_eq!(
            SourceLocation::parse("lists/words.txt"),
            SourceLocation::File(PathBuf::from("lists/words.txt"))
        );
    }

    #[test]
    fn test_default_state_path_ends_with_session_file() {
        assert!(default_state_path().ends_with(SESSION_FILE));
    }
}
