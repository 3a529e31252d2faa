//! Server configuration, resolved once at startup.
//!
//! Settings come from the process environment with an optional `.env`
//! overlay in the served directory. File entries shadow inherited
//! variables; blank values count as unset.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use vday_core::pages::YEARS;

pub const DEFAULT_PORT: u16 = 3000;

/// `.env` overlay over the process environment.
#[derive(Debug, Default)]
pub struct EnvFile {
    entries: HashMap<String, String>,
}

impl EnvFile {
    /// Load `<dir>/.env` if present. A missing or unreadable file yields an
    /// empty overlay.
    pub fn load(dir: &Path) -> Self {
        match std::fs::read_to_string(dir.join(".env")) {
            Ok(contents) => Self::parse(&contents),
            Err(_) => Self::default(),
        }
    }

    /// Parse `KEY=VALUE` lines. Lines without a valid key are skipped.
    pub fn parse(contents: &str) -> Self {
        let entries = contents.lines().filter_map(parse_line).collect();
        Self { entries }
    }

    /// Look up `key` in the overlay first, then the process environment.
    pub fn var(&self, key: &str) -> Option<String> {
        let value = match self.entries.get(key) {
            Some(v) => Some(v.clone()),
            None => std::env::var(key).ok(),
        };
        value.filter(|v| !v.is_empty())
    }
}

/// One `KEY=VALUE` line. Keys are `[A-Za-z_][A-Za-z0-9_]*`; a single pair of
/// surrounding quotes is stripped from the value.
fn parse_line(line: &str) -> Option<(String, String)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let mut chars = key.chars();
    let first = chars.next()?;
    if !(first.is_ascii_alphabetic() || first == '_') {
        return None;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }
    let mut value = value.trim();
    value = value.strip_prefix(['"', '\'']).unwrap_or(value);
    value = value.strip_suffix(['"', '\'']).unwrap_or(value);
    Some((key.to_string(), value.trim().to_string()))
}

/// ElevenLabs credentials and voice selection, one lookup per request
/// against a map built at startup.
#[derive(Debug, Clone, Default)]
pub struct VoiceConfig {
    pub api_key: Option<String>,
    pub default_voice: Option<String>,
    pub year_voices: HashMap<u16, String>,
}

impl VoiceConfig {
    /// Read `ELEVENLABS_API_KEY`, `ELEVENLABS_VOICE_ID`, and the per-year
    /// `ELEVENLABS_VOICE_<year>` overrides.
    pub fn from_env(env: &EnvFile) -> Self {
        let year_voices = YEARS
            .iter()
            .filter_map(|year| {
                env.var(&format!("ELEVENLABS_VOICE_{year}"))
                    .map(|v| (*year, v.trim().to_string()))
            })
            .filter(|(_, v)| !v.is_empty())
            .collect();
        Self {
            api_key: env.var("ELEVENLABS_API_KEY"),
            default_voice: env.var("ELEVENLABS_VOICE_ID"),
            year_voices,
        }
    }

    /// Voice id for a request: the per-year override when one exists,
    /// otherwise the default.
    pub fn voice_for_year(&self, year: Option<u16>) -> Option<&str> {
        year.and_then(|y| self.year_voices.get(&y))
            .or(self.default_voice.as_ref())
            .map(String::as_str)
    }

    /// True when synthesis can work at all: a key plus at least one voice.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some() && (self.default_voice.is_some() || !self.year_voices.is_empty())
    }

    pub fn has_year_voices(&self) -> bool {
        !self.year_voices.is_empty()
    }
}

/// Everything the server needs, resolved from the environment once.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Directory the static site is served from.
    pub public_dir: PathBuf,
    /// Directory `/audio/<name>` requests resolve in.
    pub audio_dir: PathBuf,
    pub voices: VoiceConfig,
}

impl ServerConfig {
    /// Configuration for a server rooted at `root`: `PORT` (default 3000),
    /// `AUDIO_DIR` (default `<root>/audio`), and the voice settings.
    pub fn load(root: &Path) -> Self {
        let env = EnvFile::load(root);
        let port = env
            .var("PORT")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let audio_dir = env
            .var("AUDIO_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| root.join("audio"));
        Self {
            port,
            public_dir: root.to_path_buf(),
            audio_dir,
            voices: VoiceConfig::from_env(&env),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_quoted_values() {
        assert_eq!(
            parse_line("PORT=3000"),
            Some(("PORT".to_string(), "3000".to_string()))
        );
        assert_eq!(
            parse_line("  KEY = \"quoted value\"  "),
            Some(("KEY".to_string(), "quoted value".to_string()))
        );
        assert_eq!(
            parse_line("NAME='single'"),
            Some(("NAME".to_string(), "single".to_string()))
        );
    }

    #[test]
    fn skips_comments_and_garbage() {
        assert_eq!(parse_line("# comment"), None);
        assert_eq!(parse_line(""), None);
        assert_eq!(parse_line("no equals sign"), None);
        assert_eq!(parse_line("1BAD=value"), None);
        assert_eq!(parse_line("BAD KEY=value"), None);
    }

    #[test]
    fn overlay_entries_win_and_blanks_are_unset() {
        let env = EnvFile::parse("ELEVENLABS_API_KEY=sk-test\nELEVENLABS_VOICE_ID=\n");
        assert_eq!(env.var("ELEVENLABS_API_KEY").as_deref(), Some("sk-test"));
        // Blank entry shadows anything inherited.
        assert_eq!(env.var("ELEVENLABS_VOICE_ID"), None);
    }

    #[test]
    fn per_year_voice_overrides_the_default() {
        let env = EnvFile::parse(
            "ELEVENLABS_API_KEY=sk-test\nELEVENLABS_VOICE_ID=vox-default\nELEVENLABS_VOICE_2020=vox-2020\n",
        );
        let voices = VoiceConfig::from_env(&env);
        assert_eq!(voices.voice_for_year(Some(2020)), Some("vox-2020"));
        assert_eq!(voices.voice_for_year(Some(2019)), Some("vox-default"));
        assert_eq!(voices.voice_for_year(None), Some("vox-default"));
        assert!(voices.is_configured());
        assert!(voices.has_year_voices());
    }

    #[test]
    fn key_without_any_voice_is_not_configured() {
        let voices = VoiceConfig {
            api_key: Some("sk-test".to_string()),
            default_voice: None,
            year_voices: HashMap::new(),
        };
        assert!(!voices.is_configured());
        assert_eq!(voices.voice_for_year(Some(2020)), None);
    }

    #[test]
    fn per_year_voices_without_a_default_still_configure() {
        let voices = VoiceConfig {
            api_key: Some("sk-test".to_string()),
            default_voice: None,
            year_voices: HashMap::from([(2020, "vox-2020".to_string())]),
        };
        assert!(voices.is_configured());
        assert_eq!(voices.voice_for_year(Some(2020)), Some("vox-2020"));
        assert_eq!(voices.voice_for_year(Some(2019)), None);
    }

    #[test]
    fn load_reads_the_env_file_next_to_the_site() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".env"), "PORT=8123\nAUDIO_DIR=clips\n").unwrap();
        let config = ServerConfig::load(dir.path());
        assert_eq!(config.port, 8123);
        assert_eq!(config.audio_dir, PathBuf::from("clips"));
        assert_eq!(config.public_dir, dir.path());
    }
}
