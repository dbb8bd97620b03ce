use crate::format::DisplayOptions;
use crate::stopwatch::duration_from_secs;
use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::Serialize;
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::time::Duration;

/// Everything that survives between runs.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Session {
    pub show_milliseconds: bool,
    pub show_full_format: bool,
    pub saved_seconds: f64,
    /// Opaque window geometry, stored base64-encoded and never interpreted.
    #[serde(serialize_with = "serialize_geometry")]
    pub geometry: Option<Vec<u8>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for Session {
    fn default() -> Self {
        let options = DisplayOptions::default();
        Self {
            show_milliseconds: options.show_milliseconds,
            show_full_format: options.show_full_format,
            saved_seconds: 0.0,
            geometry: None,
            updated_at: None,
        }
    }
}

impl Session {
    pub fn display_options(&self) -> DisplayOptions {
        DisplayOptions {
            show_milliseconds: self.show_milliseconds,
            show_full_format: self.show_full_format,
        }
    }

    pub fn set_display_options(&mut self, options: DisplayOptions) {
        self.show_milliseconds = options.show_milliseconds;
        self.show_full_format = options.show_full_format;
    }

    pub fn saved_time(&self) -> Duration {
        duration_from_secs(self.saved_seconds)
    }

    pub fn set_saved_time(&mut self, duration: Duration) {
        self.saved_seconds = duration.as_secs_f64();
    }

    /// Reads each key on its own, so one bad value only resets that key.
    pub fn from_value(value: &Value) -> Self {
        let defaults = Self::default();

        let show_milliseconds = read_field(value, "show_milliseconds", Value::as_bool)
            .unwrap_or(defaults.show_milliseconds);
        let show_full_format = read_field(value, "show_full_format", Value::as_bool)
            .unwrap_or(defaults.show_full_format);

        let saved_seconds = match read_field(value, "saved_seconds", Value::as_f64) {
            Some(secs) if secs.is_finite() && secs >= 0.0 => secs,
            Some(secs) => {
                tracing::warn!(saved_seconds = secs, "Saved time out of range, using 0");
                0.0
            }
            None => defaults.saved_seconds,
        };

        let geometry = read_field(value, "geometry", Value::as_str).and_then(|encoded| {
            STANDARD
                .decode(encoded)
                .map_err(|e| tracing::warn!("Discarding unreadable geometry: {}", e))
                .ok()
        });

        let updated_at = read_field(value, "updated_at", Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Self {
            show_milliseconds,
            show_full_format,
            saved_seconds,
            geometry,
            updated_at,
        }
    }

    /// Loads the session, falling back to defaults for a missing file, an
    /// unparsable file or individual malformed keys. Only I/O errors other
    /// than "not found" are reported.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let bytes = fs::read(path).context("Failed to read session file")?;

        // Handle empty file case
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        // Bytes that are not UTF-8 fail here too and take the default path
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(value) => Ok(Self::from_value(&value)),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    "Session file is not valid JSON ({}), using defaults",
                    e
                );
                Ok(Self::default())
            }
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self).context("Failed to serialize session")?;

        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write to a sibling temp file then rename over the target
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }
}

fn read_field<'a, T>(
    value: &'a Value,
    key: &str,
    read: impl Fn(&'a Value) -> Option<T>,
) -> Option<T> {
    let field = value.get(key)?;
    if field.is_null() {
        return None;
    }
    let parsed = read(field);
    if parsed.is_none() {
        tracing::warn!(key, value = %field, "Malformed session value, using default");
    }
    parsed
}

fn serialize_geometry<S: serde::Serializer>(
    bytes: &Option<Vec<u8>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match bytes {
        Some(bytes) => serializer.serialize_some(&STANDARD.encode(bytes)),
        None => serializer.serialize_none(),
    }
}

/// Runs `f` against the stored session while holding an exclusive lock on
/// `lock_path`, saving the session afterwards if `f` succeeded.
pub fn with_session_lock<F, R>(lock_path: &Path, session_path: &Path, f: F) -> Result<R>
where
    F: FnOnce(&mut Session) -> Result<R>,
{
    if let Some(parent) = lock_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(lock_path)
        .context("Failed to open lock file")?;

    file.lock_exclusive().context("Failed to acquire lock")?;

    let mut session = Session::load(session_path)?;

    let result = f(&mut session);

    if result.is_ok() {
        session.updated_at = Some(Utc::now());
        session.save(session_path)?;
    }

    file.unlock().context("Failed to unlock")?;

    result
}
