use std::str::FromStr;

use chrono_tz::Tz;

use crate::error::{Result, SetupError};

/// Runtime settings the procedures depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppSettings {
    timezone: Tz,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::UTC,
        }
    }
}

impl AppSettings {
    /// Settings reporting `timezone` (an IANA name such as `Europe/Berlin`).
    pub fn new(timezone: &str) -> Result<Self> {
        Ok(Self {
            timezone: parse_timezone(timezone)?,
        })
    }

    /// Use `explicit` when given, otherwise the process `TZ` if it names a
    /// known zone, otherwise the host's configured zone, otherwise UTC.
    pub fn resolve(explicit: Option<&str>) -> Result<Self> {
        let tz = std::env::var("TZ").ok();
        let host = match iana_time_zone::get_timezone() {
            Ok(name) => Some(name),
            Err(err) => {
                tracing::debug!(error = %err, "host timezone unavailable");
                None
            }
        };
        Self::resolve_from(explicit, tz.as_deref(), host.as_deref())
    }

    fn resolve_from(explicit: Option<&str>, tz: Option<&str>, host: Option<&str>) -> Result<Self> {
        if let Some(name) = explicit {
            return Self::new(name);
        }

        let candidates = [("TZ", tz), ("host", host)];
        for (source, name) in candidates {
            let Some(name) = name.filter(|n| !n.trim().is_empty()) else {
                continue;
            };
            match parse_timezone(name) {
                Ok(timezone) => return Ok(Self { timezone }),
                Err(_) => {
                    tracing::warn!(source, tz = %name, "not an IANA zone name, skipping");
                }
            }
        }
        Ok(Self::default())
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn timezone_name(&self) -> &'static str {
        self.timezone.name()
    }
}

fn parse_timezone(name: &str) -> Result<Tz> {
    // POSIX allows a leading ':' in TZ.
    let trimmed = name.trim().trim_start_matches(':');
    Tz::from_str(trimmed).map_err(|_| SetupError::InvalidTimezone(name.to_string()))
}
