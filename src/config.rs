//! Runtime configuration loaded from environment variables.

use std::path::PathBuf;

/// Admin secret used by earlier deployments. Still the default so existing
/// clients keep working, but startup warns about it.
pub const LEGACY_ADMIN_SECRET: &str = "1234";

pub const DEFAULT_PORT: u16 = 8000;

#[derive(Clone, Debug)]
pub struct Settings {
    /// SQLite file (from ROSTER_DATABASE). `None` means the platform data dir.
    pub database_path: Option<PathBuf>,
    /// Shared admin secret (from ROSTER_ADMIN_SECRET)
    pub admin_secret: String,
    /// Externally reachable base URL (from ROSTER_PUBLIC_URL), shown in the QR code
    pub public_url: Option<String>,
    /// Allowed CORS origins (from ROSTER_CORS_ORIGINS, comma-separated).
    /// `None` allows any origin.
    pub cors_origins: Option<Vec<String>>,
    pub static_dir: Option<PathBuf>,
    pub port: u16,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable source.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        let cors_origins = non_empty("ROSTER_CORS_ORIGINS").map(|s| {
            s.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        Self {
            database_path: non_empty("ROSTER_DATABASE").map(PathBuf::from),
            admin_secret: non_empty("ROSTER_ADMIN_SECRET")
                .unwrap_or_else(|| LEGACY_ADMIN_SECRET.to_string()),
            public_url: non_empty("ROSTER_PUBLIC_URL")
                .map(|s| s.trim().trim_end_matches('/').to_string()),
            cors_origins,
            static_dir: None,
            port: DEFAULT_PORT,
        }
    }

    pub fn uses_legacy_admin_secret(&self) -> bool {
        self.admin_secret == LEGACY_ADMIN_SECRET
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_vars(|_| None)
    }
}
