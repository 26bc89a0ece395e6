use crate::config::AppConfig;

/// Which backing store holds the durable copy of the user's data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncMode {
    /// Shared remote document with change notifications
    Remote,
    /// On-device storage only
    Local,
}

impl std::fmt::Display for SyncMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncMode::Remote => write!(f, "remote"),
            SyncMode::Local => write!(f, "local"),
        }
    }
}

/// Decides once, from startup configuration, whether the remote backend is used.
///
/// Invalid or missing credentials silently select local mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendSelector {
    mode: SyncMode,
}

impl BackendSelector {
    pub fn from_config(config: &AppConfig) -> Self {
        let remote_valid = config.remote.as_ref().is_some_and(|r| r.is_valid());
        let mode = if remote_valid && !config.offline {
            SyncMode::Remote
        } else {
            SyncMode::Local
        };
        if config.remote.is_some() && mode == SyncMode::Local {
            log::info!("remote credentials unusable or offline forced; using local storage");
        }
        Self { mode }
    }

    #[must_use]
    pub fn is_remote_active(&self) -> bool {
        self.mode == SyncMode::Remote
    }

    #[must_use]
    pub fn mode(&self) -> SyncMode {
        self.mode
    }
}
