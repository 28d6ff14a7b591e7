//! High-availability role lookup and the services handed to every form.
//!
//! On the passive (backup) node of an HA pair, model forms over tables with a
//! no-sync rule show only the node-specific fields. The node role comes from
//! a [`FailoverNotifier`]; when there is none, or it cannot tell, the node is
//! treated as not being a backup.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use freeadmin_core::nosync::NoSyncMap;
use freeadmin_core::AdminError;
use freeadmin_hooks::AppPool;

/// The failover role of this node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FailoverStatus {
    /// Active node.
    Master,
    /// Passive node.
    Backup,
    /// Not part of an HA pair.
    Single,
    /// The failover subsystem reported an error.
    Error,
    /// Any other state reported by the failover subsystem.
    #[serde(untagged)]
    Other(String),
}

impl FailoverStatus {
    /// Returns `true` for [`FailoverStatus::Backup`].
    pub const fn is_backup(&self) -> bool {
        matches!(self, Self::Backup)
    }
}

impl FromStr for FailoverStatus {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Err(AdminError::ConfigurationError(
                "empty failover status".to_string(),
            )),
            "MASTER" => Ok(Self::Master),
            "BACKUP" => Ok(Self::Backup),
            "SINGLE" => Ok(Self::Single),
            "ERROR" => Ok(Self::Error),
            other => Ok(Self::Other(other.to_string())),
        }
    }
}

impl fmt::Display for FailoverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Master => write!(f, "MASTER"),
            Self::Backup => write!(f, "BACKUP"),
            Self::Single => write!(f, "SINGLE"),
            Self::Error => write!(f, "ERROR"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

/// Reports this node's failover role.
pub trait FailoverNotifier: Send + Sync {
    /// Returns the current role, or `None` when it cannot be determined.
    fn failover_status(&self) -> Option<FailoverStatus>;
}

/// A notifier that always reports the same role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticFailover(pub Option<FailoverStatus>);

impl FailoverNotifier for StaticFailover {
    fn failover_status(&self) -> Option<FailoverStatus> {
        self.0.clone()
    }
}

/// Shared services a form needs at construction and lifecycle time.
///
/// Built once at startup and cloned cheaply into each request.
#[derive(Clone, Default)]
pub struct FormServices {
    /// The plugin registry hooks are dispatched through.
    pub hooks: Arc<AppPool>,
    /// Tables excluded from HA synchronization.
    pub no_sync: Arc<NoSyncMap>,
    /// The node role source; `None` outside HA deployments.
    pub notifier: Option<Arc<dyn FailoverNotifier>>,
}

impl fmt::Debug for FormServices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormServices")
            .field("hooks", &self.hooks)
            .field("no_sync", &self.no_sync)
            .field("notifier", &self.notifier.is_some())
            .finish()
    }
}

impl FormServices {
    /// Creates services with the given registry and no-sync map and no
    /// failover notifier.
    pub fn new(hooks: Arc<AppPool>, no_sync: Arc<NoSyncMap>) -> Self {
        Self {
            hooks,
            no_sync,
            notifier: None,
        }
    }

    /// Sets the failover notifier.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn FailoverNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Returns `true` only when a notifier positively reports `BACKUP`.
    pub fn is_backup(&self) -> bool {
        self.notifier
            .as_ref()
            .and_then(|n| n.failover_status())
            .is_some_and(|status| status.is_backup())
    }
}
