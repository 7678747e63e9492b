//! Service install/uninstall commands
//!
//! Carried over from the clusterctl tool as acknowledged placeholders:
//! they validate the role and report what would be done.
//! TODO: wire up systemd/launchd unit generation for the server role.

use crate::Result;

/// A cluster role that can be installed as a service
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Role {
    /// The registry server
    Server,
    /// The heartbeating agent
    Client,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Server => write!(f, "server"),
            Self::Client => write!(f, "client"),
        }
    }
}

/// Install a cluster role as a system service (not yet implemented)
///
/// # Errors
///
/// Currently infallible; returns `Result` for when installation lands.
pub fn install(role: Role) -> Result<()> {
    tracing::warn!(%role, "install is not fully implemented yet");
    println!("[clusterd] Installing {role} (not fully implemented yet)");
    Ok(())
}

/// Uninstall a cluster role's system service (not yet implemented)
///
/// # Errors
///
/// Currently infallible; returns `Result` for when uninstallation lands.
pub fn uninstall(role: Role) -> Result<()> {
    tracing::warn!(%role, "uninstall is not fully implemented yet");
    println!("[clusterd] Uninstalling {role} (not fully implemented yet)");
    Ok(())
}
