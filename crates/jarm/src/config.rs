//! Resolve the backend connection from the config file and global flags.

use jarm_config::{Config, Profile};
use jarm_core::DashboardConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// `--server` wins over any profile; otherwise the named or default profile
/// is used, with `--insecure`/`--timeout` layered on top.
pub fn dashboard_config(global: &GlobalOpts) -> Result<DashboardConfig, CliError> {
    let cfg = jarm_config::load_config_or_default();
    resolve(&cfg, global)
}

fn resolve(cfg: &Config, global: &GlobalOpts) -> Result<DashboardConfig, CliError> {
    let mut profile = match global.server.as_deref() {
        Some(server) => Profile::for_server(server),
        None => match jarm_config::resolve_profile(cfg, global.profile.as_deref()) {
            Ok((_, profile)) => profile.clone(),
            // No profile file at all and no flag: point at --server.
            Err(_) if global.profile.is_none() && cfg.profiles.is_empty() => {
                return Err(CliError::NoServer {
                    path: jarm_config::config_path().display().to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        },
    };

    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }

    Ok(jarm_config::profile_to_dashboard_config(
        &profile,
        &cfg.defaults,
    )?)
}
