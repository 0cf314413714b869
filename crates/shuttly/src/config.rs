//! GlobalOpts-aware runtime construction.
//!
//! Resolves the active profile (flag → env → config default), builds
//! the `ApiClient`, and rehydrates the session from the durable token
//! store -- once, at startup.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use shuttly_api::{ApiClient, TransportConfig};
use shuttly_config::{Config, DurableTokenStore, Profile, load_config_or_default, resolve_profile};
use shuttly_core::AuthSession;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Everything a command handler needs: the resolved profile, the API
/// client, and the (possibly rehydrated) session.
pub struct AppContext {
    pub profile_name: String,
    pub profile: Profile,
    pub client: Arc<ApiClient>,
    pub session: AuthSession,
}

impl AppContext {
    /// Build the runtime context and rehydrate the session.
    pub async fn init(global: &GlobalOpts) -> Result<Self, CliError> {
        let config = load_config_or_default();
        let (profile_name, profile) = resolve_active_profile(&config, global)?;
        debug!(profile = %profile_name, server = %profile.server, "resolved profile");

        let transport =
            TransportConfig::default().with_timeout(Duration::from_secs(effective_timeout(
                global,
                &profile,
            )));
        let server_url = profile.server_url()?;
        let client = Arc::new(ApiClient::new(server_url, &transport).map_err(CliError::from_api)?);

        let store = Arc::new(DurableTokenStore::for_profile(&profile_name));
        let mut session = AuthSession::new(store);
        session
            .rehydrate(&client, client.as_ref())
            .await
            .map_err(CliError::from_core)?;

        Ok(Self {
            profile_name,
            profile,
            client,
            session,
        })
    }
}

/// `--server` wins over the profile; a bare `--server` run synthesizes
/// an ad-hoc profile so no config file is required to get started.
fn resolve_active_profile(
    config: &Config,
    global: &GlobalOpts,
) -> Result<(String, Profile), CliError> {
    if let Some(server) = &global.server {
        let name = global.profile.clone().unwrap_or_else(|| "adhoc".into());
        let profile = Profile {
            server: server.clone(),
            ..Profile::default()
        };
        return Ok((name, profile));
    }

    let (name, profile) = resolve_profile(config, global.profile.as_deref())?;
    Ok((name, profile.clone()))
}

fn effective_timeout(global: &GlobalOpts, profile: &Profile) -> u64 {
    profile.timeout.unwrap_or(global.timeout)
}
