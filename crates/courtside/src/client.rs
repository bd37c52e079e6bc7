//! `CourtsideClient` builder and top-level lifecycle.
//!
//! Ties the layers together: one gateway, one session shared through
//! `Arc`, and the roster and league components built on top of it.

use std::path::PathBuf;
use std::sync::Arc;

use courtside_gateway::{GatewayConfig, HttpGateway, RemoteGateway};
use courtside_league::MembershipCoordinator;
use courtside_protocol::UserProfile;
use courtside_roster::{RosterConfig, RosterSynchronizer};
use courtside_session::{
    CredentialStore, FileCredentialStore, RestoreOutcome, SessionConfig, SessionStore,
};

use crate::CourtsideError;

/// Environment variable overriding the authority's base URL.
pub const ENV_API_URL: &str = "COURTSIDE_API_URL";

/// Environment variable overriding the credential storage directory.
pub const ENV_STORAGE_DIR: &str = "COURTSIDE_STORAGE_DIR";

const DEFAULT_STORAGE_DIR: &str = ".courtside";

/// Builder for configuring a Courtside client.
///
/// # Example
///
/// ```rust,no_run
/// use courtside::prelude::*;
///
/// # async fn run() -> Result<(), CourtsideError> {
/// let client = CourtsideClient::builder()
///     .base_url("https://fantasy.example.com/api")
///     .storage_dir("/home/me/.config/courtside")
///     .build()?;
///
/// match client.start().await {
///     RestoreOutcome::Restored(profile) => println!("welcome back {}", profile.display_name()),
///     _ => { client.login("me@example.com", "secret").await?; }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CourtsideClientBuilder {
    gateway: GatewayConfig,
    storage_dir: PathBuf,
    session: SessionConfig,
    roster: RosterConfig,
}

impl CourtsideClientBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self {
            gateway: GatewayConfig::default(),
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            session: SessionConfig::default(),
            roster: RosterConfig::default(),
        }
    }

    /// Creates a builder with defaults, overridden by
    /// `COURTSIDE_API_URL` and `COURTSIDE_STORAGE_DIR` when set.
    pub fn from_env() -> Self {
        let mut builder = Self::new();
        if let Ok(url) = std::env::var(ENV_API_URL) {
            builder.gateway.base_url = url;
        }
        if let Ok(dir) = std::env::var(ENV_STORAGE_DIR) {
            builder.storage_dir = PathBuf::from(dir);
        }
        builder
    }

    /// Sets the authority's base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.gateway.base_url = url.into();
        self
    }

    /// Sets the full gateway configuration.
    pub fn gateway_config(mut self, config: GatewayConfig) -> Self {
        self.gateway = config;
        self
    }

    /// Sets the directory the credential is persisted in.
    pub fn storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = dir.into();
        self
    }

    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.session = config;
        self
    }

    pub fn roster_config(mut self, config: RosterConfig) -> Self {
        self.roster = config;
        self
    }

    /// Builds a client that talks HTTP and persists to the storage
    /// directory.
    ///
    /// # Errors
    /// [`CourtsideError::Gateway`] if the base URL is not usable.
    pub fn build(self) -> Result<CourtsideClient<HttpGateway, FileCredentialStore>, CourtsideError> {
        let gateway = HttpGateway::new(self.gateway.clone())?;
        let storage = FileCredentialStore::new(self.storage_dir.clone());
        Ok(self.with_gateway(Arc::new(gateway), storage))
    }

    /// Builds a client over any gateway and credential store. The gateway
    /// settings and storage directory of this builder are ignored.
    pub fn with_gateway<G: RemoteGateway, S: CredentialStore>(
        self,
        gateway: Arc<G>,
        storage: S,
    ) -> CourtsideClient<G, S> {
        let session = Arc::new(SessionStore::new(gateway, storage, self.session));
        CourtsideClient {
            roster: RosterSynchronizer::new(Arc::clone(&session), self.roster),
            leagues: MembershipCoordinator::new(Arc::clone(&session)),
            session,
        }
    }
}

impl Default for CourtsideClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A Courtside client: session, roster and leagues over one authority.
pub struct CourtsideClient<G: RemoteGateway, S: CredentialStore> {
    pub(crate) session: Arc<SessionStore<G, S>>,
    pub(crate) roster: RosterSynchronizer<G, S>,
    pub(crate) leagues: MembershipCoordinator<G, S>,
}

impl CourtsideClient<HttpGateway, FileCredentialStore> {
    /// Creates a new builder.
    pub fn builder() -> CourtsideClientBuilder {
        CourtsideClientBuilder::new()
    }
}

impl<G: RemoteGateway, S: CredentialStore> CourtsideClient<G, S> {
    pub fn session(&self) -> &Arc<SessionStore<G, S>> {
        &self.session
    }

    pub fn roster(&self) -> &RosterSynchronizer<G, S> {
        &self.roster
    }

    pub fn leagues(&self) -> &MembershipCoordinator<G, S> {
        &self.leagues
    }

    /// Restores the persisted session. When that succeeds, the roster is
    /// seeded from the profile and the league list is loaded.
    ///
    /// A league list failure is logged and leaves the list empty; it does
    /// not affect the outcome.
    pub async fn start(&self) -> RestoreOutcome {
        let outcome = self.session.restore().await;
        if let Some(profile) = outcome.profile() {
            self.populate(profile).await;
        }
        outcome
    }

    /// Logs in, then seeds the roster and loads the league list.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, CourtsideError> {
        let profile = self.session.login(email, password).await?;
        self.populate(&profile).await;
        Ok(profile)
    }

    /// Logs out and forgets the roster and league projections.
    pub fn logout(&self) {
        self.session.logout();
        self.roster.clear();
        self.leagues.clear();
    }

    /// Re-fetches the profile so aggregates such as total fantasy points
    /// catch up with confirmed roster changes.
    pub async fn after_roster_change(&self) -> Result<UserProfile, CourtsideError> {
        Ok(self.session.refresh().await?)
    }

    async fn populate(&self, profile: &UserProfile) {
        self.roster.seed(profile);
        if let Err(e) = self.leagues.list().await {
            tracing::warn!(error = %e, "could not load leagues");
            self.leagues.clear();
        }
    }
}
