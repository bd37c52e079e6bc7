//! The session store: the single owner of the credential and profile.
//!
//! # Consistency
//!
//! Credential and profile live under one lock and change together, so a
//! reader never sees a profile without its credential. Every change of
//! credential (restore, login, logout, invalidation) bumps a generation
//! counter. A request started under one generation may only write its
//! result back if the generation is unchanged when it resolves; otherwise
//! a newer login or logout has already decided the session and the stale
//! result is dropped.
//!
//! The lock is never held across an `.await`.

use std::sync::Arc;

use courtside_gateway::{endpoints, GatewayError, RemoteGateway};
use courtside_protocol::{
    ChangePasswordRequest, Credential, LoginRequest, RegisterRequest,
    UpdateProfileRequest, UserProfile, UserSummary,
};
use parking_lot::Mutex;
use tokio::sync::watch;

use crate::{
    CredentialStore, RestoreOutcome, SessionConfig, SessionError, SessionState,
};

#[derive(Default)]
struct Inner {
    credential: Option<Credential>,
    profile: Option<UserProfile>,
    generation: u64,
}

/// Process-wide session shared (through `Arc`) by every component that
/// talks to the authority on the user's behalf.
///
/// ## Lifecycle
///
/// ```text
/// restore() / login() ──→ [Restoring] ──→ [Authenticated] ──→ refresh()*
///                              │                 │
///                              ▼                 ▼
///                         [Anonymous] ←── logout() / invalidate()
/// ```
pub struct SessionStore<G: RemoteGateway, S: CredentialStore> {
    gateway: Arc<G>,
    storage: S,
    config: SessionConfig,
    inner: Mutex<Inner>,
    state_tx: watch::Sender<SessionState>,
    restored_tx: watch::Sender<bool>,
}

impl<G: RemoteGateway, S: CredentialStore> SessionStore<G, S> {
    /// Creates an anonymous session. Call [`restore`](Self::restore) once
    /// at start-up to pick up a persisted credential.
    pub fn new(gateway: Arc<G>, storage: S, config: SessionConfig) -> Self {
        Self {
            gateway,
            storage,
            config,
            inner: Mutex::new(Inner::default()),
            state_tx: watch::channel(SessionState::Anonymous).0,
            restored_tx: watch::channel(false).0,
        }
    }

    // =====================================================================
    // Projections
    // =====================================================================

    /// The gateway this session talks through.
    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    /// The credential storage backing this session.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        *self.state_tx.borrow()
    }

    /// Receives every lifecycle transition.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    /// `true` when both credential and profile are present.
    pub fn is_authenticated(&self) -> bool {
        let inner = self.inner.lock();
        inner.credential.is_some() && inner.profile.is_some()
    }

    /// The credential, including while it is still being confirmed.
    pub fn credential(&self) -> Option<Credential> {
        self.inner.lock().credential.clone()
    }

    /// The credential, only once the session is authenticated.
    pub fn authorized(&self) -> Option<Credential> {
        let inner = self.inner.lock();
        inner.profile.as_ref()?;
        inner.credential.clone()
    }

    /// Identifies the current credential. Changes on every restore, login,
    /// logout and invalidation, never on refresh.
    ///
    /// State derived from a session (roster, league list) is stale once
    /// this value moves on.
    pub fn generation(&self) -> u64 {
        self.inner.lock().generation
    }

    /// Snapshot of the authenticated user's profile.
    pub fn profile(&self) -> Option<UserProfile> {
        self.inner.lock().profile.clone()
    }

    /// Waits until the first [`restore`](Self::restore) has finished.
    ///
    /// This is the gate for authenticated rendering: views that need the
    /// user await it, views that don't can render straight away.
    pub async fn wait_restored(&self) {
        let mut rx = self.restored_tx.subscribe();
        let _ = rx.wait_for(|done| *done).await;
    }

    // =====================================================================
    // Lifecycle
    // =====================================================================

    /// Restores the session from the persisted credential, if any.
    ///
    /// Never returns an error: an unusable credential is cleared and the
    /// session ends anonymous with [`RestoreOutcome::Discarded`].
    pub async fn restore(&self) -> RestoreOutcome {
        let outcome = self.restore_persisted().await;
        self.restored_tx.send_replace(true);
        outcome
    }

    async fn restore_persisted(&self) -> RestoreOutcome {
        let stored = match self.storage.load(&self.config.storage_key) {
            Ok(Some(credential)) => credential,
            Ok(None) => {
                tracing::debug!("no persisted credential, staying anonymous");
                return RestoreOutcome::NoCredential;
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not read persisted credential");
                self.clear_storage();
                return RestoreOutcome::NoCredential;
            }
        };

        let generation = match self.begin(stored.clone(), false) {
            Ok(generation) => generation,
            Err(_) => return RestoreOutcome::NoCredential,
        };
        tracing::info!("restoring session from persisted credential");

        match endpoints::fetch_profile(&*self.gateway, &stored).await {
            Ok(profile) => {
                if self.confirm(generation, profile.clone()) {
                    tracing::info!(user_id = %profile.id, "session restored");
                    RestoreOutcome::Restored(profile)
                } else {
                    RestoreOutcome::Superseded
                }
            }
            Err(e) => {
                if self.discard(generation) {
                    tracing::warn!(error = %e, "persisted credential discarded");
                    RestoreOutcome::Discarded(e)
                } else {
                    RestoreOutcome::Superseded
                }
            }
        }
    }

    /// Logs in: exchanges email and password for a credential, persists
    /// it, then confirms it by fetching the profile.
    ///
    /// All or nothing. If the profile fetch fails the credential is
    /// discarded from memory and storage and the error is returned; a
    /// credential without a confirmed profile never counts as a session.
    ///
    /// # Errors
    /// - [`SessionError::InvalidInput`] — blank email or password (no request)
    /// - [`SessionError::Gateway`] — login or profile fetch failed
    /// - [`SessionError::Storage`] — the credential could not be persisted
    /// - [`SessionError::Superseded`] — another login or a logout won the race
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, SessionError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(SessionError::InvalidInput("email is empty".into()));
        }
        if password.is_empty() {
            return Err(SessionError::InvalidInput("password is empty".into()));
        }

        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let credential = endpoints::login(&*self.gateway, &request).await?;

        let generation = self
            .begin(credential.clone(), true)
            .map_err(SessionError::Storage)?;

        match endpoints::fetch_profile(&*self.gateway, &credential).await {
            Ok(profile) => {
                if self.confirm(generation, profile.clone()) {
                    tracing::info!(user_id = %profile.id, "logged in");
                    Ok(profile)
                } else {
                    Err(SessionError::Superseded)
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "profile fetch after login failed, discarding credential");
                self.discard(generation);
                Err(e.into())
            }
        }
    }

    /// Forgets the credential and profile, in memory and in storage.
    ///
    /// Synchronous and idempotent; no request is made.
    pub fn logout(&self) {
        if self.reset() {
            tracing::info!("logged out");
        }
    }

    /// Forces the session back to anonymous because the authority rejected
    /// `rejected`.
    ///
    /// Does nothing if the session has since moved to another credential,
    /// so a late rejection of an old token can't end a newer session.
    /// Returns `true` if the session was invalidated.
    pub fn invalidate(&self, rejected: &Credential) -> bool {
        let mut inner = self.inner.lock();
        if inner.credential.as_ref() != Some(rejected) {
            return false;
        }
        self.clear_locked(&mut inner);
        tracing::warn!("credential rejected by the authority, session invalidated");
        true
    }

    /// Passes `result` through, invalidating the session first when it is
    /// an `Unauthorized` answer to a request made with `used`.
    ///
    /// Every component that talks to the authority with the session's
    /// credential funnels its results through here.
    pub fn observe<T>(
        &self,
        used: &Credential,
        result: Result<T, GatewayError>,
    ) -> Result<T, GatewayError> {
        if let Err(e) = &result {
            if e.is_unauthorized() {
                self.invalidate(used);
            }
        }
        result
    }

    /// Re-fetches the profile for the current credential and replaces the
    /// snapshot wholesale.
    ///
    /// Call after a confirmed mutation that changes server-side aggregates
    /// such as total fantasy points.
    ///
    /// # Errors
    /// - [`SessionError::NotAuthenticated`] — no credential (no request)
    /// - [`SessionError::Gateway`] — on `Unauthorized` the session is
    ///   invalidated as if logged out
    /// - [`SessionError::Superseded`] — the session changed meanwhile
    pub async fn refresh(&self) -> Result<UserProfile, SessionError> {
        let (credential, generation) = {
            let inner = self.inner.lock();
            let credential = inner
                .credential
                .clone()
                .ok_or(SessionError::NotAuthenticated)?;
            (credential, inner.generation)
        };

        let result = endpoints::fetch_profile(&*self.gateway, &credential).await;
        let profile = self.observe(&credential, result)?;
        if self.confirm(generation, profile.clone()) {
            tracing::debug!(user_id = %profile.id, "profile refreshed");
            Ok(profile)
        } else {
            Err(SessionError::Superseded)
        }
    }

    // =====================================================================
    // Account operations
    // =====================================================================

    /// Registers a new account. Does not log in.
    ///
    /// A blank nickname is sent as absent.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        nickname: Option<&str>,
    ) -> Result<UserSummary, SessionError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(SessionError::InvalidInput("email is empty".into()));
        }
        if password.is_empty() {
            return Err(SessionError::InvalidInput("password is empty".into()));
        }

        let request = RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            nickname: nickname
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
        };
        let summary = endpoints::register(&*self.gateway, &request).await?;
        tracing::info!(user_id = %summary.id, "account registered");
        Ok(summary)
    }

    /// Changes the password of the authenticated user.
    ///
    /// # Errors
    /// [`SessionError::InvalidInput`] without a request when the new
    /// password is empty or doesn't match its confirmation.
    pub async fn change_password(
        &self,
        current: &str,
        new: &str,
        confirm: &str,
    ) -> Result<(), SessionError> {
        if new.is_empty() {
            return Err(SessionError::InvalidInput("new password is empty".into()));
        }
        if new != confirm {
            return Err(SessionError::InvalidInput(
                "new passwords do not match".into(),
            ));
        }
        let credential = self.authorized().ok_or(SessionError::NotAuthenticated)?;

        let request = ChangePasswordRequest {
            current_password: current.to_string(),
            new_password: new.to_string(),
            confirm_new_password: confirm.to_string(),
        };
        let result =
            endpoints::change_password(&*self.gateway, &credential, &request).await;
        self.observe(&credential, result)?;
        tracing::info!("password changed");
        Ok(())
    }

    /// Updates the nickname. The returned profile replaces the snapshot.
    pub async fn update_profile(
        &self,
        nickname: Option<&str>,
    ) -> Result<UserProfile, SessionError> {
        let (credential, generation) = {
            let inner = self.inner.lock();
            match (&inner.credential, &inner.profile) {
                (Some(credential), Some(_)) => (credential.clone(), inner.generation),
                _ => return Err(SessionError::NotAuthenticated),
            }
        };

        let request = UpdateProfileRequest {
            nickname: nickname
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
        };
        let result =
            endpoints::update_profile(&*self.gateway, &credential, &request).await;
        let profile = self.observe(&credential, result)?;
        if self.confirm(generation, profile.clone()) {
            Ok(profile)
        } else {
            Err(SessionError::Superseded)
        }
    }

    // =====================================================================
    // Internal transitions
    //
    // Storage is touched only while `inner` is locked, so memory and
    // storage can't be reordered against each other by concurrent calls.
    // =====================================================================

    /// Installs a fresh, unconfirmed credential and enters `Restoring`.
    /// With `persist`, the credential is also written to storage; if that
    /// fails the session falls back to anonymous.
    fn begin(&self, credential: Credential, persist: bool) -> std::io::Result<u64> {
        let mut inner = self.inner.lock();
        if persist {
            if let Err(e) = self.storage.save(&self.config.storage_key, &credential) {
                self.clear_locked(&mut inner);
                return Err(e);
            }
        }
        inner.generation += 1;
        inner.credential = Some(credential);
        inner.profile = None;
        self.state_tx.send_replace(SessionState::Restoring);
        Ok(inner.generation)
    }

    /// Stores a profile fetched under `generation`. Returns `false` if the
    /// session moved on in the meantime.
    fn confirm(&self, generation: u64, profile: UserProfile) -> bool {
        let mut inner = self.inner.lock();
        if inner.generation != generation || inner.credential.is_none() {
            return false;
        }
        inner.profile = Some(profile);
        self.state_tx.send_replace(SessionState::Authenticated);
        true
    }

    /// Drops the credential installed under `generation`, if still current.
    fn discard(&self, generation: u64) -> bool {
        let mut inner = self.inner.lock();
        if inner.generation != generation {
            return false;
        }
        self.clear_locked(&mut inner);
        true
    }

    /// Clears memory and storage. Returns `true` if anything was held.
    fn reset(&self) -> bool {
        let mut inner = self.inner.lock();
        self.clear_locked(&mut inner)
    }

    fn clear_locked(&self, inner: &mut Inner) -> bool {
        inner.generation += 1;
        let had_session = inner.credential.take().is_some();
        inner.profile = None;
        self.state_tx.send_replace(SessionState::Anonymous);
        self.clear_storage();
        had_session
    }

    fn clear_storage(&self) {
        if let Err(e) = self.storage.clear(&self.config.storage_key) {
            tracing::warn!(error = %e, "could not clear persisted credential");
        }
    }
}
