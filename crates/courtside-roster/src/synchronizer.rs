//! The roster synchronizer: optimistic add/remove against the authority.

use std::collections::HashMap;
use std::sync::Arc;

use courtside_gateway::{endpoints, GatewayError, RemoteGateway};
use courtside_protocol::{Player, PlayerId, UserProfile};
use courtside_session::{CredentialStore, SessionStore};
use parking_lot::{Mutex, MutexGuard};

use crate::queue::{MutationQueue, Turn};
use crate::{Membership, PendingMutation, RosterConfig, RosterError};

/// What a successful add or remove did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterChange {
    /// The authority confirmed the change.
    Applied,
    /// The roster already matched the request; nothing was sent.
    Unchanged,
}

#[derive(Default)]
struct Inner {
    members: Membership,
    /// Session generation the members belong to.
    generation: Option<u64>,
    /// Number of mutations in flight per player.
    pending: HashMap<PlayerId, usize>,
}

/// Keeps the local roster in step with the authority.
///
/// `add` and `remove` change the local roster before the request is sent
/// and compensate if it fails. Local state is only locked for short,
/// synchronous sections; nothing is held across the request unless
/// [`RosterConfig::serialize_per_player`] is set.
///
/// The roster belongs to one session. Once the session ends (logout,
/// rejected credential, another login) it reads as empty until seeded or
/// loaded again.
pub struct RosterSynchronizer<G: RemoteGateway, S: CredentialStore> {
    session: Arc<SessionStore<G, S>>,
    config: RosterConfig,
    inner: Mutex<Inner>,
    queue: MutationQueue,
}

impl<G: RemoteGateway, S: CredentialStore> RosterSynchronizer<G, S> {
    /// Creates an empty roster bound to `session`. Call
    /// [`seed`](Self::seed) or [`load`](Self::load) once authenticated.
    pub fn new(session: Arc<SessionStore<G, S>>, config: RosterConfig) -> Self {
        Self {
            session,
            config,
            inner: Mutex::new(Inner::default()),
            queue: MutationQueue::new(),
        }
    }

    pub fn config(&self) -> &RosterConfig {
        &self.config
    }

    // =====================================================================
    // Projections
    // =====================================================================

    /// Current membership, optimistic changes included.
    pub fn members(&self) -> Vec<PlayerId> {
        self.state().members.ids().to_vec()
    }

    pub fn contains(&self, player_id: PlayerId) -> bool {
        self.state().members.contains(player_id)
    }

    pub fn len(&self) -> usize {
        self.state().members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().members.is_empty()
    }

    /// Free slots left under the local capacity.
    pub fn remaining_capacity(&self) -> usize {
        self.config.capacity.saturating_sub(self.state().members.len())
    }

    /// Returns `true` while a mutation of `player_id` awaits the authority.
    pub fn is_pending(&self, player_id: PlayerId) -> bool {
        self.inner.lock().pending.contains_key(&player_id)
    }

    // =====================================================================
    // Loading
    // =====================================================================

    /// Replaces the membership with the roster carried by `profile`.
    pub fn seed(&self, profile: &UserProfile) {
        let members = Membership::from_ids(profile.roster_ids());
        tracing::debug!(players = members.len(), "roster seeded from profile");
        self.replace(members, self.session.generation());
    }

    /// Fetches the roster from the authority and replaces the membership
    /// wholesale with its answer.
    pub async fn load(&self) -> Result<Vec<Player>, RosterError> {
        let generation = self.session.generation();
        let credential = self
            .session
            .authorized()
            .ok_or(RosterError::NotAuthenticated)?;

        let result = endpoints::fetch_roster(&**self.session.gateway(), &credential).await;
        let players = self.session.observe(&credential, result)?;

        let members = Membership::from_ids(players.iter().map(|p| p.id));
        if members.len() > self.config.capacity {
            tracing::warn!(
                players = members.len(),
                capacity = self.config.capacity,
                "authority roster exceeds local capacity"
            );
        }
        tracing::info!(players = members.len(), "roster loaded");
        self.replace(members, generation);
        Ok(players)
    }

    /// Forgets the local roster, e.g. on logout.
    pub fn clear(&self) {
        self.state().members.clear();
    }

    // =====================================================================
    // Mutations
    // =====================================================================

    /// Adds `player_id` to the roster.
    ///
    /// The player shows up locally right away. If the authority refuses or
    /// can't be reached, the player is taken out again and the gateway
    /// error is returned. Dropping the returned future before it resolves
    /// also takes the player out.
    ///
    /// # Errors
    /// - [`RosterError::NotAuthenticated`] — no session (no request)
    /// - [`RosterError::CapacityExceeded`] — roster full (no request)
    /// - [`RosterError::Gateway`] — dispatched and failed; rolled back
    pub async fn add(&self, player_id: PlayerId) -> Result<RosterChange, RosterError> {
        let _turn = self.turn(player_id).await;
        let credential = self
            .session
            .authorized()
            .ok_or(RosterError::NotAuthenticated)?;

        let in_flight = {
            let mut inner = self.state();
            if inner.members.contains(player_id) {
                return Ok(RosterChange::Unchanged);
            }
            if inner.members.len() >= self.config.capacity {
                return Err(RosterError::CapacityExceeded {
                    capacity: self.config.capacity,
                });
            }
            self.begin(&mut inner, PendingMutation::add(player_id))
        };

        tracing::debug!(%player_id, "dispatching roster add");
        let result =
            endpoints::add_to_roster(&**self.session.gateway(), &credential, player_id)
                .await;
        let result = self.session.observe(&credential, result);
        in_flight.settle(result)
    }

    /// Removes `player_id` from the roster.
    ///
    /// Symmetric to [`add`](Self::add): the player disappears locally
    /// right away and is put back if the request fails or is abandoned.
    pub async fn remove(&self, player_id: PlayerId) -> Result<RosterChange, RosterError> {
        let _turn = self.turn(player_id).await;
        let credential = self
            .session
            .authorized()
            .ok_or(RosterError::NotAuthenticated)?;

        let in_flight = {
            let mut inner = self.state();
            if !inner.members.contains(player_id) {
                return Ok(RosterChange::Unchanged);
            }
            self.begin(&mut inner, PendingMutation::remove(player_id))
        };

        tracing::debug!(%player_id, "dispatching roster remove");
        let result =
            endpoints::remove_from_roster(&**self.session.gateway(), &credential, player_id)
                .await;
        let result = self.session.observe(&credential, result);
        in_flight.settle(result)
    }

    // =====================================================================
    // Internals
    // =====================================================================

    /// Locks local state, first emptying it if it belongs to an earlier
    /// session.
    fn state(&self) -> MutexGuard<'_, Inner> {
        let current = self.session.generation();
        let mut inner = self.inner.lock();
        if inner.generation != Some(current) {
            if !inner.members.is_empty() {
                tracing::debug!("session changed, dropping previous roster");
            }
            inner.members.clear();
            inner.generation = Some(current);
        }
        inner
    }

    fn replace(&self, members: Membership, generation: u64) {
        let mut inner = self.inner.lock();
        inner.members = members;
        inner.generation = Some(generation);
    }

    async fn turn(&self, player_id: PlayerId) -> Option<Turn<'_>> {
        if self.config.serialize_per_player {
            Some(self.queue.enter(player_id).await)
        } else {
            None
        }
    }

    fn begin(&self, inner: &mut Inner, mutation: PendingMutation) -> InFlight<'_, G, S> {
        mutation.apply(&mut inner.members);
        *inner.pending.entry(mutation.player_id).or_default() += 1;
        InFlight {
            sync: self,
            mutation,
            generation: inner.generation,
            settled: false,
        }
    }
}

/// An applied optimistic change awaiting the authority's answer.
///
/// Settled exactly once: by [`settle`](Self::settle) with the answer, or on
/// drop as a failure when the caller abandoned the request. A failure is
/// only compensated while the roster still belongs to the session the
/// change was made under.
struct InFlight<'a, G: RemoteGateway, S: CredentialStore> {
    sync: &'a RosterSynchronizer<G, S>,
    mutation: PendingMutation,
    generation: Option<u64>,
    settled: bool,
}

impl<G: RemoteGateway, S: CredentialStore> InFlight<'_, G, S> {
    /// Applies the authority's answer against the current roster.
    fn settle(mut self, result: Result<(), GatewayError>) -> Result<RosterChange, RosterError> {
        self.settled = true;
        let player_id = self.mutation.player_id;
        let mut inner = self.sync.state();
        release(&mut inner, player_id);

        match result {
            Ok(()) => {
                tracing::info!(%player_id, kind = %self.mutation.kind, "roster change confirmed");
                Ok(RosterChange::Applied)
            }
            Err(e) => {
                let reverted = self.compensate(&mut inner);
                tracing::warn!(
                    %player_id,
                    kind = %self.mutation.kind,
                    reverted,
                    error = %e,
                    "roster change rolled back"
                );
                Err(e.into())
            }
        }
    }

    fn compensate(&self, inner: &mut Inner) -> bool {
        if inner.generation != self.generation {
            return false;
        }
        self.mutation
            .compensate(&mut inner.members, self.sync.config.capacity)
    }
}

impl<G: RemoteGateway, S: CredentialStore> Drop for InFlight<'_, G, S> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let player_id = self.mutation.player_id;
        let mut inner = self.sync.state();
        release(&mut inner, player_id);
        let reverted = self.compensate(&mut inner);
        tracing::warn!(
            %player_id,
            kind = %self.mutation.kind,
            reverted,
            "roster change abandoned before the authority answered, rolled back"
        );
    }
}

fn release(inner: &mut Inner, player_id: PlayerId) {
    let remaining = inner.pending.get_mut(&player_id).map(|count| {
        *count -= 1;
        *count
    });
    if remaining == Some(0) {
        inner.pending.remove(&player_id);
    }
}
