//! The membership coordinator: the user's leagues, kept by re-listing.

use std::sync::Arc;

use courtside_gateway::{endpoints, RemoteGateway};
use courtside_protocol::{CreateLeagueRequest, Credential, League, LeagueId, UserProfile};
use courtside_session::{CredentialStore, SessionStore};
use parking_lot::{Mutex, MutexGuard};

use crate::LeagueError;

/// Creates, joins and deletes leagues on the user's behalf and keeps the
/// list of leagues the user belongs to.
///
/// The local list is only ever replaced wholesale by a fresh listing from
/// the authority; nothing is edited in place. It belongs to the session it
/// was listed under and reads as empty once that session ends.
pub struct MembershipCoordinator<G: RemoteGateway, S: CredentialStore> {
    session: Arc<SessionStore<G, S>>,
    listing: Mutex<Listing>,
}

#[derive(Default)]
struct Listing {
    leagues: Vec<League>,
    /// Session generation the list was fetched under.
    generation: Option<u64>,
}

impl<G: RemoteGateway, S: CredentialStore> MembershipCoordinator<G, S> {
    pub fn new(session: Arc<SessionStore<G, S>>) -> Self {
        Self {
            session,
            listing: Mutex::new(Listing::default()),
        }
    }

    // =====================================================================
    // Projections
    // =====================================================================

    /// The last listing received from the authority.
    pub fn leagues(&self) -> Vec<League> {
        self.listing().leagues.clone()
    }

    pub fn find(&self, league_id: LeagueId) -> Option<League> {
        self.listing()
            .leagues
            .iter()
            .find(|l| l.id == league_id)
            .cloned()
    }

    /// Whether [`delete`](Self::delete) would pass the local permission
    /// check: the user is an admin or owns the league per the local list.
    pub fn can_delete(&self, league_id: LeagueId) -> bool {
        self.session
            .profile()
            .is_some_and(|profile| self.permits_delete(&profile, league_id))
    }

    /// Leagues in the local list owned by the authenticated user.
    pub fn owned_by_me(&self) -> Vec<League> {
        let Some(profile) = self.session.profile() else {
            return Vec::new();
        };
        self.listing()
            .leagues
            .iter()
            .filter(|l| l.is_owned_by(profile.id))
            .cloned()
            .collect()
    }

    /// Forgets the local list, e.g. on logout.
    pub fn clear(&self) {
        self.listing().leagues.clear();
    }

    // =====================================================================
    // Operations
    // =====================================================================

    /// Fetches the user's leagues and replaces the local list.
    pub async fn list(&self) -> Result<Vec<League>, LeagueError> {
        let generation = self.session.generation();
        let credential = self.credential()?;
        let result = endpoints::list_leagues(&**self.session.gateway(), &credential).await;
        let leagues = self.session.observe(&credential, result)?;

        for league in leagues.iter().filter(|l| !l.has_single_owner()) {
            tracing::warn!(
                league_id = %league.id,
                owner_id = %league.owner_id,
                "league member list does not contain its owner exactly once"
            );
        }
        tracing::debug!(leagues = leagues.len(), "league list refreshed");
        *self.listing.lock() = Listing {
            leagues: leagues.clone(),
            generation: Some(generation),
        };
        Ok(leagues)
    }

    /// Creates a league named `name` (trimmed) owned by the user.
    ///
    /// # Errors
    /// - [`LeagueError::InvalidInput`] — blank name (no request)
    /// - [`LeagueError::Gateway`] — the authority refused or was unreachable
    pub async fn create(&self, name: &str) -> Result<League, LeagueError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LeagueError::InvalidInput("league name is empty".into()));
        }
        let credential = self.credential()?;

        let request = CreateLeagueRequest {
            name: name.to_string(),
        };
        let result =
            endpoints::create_league(&**self.session.gateway(), &credential, &request)
                .await;
        let league = self.session.observe(&credential, result)?;
        tracing::info!(league_id = %league.id, name = %league.name, "league created");

        self.relist("create").await;
        Ok(league)
    }

    /// Joins the league identified by `invite_code` (trimmed).
    pub async fn join(&self, invite_code: &str) -> Result<League, LeagueError> {
        let invite_code = invite_code.trim();
        if invite_code.is_empty() {
            return Err(LeagueError::InvalidInput("invite code is empty".into()));
        }
        if invite_code == "." || invite_code == ".." {
            return Err(LeagueError::InvalidInput(format!(
                "invalid invite code {invite_code:?}"
            )));
        }
        let credential = self.credential()?;

        let result =
            endpoints::join_league(&**self.session.gateway(), &credential, invite_code)
                .await;
        let league = self.session.observe(&credential, result)?;
        tracing::info!(league_id = %league.id, "joined league");

        self.relist("join").await;
        Ok(league)
    }

    /// Deletes a league.
    ///
    /// Only the owner (per the local list) or an admin may delete; anyone
    /// else gets [`LeagueError::Forbidden`] without a request. A league
    /// missing from the local list can't be shown to be owned, so it is
    /// forbidden for non-admins too.
    pub async fn delete(&self, league_id: LeagueId) -> Result<(), LeagueError> {
        let credential = self.credential()?;
        let profile = self.session.profile().ok_or(LeagueError::NotAuthenticated)?;
        if !self.permits_delete(&profile, league_id) {
            tracing::debug!(%league_id, user_id = %profile.id, "league delete refused locally");
            return Err(LeagueError::Forbidden(league_id));
        }

        let result =
            endpoints::delete_league(&**self.session.gateway(), &credential, league_id)
                .await;
        self.session.observe(&credential, result)?;
        tracing::info!(%league_id, "league deleted");

        self.relist("delete").await;
        Ok(())
    }

    /// Fetches one league with its members. Not cached.
    pub async fn detail(&self, league_id: LeagueId) -> Result<League, LeagueError> {
        let credential = self.credential()?;
        let result =
            endpoints::league_detail(&**self.session.gateway(), &credential, league_id)
                .await;
        Ok(self.session.observe(&credential, result)?)
    }

    // =====================================================================
    // Internals
    // =====================================================================

    /// Locks the list, first emptying it if it was fetched under an
    /// earlier session.
    fn listing(&self) -> MutexGuard<'_, Listing> {
        let current = self.session.generation();
        let mut listing = self.listing.lock();
        if listing.generation != Some(current) {
            listing.leagues.clear();
            listing.generation = Some(current);
        }
        listing
    }

    fn credential(&self) -> Result<Credential, LeagueError> {
        self.session.authorized().ok_or(LeagueError::NotAuthenticated)
    }

    fn permits_delete(&self, profile: &UserProfile, league_id: LeagueId) -> bool {
        profile.role.is_admin()
            || self
                .listing()
                .leagues
                .iter()
                .any(|l| l.id == league_id && l.is_owned_by(profile.id))
    }

    /// Re-lists after a confirmed mutation. The mutation already succeeded,
    /// so a failed listing is only logged.
    async fn relist(&self, after: &'static str) {
        if let Err(e) = self.list().await {
            tracing::warn!(after, error = %e, "league list refresh failed");
        }
    }
}
