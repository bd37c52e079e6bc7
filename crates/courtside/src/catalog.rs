//! Read-only views: the player pool, the leaderboard and league details.

use courtside_gateway::{endpoints, RemoteGateway};
use courtside_protocol::{League, LeagueId, Player, UserProfile};
use courtside_session::{CredentialStore, SessionError};

use crate::{CourtsideClient, CourtsideError};

impl<G: RemoteGateway, S: CredentialStore> CourtsideClient<G, S> {
    /// Every player in the pool.
    pub async fn players(&self) -> Result<Vec<Player>, CourtsideError> {
        let credential = self
            .session
            .authorized()
            .ok_or(SessionError::NotAuthenticated)?;
        let result = endpoints::list_players(&**self.session.gateway(), &credential).await;
        Ok(self.session.observe(&credential, result)?)
    }

    /// All users ranked by the authority. The order is kept exactly as
    /// received.
    pub async fn leaderboard(&self) -> Result<Vec<UserProfile>, CourtsideError> {
        let credential = self
            .session
            .authorized()
            .ok_or(SessionError::NotAuthenticated)?;
        let result = endpoints::leaderboard(&**self.session.gateway(), &credential).await;
        Ok(self.session.observe(&credential, result)?)
    }

    /// One league with its members.
    pub async fn league_detail(&self, league_id: LeagueId) -> Result<League, CourtsideError> {
        Ok(self.leagues.detail(league_id).await?)
    }
}
