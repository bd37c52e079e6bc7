//! Typed helpers, one per route of the authority's contract.
//!
//! Each helper builds the request from a [`Route`], sends it through any
//! [`RemoteGateway`], and decodes the answer into protocol types. Routes
//! that need a bearer credential take it as a required argument.

use courtside_protocol::{
    ChangePasswordRequest, CreateLeagueRequest, Credential, JsonCodec, League,
    LeagueId, LoginRequest, Player, PlayerId, RegisterRequest, Route,
    TokenResponse, UpdateProfileRequest, UserProfile, UserSummary,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::{GatewayError, RemoteGateway};

/// Sends `route` with an optional body and returns the raw JSON answer.
pub async fn send<G: RemoteGateway, B: Serialize>(
    gateway: &G,
    route: Route<'_>,
    body: Option<&B>,
    credential: Option<&Credential>,
) -> Result<Value, GatewayError> {
    let body = body.map(|b| JsonCodec.to_value(b)).transpose()?;
    gateway
        .call(route.method(), &route.path(), body, credential)
        .await
}

async fn fetch<G: RemoteGateway, T: DeserializeOwned>(
    gateway: &G,
    route: Route<'_>,
    credential: &Credential,
) -> Result<T, GatewayError> {
    let value = send::<G, ()>(gateway, route, None, Some(credential)).await?;
    Ok(JsonCodec.from_value(value)?)
}

async fn execute<G: RemoteGateway>(
    gateway: &G,
    route: Route<'_>,
    credential: &Credential,
) -> Result<(), GatewayError> {
    send::<G, ()>(gateway, route, None, Some(credential)).await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Account
// ---------------------------------------------------------------------------

/// `POST /login`: exchanges email and password for a credential.
pub async fn login<G: RemoteGateway>(
    gateway: &G,
    request: &LoginRequest,
) -> Result<Credential, GatewayError> {
    let value = send(gateway, Route::Login, Some(request), None).await?;
    let token: TokenResponse = JsonCodec.from_value(value)?;
    Ok(token.into_credential()?)
}

/// `POST /register`.
pub async fn register<G: RemoteGateway>(
    gateway: &G,
    request: &RegisterRequest,
) -> Result<UserSummary, GatewayError> {
    let value = send(gateway, Route::Register, Some(request), None).await?;
    Ok(JsonCodec.from_value(value)?)
}

/// `GET /users/me`.
pub async fn fetch_profile<G: RemoteGateway>(
    gateway: &G,
    credential: &Credential,
) -> Result<UserProfile, GatewayError> {
    fetch(gateway, Route::Profile, credential).await
}

/// `PUT /users/me/change-password`.
pub async fn change_password<G: RemoteGateway>(
    gateway: &G,
    credential: &Credential,
    request: &ChangePasswordRequest,
) -> Result<(), GatewayError> {
    send(gateway, Route::ChangePassword, Some(request), Some(credential))
        .await?;
    Ok(())
}

/// `PUT /users/me`.
pub async fn update_profile<G: RemoteGateway>(
    gateway: &G,
    credential: &Credential,
    request: &UpdateProfileRequest,
) -> Result<UserProfile, GatewayError> {
    let value =
        send(gateway, Route::UpdateProfile, Some(request), Some(credential))
            .await?;
    Ok(JsonCodec.from_value(value)?)
}

// ---------------------------------------------------------------------------
// Players and roster
// ---------------------------------------------------------------------------

/// `GET /players`.
pub async fn list_players<G: RemoteGateway>(
    gateway: &G,
    credential: &Credential,
) -> Result<Vec<Player>, GatewayError> {
    fetch(gateway, Route::Players, credential).await
}

/// `GET /me/team`.
pub async fn fetch_roster<G: RemoteGateway>(
    gateway: &G,
    credential: &Credential,
) -> Result<Vec<Player>, GatewayError> {
    fetch(gateway, Route::Roster, credential).await
}

/// `POST /me/team/players/{id}`.
pub async fn add_to_roster<G: RemoteGateway>(
    gateway: &G,
    credential: &Credential,
    player_id: PlayerId,
) -> Result<(), GatewayError> {
    execute(gateway, Route::AddToRoster(player_id), credential).await
}

/// `DELETE /me/team/players/{id}`.
pub async fn remove_from_roster<G: RemoteGateway>(
    gateway: &G,
    credential: &Credential,
    player_id: PlayerId,
) -> Result<(), GatewayError> {
    execute(gateway, Route::RemoveFromRoster(player_id), credential).await
}

/// `GET /leaderboard`. The authority defines the ranking order; it is
/// returned untouched.
pub async fn leaderboard<G: RemoteGateway>(
    gateway: &G,
    credential: &Credential,
) -> Result<Vec<UserProfile>, GatewayError> {
    fetch(gateway, Route::Leaderboard, credential).await
}

// ---------------------------------------------------------------------------
// Leagues
// ---------------------------------------------------------------------------

/// `POST /leagues`.
pub async fn create_league<G: RemoteGateway>(
    gateway: &G,
    credential: &Credential,
    request: &CreateLeagueRequest,
) -> Result<League, GatewayError> {
    let value =
        send(gateway, Route::CreateLeague, Some(request), Some(credential))
            .await?;
    Ok(JsonCodec.from_value(value)?)
}

/// `GET /leagues`.
pub async fn list_leagues<G: RemoteGateway>(
    gateway: &G,
    credential: &Credential,
) -> Result<Vec<League>, GatewayError> {
    fetch(gateway, Route::Leagues, credential).await
}

/// `GET /leagues/{id}`.
pub async fn league_detail<G: RemoteGateway>(
    gateway: &G,
    credential: &Credential,
    league_id: LeagueId,
) -> Result<League, GatewayError> {
    fetch(gateway, Route::LeagueDetail(league_id), credential).await
}

/// `POST /leagues/join/{inviteCode}`.
pub async fn join_league<G: RemoteGateway>(
    gateway: &G,
    credential: &Credential,
    invite_code: &str,
) -> Result<League, GatewayError> {
    fetch(gateway, Route::JoinLeague(invite_code), credential).await
}

/// `DELETE /leagues/{id}`.
pub async fn delete_league<G: RemoteGateway>(
    gateway: &G,
    credential: &Credential,
    league_id: LeagueId,
) -> Result<(), GatewayError> {
    execute(gateway, Route::DeleteLeague(league_id), credential).await
}
