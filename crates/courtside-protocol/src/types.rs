//! Core wire types exchanged with the authority.
//!
//! Field names follow the authority's JSON (snake_case). Where the Rust name
//! differs from the wire name (`roster` ↔ `players`, `members` ↔ `users`)
//! a `#[serde(rename)]` keeps the two in sync.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Identifier of a player in the player pool.
///
/// Newtype over `u64` so a `PlayerId` can't be passed where a `LeagueId`
/// is expected. Serialized as the bare number.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// Identifier of a registered user.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U-{}", self.0)
    }
}

/// Identifier of a league.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LeagueId(pub u64);

impl fmt::Display for LeagueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Credential
// ---------------------------------------------------------------------------

/// An opaque bearer token issued by the authority on login.
///
/// The client never inspects it. `Debug` is redacted so a credential that
/// ends up in a `tracing` field doesn't leak into logs; use
/// [`as_str`](Self::as_str) when the raw value is really needed (the
/// `Authorization` header, persistence).
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wraps a raw token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the credential, returning the raw token.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

// ---------------------------------------------------------------------------
// Players
// ---------------------------------------------------------------------------

/// A player from the pool. Reference data: the client only displays it and
/// refers to it by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub full_name: String,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub team_name: Option<String>,
    #[serde(default)]
    pub average_fantasy_points: f64,
    /// Points from the player's most recent game, when the authority has
    /// synced one.
    #[serde(default)]
    pub last_game_fantasy_points: Option<f64>,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Authorization role of a user.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    /// Returns `true` for the admin role.
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

/// The authenticated user's full profile as returned by `GET /users/me`.
///
/// The session replaces this wholesale on every successful fetch; it is the
/// reconciliation point between optimistic local edits and ground truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub total_fantasy_points: f64,
    /// Players on the user's roster.
    #[serde(rename = "players", default)]
    pub roster: Vec<Player>,
    /// Leagues the user belongs to. Informational only: league state is
    /// owned by the membership coordinator, which lists leagues itself.
    #[serde(default)]
    pub leagues: Vec<League>,
}

impl UserProfile {
    /// The nickname if one is set, otherwise the email.
    pub fn display_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.email)
    }

    /// Ids of the players on the roster, in the authority's order.
    pub fn roster_ids(&self) -> Vec<PlayerId> {
        self.roster.iter().map(|p| p.id).collect()
    }
}

/// The lighter user document: returned by `POST /register` and nested in
/// leagues as the member list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub email: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub total_fantasy_points: f64,
}

impl UserSummary {
    /// The nickname if one is set, otherwise the email.
    pub fn display_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.email)
    }
}

// ---------------------------------------------------------------------------
// Leagues
// ---------------------------------------------------------------------------

/// A league: a named group of users joined through an invite code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct League {
    pub id: LeagueId,
    pub name: String,
    pub owner_id: UserId,
    pub invite_code: String,
    #[serde(rename = "users", default)]
    pub members: Vec<UserSummary>,
}

impl League {
    /// Returns `true` if `user` is the league's owner.
    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.owner_id == user
    }

    /// The member entry of the owner, if the member list contains it.
    pub fn owner(&self) -> Option<&UserSummary> {
        self.members.iter().find(|m| m.id == self.owner_id)
    }

    /// Checks the single-owner invariant: exactly one member carries the
    /// owner's id.
    pub fn has_single_owner(&self) -> bool {
        self.members.iter().filter(|m| m.id == self.owner_id).count() == 1
    }

    /// Returns `true` if `user` appears in the member list.
    pub fn has_member(&self, user: UserId) -> bool {
        self.members.iter().any(|m| m.id == user)
    }
}

// ---------------------------------------------------------------------------
// Request and response bodies
// ---------------------------------------------------------------------------

/// Body of `POST /login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `POST /register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
}

/// Body of `PUT /users/me/change-password`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub confirm_new_password: String,
}

/// Body of `PUT /users/me`.
///
/// `nickname` is always sent; `null` clears it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub nickname: Option<String>,
}

/// Body of `POST /leagues`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateLeagueRequest {
    pub name: String,
}

/// Response of `POST /login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl TokenResponse {
    /// Extracts the bearer credential.
    ///
    /// # Errors
    /// Returns [`ProtocolError::InvalidDocument`](crate::ProtocolError) if
    /// the token is blank.
    pub fn into_credential(self) -> Result<Credential, crate::ProtocolError> {
        if self.access_token.trim().is_empty() {
            return Err(crate::ProtocolError::InvalidDocument(
                "login response carried an empty access_token".into(),
            ));
        }
        Ok(Credential::new(self.access_token))
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn member(id: u64, email: &str) -> UserSummary {
        UserSummary {
            id: UserId(id),
            email: email.into(),
            nickname: None,
            role: Role::User,
            total_fantasy_points: 0.0,
        }
    }

    // =====================================================================
    // Identity types
    // =====================================================================

    #[test]
    fn test_ids_serialize_as_bare_numbers() {
        assert_eq!(serde_json::to_value(PlayerId(42)).unwrap(), json!(42));
        assert_eq!(serde_json::to_value(LeagueId(3)).unwrap(), json!(3));
    }

    #[test]
    fn test_id_display_prefixes() {
        assert_eq!(PlayerId(7).to_string(), "P-7");
        assert_eq!(UserId(7).to_string(), "U-7");
        assert_eq!(LeagueId(7).to_string(), "L-7");
    }

    // =====================================================================
    // Credential
    // =====================================================================

    #[test]
    fn test_credential_debug_is_redacted() {
        let cred = Credential::new("eyJhbGciOiJIUzI1NiJ9.secret");
        let printed = format!("{cred:?}");
        assert!(!printed.contains("secret"));
        assert_eq!(cred.as_str(), "eyJhbGciOiJIUzI1NiJ9.secret");
    }

    #[test]
    fn test_token_response_blank_token_is_invalid() {
        let resp = TokenResponse {
            access_token: "  ".into(),
            token_type: Some("bearer".into()),
        };
        assert!(matches!(
            resp.into_credential(),
            Err(crate::ProtocolError::InvalidDocument(_))
        ));
    }

    #[test]
    fn test_token_response_without_token_type_decodes() {
        let resp: TokenResponse =
            serde_json::from_value(json!({ "access_token": "abc" })).unwrap();
        assert_eq!(resp.into_credential().unwrap().as_str(), "abc");
    }

    // =====================================================================
    // UserProfile
    // =====================================================================

    #[test]
    fn test_user_profile_reads_roster_from_players_field() {
        let profile: UserProfile = serde_json::from_value(json!({
            "id": 1,
            "email": "coach@example.com",
            "nickname": null,
            "role": "admin",
            "total_fantasy_points": 40.5,
            "players": [
                { "id": 10, "full_name": "Stephen Curry", "position": "G",
                  "team_name": "GSW", "average_fantasy_points": 48.2 }
            ],
            "leagues": []
        }))
        .unwrap();

        assert_eq!(profile.role, Role::Admin);
        assert_eq!(profile.roster_ids(), vec![PlayerId(10)]);
        assert_eq!(profile.display_name(), "coach@example.com");
        assert_eq!(profile.roster[0].last_game_fantasy_points, None);
    }

    #[test]
    fn test_user_profile_missing_lists_default_to_empty() {
        let profile: UserProfile = serde_json::from_value(json!({
            "id": 2,
            "email": "a@b.c",
            "nickname": "Dunk",
            "role": "user",
            "total_fantasy_points": 0.0
        }))
        .unwrap();
        assert!(profile.roster.is_empty());
        assert!(profile.leagues.is_empty());
        assert_eq!(profile.display_name(), "Dunk");
    }

    #[test]
    fn test_role_unknown_value_is_rejected() {
        let result: Result<Role, _> = serde_json::from_value(json!("owner"));
        assert!(result.is_err());
    }

    // =====================================================================
    // League
    // =====================================================================

    #[test]
    fn test_league_reads_members_from_users_field() {
        let league: League = serde_json::from_value(json!({
            "id": 5,
            "name": "Bench Mob",
            "owner_id": 1,
            "invite_code": "ZX81QW",
            "users": [
                { "id": 1, "email": "o@x.y", "role": "user", "total_fantasy_points": 3.0 },
                { "id": 2, "email": "m@x.y", "role": "user", "total_fantasy_points": 1.0 }
            ]
        }))
        .unwrap();

        assert_eq!(league.members.len(), 2);
        assert!(league.has_single_owner());
        assert_eq!(league.owner().map(|o| o.id), Some(UserId(1)));
        assert!(league.is_owned_by(UserId(1)));
        assert!(!league.is_owned_by(UserId(2)));
    }

    #[test]
    fn test_league_without_owner_member_fails_invariant() {
        let league = League {
            id: LeagueId(1),
            name: "Ghost".into(),
            owner_id: UserId(9),
            invite_code: "AAAA".into(),
            members: vec![member(1, "a@x.y")],
        };
        assert!(!league.has_single_owner());
        assert!(league.owner().is_none());
        assert!(league.has_member(UserId(1)));
    }

    #[test]
    fn test_register_request_omits_missing_nickname() {
        let body = RegisterRequest {
            email: "a@b.c".into(),
            password: "pw".into(),
            nickname: None,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "email": "a@b.c", "password": "pw" })
        );
    }

    #[test]
    fn test_update_profile_request_sends_null_nickname() {
        let body = UpdateProfileRequest { nickname: None };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "nickname": null })
        );
    }
}
