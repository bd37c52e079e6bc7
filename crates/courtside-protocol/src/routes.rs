//! The authority's request contract as a typed route table.
//!
//! Each [`Route`] variant is one row of the contract: it knows its HTTP
//! method, its path, and whether a bearer credential must accompany it.
//! Components build requests from routes instead of formatting paths by
//! hand, so a path typo can only happen in one place.

use std::fmt;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::{LeagueId, PlayerId};

/// Characters escaped when an invite code is placed in a path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// HTTP method of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Returns `true` for methods that change state on the authority.
    pub fn is_mutating(self) -> bool {
        !matches!(self, Self::Get)
    }

    /// The method name as it appears on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every operation the client can request from the authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    Login,
    Register,
    Profile,
    ChangePassword,
    UpdateProfile,
    Players,
    Roster,
    AddToRoster(PlayerId),
    RemoveFromRoster(PlayerId),
    Leaderboard,
    CreateLeague,
    Leagues,
    LeagueDetail(LeagueId),
    JoinLeague(&'a str),
    DeleteLeague(LeagueId),
}

impl Route<'_> {
    /// HTTP method of the route.
    pub fn method(&self) -> Method {
        match self {
            Self::Profile
            | Self::Players
            | Self::Roster
            | Self::Leaderboard
            | Self::Leagues
            | Self::LeagueDetail(_) => Method::Get,
            Self::Login
            | Self::Register
            | Self::AddToRoster(_)
            | Self::CreateLeague
            | Self::JoinLeague(_) => Method::Post,
            Self::ChangePassword | Self::UpdateProfile => Method::Put,
            Self::RemoveFromRoster(_) | Self::DeleteLeague(_) => {
                Method::Delete
            }
        }
    }

    /// Path of the route, relative to the authority's base URL.
    pub fn path(&self) -> String {
        match self {
            Self::Login => "/login".into(),
            Self::Register => "/register".into(),
            Self::Profile | Self::UpdateProfile => "/users/me".into(),
            Self::ChangePassword => "/users/me/change-password".into(),
            Self::Players => "/players".into(),
            Self::Roster => "/me/team".into(),
            Self::AddToRoster(id) | Self::RemoveFromRoster(id) => {
                format!("/me/team/players/{}", id.0)
            }
            Self::Leaderboard => "/leaderboard".into(),
            Self::CreateLeague | Self::Leagues => "/leagues".into(),
            Self::LeagueDetail(id) | Self::DeleteLeague(id) => {
                format!("/leagues/{}", id.0)
            }
            Self::JoinLeague(code) => {
                format!("/leagues/join/{}", encode_segment(code))
            }
        }
    }

    /// Whether the route must carry a bearer credential.
    ///
    /// Only login and registration are reachable anonymously.
    pub fn requires_credential(&self) -> bool {
        !matches!(self, Self::Login | Self::Register)
    }
}

/// Encodes `raw` as one path segment. `.` and `..` are escaped too, since
/// URL normalization would otherwise resolve them against the parent path.
fn encode_segment(raw: &str) -> String {
    match raw {
        "." => "%2E".to_string(),
        ".." => "%2E%2E".to_string(),
        _ => utf8_percent_encode(raw, PATH_SEGMENT).to_string(),
    }
}

impl fmt::Display for Route<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method(), self.path())
    }
}
