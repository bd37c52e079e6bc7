//! Integration tests for league membership coordination.

use std::sync::Arc;

use courtside_gateway::{GatewayError, MockGateway};
use courtside_league::{LeagueError, MembershipCoordinator};
use courtside_protocol::{LeagueId, Route, UserId};
use courtside_session::{MemoryCredentialStore, SessionConfig, SessionState, SessionStore};
use serde_json::{json, Value};

type Session = SessionStore<MockGateway, MemoryCredentialStore>;
type Coordinator = MembershipCoordinator<MockGateway, MemoryCredentialStore>;

// =========================================================================
// Helpers
// =========================================================================

fn member_json(id: u64) -> Value {
    json!({
        "id": id,
        "email": format!("user{id}@example.com"),
        "role": "user",
        "total_fantasy_points": 0.0
    })
}

fn league_json(id: u64, owner: u64, members: &[u64]) -> Value {
    json!({
        "id": id,
        "name": format!("League {id}"),
        "owner_id": owner,
        "invite_code": format!("CODE{id}"),
        "users": members.iter().map(|&m| member_json(m)).collect::<Vec<_>>()
    })
}

/// Logs in user 1 with `role` and loads `leagues` into the coordinator.
async fn signed_in(role: &str, leagues: Value) -> (Arc<MockGateway>, Arc<Session>, Coordinator) {
    let gateway = Arc::new(MockGateway::new());
    gateway
        .respond_ok(Route::Login, json!({ "access_token": "t1" }))
        .respond_ok(
            Route::Profile,
            json!({
                "id": 1,
                "email": "user1@example.com",
                "role": role,
                "total_fantasy_points": 0.0,
                "players": [],
                "leagues": []
            }),
        )
        .respond_ok(Route::Leagues, leagues);
    let session = Arc::new(SessionStore::new(
        Arc::clone(&gateway),
        MemoryCredentialStore::new(),
        SessionConfig::default(),
    ));
    session.login("user1@example.com", "pw").await.unwrap();

    let coordinator = MembershipCoordinator::new(Arc::clone(&session));
    coordinator.list().await.unwrap();
    (gateway, session, coordinator)
}

// =========================================================================
// list() / projections
// =========================================================================

#[tokio::test]
async fn test_list_replaces_local_leagues() {
    let (gateway, _session, coordinator) =
        signed_in("user", json!([league_json(1, 1, &[1])])).await;
    gateway.respond_ok(
        Route::Leagues,
        json!([league_json(2, 5, &[5, 1]), league_json(3, 1, &[1])]),
    );

    let leagues = coordinator.list().await.unwrap();

    assert_eq!(leagues.len(), 2);
    assert!(coordinator.find(LeagueId(1)).is_none());
    assert_eq!(coordinator.find(LeagueId(2)).unwrap().members.len(), 2);
    let owned: Vec<_> = coordinator.owned_by_me().into_iter().map(|l| l.id).collect();
    assert_eq!(owned, vec![LeagueId(3)]);
}

#[tokio::test]
async fn test_list_tolerates_league_without_owner_member() {
    let (_gateway, _session, coordinator) =
        signed_in("user", json!([league_json(1, 9, &[1])])).await;

    let league = coordinator.find(LeagueId(1)).unwrap();
    assert!(!league.has_single_owner());
    assert_eq!(league.owner_id, UserId(9));
}

// =========================================================================
// create() / join()
// =========================================================================

#[tokio::test]
async fn test_create_trims_name_and_relists() {
    let (gateway, _session, coordinator) = signed_in("user", json!([])).await;
    gateway
        .respond_ok(Route::CreateLeague, league_json(7, 1, &[1]))
        .respond_ok(Route::Leagues, json!([league_json(7, 1, &[1])]));

    let league = coordinator.create("  Friday Hoops  ").await.unwrap();

    assert_eq!(league.id, LeagueId(7));
    let calls = gateway.calls();
    let create = calls.iter().find(|c| c.path == "/leagues" && c.body.is_some()).unwrap();
    assert_eq!(create.body, Some(json!({ "name": "Friday Hoops" })));
    assert_eq!(coordinator.leagues().len(), 1);
    assert!(coordinator.can_delete(LeagueId(7)));
}

#[tokio::test]
async fn test_create_blank_name_invalid_without_request() {
    let (gateway, _session, coordinator) = signed_in("user", json!([])).await;
    let calls_before = gateway.call_count();

    let err = coordinator.create("   ").await.unwrap_err();

    assert!(matches!(err, LeagueError::InvalidInput(_)));
    assert_eq!(gateway.call_count(), calls_before);
}

#[tokio::test]
async fn test_create_succeeds_even_if_relist_fails() {
    let (gateway, _session, coordinator) =
        signed_in("user", json!([league_json(1, 1, &[1])])).await;
    gateway
        .respond_ok(Route::CreateLeague, league_json(7, 1, &[1]))
        .respond(Route::Leagues, Err(GatewayError::Unreachable("timeout".into())));

    let league = coordinator.create("New").await.unwrap();

    assert_eq!(league.id, LeagueId(7));
    // The stale list is kept until the next successful listing.
    assert_eq!(coordinator.leagues().len(), 1);
}

#[tokio::test]
async fn test_join_encodes_invite_code_and_relists() {
    let (gateway, _session, coordinator) = signed_in("user", json!([])).await;
    gateway
        .respond_ok(Route::JoinLeague("AB 12"), league_json(4, 2, &[2, 1]))
        .respond_ok(Route::Leagues, json!([league_json(4, 2, &[2, 1])]));

    let league = coordinator.join(" AB 12 ").await.unwrap();

    assert_eq!(league.id, LeagueId(4));
    assert_eq!(gateway.calls_to(Route::JoinLeague("AB 12")), 1);
    assert!(
        gateway.calls().iter().any(|c| c.path == "/leagues/join/AB%2012"),
        "invite code must be percent-encoded"
    );
    assert!(!coordinator.can_delete(LeagueId(4)));
}

#[tokio::test]
async fn test_join_invalid_code_surfaces_rejection() {
    let (gateway, _session, coordinator) = signed_in("user", json!([])).await;
    gateway.respond(
        Route::JoinLeague("NOPE"),
        Err(GatewayError::rejected("Invalid invite code")),
    );

    let err = coordinator.join("NOPE").await.unwrap_err();

    assert_eq!(err.to_string(), "Invalid invite code");
    assert_eq!(gateway.calls_to(Route::Leagues), 1, "no relist after failure");
}

#[tokio::test]
async fn test_join_blank_code_invalid_without_request() {
    let (gateway, _session, coordinator) = signed_in("user", json!([])).await;
    let calls_before = gateway.call_count();

    let err = coordinator.join("").await.unwrap_err();

    assert!(matches!(err, LeagueError::InvalidInput(_)));
    assert_eq!(gateway.call_count(), calls_before);
}

#[tokio::test]
async fn test_join_dot_segment_code_invalid_without_request() {
    let (gateway, _session, coordinator) = signed_in("user", json!([])).await;
    let calls_before = gateway.call_count();

    for code in ["..", " . "] {
        let err = coordinator.join(code).await.unwrap_err();
        assert!(matches!(err, LeagueError::InvalidInput(_)), "{code:?}");
    }
    assert_eq!(gateway.call_count(), calls_before);
}

#[tokio::test]
async fn test_join_backslash_code_stays_on_join_route() {
    let (gateway, _session, coordinator) = signed_in("user", json!([])).await;
    gateway
        .respond_ok(Route::JoinLeague(r"a\..\.."), league_json(4, 2, &[2, 1]))
        .respond_ok(Route::Leagues, json!([]));

    coordinator.join(r"a\..\..").await.unwrap();

    let join = gateway.calls().into_iter().find(|c| c.body.is_none() && c.path.starts_with("/leagues/join/"));
    assert_eq!(join.unwrap().path, "/leagues/join/a%5C..%5C..");
}

// =========================================================================
// delete()
// =========================================================================

#[tokio::test]
async fn test_delete_by_non_owner_forbidden_without_request() {
    let (gateway, _session, coordinator) =
        signed_in("user", json!([league_json(4, 2, &[2, 1])])).await;
    let calls_before = gateway.call_count();

    let err = coordinator.delete(LeagueId(4)).await.unwrap_err();

    assert!(matches!(err, LeagueError::Forbidden(LeagueId(4))));
    assert_eq!(gateway.call_count(), calls_before);
}

#[tokio::test]
async fn test_delete_unknown_league_forbidden_for_user() {
    let (gateway, _session, coordinator) = signed_in("user", json!([])).await;
    let calls_before = gateway.call_count();

    let err = coordinator.delete(LeagueId(99)).await.unwrap_err();

    assert!(matches!(err, LeagueError::Forbidden(_)));
    assert_eq!(gateway.call_count(), calls_before);
}

#[tokio::test]
async fn test_delete_by_owner_dispatches_and_relists() {
    let (gateway, _session, coordinator) =
        signed_in("user", json!([league_json(4, 1, &[1])])).await;
    gateway
        .respond_ok(Route::DeleteLeague(LeagueId(4)), Value::Null)
        .respond_ok(Route::Leagues, json!([]));

    coordinator.delete(LeagueId(4)).await.unwrap();

    assert_eq!(gateway.calls_to(Route::DeleteLeague(LeagueId(4))), 1);
    assert!(coordinator.leagues().is_empty());
}

#[tokio::test]
async fn test_delete_by_admin_allowed_for_any_league() {
    let (gateway, _session, coordinator) =
        signed_in("admin", json!([league_json(4, 2, &[2])])).await;
    gateway
        .respond_ok(Route::DeleteLeague(LeagueId(4)), Value::Null)
        .respond_ok(Route::Leagues, json!([]));

    assert!(coordinator.can_delete(LeagueId(4)));
    coordinator.delete(LeagueId(4)).await.unwrap();

    assert_eq!(gateway.calls_to(Route::DeleteLeague(LeagueId(4))), 1);
}

#[tokio::test]
async fn test_delete_rejected_by_authority_keeps_list() {
    let (gateway, _session, coordinator) =
        signed_in("user", json!([league_json(4, 1, &[1])])).await;
    gateway.respond(
        Route::DeleteLeague(LeagueId(4)),
        Err(GatewayError::Rejected {
            status: 403,
            reason: "Not league owner".into(),
        }),
    );

    let err = coordinator.delete(LeagueId(4)).await.unwrap_err();

    assert!(matches!(err, LeagueError::Gateway(GatewayError::Rejected { status: 403, .. })));
    assert_eq!(coordinator.leagues().len(), 1);
}

// =========================================================================
// Session interaction
// =========================================================================

#[tokio::test]
async fn test_detail_unauthorized_invalidates_session() {
    let (gateway, session, coordinator) = signed_in("user", json!([])).await;
    gateway.respond(Route::LeagueDetail(LeagueId(4)), Err(GatewayError::Unauthorized));

    let err = coordinator.detail(LeagueId(4)).await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(session.state(), SessionState::Anonymous);
}

#[tokio::test]
async fn test_operations_after_logout_not_authenticated() {
    let (gateway, session, coordinator) =
        signed_in("user", json!([league_json(4, 1, &[1])])).await;
    session.logout();
    let calls_before = gateway.call_count();

    assert!(matches!(coordinator.list().await, Err(LeagueError::NotAuthenticated)));
    assert!(matches!(
        coordinator.delete(LeagueId(4)).await,
        Err(LeagueError::NotAuthenticated)
    ));
    assert!(!coordinator.can_delete(LeagueId(4)));
    assert_eq!(gateway.call_count(), calls_before);
}

#[tokio::test]
async fn test_leagues_after_invalidation_empty() {
    let (gateway, session, coordinator) =
        signed_in("user", json!([league_json(4, 1, &[1])])).await;
    gateway.respond(Route::LeagueDetail(LeagueId(4)), Err(GatewayError::Unauthorized));

    let _ = coordinator.detail(LeagueId(4)).await;

    assert_eq!(session.state(), SessionState::Anonymous);
    assert!(coordinator.leagues().is_empty());
    assert!(coordinator.find(LeagueId(4)).is_none());
}

#[tokio::test]
async fn test_list_answer_after_session_change_not_kept() {
    let (gateway, session, coordinator) = signed_in("user", json!([])).await;
    let mut gate = gateway.gate(Route::Leagues);

    let (listed, ()) = tokio::join!(coordinator.list(), async {
        gate.entered().await;
        session.logout();
        gate.release(Ok(json!([league_json(4, 1, &[1])])));
    });

    // The request was sent under the old session; its answer is stale.
    assert!(listed.is_ok());
    assert!(coordinator.leagues().is_empty());
}
