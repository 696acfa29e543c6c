//! API Integration Tests
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Environment variables: DATABASE_URL, JWT_SECRET
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_error, assert_json, assert_status, check_test_env, fixtures::*, TestServer,
    TEST_USERNAME, TEST_USER_ID,
};
use reqwest::StatusCode;

async fn create_account(server: &TestServer, request: &CreateAccountRequest) -> AccountResponse {
    let response = server.post_allocating("/api/v1/accounts", request).await.unwrap();
    let applied: Applied<AccountResponse> =
        assert_json(response, StatusCode::CREATED).await.unwrap();
    applied.record
}

async fn create_group(server: &TestServer, request: &CreateGroupRequest) -> GroupResponse {
    let response = server.post_allocating("/api/v1/groups", request).await.unwrap();
    let applied: Applied<GroupResponse> =
        assert_json(response, StatusCode::CREATED).await.unwrap();
    applied.record
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_api_requires_token() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/api/v1/accounts").await.unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "MISSING_AUTHORIZATION");
}

// ============================================================================
// Account Tests
// ============================================================================

#[tokio::test]
async fn test_account_lifecycle_is_audited() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let account = create_account(&server, &CreateAccountRequest::unique("people")).await;
    assert_eq!(account.account_type, "people");
    assert!((1000..=60000).contains(&account.unix_uid));

    let path = format!("/api/v1/accounts/{}", account.id);
    let response = server
        .put_auth(&path, &serde_json::json!({ "first_name": "Ada" }))
        .await
        .unwrap();
    let updated: Applied<AccountResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(updated.record.first_name.as_deref(), Some("Ada"));
    assert_eq!(updated.record.username, account.username);

    let response = server
        .get_auth(&format!("/api/v1/accounts/by-uid/{}", account.unix_uid))
        .await
        .unwrap();
    let by_uid: AccountResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(by_uid.id, account.id);

    let response = server
        .get_auth(&format!("/api/v1/accounts/by-name/{}", account.username))
        .await
        .unwrap();
    let by_name: AccountResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(by_name.unix_uid, account.unix_uid);

    let response = server.delete_auth(&path).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server.get_auth(&path).await.unwrap();
    let code = assert_error(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(code, "UNKNOWN_ACCOUNT");

    let response = server
        .get_auth(&format!(
            "/api/v1/audit?entity_type=account&entity_id={}",
            account.id
        ))
        .await
        .unwrap();
    let entries: Vec<AuditEntryResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    let actions: Vec<&str> = entries.iter().map(|e| e.action.as_str()).collect();
    assert_eq!(actions, ["delete", "update", "create"]);
    for entry in &entries {
        assert_eq!(entry.user_id, TEST_USER_ID);
        assert_eq!(entry.username, TEST_USERNAME);
        assert_eq!(entry.ip_address, "127.0.0.1");
    }
}

#[tokio::test]
async fn test_duplicate_uid_is_rejected() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let first = create_account(&server, &CreateAccountRequest::unique("people")).await;

    let response = server
        .get_auth(&format!(
            "/api/v1/accounts/uid-check?uid={}&exclude_id=0",
            first.unix_uid
        ))
        .await
        .unwrap();
    let check: DuplicateCheckResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(check.duplicate);

    let response = server
        .get_auth(&format!(
            "/api/v1/accounts/uid-check?uid={}&exclude_id={}",
            first.unix_uid, first.id
        ))
        .await
        .unwrap();
    let check: DuplicateCheckResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(!check.duplicate);

    let mut second = CreateAccountRequest::unique("people");
    second.unix_uid = Some(first.unix_uid);
    let response = server.post_auth("/api/v1/accounts", &second).await.unwrap();
    let code = assert_error(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(code, "UID_TAKEN");
}

#[tokio::test]
async fn test_next_uid_is_past_allocated_uid() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let account = create_account(&server, &CreateAccountRequest::unique("database")).await;
    assert!((70000..=79999).contains(&account.unix_uid));

    let response = server
        .get_auth("/api/v1/accounts/next-uid?type=database")
        .await
        .unwrap();
    let next: NextIdResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(next.kind, "uid");
    assert!(next.next > account.unix_uid);
}

#[tokio::test]
async fn test_out_of_range_uid_warns() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let mut request = CreateAccountRequest::unique("people");
    request.unix_uid = Some(1_000_000 + chrono::Utc::now().timestamp_micros() % 1_000_000_000);

    let response = server.post_auth("/api/v1/accounts", &request).await.unwrap();
    let applied: Applied<AccountResponse> =
        assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(applied.warnings.len(), 1);
    assert_eq!(applied.warnings[0].kind, "uid");
    assert_eq!(applied.warnings[0].identity_type, "people");

    // free the UID again
    let response = server
        .delete_auth(&format!("/api/v1/accounts/{}", applied.record.id))
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();
}

#[tokio::test]
async fn test_system_account_needs_system_primary_group() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");

    let response = server
        .post_auth("/api/v1/accounts", &CreateAccountRequest::unique("system"))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::UNPROCESSABLE_ENTITY)
        .await
        .unwrap();
    assert_eq!(code, "PRIMARY_GROUP_REQUIRED");

    let people_group = create_group(&server, &CreateGroupRequest::unique("people")).await;
    let mut request = CreateAccountRequest::unique("system");
    request.primary_group_id = Some(people_group.id);
    let response = server.post_auth("/api/v1/accounts", &request).await.unwrap();
    let code = assert_error(response, StatusCode::UNPROCESSABLE_ENTITY)
        .await
        .unwrap();
    assert_eq!(code, "PRIMARY_GROUP_NOT_SYSTEM");

    let system_group = create_group(&server, &CreateGroupRequest::unique("system")).await;
    let mut request = CreateAccountRequest::unique("system");
    request.primary_group_id = Some(system_group.id);
    let account = create_account(&server, &request).await;
    assert_eq!(account.primary_group_id, Some(system_group.id));

    let response = server
        .delete_auth(&format!("/api/v1/groups/{}", system_group.id))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(code, "GROUP_IN_USE");
}

// ============================================================================
// Group Tests
// ============================================================================

#[tokio::test]
async fn test_group_crud() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let group = create_group(&server, &CreateGroupRequest::unique("people")).await;
    assert_eq!(group.created_by.as_deref(), Some(TEST_USERNAME));

    let path = format!("/api/v1/groups/{}", group.id);
    let response = server
        .put_auth(&path, &serde_json::json!({ "description": "renamed" }))
        .await
        .unwrap();
    let updated: Applied<GroupResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(updated.record.description, "renamed");

    let response = server
        .get_auth(&format!("/api/v1/groups?q={}", group.groupname))
        .await
        .unwrap();
    let found: Vec<GroupResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, group.id);

    let response = server.delete_auth(&path).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server
        .get_auth(&format!(
            "/api/v1/groups/gid-check?gid={}&exclude_id=0",
            group.unix_gid
        ))
        .await
        .unwrap();
    let check: DuplicateCheckResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(!check.duplicate);
}

// ============================================================================
// Membership Tests
// ============================================================================

#[tokio::test]
async fn test_membership_assign_and_remove() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let account = create_account(&server, &CreateAccountRequest::unique("people")).await;
    let group = create_group(&server, &CreateGroupRequest::unique("database")).await;
    let membership = MembershipRequest {
        account_id: account.id,
        group_id: group.id,
    };

    let response = server
        .post_auth("/api/v1/memberships", &membership)
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server
        .post_auth("/api/v1/memberships", &membership)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(code, "ALREADY_MEMBER");

    let response = server
        .get_auth(&format!("/api/v1/accounts/{}/groups", account.id))
        .await
        .unwrap();
    let groups: Vec<GroupResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].id, group.id);

    let response = server
        .delete_auth_json("/api/v1/memberships", &membership)
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server
        .get_auth(&format!("/api/v1/groups/{}/members", group.id))
        .await
        .unwrap();
    let members: Vec<AccountResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(members.is_empty());

    let response = server
        .get_auth(&format!(
            "/api/v1/audit?entity_type=account_group&entity_id={}",
            account.id
        ))
        .await
        .unwrap();
    let entries: Vec<AuditEntryResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    let actions: Vec<&str> = entries.iter().map(|e| e.action.as_str()).collect();
    assert_eq!(actions, ["remove", "assign"]);
}

#[tokio::test]
async fn test_incompatible_membership_is_rejected() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let account = create_account(&server, &CreateAccountRequest::unique("service")).await;
    let group = create_group(&server, &CreateGroupRequest::unique("people")).await;

    let response = server
        .post_auth(
            "/api/v1/memberships",
            &MembershipRequest {
                account_id: account.id,
                group_id: group.id,
            },
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::UNPROCESSABLE_ENTITY)
        .await
        .unwrap();
    assert_eq!(code, "INCOMPATIBLE_TYPES");

    let response = server
        .get_auth(&format!(
            "/api/v1/audit?entity_type=account_group&entity_id={}",
            account.id
        ))
        .await
        .unwrap();
    let entries: Vec<AuditEntryResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(entries.is_empty());
}
