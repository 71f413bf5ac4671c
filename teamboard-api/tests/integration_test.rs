/// Integration tests for the Teamboard API
///
/// These drive the complete router over the in-memory store:
/// - Authentication (signup, login, bearer tokens)
/// - Team membership and project management rules
/// - Task edit rights, assignment checks and status changes
/// - Activity log contents and ordering
/// - Response envelopes

mod common;

use axum::http::{Method, StatusCode};
use common::{data_id, TestContext, TestUser};
use serde_json::json;
use teamboard_shared::models::user::UserRole;

/// Team created by an admin, with the given extra users joined
async fn team_with(ctx: &TestContext, admin: &TestUser, joiners: &[&TestUser]) -> String {
    let (status, body) = ctx.post("/api/teams", admin, json!({ "name": "Core" })).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let team_id = data_id(&body);

    for user in joiners {
        let (status, _) = ctx
            .post("/api/teams/join", user, json!({ "team_id": team_id }))
            .await;
        assert_eq!(status, StatusCode::OK);
    }
    team_id
}

async fn project_in(ctx: &TestContext, manager: &TestUser, team_id: &str) -> String {
    let (status, body) = ctx
        .post(
            "/api/projects",
            manager,
            json!({ "name": "Website", "description": "Marketing site", "team_id": team_id }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    data_id(&body)
}

#[tokio::test]
async fn test_health_is_public() {
    let ctx = TestContext::new();

    let (status, body) = ctx.send(Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"], "connected");
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let ctx = TestContext::new();

    let (status, body) = ctx.send(Method::GET, "/api/teams/mine", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");

    let (status, _) = ctx
        .send(Method::GET, "/api/activity", Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = ctx.send(Method::GET, "/api/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_signup_login_and_me() {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .send(
            Method::POST,
            "/api/auth/signup",
            None,
            Some(json!({
                "name": "Ada",
                "email": "ada@example.com",
                "password": "SecureP@ss123",
                "role": "ProjectManager"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["message"], "User registered successfully");
    assert_eq!(body["data"]["user"]["role"], "ProjectManager");
    assert!(body["data"]["user"].get("password_hash").is_none());

    let (status, body) = ctx
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "ada@example.com", "password": "SecureP@ss123" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let (status, body) = ctx.send(Method::GET, "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Ada");
    assert_eq!(body["data"]["email"], "ada@example.com");
}

#[tokio::test]
async fn test_signup_rejections() {
    let ctx = TestContext::new();
    let signup = |email: &str, password: &str| {
        json!({ "name": "Bob", "email": email, "password": password })
    };

    let (status, body) = ctx
        .send(Method::POST, "/api/auth/signup", None, Some(signup("bob", "SecureP@ss123")))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["details"][0]["field"], "email");

    let (status, body) = ctx
        .send(Method::POST, "/api/auth/signup", None, Some(signup("bob@example.com", "password")))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "password");

    let (status, _) = ctx
        .send(Method::POST, "/api/auth/signup", None, Some(signup("bob@example.com", "SecureP@ss123")))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = ctx
        .send(Method::POST, "/api/auth/signup", None, Some(signup("BOB@example.com", "SecureP@ss123")))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn test_login_does_not_reveal_which_part_failed() {
    let ctx = TestContext::new();
    ctx.send(
        Method::POST,
        "/api/auth/signup",
        None,
        Some(json!({ "name": "Cy", "email": "cy@example.com", "password": "SecureP@ss123" })),
    )
    .await;

    let (wrong_status, wrong) = ctx
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "cy@example.com", "password": "WrongP@ss123" })),
        )
        .await;
    let (unknown_status, unknown) = ctx
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "nobody@example.com", "password": "SecureP@ss123" })),
        )
        .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong["message"], unknown["message"]);
}

#[tokio::test]
async fn test_member_cannot_create_team() {
    let ctx = TestContext::new();
    let member = ctx.user("Bea", UserRole::Member).await;

    let (status, body) = ctx.post("/api/teams", &member, json!({ "name": "Core" })).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");
}

#[tokio::test]
async fn test_join_is_idempotent() {
    let ctx = TestContext::new();
    let admin = ctx.user("Ada", UserRole::Admin).await;
    let member = ctx.user("Bea", UserRole::Member).await;
    let team_id = team_with(&ctx, &admin, &[&member]).await;

    let (status, body) = ctx
        .post("/api/teams/join", &member, json!({ "team_id": team_id }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["members"].as_array().unwrap().len(), 2);

    let (_, body) = ctx.get(&format!("/api/activity/team/{team_id}"), &admin).await;
    let actions: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["action"].as_str().unwrap())
        .collect();
    assert_eq!(actions, vec!["Join Team", "Create Team"]);

    let (status, _) = ctx
        .post("/api/teams/join", &member, json!({ "team_id": uuid::Uuid::new_v4() }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_my_teams_populates_members() {
    let ctx = TestContext::new();
    let admin = ctx.user("Ada", UserRole::Admin).await;
    let member = ctx.user("Bea", UserRole::Member).await;
    let team_id = team_with(&ctx, &admin, &[&member]).await;

    let (status, body) = ctx.get("/api/teams/mine", &member).await;

    assert_eq!(status, StatusCode::OK);
    let teams = body["data"].as_array().unwrap();
    assert_eq!(teams.len(), 1);
    assert_eq!(teams[0]["id"], team_id.as_str());
    let names: Vec<&str> = teams[0]["members"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Ada", "Bea"]);
}

/// Membership and role gates on project creation, then edit rights on a
/// member's task.
#[tokio::test]
async fn test_collaboration_scenario() {
    let ctx = TestContext::new();
    let admin = ctx.user("Ada", UserRole::Admin).await;
    let bea = ctx.user("Bea", UserRole::Member).await;
    let cy = ctx.user("Cy", UserRole::Member).await;

    let (_, body) = ctx.post("/api/teams", &admin, json!({ "name": "Core" })).await;
    let team_id = data_id(&body);
    let new_project = json!({ "name": "Website", "team_id": team_id });

    // Not a member yet
    let (status, _) = ctx.post("/api/projects", &bea, new_project.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    ctx.post("/api/teams/join", &bea, json!({ "team_id": team_id })).await;
    ctx.post("/api/teams/join", &cy, json!({ "team_id": team_id })).await;

    // Member, but not Admin or ProjectManager
    let (status, _) = ctx.post("/api/projects", &bea, new_project.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = ctx.post("/api/projects", &admin, new_project).await;
    assert_eq!(status, StatusCode::CREATED);
    let project_id = data_id(&body);

    let (_, body) = ctx.get(&format!("/api/activity/project/{project_id}"), &admin).await;
    let entries = body["data"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["action"], "Create Project");

    let (status, body) = ctx
        .post(
            "/api/tasks",
            &bea,
            json!({ "title": "Landing page", "project_id": project_id, "assigned_to": [admin.id] }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "Todo");
    let task_id = data_id(&body);

    // Cy is neither the creator nor privileged
    let (status, _) = ctx
        .put(&format!("/api/tasks/{task_id}"), &cy, json!({ "title": "Hijacked" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = ctx
        .patch(&format!("/api/tasks/{task_id}/status"), &cy, json!({ "status": "In Progress" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "In Progress");

    // The creator may edit
    let (status, body) = ctx
        .put(&format!("/api/tasks/{task_id}"), &bea, json!({ "title": "Home page" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Home page");
    assert_eq!(body["data"]["status"], "In Progress");

    let (status, _) = ctx.delete(&format!("/api/tasks/{task_id}"), &cy).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, body) = ctx.delete(&format!("/api/tasks/{task_id}"), &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Task deleted successfully");
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_outside_assignee_rejected_and_nothing_stored() {
    let ctx = TestContext::new();
    let admin = ctx.user("Ada", UserRole::Admin).await;
    let outsider = ctx.user("Olly", UserRole::Member).await;
    let team_id = team_with(&ctx, &admin, &[]).await;
    let project_id = project_in(&ctx, &admin, &team_id).await;

    let (status, body) = ctx
        .post(
            "/api/tasks",
            &admin,
            json!({ "title": "Launch", "project_id": project_id, "assigned_to": [admin.id, outsider.id] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_assignment");
    assert_eq!(body["details"].as_array().unwrap().len(), 1);
    assert_eq!(body["details"][0]["field"], "assigned_to");

    let (_, body) = ctx.get(&format!("/api/tasks/{project_id}"), &admin).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_not_found_is_decided_before_access() {
    let ctx = TestContext::new();
    let admin = ctx.user("Ada", UserRole::Admin).await;
    let outsider = ctx.user("Olly", UserRole::Admin).await;
    let team_id = team_with(&ctx, &admin, &[]).await;
    let project_id = project_in(&ctx, &admin, &team_id).await;
    let missing = uuid::Uuid::new_v4();

    let (status, _) = ctx.get(&format!("/api/tasks/{project_id}"), &outsider).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = ctx.get(&format!("/api/tasks/{missing}"), &outsider).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Project not found");

    let (status, _) = ctx
        .patch(&format!("/api/tasks/{missing}/status"), &admin, json!({ "status": "Completed" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = ctx.get("/api/projects/not-a-uuid", &admin).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "team_id");
}

#[tokio::test]
async fn test_status_moves_freely() {
    let ctx = TestContext::new();
    let admin = ctx.user("Ada", UserRole::Admin).await;
    let member = ctx.user("Bea", UserRole::Member).await;
    let team_id = team_with(&ctx, &admin, &[&member]).await;
    let project_id = project_in(&ctx, &admin, &team_id).await;
    let (_, body) = ctx
        .post("/api/tasks", &admin, json!({ "title": "Ship", "project_id": project_id }))
        .await;
    let task_id = data_id(&body);
    let uri = format!("/api/tasks/{task_id}/status");

    for status in ["Completed", "Todo", "QA Complete", "In Progress"] {
        let (code, body) = ctx.patch(&uri, &member, json!({ "status": status })).await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(body["data"]["status"], status);
    }

    let (code, body) = ctx.patch(&uri, &member, json!({ "status": "Blocked" })).await;
    assert_eq!(code, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_task_update_can_clear_fields() {
    let ctx = TestContext::new();
    let admin = ctx.user("Ada", UserRole::Admin).await;
    let member = ctx.user("Bea", UserRole::Member).await;
    let team_id = team_with(&ctx, &admin, &[&member]).await;
    let project_id = project_in(&ctx, &admin, &team_id).await;
    let (_, body) = ctx
        .post(
            "/api/tasks",
            &admin,
            json!({
                "title": "Ship",
                "description": "Before Friday",
                "project_id": project_id,
                "assigned_to": [member.id]
            }),
        )
        .await;
    let task_id = data_id(&body);

    let (status, body) = ctx
        .put(
            &format!("/api/tasks/{task_id}"),
            &admin,
            json!({ "description": "", "assigned_to": [] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Ship");
    assert_eq!(body["data"]["description"], "");
    assert!(body["data"]["assigned_to"].as_array().unwrap().is_empty());

    let (status, body) = ctx
        .put(&format!("/api/tasks/{task_id}"), &admin, json!({ "title": "   " }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "title");
}

#[tokio::test]
async fn test_list_tasks_populates_users() {
    let ctx = TestContext::new();
    let admin = ctx.user("Ada", UserRole::Admin).await;
    let member = ctx.user("Bea", UserRole::Member).await;
    let team_id = team_with(&ctx, &admin, &[&member]).await;
    let project_id = project_in(&ctx, &admin, &team_id).await;
    ctx.post(
        "/api/tasks",
        &member,
        json!({ "title": "Ship", "project_id": project_id, "assigned_to": [admin.id, member.id] }),
    )
    .await;

    let (status, body) = ctx.get(&format!("/api/tasks/{project_id}"), &member).await;

    assert_eq!(status, StatusCode::OK);
    let task = &body["data"][0];
    assert_eq!(task["title"], "Ship");
    assert_eq!(task["creator"]["name"], "Bea");
    let assignees: Vec<&str> = task["assignees"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["name"].as_str().unwrap())
        .collect();
    assert_eq!(assignees, vec!["Ada", "Bea"]);
}

#[tokio::test]
async fn test_project_update_and_delete() {
    let ctx = TestContext::new();
    let manager = ctx.user("Pam", UserRole::ProjectManager).await;
    let admin = ctx.user("Ada", UserRole::Admin).await;
    let team_id = team_with(&ctx, &manager, &[]).await;
    let project_id = project_in(&ctx, &manager, &team_id).await;

    // Privileged, but not in the team
    let (status, _) = ctx
        .put(&format!("/api/projects/{project_id}"), &admin, json!({ "name": "Mine" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = ctx
        .put(&format!("/api/projects/{project_id}"), &manager, json!({ "description": "" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Website");
    assert_eq!(body["data"]["description"], "");

    let (status, body) = ctx.delete(&format!("/api/projects/{project_id}"), &manager).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Project deleted successfully");

    let (_, body) = ctx.get(&format!("/api/projects/{team_id}"), &manager).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_activity_newest_first_with_users() {
    let ctx = TestContext::new();
    let admin = ctx.user("Ada", UserRole::Admin).await;
    let member = ctx.user("Bea", UserRole::Member).await;
    let team_id = team_with(&ctx, &admin, &[&member]).await;
    let project_id = project_in(&ctx, &admin, &team_id).await;
    let (_, body) = ctx
        .post("/api/tasks", &member, json!({ "title": "Ship", "project_id": project_id }))
        .await;
    let task_id = data_id(&body);
    ctx.patch(&format!("/api/tasks/{task_id}/status"), &member, json!({ "status": "Completed" }))
        .await;

    let (status, body) = ctx.get("/api/activity", &member).await;
    assert_eq!(status, StatusCode::OK);
    let entries = body["data"].as_array().unwrap();
    let actions: Vec<&str> = entries.iter().map(|e| e["action"].as_str().unwrap()).collect();
    assert_eq!(
        actions,
        vec![
            "Update Task Status",
            "Create Task",
            "Create Project",
            "Join Team",
            "Create Team"
        ]
    );
    assert_eq!(entries[0]["user"]["name"], "Bea");
    assert_eq!(entries[0]["entity_type"], "Task");
    assert_eq!(
        entries[0]["description"],
        "Bea changed status of task \"Ship\" to \"Completed\""
    );

    let (status, body) = ctx.get(&format!("/api/activity/Task/{task_id}"), &member).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, body) = ctx.get(&format!("/api/activity/user/{task_id}"), &member).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "entity_type");
}

#[tokio::test]
async fn test_malformed_body_uses_error_envelope() {
    let ctx = TestContext::new();
    let admin = ctx.user("Ada", UserRole::Admin).await;

    let (status, body) = ctx.post("/api/teams", &admin, json!({ "title": "Core" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_updates_enforce_length_limits() {
    let ctx = TestContext::new();
    let admin = ctx.user("Ada", UserRole::Admin).await;
    let team_id = team_with(&ctx, &admin, &[]).await;
    let project_id = project_in(&ctx, &admin, &team_id).await;
    let (_, body) = ctx
        .post("/api/tasks", &admin, json!({ "title": "Ship", "project_id": project_id }))
        .await;
    let task_id = data_id(&body);
    let long = "x".repeat(300);

    let (status, body) = ctx
        .put(&format!("/api/tasks/{task_id}"), &admin, json!({ "title": long }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["details"][0]["field"], "title");

    let (status, body) = ctx
        .put(&format!("/api/projects/{project_id}"), &admin, json!({ "name": long }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "name");

    let (_, body) = ctx.get(&format!("/api/tasks/{project_id}"), &admin).await;
    assert_eq!(body["data"][0]["title"], "Ship");
    let (_, body) = ctx.get(&format!("/api/projects/{team_id}"), &admin).await;
    assert_eq!(body["data"][0]["name"], "Website");
}

#[tokio::test]
async fn test_privileged_signup_can_be_disabled() {
    let ctx = TestContext::with_env(&[("SIGNUP_ALLOW_PRIVILEGED_ROLES", "false")]);
    let signup = |email: &str, role: &str| {
        json!({ "name": "Eve", "email": email, "password": "SecureP@ss123", "role": role })
    };

    let (status, body) = ctx
        .send(Method::POST, "/api/auth/signup", None, Some(signup("eve@example.com", "Admin")))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    let (status, body) = ctx
        .send(Method::POST, "/api/auth/signup", None, Some(signup("eve@example.com", "Member")))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["user"]["role"], "Member");
}
