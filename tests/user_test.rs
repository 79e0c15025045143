//! Integration tests for profiles, suggestions and profile updates.

mod helpers;

use http::StatusCode;
use serde_json::json;

use helpers::{PASSWORD, TestApp, png_payload};

#[tokio::test]
async fn test_profile_lookup() {
    let app = TestApp::new().await;
    let (token, _) = app.signup("alice").await;
    app.signup("bob").await;

    let response = app
        .request("GET", "/api/users/profile/bob", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["username"], "bob");
    assert_eq!(response.body["fullName"], "BOB");
    assert!(response.body.get("passwordHash").is_none());

    let response = app
        .request("GET", "/api/users/profile/nobody", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.message(), "User not found");
}

#[tokio::test]
async fn test_suggestions_exclude_self_and_followed() {
    let app = TestApp::new().await;
    let (token, alice) = app.signup("alice").await;
    let (_, bob) = app.signup("bob").await;
    for name in ["carol", "dave", "erin", "frank"] {
        app.signup(name).await;
    }

    app.request(
        "POST",
        &format!("/api/users/follow/{}", bob["id"].as_str().unwrap()),
        None,
        Some(&token),
    )
    .await;

    let response = app
        .request("GET", "/api/users/suggested", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let suggested = response.body.as_array().unwrap();
    assert_eq!(suggested.len(), 4);
    assert!(
        suggested
            .iter()
            .all(|u| u["id"] != alice["id"] && u["id"] != bob["id"])
    );
}

#[tokio::test]
async fn test_update_profile_fields() {
    let app = TestApp::new().await;
    let (token, _) = app.signup("alice").await;

    let response = app
        .request(
            "POST",
            "/api/users/update",
            Some(json!({
                "fullName": "",
                "bio": "Down the rabbit hole",
                "link": "https://example.com/alice",
                "username": "alice_l",
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["fullName"], "ALICE");
    assert_eq!(response.body["bio"], "Down the rabbit hole");
    assert_eq!(response.body["link"], "https://example.com/alice");
    assert_eq!(response.body["username"], "alice_l");

    // The session names the identity by id, so it survives a handle change.
    let me = app.request("GET", "/api/auth/me", None, Some(&token)).await;
    assert_eq!(me.body["username"], "alice_l");
}

#[tokio::test]
async fn test_update_password_rules() {
    let app = TestApp::new().await;
    let (token, _) = app.signup("alice").await;

    let response = app
        .request(
            "POST",
            "/api/users/update",
            Some(json!({ "newPassword": "brand-new" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.message(),
        "Please provide both current password and new password"
    );

    let response = app
        .request(
            "POST",
            "/api/users/update",
            Some(json!({ "currentPassword": "wrong", "newPassword": "brand-new" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.message(), "Current password is incorrect");

    let response = app
        .request(
            "POST",
            "/api/users/update",
            Some(json!({ "currentPassword": PASSWORD, "newPassword": "brand-new" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let login = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "username": "alice", "password": "brand-new" })),
            None,
        )
        .await;
    assert_eq!(login.status, StatusCode::OK);
}

#[tokio::test]
async fn test_update_rejects_taken_handle_and_email() {
    let app = TestApp::new().await;
    let (token, _) = app.signup("alice").await;
    app.signup("bob").await;

    let response = app
        .request(
            "POST",
            "/api/users/update",
            Some(json!({ "username": "bob" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.error_code(), "CONFLICT");
    assert_eq!(response.message(), "Username is already taken");

    let response = app
        .request(
            "POST",
            "/api/users/update",
            Some(json!({ "email": "bob@example.com" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.error_code(), "CONFLICT");
    assert_eq!(response.message(), "Email is already taken");
}

#[tokio::test]
async fn test_new_avatar_releases_previous_image() {
    let app = TestApp::new().await;
    let (token, _) = app.signup("alice").await;

    let first = app
        .request(
            "POST",
            "/api/users/update",
            Some(json!({ "profileImg": png_payload() })),
            Some(&token),
        )
        .await;
    let first_url = first.body["profileImg"].as_str().unwrap().to_string();
    assert!(app.image_exists(&first_url));

    let second = app
        .request(
            "POST",
            "/api/users/update",
            Some(json!({ "profileImg": png_payload(), "coverImg": png_payload() })),
            Some(&token),
        )
        .await;
    let second_url = second.body["profileImg"].as_str().unwrap();
    assert_ne!(first_url, second_url);
    assert!(!app.image_exists(&first_url));
    assert!(app.image_exists(second_url));
    assert!(app.image_exists(second.body["coverImg"].as_str().unwrap()));
}
