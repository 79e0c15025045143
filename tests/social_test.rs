//! Integration tests for the follow and like toggles.

mod helpers;

use std::sync::Arc;

use http::StatusCode;
use serde_json::{Value, json};

use helpers::TestApp;

fn id_of(user: &Value) -> String {
    user["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_follow_records_both_edges_and_one_notification() {
    let app = TestApp::new().await;
    let (alice_token, alice) = app.signup("alice").await;
    let (bob_token, bob) = app.signup("bob").await;

    let response = app
        .request(
            "POST",
            &format!("/api/users/follow/{}", id_of(&bob)),
            None,
            Some(&alice_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.message(), "User followed successfully");

    let bob_profile = app
        .request("GET", "/api/users/profile/bob", None, Some(&alice_token))
        .await;
    assert_eq!(bob_profile.body["followers"], json!([id_of(&alice)]));

    let me = app.request("GET", "/api/auth/me", None, Some(&alice_token)).await;
    assert_eq!(me.body["following"], json!([id_of(&bob)]));

    let notes = app
        .request("GET", "/api/notifications", None, Some(&bob_token))
        .await;
    assert_eq!(notes.status, StatusCode::OK);
    let notes = notes.body.as_array().unwrap().clone();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0]["type"], "follow");
    assert_eq!(notes[0]["read"], false);
    assert_eq!(notes[0]["to"], id_of(&bob));
    assert_eq!(notes[0]["from"]["id"], id_of(&alice));
    assert_eq!(notes[0]["from"]["username"], "alice");
}

#[tokio::test]
async fn test_unfollow_restores_graph_without_notifying() {
    let app = TestApp::new().await;
    let (alice_token, _) = app.signup("alice").await;
    let (bob_token, bob) = app.signup("bob").await;
    let path = format!("/api/users/follow/{}", id_of(&bob));

    app.request("POST", &path, None, Some(&alice_token)).await;
    let response = app.request("POST", &path, None, Some(&alice_token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.message(), "User unfollowed successfully");

    let me = app.request("GET", "/api/auth/me", None, Some(&alice_token)).await;
    assert_eq!(me.body["following"], json!([]));
    let bob_me = app.request("GET", "/api/auth/me", None, Some(&bob_token)).await;
    assert_eq!(bob_me.body["followers"], json!([]));

    let notes = app
        .request("GET", "/api/notifications", None, Some(&bob_token))
        .await;
    assert_eq!(notes.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_follow_errors() {
    let app = TestApp::new().await;
    let (alice_token, alice) = app.signup("alice").await;

    // Self-follow fails no matter how often it is tried.
    for _ in 0..2 {
        let response = app
            .request(
                "POST",
                &format!("/api/users/follow/{}", id_of(&alice)),
                None,
                Some(&alice_token),
            )
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error_code(), "SELF_REFERENCE_NOT_ALLOWED");
    }

    let response = app
        .request(
            "POST",
            &format!("/api/users/follow/{}", uuid::Uuid::new_v4()),
            None,
            Some(&alice_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error_code(), "NOT_FOUND");

    let response = app
        .request("POST", "/api/users/follow/not-a-uuid", None, Some(&alice_token))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_concurrent_follow_toggles_stay_consistent() {
    let app = Arc::new(TestApp::new().await);
    let (alice_token, alice) = app.signup("alice").await;
    let (bob_token, bob) = app.signup("bob").await;
    let path = format!("/api/users/follow/{}", id_of(&bob));

    let mut handles = Vec::new();
    for _ in 0..9 {
        let app = Arc::clone(&app);
        let token = alice_token.clone();
        let path = path.clone();
        handles.push(tokio::spawn(async move {
            app.request("POST", &path, None, Some(&token)).await.status
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::OK);
    }

    // An odd number of toggles ends followed, on both sides.
    let me = app.request("GET", "/api/auth/me", None, Some(&alice_token)).await;
    assert_eq!(me.body["following"], json!([id_of(&bob)]));
    let bob_me = app.request("GET", "/api/auth/me", None, Some(&bob_token)).await;
    assert_eq!(bob_me.body["followers"], json!([id_of(&alice)]));

    let notes = app
        .request("GET", "/api/notifications", None, Some(&bob_token))
        .await;
    assert_eq!(notes.body.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_like_toggles_and_notifies_owner() {
    let app = TestApp::new().await;
    let (alice_token, _) = app.signup("alice").await;
    let (bob_token, bob) = app.signup("bob").await;

    let post = app
        .request(
            "POST",
            "/api/posts/create",
            Some(json!({ "text": "like me" })),
            Some(&alice_token),
        )
        .await;
    let like_path = format!("/api/posts/like/{}", post.body["id"].as_str().unwrap());

    let liked = app.request("POST", &like_path, None, Some(&bob_token)).await;
    assert_eq!(liked.status, StatusCode::OK);
    assert_eq!(liked.body, json!([id_of(&bob)]));

    let liked_posts = app
        .request(
            "GET",
            &format!("/api/posts/likes/{}", id_of(&bob)),
            None,
            Some(&bob_token),
        )
        .await;
    assert_eq!(liked_posts.body.as_array().unwrap().len(), 1);

    let unliked = app.request("POST", &like_path, None, Some(&bob_token)).await;
    assert_eq!(unliked.status, StatusCode::OK);
    assert_eq!(unliked.body, json!([]));

    let liked_posts = app
        .request(
            "GET",
            &format!("/api/posts/likes/{}", id_of(&bob)),
            None,
            Some(&bob_token),
        )
        .await;
    assert_eq!(liked_posts.body, json!([]));

    let notes = app
        .request("GET", "/api/notifications", None, Some(&alice_token))
        .await;
    let notes = notes.body.as_array().unwrap().clone();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0]["type"], "like");
    assert_eq!(notes[0]["from"]["username"], "bob");
}

#[tokio::test]
async fn test_self_like_notifies_self_and_missing_post_is_not_found() {
    let app = TestApp::new().await;
    let (alice_token, _) = app.signup("alice").await;

    let post = app
        .request(
            "POST",
            "/api/posts/create",
            Some(json!({ "text": "mine" })),
            Some(&alice_token),
        )
        .await;
    let like_path = format!("/api/posts/like/{}", post.body["id"].as_str().unwrap());
    app.request("POST", &like_path, None, Some(&alice_token)).await;

    let notes = app
        .request("GET", "/api/notifications", None, Some(&alice_token))
        .await;
    assert_eq!(notes.body.as_array().unwrap().len(), 1);

    let response = app
        .request(
            "POST",
            &format!("/api/posts/like/{}", uuid::Uuid::new_v4()),
            None,
            Some(&alice_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
