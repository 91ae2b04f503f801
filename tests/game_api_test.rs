mod common;

use axum::http::{Method, StatusCode};
use carnival_backend::database::repository::CatalogRepository;
use chrono::Duration;
use serde_json::{json, Value as JsonValue};
use uuid::Uuid;

async fn category_question_ids(t: &common::TestApp, category_name: &str) -> Vec<Uuid> {
    let categories = t.store.get_categories().await.unwrap();
    let category = categories.iter().find(|c| c.name == category_name).unwrap();
    t.store
        .get_questions_by_category(category.id, 100)
        .await
        .unwrap()
        .into_iter()
        .map(|q| q.id)
        .collect()
}

async fn answer(t: &common::TestApp, token: &str, session_id: &str, question_id: Uuid, answer: &str) -> (StatusCode, JsonValue) {
    t.send(
        Method::POST,
        &format!("/api/v1/sessions/{}/answer", session_id),
        Some(token),
        Some(json!({ "question_id": question_id, "answer": answer })),
    )
    .await
}

#[tokio::test]
async fn full_node_run_reaches_leaderboard() {
    let t = common::spawn_app().await;
    let token = t.player_token("Rostam", "rostam@example.com").await;

    let (status, body) = t
        .send(Method::POST, "/api/v1/sessions/start", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "created");
    let session_id = body["session_id"].as_str().unwrap().to_string();

    let (status, body) = t
        .send(
            Method::POST,
            "/api/v1/nodes/scan",
            Some(&token),
            Some(json!({ "node_code": "NODE_001", "session_id": session_id })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session_id"], session_id.as_str());
    assert_eq!(body["node"]["number"], 1);
    let questions = body["node"]["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 5);
    assert!(questions.iter().all(|q| q.get("correct").is_none()));
    let category_name = body["node"]["category_name"].as_str().unwrap().to_string();
    assert!(category_name.starts_with("Trial"));

    let ids = category_question_ids(&t, &category_name).await;
    t.clock.advance(Duration::seconds(90));

    let (status, body) = answer(&t, &token, &session_id, ids[0], "A").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_correct"], true);
    assert_eq!(body["message"], "Correct! 4 questions remaining in this node.");
    assert!(body.get("current_score").is_none());

    for id in &ids[1..4] {
        let (status, body) = answer(&t, &token, &session_id, *id, "A").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["node_completed"], false);
    }

    let (status, body) = answer(&t, &token, &session_id, ids[4], "A").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["node_completed"], true);
    assert_eq!(body["questions_answered_in_node"], 5);
    assert_eq!(body["current_score"], 470);

    let (status, body) = t.send(Method::GET, "/api/v1/leaderboard", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let entries = body["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["rank"], 1);
    assert_eq!(entries[0]["player_name"], "Rostam");
    assert_eq!(entries[0]["final_score"], 470);
    assert_eq!(entries[0]["completion_time"], "1m30s");
}

#[tokio::test]
async fn repeated_answer_conflicts() {
    let t = common::spawn_app().await;
    let token = t.player_token("Sohrab", "sohrab@example.com").await;

    let (_, body) = t
        .send(
            Method::POST,
            "/api/v1/nodes/scan",
            Some(&token),
            Some(json!({ "node_code": "NODE_004" })),
        )
        .await;
    let session_id = body["session_id"].as_str().unwrap().to_string();
    let question_id: Uuid = body["node"]["questions"][0]["id"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();

    let (status, body) = answer(&t, &token, &session_id, question_id, "B").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_correct"], false);

    let (status, body) = answer(&t, &token, &session_id, question_id, "A").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "already_answered");
}

#[tokio::test]
async fn unknown_node_code_is_not_found() {
    let t = common::spawn_app().await;
    let token = t.player_token("Tahmineh", "tahmineh@example.com").await;

    let (status, body) = t
        .send(
            Method::POST,
            "/api/v1/nodes/scan",
            Some(&token),
            Some(json!({ "node_code": "NODE_CRYPTO_001" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "node_not_found");
}

#[tokio::test]
async fn sessions_are_private_to_their_player() {
    let t = common::spawn_app().await;
    let owner = t.player_token("Zal", "zal@example.com").await;
    let intruder = t.player_token("Div", "div@example.com").await;

    let (_, body) = t
        .send(
            Method::POST,
            "/api/v1/nodes/scan",
            Some(&owner),
            Some(json!({ "node_code": "NODE_002" })),
        )
        .await;
    let session_id = body["session_id"].as_str().unwrap().to_string();
    let question_id: Uuid = body["node"]["questions"][0]["id"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();

    let (status, body) = answer(&t, &intruder, &session_id, question_id, "A").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "session_not_found");

    let (status, _) = t
        .send(
            Method::POST,
            "/api/v1/nodes/scan",
            Some(&intruder),
            Some(json!({ "node_code": "NODE_003", "session_id": session_id })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn expired_session_rejects_play() {
    let t = common::spawn_app().await;
    let token = t.player_token("Simorgh", "simorgh@example.com").await;

    let (_, body) = t
        .send(
            Method::POST,
            "/api/v1/nodes/scan",
            Some(&token),
            Some(json!({ "node_code": "NODE_001" })),
        )
        .await;
    let session_id = body["session_id"].as_str().unwrap().to_string();
    let question_id: Uuid = body["node"]["questions"][0]["id"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();

    t.clock.advance(Duration::hours(2));

    let (status, body) = answer(&t, &token, &session_id, question_id, "A").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "session_inactive");

    let (status, body) = t
        .send(
            Method::POST,
            "/api/v1/nodes/scan",
            Some(&token),
            Some(json!({ "node_code": "NODE_002", "session_id": session_id })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "session_expired");
}

#[tokio::test]
async fn empty_leaderboard_is_an_empty_list() {
    let t = common::spawn_app().await;
    let (status, body) = t.send(Method::GET, "/api/v1/leaderboard", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entries"], json!([]));
}
