mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

#[tokio::test]
async fn apply_and_move_cards_on_the_board() {
    let Some(pool) = common::db_pool().await else {
        return;
    };
    let app = common::app(pool.clone());

    let company_id = common::seed_company(&pool, "Hooli").await;
    let rival_id = common::seed_company(&pool, "Pied Piper").await;
    let candidate_id = common::seed_candidate(&pool, "Dana").await;
    let company = common::token(company_id, "company");
    let rival = common::token(rival_id, "company");
    let candidate = common::token(candidate_id, "candidate");

    let (status, body) = common::send(
        &app,
        Method::POST,
        "/api/company/jobs",
        Some(&company),
        Some(json!({ "title": "Platform Engineer", "salaryMin": 1000, "salaryMax": 2000 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let job_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = common::send(
        &app,
        Method::POST,
        "/api/candidate/applications",
        Some(&candidate),
        Some(json!({ "jobId": job_id, "coverLetter": "Hello" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["status"], "Applied");
    let application_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = common::send(
        &app,
        Method::POST,
        "/api/candidate/applications",
        Some(&candidate),
        Some(json!({ "jobId": job_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["errorCode"], "DUPLICATE_ENTRY");

    // The company hears about the new application.
    let (status, body) = common::send(
        &app,
        Method::GET,
        "/api/notifications/unread-count",
        Some(&company),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["count"], 1);

    let (status, body) = common::send(
        &app,
        Method::GET,
        "/api/notifications?unreadOnly=true",
        Some(&company),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"][0]["kind"], "application_received");

    let (status, body) = common::send(
        &app,
        Method::POST,
        "/api/notifications/read-all",
        Some(&company),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["updated"], 1);

    let status_uri = format!("/api/company/applications/{}/status", application_id);
    let moves = [
        ("Applied", StatusCode::BAD_REQUEST),
        ("Interview", StatusCode::OK),
        ("Applied", StatusCode::BAD_REQUEST),
        ("Shortlisted", StatusCode::OK),
        ("archived", StatusCode::BAD_REQUEST),
        ("Hired", StatusCode::OK),
        ("Offered", StatusCode::BAD_REQUEST),
    ];
    for (next, expected) in moves {
        let (status, body) = common::send(
            &app,
            Method::PATCH,
            &status_uri,
            Some(&company),
            Some(json!({ "status": next })),
        )
        .await;
        assert_eq!(status, expected, "move to {next}: {body}");
    }

    let (status, _) = common::send(
        &app,
        Method::PATCH,
        &status_uri,
        Some(&rival),
        Some(json!({ "status": "Rejected" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = common::send(
        &app,
        Method::GET,
        &format!("/api/company/jobs/{}/board", job_id),
        Some(&company),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let columns = body["data"]["columns"].as_array().unwrap();
    assert_eq!(columns.len(), 7);
    let hired = columns.iter().find(|c| c["status"] == "Hired").unwrap();
    assert_eq!(hired["count"], 1);

    // Three status moves reached the candidate.
    let (_, body) = common::send(
        &app,
        Method::GET,
        "/api/notifications/unread-count",
        Some(&candidate),
        None,
    )
    .await;
    assert_eq!(body["data"]["count"], 3);

    let (status, body) = common::send(
        &app,
        Method::GET,
        "/api/candidate/applications?page=1&pageSize=1",
        Some(&candidate),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let pagination = &body["data"]["pagination"];
    assert_eq!(pagination["totalItems"], 1);
    assert_eq!(pagination["currentPage"], 1);
    assert_eq!(pagination["hasNextPage"], false);
    assert_eq!(body["data"]["items"][0]["jobTitle"], "Platform Engineer");
}

#[tokio::test]
async fn closed_job_rejects_applications() {
    let Some(pool) = common::db_pool().await else {
        return;
    };
    let app = common::app(pool.clone());
    let company_id = common::seed_company(&pool, "Vandelay").await;
    let candidate_id = common::seed_candidate(&pool, "Eve").await;
    let company = common::token(company_id, "company");
    let candidate = common::token(candidate_id, "candidate");

    let (_, body) = common::send(
        &app,
        Method::POST,
        "/api/company/jobs",
        Some(&company),
        Some(json!({ "title": "Importer" })),
    )
    .await;
    let job_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = common::send(
        &app,
        Method::PATCH,
        &format!("/api/company/jobs/{}", job_id),
        Some(&company),
        Some(json!({ "status": "closed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "Closed");

    let (status, body) = common::send(
        &app,
        Method::POST,
        "/api/candidate/applications",
        Some(&candidate),
        Some(json!({ "jobId": job_id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn support_ticket_lifecycle() {
    let Some(pool) = common::db_pool().await else {
        return;
    };
    let app = common::app(pool.clone());
    let candidate_id = common::seed_candidate(&pool, "Frank").await;
    let other_id = common::seed_candidate(&pool, "Grace").await;
    let candidate = common::token(candidate_id, "candidate");
    let other = common::token(other_id, "candidate");
    let admin = common::token(uuid::Uuid::new_v4(), "admin");

    let (status, body) = common::send(
        &app,
        Method::POST,
        "/api/support/tickets",
        Some(&candidate),
        Some(json!({
            "subject": "Cannot upload CV",
            "description": "The upload button does nothing",
            "priority": "high"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["priority"], "High");
    assert_eq!(body["data"]["status"], "Open");
    let ticket_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = common::send(
        &app,
        Method::GET,
        &format!("/api/support/tickets/{}", ticket_id),
        Some(&other),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let respond_uri = format!("/api/admin/support/tickets/{}", ticket_id);
    let (status, _) = common::send(
        &app,
        Method::PATCH,
        &respond_uri,
        Some(&admin),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = common::send(
        &app,
        Method::PATCH,
        &respond_uri,
        Some(&admin),
        Some(json!({ "response": "Fixed in the latest release", "status": "resolved" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "Resolved");
    assert!(body["data"]["resolvedAt"].is_string());

    let (status, body) = common::send(
        &app,
        Method::GET,
        "/api/admin/support/tickets?status=Resolved",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .any(|t| t["id"] == ticket_id.as_str()));

    let (_, body) = common::send(
        &app,
        Method::GET,
        "/api/notifications",
        Some(&candidate),
        None,
    )
    .await;
    assert_eq!(body["data"]["items"][0]["kind"], "support_ticket");

    let (status, body) = common::send(
        &app,
        Method::GET,
        "/api/admin/dashboard",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["totalCandidates"].as_i64().unwrap() >= 2);
    assert_eq!(
        body["data"]["applicationsByStatus"]
            .as_object()
            .unwrap()
            .len(),
        7
    );
}
