mod common;

use anyhow::Result;
use axum::http::StatusCode;
use common::{status_of, submit, Cast, TestApp};
use serde_json::json;

const PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake-invoice";

#[tokio::test]
async fn facility_request_runs_the_full_approval_chain() -> Result<()> {
    let app = TestApp::new().await?;
    let cast = Cast::new(&app).await?;

    let ids = submit(&app, &cast.staff, json!([{ "category": "Facility", "item": "AC Repair" }])).await?;
    assert_eq!(ids.len(), 1);
    let id = &ids[0];
    assert_eq!(status_of(&app, &cast.staff, id).await?, "Pending Dept HOD");

    // The department head sees it in their queue
    let res = app.get("/api/queue", &cast.hod).await?;
    assert_eq!(res.json()["data"].as_array().map(Vec::len), Some(1));

    let res = app.post(&format!("/api/requests/{}/approve", id), &cast.hod, json!({})).await?;
    assert_eq!(res.status, StatusCode::OK, "{}", res.text());
    assert_eq!(res.json()["data"]["transition"]["to"], "Pending Admin");

    let res = app.post_quote(id, &cast.admin, "Cool Air Ltd", "50000", PNG).await?;
    assert_eq!(res.status, StatusCode::OK, "{}", res.text());
    let request = res.json()["data"]["request"].clone();
    assert_eq!(request["status"], "Pending SS HOD");
    assert_eq!(request["vendor"], "Cool Air Ltd");
    assert_eq!(request["initial_cost"], 50000.0);
    assert_eq!(request["has_invoice"], true);

    let res = app.get(&format!("/api/requests/{}/invoice", id), &cast.ss_hod).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.content_type.as_deref(), Some("image/png"));
    assert_eq!(res.bytes, PNG);

    let res = app.post(&format!("/api/requests/{}/approve", id), &cast.ss_hod, json!({})).await?;
    assert_eq!(res.json()["data"]["request"]["status"], "Pending SAC");

    let res = app
        .post(
            &format!("/api/requests/{}/validate", id),
            &cast.sac,
            json!({ "amount": 42000.0, "note": "Negotiated bulk rate" }),
        )
        .await?;
    assert_eq!(res.status, StatusCode::OK, "{}", res.text());
    let request = res.json()["data"]["request"].clone();
    assert_eq!(request["status"], "Pending ED");
    assert_eq!(request["amount"], 42000.0);
    assert_eq!(request["initial_cost"], 50000.0);

    let res = app.post(&format!("/api/requests/{}/approve", id), &cast.ed, json!({})).await?;
    assert_eq!(res.json()["data"]["request"]["status"], "Pending GMD");

    let res = app.post(&format!("/api/requests/{}/approve", id), &cast.gmd, json!({})).await?;
    assert_eq!(res.status, StatusCode::OK);
    let body = res.json();
    assert_eq!(body["data"]["request"]["status"], "Approved");
    let payment_id = body["data"]["payment_id"].as_str().expect("payment id").to_string();

    let res = app.get("/api/payments", &cast.accounts).await?;
    let payments = res.json()["data"].as_array().cloned().unwrap_or_default();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0]["payment_id"], payment_id.as_str());
    assert_eq!(payments[0]["amount"], 42000.0);
    assert_eq!(payments[0]["vendor"], "Cool Air Ltd");

    let res = app.post(&format!("/api/payments/{}/paid", payment_id), &cast.accounts, json!({})).await?;
    assert_eq!(res.status, StatusCode::OK, "{}", res.text());
    assert_eq!(res.json()["data"]["status"], "Paid");
    assert_eq!(status_of(&app, &cast.staff, id).await?, "Paid");

    // Settling twice is a conflict, and the queue is now empty
    let res = app.post(&format!("/api/payments/{}/paid", payment_id), &cast.accounts, json!({})).await?;
    assert_eq!(res.status, StatusCode::CONFLICT);
    let res = app.get("/api/payments", &cast.accounts).await?;
    assert_eq!(res.json()["data"].as_array().map(Vec::len), Some(0));

    let res = app.get("/api/requests/mine", &cast.staff).await?;
    assert_eq!(res.json()["data"][0]["status"], "Paid");
    Ok(())
}

#[tokio::test]
async fn stationary_lines_merge_and_are_issued_from_the_store() -> Result<()> {
    let app = TestApp::new().await?;
    let cast = Cast::new(&app).await?;

    let ids = submit(
        &app,
        &cast.staff,
        json!([
            { "category": "Stationary", "item": "A4 Paper", "qty": 2 },
            { "category": "Stationary", "item": "Biro", "qty": 10 },
            { "category": "Furniture", "item": "Chair Repair" }
        ]),
    )
    .await?;
    assert_eq!(ids.len(), 2);

    let res = app.get(&format!("/api/requests/{}", ids[0]), &cast.staff).await?;
    let store = res.json()["data"].clone();
    assert_eq!(store["category"], "Stationary");
    assert_eq!(store["item"], "A4 Paper (2), Biro (10)");
    assert_eq!(store["vendor"], "Store");
    assert_eq!(store["status"], "Pending Admin");
    assert_eq!(status_of(&app, &cast.staff, &ids[1]).await?, "Pending Dept HOD");

    // Stationary cannot be quoted, furniture cannot be issued
    let res = app.post_quote(&ids[0], &cast.admin, "Shop", "10", PNG).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = app.post(&format!("/api/requests/{}/issue", ids[0]), &cast.admin, json!({})).await?;
    assert_eq!(res.status, StatusCode::OK, "{}", res.text());
    assert_eq!(res.json()["data"]["request"]["status"], "Completed (Fulfilled)");
    Ok(())
}

#[tokio::test]
async fn cug_issue_skips_the_department_head_and_resolves_at_no_cost() -> Result<()> {
    let app = TestApp::new().await?;
    let cast = Cast::new(&app).await?;

    let ids = submit(&app, &cast.staff, json!([{ "category": "Communication", "item": "CUG Issue" }])).await?;
    assert_eq!(status_of(&app, &cast.staff, &ids[0]).await?, "Pending Admin");

    let res = app.post(&format!("/api/requests/{}/resolve", ids[0]), &cast.admin, json!({})).await?;
    assert_eq!(res.status, StatusCode::OK);
    let request = res.json()["data"]["request"].clone();
    assert_eq!(request["status"], "Completed (Resolved)");
    assert_eq!(request["amount"], 0.0);
    Ok(())
}

#[tokio::test]
async fn declines_close_the_request() -> Result<()> {
    let app = TestApp::new().await?;
    let cast = Cast::new(&app).await?;

    let ids = submit(
        &app,
        &cast.staff,
        json!([
            { "category": "Facility", "item": "Plumbing" },
            { "category": "Others", "item": "Projector for the boardroom" }
        ]),
    )
    .await?;

    let res = app.post(&format!("/api/requests/{}/decline", ids[0]), &cast.hod, json!({})).await?;
    assert_eq!(res.json()["data"]["request"]["status"], "Declined");

    app.post(&format!("/api/requests/{}/approve", ids[1]), &cast.hod, json!({})).await?;
    app.post_quote(&ids[1], &cast.admin, "AV Hub", "300000", PNG).await?;
    let res = app.post(&format!("/api/requests/{}/decline", ids[1]), &cast.ss_hod, json!({})).await?;
    assert_eq!(res.json()["data"]["request"]["status"], "Declined");

    // A declined request is out of every queue
    let res = app.get("/api/queue", &cast.sac).await?;
    assert_eq!(res.json()["data"].as_array().map(Vec::len), Some(0));
    Ok(())
}

#[tokio::test]
async fn actions_are_bound_to_role_status_and_assignee() -> Result<()> {
    let app = TestApp::new().await?;
    let cast = Cast::new(&app).await?;
    let other_hod = app
        .user_token("otherhod", facility_portal::workflow::Role::DeptHod, "Sales", "")
        .await?;

    let ids = submit(&app, &cast.staff, json!([{ "category": "Facility", "item": "Door Repair" }])).await?;
    let approve = format!("/api/requests/{}/approve", ids[0]);

    // Staff cannot approve, and another department's head is not the assignee
    let res = app.post(&approve, &cast.staff, json!({})).await?;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    let res = app.post(&approve, &other_hod, json!({})).await?;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    let res = app.get("/api/queue", &other_hod).await?;
    assert_eq!(res.json()["data"].as_array().map(Vec::len), Some(0));

    // GMD acting out of turn hits the status check
    let res = app.post(&approve, &cast.gmd, json!({})).await?;
    assert_eq!(res.status, StatusCode::CONFLICT);

    let res = app.post(&approve, &cast.hod, json!({})).await?;
    assert_eq!(res.status, StatusCode::OK);
    let res = app.post(&approve, &cast.hod, json!({})).await?;
    assert_eq!(res.status, StatusCode::CONFLICT, "second approval must not apply twice");

    // Quotes need a positive cost and an invoice
    let res = app.post_quote(&ids[0], &cast.admin, "Doors Inc", "-5", PNG).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    let res = app.post_quote(&ids[0], &cast.admin, "Doors Inc", "abc", PNG).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    let res = app.post_quote(&ids[0], &cast.admin, "Doors Inc", "100", b"").await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(status_of(&app, &cast.staff, &ids[0]).await?, "Pending Admin");
    Ok(())
}

#[tokio::test]
async fn carts_are_validated_before_anything_is_stored() -> Result<()> {
    let app = TestApp::new().await?;
    let cast = Cast::new(&app).await?;

    let res = app.post("/api/requests", &cast.staff, json!({ "items": [] })).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = app
        .post(
            "/api/requests",
            &cast.staff,
            json!({ "items": [
                { "category": "Facility", "item": "AC Repair" },
                { "category": "Furniture", "item": "Spaceship" }
            ] }),
        )
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.json()["field_errors"]["items"].is_string());

    let res = app.get("/api/requests/mine", &cast.staff).await?;
    assert_eq!(res.json()["data"].as_array().map(Vec::len), Some(0));

    // Only staff submit
    let res = app
        .post("/api/requests", &cast.hod, json!({ "items": [{ "category": "Facility", "item": "AC Repair" }] }))
        .await?;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn staff_only_see_their_own_requests() -> Result<()> {
    let app = TestApp::new().await?;
    let cast = Cast::new(&app).await?;
    let colleague = app
        .user_token("colleague", facility_portal::workflow::Role::Staff, "Finance", "hod@co.com")
        .await?;

    let ids = submit(&app, &cast.staff, json!([{ "category": "Facility", "item": "Electrical" }])).await?;

    let res = app.get(&format!("/api/requests/{}", ids[0]), &colleague).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    let res = app.get("/api/requests", &cast.staff).await?;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = app.get("/api/requests", &cast.admin).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["data"].as_array().map(Vec::len), Some(1));
    Ok(())
}

#[tokio::test]
async fn malformed_bodies_get_the_error_envelope() -> Result<()> {
    let app = TestApp::new().await?;
    let cast = Cast::new(&app).await?;
    let su = app.superuser_token().await?;

    let res = app
        .post("/api/requests", &cast.staff, json!({ "items": [{ "category": "Bogus", "item": "x" }] }))
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.content_type.as_deref(), Some("application/json"));
    let body = res.json();
    assert_eq!(body["error"], true);
    assert_eq!(body["code"], "INVALID_JSON");
    assert!(body["message"].as_str().unwrap_or_default().contains("Bogus"), "{}", body);

    let res = app
        .post("/api/users", &su, json!({ "username": "x", "password": "y", "role": "Janitor" }))
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()["code"], "INVALID_JSON");

    let res = app.post("/api/requests/abc/validate", &cast.sac, json!({ "note": "no amount" })).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()["code"], "INVALID_JSON");

    let request = axum::http::Request::builder()
        .method(axum::http::Method::POST)
        .uri("/auth/login")
        .body(axum::body::Body::from("username=super"))?;
    let res = app.send(request).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()["code"], "BAD_REQUEST");
    Ok(())
}

#[tokio::test]
async fn hod_queue_and_approval_agree_on_mixed_case_emails() -> Result<()> {
    let app = TestApp::new().await?;
    let cast = Cast::new(&app).await?;
    let shouty = app
        .user_token("shouty", facility_portal::workflow::Role::Staff, "Finance", "HOD@CO.com")
        .await?;

    let ids = submit(&app, &shouty, json!([{ "category": "Facility", "item": "AC Repair" }])).await?;

    let res = app.get("/api/queue", &cast.hod).await?;
    let queued: Vec<String> = res.json()["data"]
        .as_array()
        .map(|rows| rows.iter().filter_map(|r| r["id"].as_str().map(str::to_string)).collect())
        .unwrap_or_default();
    assert!(queued.contains(&ids[0]), "request missing from HOD queue: {:?}", queued);

    let res = app.post(&format!("/api/requests/{}/approve", ids[0]), &cast.hod, json!({})).await?;
    assert_eq!(res.status, StatusCode::OK, "{}", res.text());
    Ok(())
}

#[tokio::test]
async fn sac_cannot_record_a_negative_cost() -> Result<()> {
    let app = TestApp::new().await?;
    let cast = Cast::new(&app).await?;

    let ids = submit(&app, &cast.staff, json!([{ "category": "Facility", "item": "Generator" }])).await?;
    let id = &ids[0];
    app.post(&format!("/api/requests/{}/approve", id), &cast.hod, json!({})).await?;
    app.post_quote(id, &cast.admin, "PowerGen", "1200", PNG).await?;
    app.post(&format!("/api/requests/{}/approve", id), &cast.ss_hod, json!({})).await?;
    assert_eq!(status_of(&app, &cast.staff, id).await?, "Pending SAC");

    let res = app
        .post(&format!("/api/requests/{}/validate", id), &cast.sac, json!({ "amount": -5, "note": "" }))
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()["code"], "VALIDATION_ERROR");

    let res = app.get(&format!("/api/requests/{}", id), &cast.sac).await?;
    let request = res.json()["data"].clone();
    assert_eq!(request["status"], "Pending SAC");
    assert_eq!(request["amount"], 1200.0);
    Ok(())
}

#[tokio::test]
async fn closed_requests_reject_further_actions() -> Result<()> {
    let app = TestApp::new().await?;
    let cast = Cast::new(&app).await?;

    let ids = submit(&app, &cast.staff, json!([{ "category": "Facility", "item": "Plumbing" }])).await?;
    app.post(&format!("/api/requests/{}/decline", ids[0]), &cast.hod, json!({})).await?;

    let res = app.post(&format!("/api/requests/{}/approve", ids[0]), &cast.hod, json!({})).await?;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert!(res.json()["message"].as_str().unwrap_or_default().contains("Declined"));
    Ok(())
}
