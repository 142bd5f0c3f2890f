// tests/http_tests.rs
//
// Drives the axum router end to end over the in-memory store.

use std::sync::Arc;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;
use ctxhelp_core::auth::{EDITOR_ROLE, RolePolicy};
use ctxhelp_core::http::{ROLES_HEADER, router};
use ctxhelp_core::test_utils::helpers::{course_fixture, in_memory_service};

async fn app() -> Router {
    let (svc, _repo) = in_memory_service(Arc::new(RolePolicy::default())).unwrap();
    svc.seed(course_fixture()).await.unwrap();
    router(svc)
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value, editor: bool) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if editor {
        builder = builder.header(ROLES_HEADER, EDITOR_ROLE);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn as_json(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap()
}

#[tokio::test]
async fn index_lists_entries_in_key_order() {
    let app = app().await;
    let (status, body) = send(&app, get("/ContextHelp")).await;
    assert_eq!(status, StatusCode::OK);

    let ids: Vec<i64> = as_json(&body)
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["context_help_id"].as_i64().unwrap())
        .collect();
    // (Course,-,-) (Course,-,Title) (Course,Edit,-) (Course,Edit,Title)
    assert_eq!(ids, vec![1, 3, 2, 4]);
}

#[tokio::test]
async fn details_for_missing_or_bad_ids_are_404() {
    let app = app().await;
    assert_eq!(send(&app, get("/ContextHelp/99")).await.0, StatusCode::NOT_FOUND);
    assert_eq!(send(&app, get("/ContextHelp/abc")).await.0, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, get("/ContextHelp/Edit/2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body)["action"], "Edit");
}

#[tokio::test]
async fn create_form_is_prefilled_from_query() {
    let app = app().await;
    let uri = "/ContextHelp/Create?cont=Student&act=Edit&prop=LastName";
    let (status, body) = send(&app, get(uri)).await;
    assert_eq!(status, StatusCode::OK);
    let form = as_json(&body);
    assert_eq!(form["controller"], "Student");
    assert_eq!(form["action"], "Edit");
    assert_eq!(form["property"], "LastName");
    assert_eq!(form["help_text"], Value::Null);
}

#[tokio::test]
async fn editor_round_trip() {
    let app = app().await;

    let new = json!({
        "controller": "Student",
        "property": "LastName",
        "help_text": "Family name",
    });
    let (status, body) = send(&app, json_request("POST", "/ContextHelp", new, true)).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = as_json(&body)["context_help_id"].as_i64().unwrap();

    let lookup = "/help?controller=Student&action=Edit&property=LastName";
    let (status, body) = send(&app, get(lookup)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body)["help_text"], "Family name");

    let changes = json!({
        "controller": "Student",
        "property": "LastName",
        "help_text": "Surname",
    });
    let put = json_request("PUT", &format!("/ContextHelp/{id}"), changes, true);
    let (status, _) = send(&app, put).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&send(&app, get(lookup)).await.1)["help_text"], "Surname");

    let delete = Request::builder()
        .method("DELETE")
        .uri(format!("/ContextHelp/{id}"))
        .header(ROLES_HEADER, EDITOR_ROLE)
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&app, delete).await.0, StatusCode::NO_CONTENT);
    assert_eq!(send(&app, get(lookup)).await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn writes_without_editor_role_are_forbidden() {
    let app = app().await;
    let new = json!({ "controller": "Student", "help_text": "x" });
    let (status, body) = send(&app, json_request("POST", "/ContextHelp", new, false)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(as_json(&body)["error"].as_str().unwrap().contains("not allowed"));

    let delete = Request::builder()
        .method("POST")
        .uri("/ContextHelp/Delete/1")
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&app, delete).await.0, StatusCode::FORBIDDEN);
    assert_eq!(send(&app, get("/ContextHelp/1")).await.0, StatusCode::OK);
}

#[tokio::test]
async fn invalid_entries_are_unprocessable() {
    let app = app().await;
    let new = json!({ "controller": "  " });
    let (status, _) = send(&app, json_request("POST", "/ContextHelp", new, true)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn lookup_requires_a_controller() {
    let app = app().await;
    assert_eq!(send(&app, get("/help?action=Edit")).await.0, StatusCode::BAD_REQUEST);
    assert_eq!(send(&app, get("/help/render?controller=")).await.0, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn lookup_returns_the_most_specific_entry() {
    let app = app().await;
    let uri = "/help?controller=Course&action=Edit&property=Title";
    let (status, body) = send(&app, get(uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body)["context_help_id"], 4);

    let (_, body) = send(&app, get("/help?controller=Course&action=Index")).await;
    assert_eq!(as_json(&body)["context_help_id"], 1);

    let (status, _) = send(&app, get("/help?controller=Course&action=Edit&property=Credits")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn render_returns_html_fragment() {
    let app = app().await;

    let req = Request::builder()
        .uri(concat!(
            "/help/render?controller=Course&action=Edit&property=Title",
            "&label=Course%20title&caption=true"
        ))
        .header(ROLES_HEADER, EDITOR_ROLE)
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));

    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("Course title </span>"));
    assert!(html.contains("title=\"New title\""));
    assert!(html.contains("data-content=\"Changing the title\""));
    assert!(html.contains("/ContextHelp/Edit/4"));

    let uri = "/help/render?controller=Course&action=Edit&property=Credits";
    let (status, body) = send(&app, get(uri)).await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("color: transparent"));
    assert!(!html.contains("glyphicon-edit"));
}

#[tokio::test]
async fn malformed_bodies_get_json_errors() {
    let app = app().await;

    let missing_controller = json!({ "help_text": "x" });
    let req = json_request("POST", "/ContextHelp", missing_controller, true);
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(as_json(&body)["error"].as_str().unwrap().contains("controller"));

    let not_json = Request::builder()
        .method("POST")
        .uri("/ContextHelp")
        .header("content-type", "application/json")
        .header(ROLES_HEADER, EDITOR_ROLE)
        .body(Body::from("not json"))
        .unwrap();
    let (status, body) = send(&app, not_json).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(as_json(&body)["error"].is_string());

    let put = json_request("PUT", "/ContextHelp/1", json!([1, 2]), true);
    let (status, body) = send(&app, put).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(as_json(&body)["error"].is_string());
}

#[tokio::test]
async fn role_is_checked_before_the_body() {
    let app = app().await;
    let bad = Request::builder()
        .method("POST")
        .uri("/ContextHelp")
        .header("content-type", "application/json")
        .body(Body::from("not json"))
        .unwrap();
    let (status, body) = send(&app, bad).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(as_json(&body)["error"].as_str().unwrap().contains("not allowed"));
}

#[tokio::test]
async fn malformed_query_strings_get_json_errors() {
    let app = app().await;
    let (status, body) = send(&app, get("/help/render?controller=Course&caption=yes")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = as_json(&body)["error"].as_str().unwrap().to_string();
    assert!(error.starts_with("Invalid help query"));
}

#[tokio::test]
async fn ranked_lists_every_applicable_entry_best_first() {
    let app = app().await;
    let uri = "/help/ranked?controller=Course&action=Edit&property=Title";
    let (status, body) = send(&app, get(uri)).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = as_json(&body)
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["context_help_id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![4, 3]);

    let (status, body) = send(&app, get("/help/ranked?controller=Instructor")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body), json!([]));
}
