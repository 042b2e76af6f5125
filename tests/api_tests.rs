//! API integration tests
//!
//! These exercise a running server (config/default.toml defaults).
//! Run with: cargo test -- --ignored

use reqwest::{redirect::Policy, Client, StatusCode};
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};

use biblos_server::models::actor::{ActorClaims, Capability};

const BASE_URL: &str = "http://localhost:8080";

/// Redirects are part of the workflow contract, so never follow them
fn client() -> Client {
    Client::builder()
        .redirect(Policy::none())
        .build()
        .expect("Failed to build client")
}

fn token_with(capabilities: Vec<Capability>) -> String {
    let secret = std::env::var("JWT_SECRET")
        .unwrap_or_else(|_| "change-this-secret-in-production".to_string());
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_secs() as i64;

    ActorClaims {
        sub: "integration-tests".to_string(),
        capabilities,
        exp: now + 3600,
        iat: now,
    }
    .create_token(&secret)
    .expect("Failed to mint token")
}

fn staff_token() -> String {
    token_with(vec![
        Capability::ManageBooks,
        Capability::ManageAuthors,
        Capability::ManageTags,
        Capability::ManageStudents,
    ])
}

/// Unique marker so runs don't trip over leftover rows
fn nonce() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    format!("{:x}", nanos)
}

async fn create_author(client: &Client, token: &str, name: &str) -> i64 {
    let response = client
        .post(format!("{}/library/author/add/", BASE_URL))
        .bearer_auth(token)
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("Failed to create author");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("author body");
    body["id"].as_i64().expect("author id")
}

async fn create_book(client: &Client, token: &str, title: &str, author_id: i64, active: bool) -> i64 {
    let response = client
        .post(format!("{}/library/add/", BASE_URL))
        .bearer_auth(token)
        .json(&json!({
            "title": title,
            "author_id": author_id,
            "published_year": 1999,
            "is_active": active
        }))
        .send()
        .await
        .expect("Failed to create book");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("book body");
    body["id"].as_i64().expect("book id")
}

async fn create_student(client: &Client, token: &str, name: &str) -> i64 {
    let response = client
        .post(format!("{}/students/", BASE_URL))
        .bearer_auth(token)
        .json(&json!({ "full_name": name }))
        .send()
        .await
        .expect("Failed to create student");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("student body");
    body["id"].as_i64().expect("student id")
}

async fn book_detail(client: &Client, book_id: i64) -> Value {
    let response = client
        .get(format!("{}/library/{}/", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to fetch detail");
    assert_eq!(response.status(), StatusCode::OK);
    response.json().await.expect("detail body")
}

async fn borrow(client: &Client, book_id: i64, student_id: i64) -> reqwest::Response {
    client
        .post(format!("{}/book/{}/borrow/", BASE_URL, book_id))
        .json(&json!({ "student_id": student_id }))
        .send()
        .await
        .expect("Failed to borrow")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = client();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_create_book_requires_authentication() {
    let client = client();

    let response = client
        .post(format!("{}/library/add/", BASE_URL))
        .json(&json!({ "title": "Intruder", "author_id": 1 }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_create_book_requires_the_capability() {
    let client = client();
    let token = token_with(vec![Capability::ManageAuthors]);

    let response = client
        .post(format!("{}/library/add/", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "title": "Intruder", "author_id": 1 }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore]
async fn test_short_title_fails_on_the_title_field() {
    let client = client();
    let token = staff_token();
    let author_id = create_author(&client, &token, &format!("Author {}", nonce())).await;

    let response = client
        .post(format!("{}/library/add/", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "title": "ab", "author_id": author_id }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("error body");
    let fields = body["fields"].as_array().expect("fields list");
    assert!(fields.iter().any(|f| f["field"] == "title"));
}

#[tokio::test]
#[ignore]
async fn test_future_publication_year_fails_on_that_field() {
    let client = client();
    let token = staff_token();
    let author_id = create_author(&client, &token, &format!("Author {}", nonce())).await;

    let response = client
        .post(format!("{}/library/add/", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "title": "From the Future", "author_id": author_id, "published_year": 3000 }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("error body");
    let fields = body["fields"].as_array().expect("fields list");
    assert!(fields.iter().any(|f| f["field"] == "published_year"));
}

#[tokio::test]
#[ignore]
async fn test_listing_filters_by_title_substring() {
    let client = client();
    let token = staff_token();
    let n = nonce();
    let author_id = create_author(&client, &token, &format!("Author {}", n)).await;

    create_book(&client, &token, &format!("zz WAR {}", n), author_id, true).await;
    create_book(&client, &token, &format!("Aa War {}", n), author_id, true).await;
    create_book(&client, &token, &format!("Peace {}", n), author_id, true).await;

    let response = client
        .get(format!("{}/library/", BASE_URL))
        .query(&[("q", format!("war {}", n))])
        .send()
        .await
        .expect("Failed to list books");
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("listing body");
    let titles: Vec<String> = body["books"]
        .as_array()
        .expect("books array")
        .iter()
        .map(|b| b["title"].as_str().expect("title").to_string())
        .collect();

    // Case-insensitive substring match, ordered by title ascending
    assert_eq!(titles, vec![format!("Aa War {}", n), format!("zz WAR {}", n)]);
}

#[tokio::test]
#[ignore]
async fn test_borrow_and_return_cycle() {
    let client = client();
    let token = staff_token();
    let n = nonce();
    let author_id = create_author(&client, &token, "Leo Tolstoy").await;
    let book_id = create_book(&client, &token, &format!("Anna Karenina {}", n), author_id, true).await;
    let student_id = create_student(&client, &token, &format!("Student {}", n)).await;

    // Fresh book: available, no open loan
    let detail = book_detail(&client, book_id).await;
    assert_eq!(detail["available"], true);
    assert!(detail["current_loan"].is_null());

    // Borrow redirects to the detail view
    let response = borrow(&client, book_id, student_id).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers()["location"],
        format!("/library/{}/", book_id).as_str()
    );

    // On loan: unavailable, the open loan carries the borrower
    let detail = book_detail(&client, book_id).await;
    assert_eq!(detail["available"], false);
    assert_eq!(detail["current_loan"]["student"]["id"], student_id);
    assert!(detail["current_loan"]["borrowed_at"].is_string());
    let loan_id = detail["current_loan"]["loan_id"].as_i64().expect("loan id");

    // Return redirects back to the detail view
    let response = client
        .post(format!("{}/loans/{}/return/", BASE_URL, loan_id))
        .send()
        .await
        .expect("Failed to return");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    // Available again
    let detail = book_detail(&client, book_id).await;
    assert_eq!(detail["available"], true);
    assert!(detail["current_loan"].is_null());
}

#[tokio::test]
#[ignore]
async fn test_double_borrow_is_a_deliberate_noop() {
    let client = client();
    let token = staff_token();
    let n = nonce();
    let author_id = create_author(&client, &token, &format!("Author {}", n)).await;
    let book_id = create_book(&client, &token, &format!("Popular {}", n), author_id, true).await;
    let first = create_student(&client, &token, &format!("First {}", n)).await;
    let second = create_student(&client, &token, &format!("Second {}", n)).await;

    let response = borrow(&client, book_id, first).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    // The second attempt also redirects; the loan set is unchanged
    let response = borrow(&client, book_id, second).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let detail = book_detail(&client, book_id).await;
    assert_eq!(detail["current_loan"]["student"]["id"], first);
}

#[tokio::test]
#[ignore]
async fn test_double_return_is_idempotent() {
    let client = client();
    let token = staff_token();
    let n = nonce();
    let author_id = create_author(&client, &token, &format!("Author {}", n)).await;
    let book_id = create_book(&client, &token, &format!("Returned {}", n), author_id, true).await;
    let student_id = create_student(&client, &token, &format!("Student {}", n)).await;

    borrow(&client, book_id, student_id).await;
    let detail = book_detail(&client, book_id).await;
    let loan_id = detail["current_loan"]["loan_id"].as_i64().expect("loan id");

    for _ in 0..2 {
        let response = client
            .post(format!("{}/loans/{}/return/", BASE_URL, loan_id))
            .send()
            .await
            .expect("Failed to return");
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    let detail = book_detail(&client, book_id).await;
    assert_eq!(detail["available"], true);
}

#[tokio::test]
#[ignore]
async fn test_get_on_borrow_path_does_not_mutate() {
    let client = client();
    let token = staff_token();
    let n = nonce();
    let author_id = create_author(&client, &token, &format!("Author {}", n)).await;
    let book_id = create_book(&client, &token, &format!("Untouched {}", n), author_id, true).await;

    let response = client
        .get(format!("{}/book/{}/borrow/", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let detail = book_detail(&client, book_id).await;
    assert_eq!(detail["available"], true);
    assert!(detail["current_loan"].is_null());
}

#[tokio::test]
#[ignore]
async fn test_inactive_book_is_not_borrowable() {
    let client = client();
    let token = staff_token();
    let n = nonce();
    let author_id = create_author(&client, &token, &format!("Author {}", n)).await;
    let book_id = create_book(&client, &token, &format!("Archived {}", n), author_id, false).await;
    let student_id = create_student(&client, &token, &format!("Student {}", n)).await;

    let response = borrow(&client, book_id, student_id).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let detail = book_detail(&client, book_id).await;
    assert!(detail["current_loan"].is_null());
}

#[tokio::test]
#[ignore]
async fn test_author_with_books_cannot_be_deleted() {
    let client = client();
    let token = staff_token();
    let n = nonce();
    let author_id = create_author(&client, &token, &format!("Owner {}", n)).await;
    let book_id = create_book(&client, &token, &format!("Owned {}", n), author_id, true).await;

    let response = client
        .delete(format!("{}/library/author/{}/", BASE_URL, author_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Both survive the rejected deletion
    let detail = book_detail(&client, book_id).await;
    assert_eq!(detail["author"]["id"], author_id);
}

#[tokio::test]
#[ignore]
async fn test_author_without_books_can_be_deleted() {
    let client = client();
    let token = staff_token();
    let author_id = create_author(&client, &token, &format!("Fleeting {}", nonce())).await;

    let response = client
        .delete(format!("{}/library/author/{}/", BASE_URL, author_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_tag_name_is_rejected() {
    let client = client();
    let token = staff_token();
    let name = format!("tag-{}", nonce());

    let response = client
        .post(format!("{}/tags/", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("Failed to create tag");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = client
        .post(format!("{}/tags/", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore]
async fn test_edit_preserves_id_and_loan_history() {
    let client = client();
    let token = staff_token();
    let n = nonce();
    let author_id = create_author(&client, &token, &format!("Author {}", n)).await;
    let book_id = create_book(&client, &token, &format!("First Title {}", n), author_id, true).await;
    let student_id = create_student(&client, &token, &format!("Student {}", n)).await;

    borrow(&client, book_id, student_id).await;

    let response = client
        .post(format!("{}/library/{}/edit/", BASE_URL, book_id))
        .bearer_auth(&token)
        .json(&json!({
            "title": format!("Second Title {}", n),
            "author_id": author_id,
            "published_year": 2001
        }))
        .send()
        .await
        .expect("Failed to update book");
    assert_eq!(response.status(), StatusCode::OK);

    let detail = book_detail(&client, book_id).await;
    assert_eq!(detail["id"], book_id);
    assert_eq!(detail["title"], format!("Second Title {}", n));
    // The open loan survived the edit
    assert_eq!(detail["current_loan"]["student"]["id"], student_id);
}
