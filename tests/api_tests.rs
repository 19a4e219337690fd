// tests/api_tests.rs

use leetkeep::{config::Config, leetcode::LeetCodeClient, routes, state::AppState};
use sqlx::postgres::PgPoolOptions;

/// Helper function to spawn the app on a random port for testing.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
async fn spawn_app() -> String {
    // Note: For Postgres, you must have a running database.
    // We'll read from DATABASE_URL environment variable.
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await
        .expect("Failed to connect to Postgres for testing. Make sure DATABASE_URL is set.");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let config = Config {
        database_url: database_url.clone(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600, // 10 minutes for tests
        rust_log: "error".to_string(),
    };

    let state = AppState {
        pool,
        config,
        leetcode: LeetCodeClient::new(),
    };

    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

/// Registers and logs in a fresh user; returns (token, user_id).
async fn register_and_login(address: &str, client: &reqwest::Client) -> (String, String) {
    let username = format!("u_{}", &uuid::Uuid::new_v4().to_string()[..8]);
    let password = "password123";

    client
        .post(format!("{}/api/auth/register", address))
        .json(&serde_json::json!({"username": username, "password": password}))
        .send()
        .await
        .expect("Register failed");

    let login: serde_json::Value = client
        .post(format!("{}/api/auth/login", address))
        .json(&serde_json::json!({"username": username, "password": password}))
        .send()
        .await
        .expect("Login failed")
        .json()
        .await
        .expect("Failed to parse login json");

    let token = login["token"].as_str().expect("Token not found").to_string();
    let user_id = login["user"]["id"].as_str().expect("User id not found").to_string();
    (token, user_id)
}

fn sample_question(user_id: &str) -> serde_json::Value {
    serde_json::json!({
        "title": "Two Sum",
        "content": "**Example 1:**\n\nGiven `nums`, return indices.",
        "category": "arrays",
        "solution": "def two_sum(nums, target): ...",
        "sourceLink": "https://leetcode.com/problems/two-sum/",
        "difficulty": "Easy",
        "tags": ["Array", "Hash Table"],
        "userId": user_id
    })
}

#[tokio::test]
async fn health_check_404() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .get(format!("{}/random_path_that_does_not_exist", address))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn register_works() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let unique_name = format!("u_{}", &uuid::Uuid::new_v4().to_string()[..8]);

    // Act
    let response = client
        .post(format!("{}/api/auth/register", address))
        .json(&serde_json::json!({
            "username": unique_name,
            "password": "password123"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["user"]["id"].as_str().is_some());
    assert!(body["user"].get("password").is_none());
}

#[tokio::test]
async fn register_fails_validation() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Act: Send a password that is too short
    let response = client
        .post(format!("{}/api/auth/register", address))
        .json(&serde_json::json!({
            "username": "valid_name",
            "password": "short"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let unique_name = format!("u_{}", &uuid::Uuid::new_v4().to_string()[..8]);
    let payload = serde_json::json!({"username": unique_name, "password": "password123"});

    client
        .post(format!("{}/api/auth/register", address))
        .json(&payload)
        .send()
        .await
        .unwrap();

    // Act
    let response = client
        .post(format!("{}/api/auth/register", address))
        .json(&payload)
        .send()
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Username already exists");
}

#[tokio::test]
async fn login_with_bad_credentials_is_401() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Unknown user
    let response = client
        .post(format!("{}/api/auth/login", address))
        .json(&serde_json::json!({"username": "no_such_user_here", "password": "whatever1"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn list_requires_a_token() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .get(format!("{}/api/questions", address))
        .send()
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn question_crud_flow() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let (token, user_id) = register_and_login(&address, &client).await;

    // 1. Save a question
    let save_resp = client
        .post(format!("{}/api/questions", address))
        .json(&sample_question(&user_id))
        .send()
        .await
        .unwrap();
    assert_eq!(save_resp.status().as_u16(), 201);
    let saved: serde_json::Value = save_resp.json().await.unwrap();
    let question_id = saved["question"]["id"].as_str().unwrap().to_string();
    assert_eq!(saved["question"]["difficulty"], "Easy");

    // 2. List: the new question shows up, without content/solution
    let list: serde_json::Value = client
        .get(format!("{}/api/questions?page=1&limit=10", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let questions = list["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0]["title"], "Two Sum");
    assert!(questions[0].get("content").is_none());
    assert!(questions[0].get("solution").is_none());
    assert_eq!(list["pagination"]["currentPage"], 1);
    assert_eq!(list["pagination"]["totalPages"], 1);
    assert_eq!(list["pagination"]["totalCount"], 1);
    assert_eq!(list["pagination"]["hasNextPage"], false);
    assert_eq!(list["pagination"]["hasPreviousPage"], false);

    // 3. Category filter misses
    let filtered: serde_json::Value = client
        .get(format!("{}/api/questions?category=graphs", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(filtered["questions"].as_array().unwrap().len(), 0);
    assert_eq!(filtered["pagination"]["totalCount"], 0);

    // 4. Fetch one
    let fetched: serde_json::Value = client
        .get(format!("{}/api/questions/{}", address, question_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["title"], "Two Sum");
    assert_eq!(fetched["content"], "**Example 1:**\n\nGiven `nums`, return indices.");

    // 5. Rendered view: heading, spacer, paragraph with a code span
    let rendered: serde_json::Value = client
        .get(format!("{}/api/questions/{}/rendered", address, question_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let blocks = rendered["blocks"].as_array().unwrap();
    assert_eq!(blocks[0]["kind"], "heading");
    assert_eq!(blocks[0]["text"], "Example 1:");
    assert_eq!(blocks[1]["kind"], "spacer");
    assert_eq!(blocks[2]["kind"], "paragraph");
    let segments = blocks[2]["segments"].as_array().unwrap();
    assert_eq!(segments[1]["kind"], "code");
    assert_eq!(segments[1]["text"], "nums");

    // 6. Update
    let update_resp = client
        .put(format!("{}/api/questions/{}", address, question_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({
            "title": "Two Sum (revisited)",
            "content": "New content",
            "category": "hashmaps",
            "difficulty": "Medium",
            "solution": "def solve(): ...",
            "sourceLink": ""
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(update_resp.status().as_u16(), 200);
    let updated: serde_json::Value = update_resp.json().await.unwrap();
    assert_eq!(updated["question"]["title"], "Two Sum (revisited)");
    assert_eq!(updated["question"]["category"], "hashmaps");
    assert!(updated["question"]["source_link"].is_null());

    // 7. Delete
    let delete_resp = client
        .delete(format!("{}/api/questions", address))
        .json(&serde_json::json!({"questionId": question_id, "userId": user_id}))
        .send()
        .await
        .unwrap();
    assert_eq!(delete_resp.status().as_u16(), 200);

    // 8. Gone
    let gone = client
        .get(format!("{}/api/questions/{}", address, question_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();
    assert_eq!(gone.status().as_u16(), 404);
}

#[tokio::test]
async fn save_with_unknown_category_is_400() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let (_token, user_id) = register_and_login(&address, &client).await;

    let mut payload = sample_question(&user_id);
    payload["category"] = serde_json::json!("numerology");

    // Act
    let response = client
        .post(format!("{}/api/questions", address))
        .json(&payload)
        .send()
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn save_for_unknown_user_is_404() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // A well-formed UUID that matches no user
    let payload = sample_question(&uuid::Uuid::new_v4().to_string());

    // Act
    let response = client
        .post(format!("{}/api/questions", address))
        .json(&payload)
        .send()
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn delete_with_malformed_id_is_400() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let (_token, user_id) = register_and_login(&address, &client).await;

    // Act: questionId is not a UUID, so the request must fail before storage
    let response = client
        .delete(format!("{}/api/questions", address))
        .json(&serde_json::json!({"questionId": "not-a-uuid", "userId": user_id}))
        .send()
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Invalid questionId format");
}

#[tokio::test]
async fn delete_of_foreign_question_is_403() {
    // Arrange: user A owns a question, user B tries to delete it
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let (_token_a, user_a) = register_and_login(&address, &client).await;
    let (_token_b, user_b) = register_and_login(&address, &client).await;

    let saved: serde_json::Value = client
        .post(format!("{}/api/questions", address))
        .json(&sample_question(&user_a))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let question_id = saved["question"]["id"].as_str().unwrap();

    // Act
    let response = client
        .delete(format!("{}/api/questions", address))
        .json(&serde_json::json!({"questionId": question_id, "userId": user_b}))
        .send()
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status().as_u16(), 403);
}

#[tokio::test]
async fn update_of_foreign_question_is_404() {
    // Arrange: user A owns a question, user B authenticates and edits it
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let (_token_a, user_a) = register_and_login(&address, &client).await;
    let (token_b, _user_b) = register_and_login(&address, &client).await;

    let saved: serde_json::Value = client
        .post(format!("{}/api/questions", address))
        .json(&sample_question(&user_a))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let question_id = saved["question"]["id"].as_str().unwrap();

    // Act
    let response = client
        .put(format!("{}/api/questions/{}", address, question_id))
        .header("Authorization", format!("Bearer {}", token_b))
        .json(&serde_json::json!({
            "title": "Hijacked",
            "content": "x",
            "category": "arrays",
            "difficulty": "Easy",
            "solution": "y"
        }))
        .send()
        .await
        .unwrap();

    // Assert: existence is not leaked
    assert_eq!(response.status().as_u16(), 404);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Question not found or access denied");
}

#[tokio::test]
async fn fetch_with_malformed_id_is_400() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let (token, _user_id) = register_and_login(&address, &client).await;

    // Act
    let response = client
        .get(format!("{}/api/questions/not-a-uuid", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status().as_u16(), 400);
}
