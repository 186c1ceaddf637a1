//! End-to-end HTTP API tests against an in-memory database.
//!
//! Each test builds a full router and drives it with `tower::ServiceExt`,
//! exercising routing, auth, JSON encoding, and the SQLite layer together.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use infinity_db::{Database, DbConfig};
use infinity_server::auth::JwtManager;
use infinity_server::{app, AppState};

async fn test_app() -> Router {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let state = AppState {
        db,
        jwt: JwtManager::new("test-secret".to_string(), 86400),
    };
    app(state, "*")
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn put_json(uri: &str, body: Value, token: &str) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn delete(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

/// Seeds demo data and logs in as admin, returning a bearer token.
async fn seed_and_login(app: &Router) -> String {
    let (status, _) = send(app, post_json("/init-data", json!({}), None)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        app,
        post_json(
            "/auth/login",
            json!({"username": "admin", "password": "admin123"}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "bearer");

    body["access_token"].as_str().unwrap().to_string()
}

// =============================================================================
// Auth
// =============================================================================

#[tokio::test]
async fn register_login_and_access() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        post_json(
            "/auth/register",
            json!({"username": "clerk", "password": "s3cret"}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "clerk");
    assert!(body.get("password_hash").is_none());
    assert!(body.get("password").is_none());

    // Duplicate username is rejected.
    let (status, body) = send(
        &app,
        post_json(
            "/auth/register",
            json!({"username": "clerk", "password": "other"}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Username already exists");

    // Wrong password.
    let (status, body) = send(
        &app,
        post_json(
            "/auth/login",
            json!({"username": "clerk", "password": "wrong"}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Invalid credentials");

    // Correct password yields a working token.
    let (status, body) = send(
        &app,
        post_json(
            "/auth/login",
            json!({"username": "clerk", "password": "s3cret"}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["access_token"].as_str().unwrap().to_string();

    let (status, _) = send(&app, get("/dashboard/stats", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn protected_routes_require_valid_token() {
    let app = test_app().await;

    let (status, _) = send(&app, get("/products", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, get("/products", Some("not-a-jwt"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Invalid authentication credentials");

    // Tampered token signed with the right shape but wrong secret.
    let other = JwtManager::new("other-secret".to_string(), 86400);
    let forged = other.generate_token("admin").unwrap();
    let (status, _) = send(&app, get("/products", Some(&forged))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Seeding & Dashboard
// =============================================================================

#[tokio::test]
async fn seed_then_stats() {
    let app = test_app().await;

    let (status, body) = send(&app, post_json("/init-data", json!({}), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Sample data initialized successfully");
    assert_eq!(body["admin_credentials"]["username"], "admin");

    // Second call is a no-op.
    let (status, body) = send(&app, post_json("/init-data", json!({}), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Sample data already exists");

    let (_, login) = send(
        &app,
        post_json(
            "/auth/login",
            json!({"username": "admin", "password": "admin123"}),
            None,
        ),
    )
    .await;
    let token = login["access_token"].as_str().unwrap();

    let (status, stats) = send(&app, get("/dashboard/stats", Some(token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_products"], 12);
    assert_eq!(stats["total_categories"], 4);
    assert_eq!(stats["total_customers"], 5);
    assert_eq!(stats["total_bills"], 0);
    assert_eq!(stats["low_stock_products"], 0);
    assert_eq!(stats["today_sales"], 0.0);
}

// =============================================================================
// Categories
// =============================================================================

#[tokio::test]
async fn category_crud_and_delete_guard() {
    let app = test_app().await;
    let token = seed_and_login(&app).await;

    let (status, created) = send(
        &app,
        post_json(
            "/categories",
            json!({"name": "Magazines", "description": "Periodicals"}),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let cat_id = created["id"].as_str().unwrap().to_string();

    let (status, updated) = send(
        &app,
        put_json(
            &format!("/categories/{cat_id}"),
            json!({"name": "Periodicals", "description": ""}),
            &token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Periodicals");

    // Attach a product, then the delete must be rejected.
    let (status, _) = send(
        &app,
        post_json(
            "/products",
            json!({
                "name": "Weekly Digest",
                "category_id": cat_id,
                "price": 120.0,
                "quantity": 20
            }),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, delete(&format!("/categories/{cat_id}"), &token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Cannot delete category with existing products");

    // Deleting an unknown category is a 404.
    let (status, _) = send(&app, delete("/categories/does-not-exist", &token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Products
// =============================================================================

#[tokio::test]
async fn product_partial_update_and_category_join() {
    let app = test_app().await;
    let token = seed_and_login(&app).await;

    let (_, products) = send(&app, get("/products", Some(&token))).await;
    let product = &products.as_array().unwrap()[0];
    let product_id = product["id"].as_str().unwrap().to_string();
    assert_eq!(product["name"], "Mathematics Textbook Grade 10");
    assert_eq!(product["price"], 850.0);
    assert_eq!(product["category_name"], "School Books");

    // Partial update touching only the price.
    let (status, updated) = send(
        &app,
        put_json(
            &format!("/products/{product_id}"),
            json!({"price": 899.5}),
            &token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["price"], 899.5);
    assert_eq!(updated["name"], "Mathematics Textbook Grade 10");
    assert_eq!(updated["quantity"], 50);

    // Renaming the category shows up in the product listing without any
    // product write.
    let (_, categories) = send(&app, get("/categories", Some(&token))).await;
    let school_books = categories
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["name"] == "School Books")
        .unwrap();
    let cat_id = school_books["id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        put_json(
            &format!("/categories/{cat_id}"),
            json!({"name": "Textbooks", "description": ""}),
            &token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, products) = send(&app, get("/products", Some(&token))).await;
    let product = products
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["id"] == product_id.as_str())
        .unwrap();
    assert_eq!(product["category_name"], "Textbooks");

    // Unknown category on create is a 404.
    let (status, body) = send(
        &app,
        post_json(
            "/products",
            json!({
                "name": "Orphan",
                "category_id": "missing",
                "price": 10.0,
                "quantity": 1
            }),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Category not found");

    // Negative price is rejected.
    let (status, _) = send(
        &app,
        put_json(
            &format!("/products/{product_id}"),
            json!({"price": -5.0}),
            &token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Customers
// =============================================================================

#[tokio::test]
async fn customer_crud() {
    let app = test_app().await;
    let token = seed_and_login(&app).await;

    let (status, created) = send(
        &app,
        post_json(
            "/customers",
            json!({"name": "New Customer", "contact": "0700000000"}),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["email"], "");
    let id = created["id"].as_str().unwrap().to_string();

    let (status, updated) = send(
        &app,
        put_json(
            &format!("/customers/{id}"),
            json!({
                "name": "New Customer",
                "contact": "0711111111",
                "email": "new@email.com",
                "address": "1 First Lane"
            }),
            &token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["contact"], "0711111111");

    let (status, body) = send(&app, delete(&format!("/customers/{id}"), &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Customer deleted successfully");

    let (status, _) = send(&app, delete(&format!("/customers/{id}"), &token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Bills
// =============================================================================

#[tokio::test]
async fn bill_creation_decrements_stock_and_shows_in_stats() {
    let app = test_app().await;
    let token = seed_and_login(&app).await;

    let (_, products) = send(&app, get("/products", Some(&token))).await;
    let product = &products.as_array().unwrap()[0];
    let product_id = product["id"].as_str().unwrap().to_string();
    assert_eq!(product["price"], 850.0);

    let (_, customers) = send(&app, get("/customers", Some(&token))).await;
    let customer = &customers.as_array().unwrap()[0];
    let customer_id = customer["id"].as_str().unwrap().to_string();

    let (status, bill) = send(
        &app,
        post_json(
            "/bills",
            json!({
                "customer_id": customer_id,
                "items": [{"product_id": product_id, "quantity": 2}]
            }),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bill["bill_number"], "INF-00001");
    assert_eq!(bill["total"], 1700.0);
    assert_eq!(bill["customer_name"], customer["name"]);
    assert_eq!(bill["items"][0]["price"], 850.0);
    assert_eq!(bill["items"][0]["subtotal"], 1700.0);

    // Stock decremented from 50 to 48.
    let (_, products) = send(&app, get("/products", Some(&token))).await;
    let product = products
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["id"] == product_id.as_str())
        .unwrap();
    assert_eq!(product["quantity"], 48);

    // Fetch by id and list agree.
    let bill_id = bill["id"].as_str().unwrap();
    let (status, fetched) = send(&app, get(&format!("/bills/{bill_id}"), Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["bill_number"], "INF-00001");

    let (_, bills) = send(&app, get("/bills", Some(&token))).await;
    assert_eq!(bills.as_array().unwrap().len(), 1);

    // Dashboard reflects the sale.
    let (_, stats) = send(&app, get("/dashboard/stats", Some(&token))).await;
    assert_eq!(stats["total_bills"], 1);
    assert_eq!(stats["today_sales"], 1700.0);
}

#[tokio::test]
async fn insufficient_stock_rejects_whole_bill() {
    let app = test_app().await;
    let token = seed_and_login(&app).await;

    let (_, products) = send(&app, get("/products", Some(&token))).await;
    let products = products.as_array().unwrap().clone();
    let first = &products[0];
    let second = &products[1];
    let first_id = first["id"].as_str().unwrap().to_string();
    let second_id = second["id"].as_str().unwrap().to_string();
    let second_name = second["name"].as_str().unwrap().to_string();
    let second_qty = second["quantity"].as_i64().unwrap();

    let (_, customers) = send(&app, get("/customers", Some(&token))).await;
    let customer_id = customers[0]["id"].as_str().unwrap().to_string();

    // First line is satisfiable, second over-asks.
    let (status, body) = send(
        &app,
        post_json(
            "/bills",
            json!({
                "customer_id": customer_id,
                "items": [
                    {"product_id": first_id, "quantity": 1},
                    {"product_id": second_id, "quantity": second_qty + 1}
                ]
            }),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["detail"],
        format!("Insufficient stock for product: {second_name}")
    );

    // Nothing committed: no bill, first product's stock untouched.
    let (_, bills) = send(&app, get("/bills", Some(&token))).await;
    assert!(bills.as_array().unwrap().is_empty());

    let (_, products_after) = send(&app, get("/products", Some(&token))).await;
    let first_after = products_after
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["id"] == first["id"])
        .unwrap();
    assert_eq!(first_after["quantity"], first["quantity"]);
}

#[tokio::test]
async fn bill_with_unknown_references() {
    let app = test_app().await;
    let token = seed_and_login(&app).await;

    // Unknown customer.
    let (status, body) = send(
        &app,
        post_json(
            "/bills",
            json!({"customer_id": "missing", "items": [{"product_id": "x", "quantity": 1}]}),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Customer not found");

    // Unknown product.
    let (_, customers) = send(&app, get("/customers", Some(&token))).await;
    let customer_id = customers[0]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        post_json(
            "/bills",
            json!({
                "customer_id": customer_id,
                "items": [{"product_id": "missing-product", "quantity": 1}]
            }),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Product not found: missing-product");

    // Empty item list.
    let (status, _) = send(
        &app,
        post_json(
            "/bills",
            json!({"customer_id": customer_id, "items": []}),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Zero quantity.
    let (_, products) = send(&app, get("/products", Some(&token))).await;
    let product_id = products[0]["id"].as_str().unwrap().to_string();
    let (status, _) = send(
        &app,
        post_json(
            "/bills",
            json!({
                "customer_id": customer_id,
                "items": [{"product_id": product_id, "quantity": 0}]
            }),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn bill_numbers_increment_across_requests() {
    let app = test_app().await;
    let token = seed_and_login(&app).await;

    let (_, products) = send(&app, get("/products", Some(&token))).await;
    let product_id = products[0]["id"].as_str().unwrap().to_string();
    let (_, customers) = send(&app, get("/customers", Some(&token))).await;
    let customer_id = customers[0]["id"].as_str().unwrap().to_string();

    for expected in ["INF-00001", "INF-00002", "INF-00003"] {
        let (status, bill) = send(
            &app,
            post_json(
                "/bills",
                json!({
                    "customer_id": customer_id,
                    "items": [{"product_id": product_id, "quantity": 1}]
                }),
                Some(&token),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(bill["bill_number"], expected);
    }
}
