//! Helpers shared by the HTTP integration tests

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use shared::models::UserRole;
use storefront_server::db::DbService;
use storefront_server::db::repository::user::{self as user_repo, NewUser};
use storefront_server::utils::password::hash_password;
use storefront_server::{Config, ServerState, build_router};
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "admin@shop.test";
pub const ADMIN_PASSWORD: &str = "AdminPass1";

pub struct TestApp {
    pub router: Router,
    pub state: ServerState,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(Config::with_database(":memory:")).await
    }

    pub async fn with_config(config: Config) -> Self {
        let db = DbService::in_memory().await.unwrap();
        let state = ServerState::with_db(config, db);
        Self {
            router: build_router(state.clone()),
            state,
        }
    }

    /// Send a request and decode the JSON body (`Null` when empty)
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, token, Some(body)).await
    }

    /// Insert an admin account directly and log it in
    pub async fn admin_token(&self) -> String {
        let hash = hash_password(ADMIN_PASSWORD).unwrap();
        user_repo::create(
            self.state.pool(),
            &NewUser {
                email: ADMIN_EMAIL,
                password_hash: &hash,
                first_name: "Site",
                last_name: "Admin",
                phone: None,
                role: UserRole::Admin,
            },
            0,
        )
        .await
        .unwrap();
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    pub async fn register(&self, email: &str) -> String {
        let (status, body) = self
            .post(
                "/api/v1/auth/register",
                None,
                json!({
                    "email": email,
                    "password": "Secret123",
                    "first_name": "Ada",
                    "last_name": "Obi",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"]["token"].as_str().unwrap().to_string()
    }

    pub async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .post(
                "/api/v1/auth/login",
                None,
                json!({ "email": email, "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["data"]["token"].as_str().unwrap().to_string()
    }

    /// Create a product through the admin API and return its id
    pub async fn create_product(&self, admin: &str, name: &str, price: f64, stock: i64) -> i64 {
        let (status, body) = self
            .post(
                "/api/v1/admin/products",
                Some(admin),
                json!({
                    "sku": name.to_uppercase().replace(' ', "-"),
                    "name": name,
                    "price": price,
                    "stock": stock,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"]["id"].as_i64().unwrap()
    }
}

pub fn checkout(email: &str, items: Value) -> Value {
    json!({
        "customer_email": email,
        "customer_name": "Ada Obi",
        "customer_phone": "08030000000",
        "shipping_address": "12 Marina Road",
        "shipping_city": "Lagos",
        "items": items,
    })
}
