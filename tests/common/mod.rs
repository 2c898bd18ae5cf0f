// Helpers compartilhados pelos testes de integração
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use scatole::{
    config::{AppState, Settings},
    db::{ItemStore, MemoryStore},
    models::inventory::NewItem,
    routes,
};

pub const ADMIN_PASSWORD: &str = "segreta";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub token: String,
}

pub async fn setup_test_app() -> TestApp {
    // Custo mínimo do bcrypt para o teste ser rápido
    let hash = bcrypt::hash(ADMIN_PASSWORD, 4).unwrap();
    let settings = Settings {
        jwt_secret: "test-secret".into(),
        admin_password_hash: Some(hash),
        font_dir: "/nonexistent/fonts".into(),
        ..Settings::default()
    };
    build(settings).await
}

pub async fn setup_app_without_admin() -> TestApp {
    build(Settings::default()).await
}

async fn build(settings: Settings) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::from_stores(store.clone(), store.clone(), &settings);
    let token = match state.auth_service.login_admin(ADMIN_PASSWORD).await {
        Ok(token) => token,
        Err(_) => String::new(),
    };
    TestApp {
        router: routes::app(state),
        store,
        token,
    }
}

pub fn new_item(code: &str, description: &str, on_hand: i32, minimum: i32, target: i32) -> NewItem {
    NewItem {
        code: code.into(),
        description: description.into(),
        pieces_per_box: 250,
        on_hand,
        committed: 0,
        incoming: 0,
        minimum,
        target,
        unit_cost: Decimal::new(1850, 2),
        visible: true,
    }
}

impl TestApp {
    pub async fn seed(&self, item: NewItem) -> Uuid {
        self.store.insert_item(&item).await.unwrap().id
    }

    pub async fn request(&self, method: &str, uri: &str, body: Option<Value>, admin: bool) -> (StatusCode, Vec<u8>) {
        let mut builder = Request::builder().method(method).uri(uri);
        if admin {
            builder = builder.header("Authorization", format!("Bearer {}", self.token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header("Content-Type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    pub async fn json(&self, method: &str, uri: &str, body: Option<Value>, admin: bool) -> (StatusCode, Value) {
        let (status, bytes) = self.request(method, uri, body, admin).await;
        let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, value)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.json("GET", uri, None, false).await
    }

    pub async fn get_in_language(&self, uri: &str, accept_language: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .uri(uri)
            .header("Accept-Language", accept_language)
            .body(Body::empty())
            .unwrap();
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }
}
