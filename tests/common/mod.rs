#![allow(dead_code)]

//! Shared fixtures: in-memory repository fakes and an app builder, so the
//! handler tests run without Postgres or Redis.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::{Router, middleware, routing::get};
use axum_test::TestServer;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde_json::{Value, json};
use tokio::sync::Mutex;

use subtrack::api::handlers::health_handler;
use subtrack::api::middleware::auth;
use subtrack::api::routes::{protected_routes, public_routes};
use subtrack::application::services::{
    AuthService, CacheKeys, JwtConfig, SubscriptionCache, SubscriptionService,
};
use subtrack::domain::entities::{
    NewSubscription, NewUser, Subscription, SubscriptionStats, User,
};
use subtrack::domain::repositories::{SubscriptionRepository, UserRepository};
use subtrack::error::AppError;
use subtrack::infrastructure::cache::{KeyValueCache, MemoryCache};
use subtrack::state::AppState;

/// In-memory user store with the same conflict semantics as Postgres.
pub struct FakeUserRepository {
    users: Mutex<Vec<User>>,
    next_id: AtomicI64,
}

impl FakeUserRepository {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl UserRepository for FakeUserRepository {
    async fn create(&self, new: NewUser) -> Result<User, AppError> {
        let mut users = self.users.lock().await;
        if users.iter().any(|u| u.email == new.email) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "users_email_key" }),
            ));
        }

        let now = Utc::now();
        let user = User {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            name: new.name,
            email: new.email,
            password_hash: new.password_hash,
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.users.lock().await.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .lock()
            .await
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }
}

/// In-memory subscription store that counts read calls, so tests can prove
/// a cached read never reached it.
pub struct FakeSubscriptionRepository {
    subscriptions: Mutex<Vec<Subscription>>,
    next_id: AtomicI64,
    pub list_calls: AtomicUsize,
    pub stats_calls: AtomicUsize,
}

impl FakeSubscriptionRepository {
    pub fn new() -> Self {
        Self {
            subscriptions: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            list_calls: AtomicUsize::new(0),
            stats_calls: AtomicUsize::new(0),
        }
    }

    pub fn list_call_count(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn stats_call_count(&self) -> usize {
        self.stats_calls.load(Ordering::SeqCst)
    }

    /// Seeds a subscription directly, bypassing the API.
    pub async fn seed(&self, user_id: i64, new: NewSubscription, is_active: bool) -> Subscription {
        let now = Utc::now();
        let sub = Subscription {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            user_id,
            name: new.name,
            category: new.category,
            price: new.price,
            billing_cycle: new.billing_cycle,
            next_billing_date: new.next_billing_date,
            is_active,
            created_at: now,
            updated_at: now,
        };
        self.subscriptions.lock().await.push(sub.clone());
        sub
    }
}

#[async_trait]
impl SubscriptionRepository for FakeSubscriptionRepository {
    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Subscription>, AppError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let mut list: Vec<Subscription> = self
            .subscriptions
            .lock()
            .await
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Subscription>, AppError> {
        Ok(self
            .subscriptions
            .lock()
            .await
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn create(&self, new: NewSubscription, user_id: i64) -> Result<Subscription, AppError> {
        Ok(self.seed(user_id, new, true).await)
    }

    async fn update(&self, id: i64, new: NewSubscription) -> Result<Subscription, AppError> {
        let mut subs = self.subscriptions.lock().await;
        let sub = subs
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| AppError::not_found("Subscription not found", json!({ "id": id })))?;

        sub.name = new.name;
        sub.category = new.category;
        sub.price = new.price;
        sub.billing_cycle = new.billing_cycle;
        sub.next_billing_date = new.next_billing_date;
        sub.updated_at = Utc::now();
        Ok(sub.clone())
    }

    async fn delete(&self, id: i64, user_id: i64) -> Result<bool, AppError> {
        let mut subs = self.subscriptions.lock().await;
        let before = subs.len();
        subs.retain(|s| !(s.id == id && s.user_id == user_id));
        Ok(subs.len() < before)
    }

    async fn upcoming(&self, window_days: i64) -> Result<Vec<Subscription>, AppError> {
        let cutoff = Utc::now().date_naive() + Duration::days(window_days);
        Ok(self
            .subscriptions
            .lock()
            .await
            .iter()
            .filter(|s| s.is_active && s.next_billing_date <= cutoff)
            .cloned()
            .collect())
    }

    async fn stats_for_user(&self, user_id: i64) -> Result<SubscriptionStats, AppError> {
        self.stats_calls.fetch_add(1, Ordering::SeqCst);
        let subs = self.subscriptions.lock().await;
        let active: Vec<&Subscription> = subs
            .iter()
            .filter(|s| s.user_id == user_id && s.is_active)
            .collect();

        let total_monthly = if active.is_empty() {
            None
        } else {
            Some(active.iter().map(|s| s.price).sum())
        };
        let next_payment = active
            .iter()
            .min_by_key(|s| s.next_billing_date)
            .map(|s| s.price);

        Ok(SubscriptionStats {
            total_monthly,
            active_count: active.len() as i64,
            next_payment,
        })
    }

    async fn active_user_ids(&self) -> Result<Vec<i64>, AppError> {
        let mut ids: Vec<i64> = self
            .subscriptions
            .lock()
            .await
            .iter()
            .filter(|s| s.is_active)
            .map(|s| s.user_id)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }

    async fn latest_change(&self) -> Result<Option<DateTime<Utc>>, AppError> {
        Ok(self
            .subscriptions
            .lock()
            .await
            .iter()
            .map(|s| s.created_at.max(s.updated_at))
            .max())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// Everything a handler test needs: the wired state plus direct handles to
/// the fakes behind it.
pub struct TestContext {
    pub state: AppState,
    pub subscriptions: Arc<FakeSubscriptionRepository>,
    pub users: Arc<FakeUserRepository>,
    pub cache: Arc<SubscriptionCache>,
}

pub fn test_context() -> TestContext {
    let backend: Arc<dyn KeyValueCache> = Arc::new(MemoryCache::new());
    test_context_with_backend(backend)
}

pub fn test_context_with_backend(backend: Arc<dyn KeyValueCache>) -> TestContext {
    let subscriptions = Arc::new(FakeSubscriptionRepository::new());
    let users = Arc::new(FakeUserRepository::new());

    let cache = Arc::new(SubscriptionCache::new(backend, 3600, CacheKeys::default()));

    let subscription_service = Arc::new(SubscriptionService::new(
        subscriptions.clone(),
        cache.clone(),
    ));
    let auth_service = Arc::new(AuthService::new(
        users.clone(),
        JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_ttl_seconds: 300,
            refresh_ttl_seconds: 86_400,
        },
    ));

    let state = AppState::new(auth_service, subscription_service, cache.clone());

    TestContext {
        state,
        subscriptions,
        users,
        cache,
    }
}

/// Full application router wired like production, minus the outermost
/// trailing-slash layer.
pub fn app(state: AppState) -> Router {
    let protected = protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api/v1", public_routes().merge(protected))
        .with_state(state)
}

pub fn server(state: AppState) -> TestServer {
    TestServer::new(app(state)).unwrap()
}

/// Registers an account and returns its access token and user id.
pub async fn register_user(server: &TestServer, email: &str) -> (String, i64) {
    let response = server
        .post("/api/v1/register")
        .json(&json!({
            "name": "Test User",
            "email": email,
            "password": "correct horse battery staple",
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    let body = response.json::<Value>();
    let token = body["access_token"].as_str().unwrap().to_string();
    let user_id = body["user"]["id"].as_i64().unwrap();
    (token, user_id)
}

pub fn subscription_payload(name: &str, price: f64, date: &str) -> Value {
    json!({
        "name": name,
        "category": "entertainment",
        "price": price,
        "billing_cycle": "monthly",
        "next_billing_date": date,
    })
}

pub fn new_subscription(name: &str, price: f64, date: NaiveDate) -> NewSubscription {
    NewSubscription {
        name: name.to_string(),
        category: "entertainment".to_string(),
        price,
        billing_cycle: "monthly".to_string(),
        next_billing_date: date,
    }
}
