//! Integration tests for the Technest storefront runtime.
//!
//! [`FixtureShop`] is a small axum server answering the storefront
//! endpoints the way the real shop does, including its login redirect,
//! session expiry and CSRF checks. The suites in `tests/` drive the
//! runtime's handlers against it over real HTTP through
//! [`ReqwestTransport`].
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p technest-integration-tests
//! ```
//!
//! Each test starts its own shop on an ephemeral port, so suites run in
//! parallel without sharing state.

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use technest_core::api::{AddToCartRequest, SubscribeRequest};
use technest_storefront::api::ReqwestTransport;
use technest_storefront::csrf::CSRF_HEADER;
use tokio::net::TcpListener;
use tokio::sync::{Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tracing::{error, info};
use url::Url;

/// Token the shop accepts unless started with another one.
///
/// Matches the cookie the storefront test harness serves.
pub const FIXTURE_CSRF_TOKEN: &str = "test-token";

/// Units of any product the shop will put in one cart.
pub const STOCK_LIMIT: u32 = 10;

/// Login page anonymous visitors are redirected to.
pub const LOGIN_PATH: &str = "/accounts/login/";

/// Product IDs that exist.
pub const CATALOG: std::ops::RangeInclusive<i32> = 1..=5;

/// Who the shop thinks is calling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    LoggedIn,
    /// No session: login-only views redirect to [`LOGIN_PATH`].
    Anonymous,
    /// A stale session: login-only API views answer 401 JSON.
    Expired,
}

/// Everything the shop remembers between requests.
#[derive(Debug, Default)]
pub struct ShopState {
    /// Units per product ID.
    pub cart: BTreeMap<i32, u32>,
    pub wishlist: BTreeSet<i32>,
    pub subscribers: Vec<String>,
    pub session: Session,
    /// Mutations refused for a missing or wrong CSRF header.
    pub rejected_csrf: usize,
    /// Make the cart count endpoint answer with an HTML 500 page.
    pub cart_count_down: bool,
    /// Make the newsletter endpoint answer with an HTML 503 page.
    pub newsletter_down: bool,
}

impl ShopState {
    /// Total units in the cart.
    #[must_use]
    pub fn cart_units(&self) -> u32 {
        self.cart.values().sum()
    }
}

#[derive(Clone)]
struct Shop {
    state: Arc<Mutex<ShopState>>,
    csrf_token: Arc<str>,
}

impl Shop {
    fn csrf_ok(&self, headers: &HeaderMap) -> bool {
        headers
            .get(CSRF_HEADER)
            .and_then(|value| value.to_str().ok())
            == Some(&*self.csrf_token)
    }
}

/// A running fixture shop. Stops when dropped.
pub struct FixtureShop {
    base_url: Url,
    state: Arc<Mutex<ShopState>>,
    server: JoinHandle<()>,
}

impl FixtureShop {
    /// Start a shop accepting [`FIXTURE_CSRF_TOKEN`].
    ///
    /// # Errors
    ///
    /// Returns an error if no local port can be bound.
    pub async fn start() -> io::Result<Self> {
        Self::start_with_token(FIXTURE_CSRF_TOKEN).await
    }

    /// Start a shop that only accepts `csrf_token`.
    ///
    /// # Errors
    ///
    /// Returns an error if no local port can be bound.
    pub async fn start_with_token(csrf_token: &str) -> io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let base_url = Url::parse(&format!("http://{addr}/")).map_err(io::Error::other)?;

        let state = Arc::new(Mutex::new(ShopState::default()));
        let app = router(Shop {
            state: Arc::clone(&state),
            csrf_token: Arc::from(csrf_token),
        });

        let server = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                error!(error = %e, "Fixture shop stopped");
            }
        });
        info!(%addr, "Fixture shop listening");

        Ok(Self {
            base_url,
            state,
            server,
        })
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// A fresh transport pointed at this shop.
    #[must_use]
    pub fn transport(&self) -> ReqwestTransport {
        ReqwestTransport::new(self.base_url.clone())
    }

    /// Lock the shop's state to inspect or rig it.
    pub async fn state(&self) -> MutexGuard<'_, ShopState> {
        self.state.lock().await
    }
}

impl Drop for FixtureShop {
    fn drop(&mut self) {
        self.server.abort();
    }
}

fn router(shop: Shop) -> Router {
    Router::new()
        .route("/api/cart/count/", get(cart_count))
        .route("/add_to_cart/", post(add_to_cart))
        .route("/wishlist/add/{product_id}/", post(toggle_wishlist))
        .route("/api/newsletter/subscribe/", post(subscribe))
        .route(LOGIN_PATH, get(login_page))
        .with_state(shop)
}

fn error_page(status: StatusCode) -> Response {
    (status, Html(format!("<!doctype html><h1>{status}</h1>"))).into_response()
}

fn json_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({"status": "error", "message": message}))).into_response()
}

async fn cart_count(State(shop): State<Shop>) -> Response {
    let state = shop.state.lock().await;
    if state.cart_count_down {
        return error_page(StatusCode::INTERNAL_SERVER_ERROR);
    }
    Json(json!({"count": state.cart_units()})).into_response()
}

async fn add_to_cart(
    State(shop): State<Shop>,
    headers: HeaderMap,
    Json(body): Json<AddToCartRequest>,
) -> Response {
    let mut state = shop.state.lock().await;
    if !shop.csrf_ok(&headers) {
        state.rejected_csrf += 1;
        return error_page(StatusCode::FORBIDDEN);
    }

    let product_id = body.product_id.as_i32();
    if !CATALOG.contains(&product_id) {
        return json_error(StatusCode::NOT_FOUND, "Product not found");
    }

    let in_cart = state.cart.get(&product_id).copied().unwrap_or(0);
    let wanted = in_cart.saturating_add(body.quantity.get());
    if wanted > STOCK_LIMIT {
        return json_error(
            StatusCode::BAD_REQUEST,
            &format!("Only {STOCK_LIMIT} left in stock"),
        );
    }

    state.cart.insert(product_id, wanted);
    Json(json!({"status": "success", "message": "Product added to cart"})).into_response()
}

async fn toggle_wishlist(
    State(shop): State<Shop>,
    Path(product_id): Path<i32>,
    headers: HeaderMap,
) -> Response {
    let mut state = shop.state.lock().await;
    if !shop.csrf_ok(&headers) {
        state.rejected_csrf += 1;
        return error_page(StatusCode::FORBIDDEN);
    }

    match state.session {
        Session::Anonymous => {
            let next = format!("/wishlist/add/{product_id}/");
            let location = format!("{LOGIN_PATH}?next={}", urlencoding::encode(&next));
            Redirect::to(&location).into_response()
        }
        Session::Expired => json_error(StatusCode::UNAUTHORIZED, "Authentication required"),
        Session::LoggedIn if !CATALOG.contains(&product_id) => {
            json_error(StatusCode::NOT_FOUND, "Product not found")
        }
        Session::LoggedIn => {
            let (action, message) = if state.wishlist.remove(&product_id) {
                ("removed", "Removed from your wishlist")
            } else {
                state.wishlist.insert(product_id);
                ("added", "Added to your wishlist")
            };
            Json(json!({"status": "success", "action": action, "message": message}))
                .into_response()
        }
    }
}

async fn subscribe(
    State(shop): State<Shop>,
    headers: HeaderMap,
    Json(body): Json<SubscribeRequest>,
) -> Response {
    let mut state = shop.state.lock().await;
    if !shop.csrf_ok(&headers) {
        state.rejected_csrf += 1;
        return error_page(StatusCode::FORBIDDEN);
    }
    if state.newsletter_down {
        return error_page(StatusCode::SERVICE_UNAVAILABLE);
    }

    let email = body.email.into_inner();
    if state.subscribers.contains(&email) {
        return json_error(StatusCode::BAD_REQUEST, "This email is already subscribed.");
    }
    state.subscribers.push(email);
    Json(json!({"status": "success", "message": "Subscribed"})).into_response()
}

async fn login_page() -> Html<&'static str> {
    Html("<!doctype html><form method=\"post\"><input name=\"username\"></form>")
}
