//! Cart badge and add-to-cart flows against the fixture shop.

use std::rc::Rc;

use technest_core::CartCount;
use technest_integration_tests::{FixtureShop, STOCK_LIMIT};
use technest_storefront::api::ReqwestTransport;
use technest_storefront::components::{
    ADD_TO_CART_FAILED_MESSAGE, ADDED_TO_CART_MESSAGE, AddToCartOutcome, BadgeView, CartCache,
};
use technest_storefront::registry::ControlRole;
use technest_storefront::signals::Signal;
use technest_storefront::testing::{FakeBadge, FakeCard, FakeTarget, Harness, MemoryCartCache};
use technest_storefront::toast::ToastKind;
use tokio::net::TcpListener;
use url::Url;

async fn shop() -> FixtureShop {
    FixtureShop::start().await.expect("Failed to start fixture shop")
}

fn badge_parts(snapshot: Option<&str>) -> (Rc<FakeBadge>, Option<Rc<dyn BadgeView>>, Rc<dyn CartCache>) {
    let badge = Rc::new(FakeBadge::default());
    let view = Some(Rc::clone(&badge) as Rc<dyn BadgeView>);
    (badge, view, Rc::new(MemoryCartCache::new(snapshot)))
}

#[tokio::test]
async fn test_add_to_cart_then_refresh_badge() {
    let shop = shop().await;
    let harness = Harness::new(shop.transport());
    let (badge, view, cache) = badge_parts(None);
    harness.storefront.attach_cart_badge(view, cache);

    harness.spawner.run_until_idle().await;
    assert!(!badge.is_visible());

    let card = FakeCard::new(Some("2"), Some("3"), Some("10"));
    let outcome = harness.storefront.cart_actions().add_to_cart(&card).await;
    assert!(matches!(outcome, AddToCartOutcome::Added { .. }));
    assert_eq!(harness.signals.emitted(), vec![Signal::CartUpdated]);
    assert_eq!(
        harness.surface.shown(),
        vec![(ToastKind::Success, ADDED_TO_CART_MESSAGE.to_string())]
    );

    assert_eq!(harness.spawner.pending(), 1);
    harness.spawner.run_until_idle().await;
    assert_eq!(badge.state(), ("3".to_string(), true));
    assert_eq!(shop.state().await.cart.get(&2), Some(&3));
}

#[tokio::test]
async fn test_card_without_quantity_input_adds_one() {
    let shop = shop().await;
    let harness = Harness::new(shop.transport());

    let card = FakeCard::new(Some("4"), None, None);
    harness.storefront.cart_actions().add_to_cart(&card).await;
    harness.storefront.cart_actions().add_to_cart(&card).await;

    assert_eq!(shop.state().await.cart.get(&4), Some(&2));
    assert_eq!(
        harness.signals.emitted(),
        vec![Signal::CartUpdated, Signal::CartUpdated]
    );
}

#[tokio::test]
async fn test_stock_limit_shows_server_message() {
    let shop = shop().await;
    let harness = Harness::new(shop.transport());
    let actions = harness.storefront.cart_actions();
    let card = FakeCard::new(Some("1"), Some("8"), Some("20"));

    actions.add_to_cart(&card).await;
    let outcome = actions.add_to_cart(&card).await;

    assert!(matches!(outcome, AddToCartOutcome::Failed(_)));
    assert_eq!(shop.state().await.cart.get(&1), Some(&8));
    assert_eq!(harness.signals.emitted(), vec![Signal::CartUpdated]);
    assert_eq!(
        harness.surface.shown().last(),
        Some(&(ToastKind::Error, format!("Only {STOCK_LIMIT} left in stock")))
    );
}

#[tokio::test]
async fn test_unknown_product_is_refused() {
    let shop = shop().await;
    let harness = Harness::new(shop.transport());

    let card = FakeCard::new(Some("42"), Some("1"), None);
    let outcome = harness.storefront.cart_actions().add_to_cart(&card).await;

    match outcome {
        AddToCartOutcome::Failed(e) => assert_eq!(e.status(), Some(404)),
        other => panic!("expected a refusal, got {other:?}"),
    }
    assert_eq!(
        harness.surface.shown(),
        vec![(ToastKind::Error, "Product not found".to_string())]
    );
    assert!(harness.signals.emitted().is_empty());
}

#[tokio::test]
async fn test_csrf_mismatch_is_rejected() {
    let shop = FixtureShop::start_with_token("rotated-token")
        .await
        .expect("Failed to start fixture shop");
    let harness = Harness::new(shop.transport());

    let card = FakeCard::new(Some("1"), Some("1"), None);
    let outcome = harness.storefront.cart_actions().add_to_cart(&card).await;

    match outcome {
        AddToCartOutcome::Failed(e) => assert_eq!(e.status(), Some(403)),
        other => panic!("expected a CSRF failure, got {other:?}"),
    }
    assert_eq!(
        harness.surface.shown(),
        vec![(ToastKind::Error, ADD_TO_CART_FAILED_MESSAGE.to_string())]
    );

    let state = shop.state().await;
    assert_eq!(state.rejected_csrf, 1);
    assert!(state.cart.is_empty());
}

#[tokio::test]
async fn test_invalid_quantity_never_reaches_server() {
    let shop = shop().await;
    let harness = Harness::new(shop.transport());

    let card = FakeCard::new(Some("1"), Some("0"), Some("5"));
    let outcome = harness.storefront.cart_actions().add_to_cart(&card).await;

    assert!(matches!(outcome, AddToCartOutcome::InvalidQuantity(_)));
    let state = shop.state().await;
    assert!(state.cart.is_empty());
    assert_eq!(state.rejected_csrf, 0);
}

#[tokio::test]
async fn test_badge_falls_back_to_cached_cart_on_server_error() {
    let shop = shop().await;
    shop.state().await.cart_count_down = true;
    let harness = Harness::new(shop.transport());
    let (badge, view, cache) = badge_parts(Some(r#"{"1": 2, "4": 5}"#));

    let count = harness
        .storefront
        .cart_badge(view, cache)
        .update_cart_count()
        .await;

    assert_eq!(count.map(CartCount::get), Some(7));
    assert_eq!(badge.state(), ("7".to_string(), true));
}

#[tokio::test]
async fn test_badge_falls_back_when_server_unreachable() {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to read address");
    drop(listener);

    let base_url = Url::parse(&format!("http://{addr}/")).expect("Invalid URL");
    let harness = Harness::new(ReqwestTransport::new(base_url));
    let (badge, view, cache) = badge_parts(Some(r#"{"3": 1}"#));

    harness
        .storefront
        .cart_badge(view, cache)
        .update_cart_count()
        .await;

    assert_eq!(badge.state(), ("1".to_string(), true));
}

#[tokio::test]
async fn test_add_to_cart_control_dispatch() {
    let shop = shop().await;
    let harness = Harness::new(shop.transport());
    let controls = harness.storefront.controls::<FakeTarget>();

    let target = FakeTarget {
        card: Some(Rc::new(FakeCard::new(Some("5"), Some("2"), None))),
        ..FakeTarget::default()
    };
    controls
        .dispatch(ControlRole::AddToCart, target)
        .expect("add-to-cart handler registered")
        .await;

    assert_eq!(shop.state().await.cart_units(), 2);
    assert_eq!(harness.signals.emitted(), vec![Signal::CartUpdated]);
}
