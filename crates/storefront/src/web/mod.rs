//! Browser bindings.
//!
//! The page loads the module and calls `boot()` once the DOM is parsed:
//!
//! ```js
//! import init, { boot } from "/static/pkg/technest_storefront.js";
//! await init();
//! window.storefront = boot();
//! ```
//!
//! `boot` reads the embedded configuration, installs logging, builds the
//! [`Storefront`] and binds every component found on the page. Listeners
//! live as long as the page.

// wasm-bindgen expands to unsafe FFI glue.
#![allow(unsafe_code)]

mod bind;
mod fetch;
mod platform;
mod views;

use std::rc::Rc;
use std::time::Duration;

use gloo_utils::document;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_web::MakeWebConsoleWriter;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

pub use fetch::FetchTransport;
pub use platform::{
    DocumentCookies, DocumentSignals, LocalSpawner, LocalStorageCart, TimeoutScheduler, WindowNavigator,
};
pub use views::DomToastSurface;

use self::views::DomIcon;
use crate::app::{Ports, Storefront};
use crate::components::{DEFAULT_SKELETON_COUNT, WishlistIcon, skeleton_markup};
use crate::config::{CONFIG_ELEMENT_ID, ClientConfig, ConfigError};
use crate::toast::{DEFAULT_DURATION, ToastId, ToastKind};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// Read the embedded configuration.
///
/// A missing element means defaults. An invalid one also means defaults,
/// with the error handed back for logging once logging is up.
fn load_config() -> (ClientConfig, Option<ConfigError>) {
    let Some(raw) = document()
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content())
    else {
        return (ClientConfig::default(), None);
    };
    match ClientConfig::from_json(&raw) {
        Ok(config) => (config, None),
        Err(e) => (ClientConfig::default(), Some(e)),
    }
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .without_time()
        .with_writer(MakeWebConsoleWriter::new());
    // A second boot keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

/// Build the storefront and bind it to the page.
///
/// Components whose elements are missing are skipped.
#[wasm_bindgen]
#[must_use]
pub fn boot() -> StorefrontHandle {
    let (config, config_error) = load_config();
    init_tracing(&config.log_filter);
    if let Some(e) = config_error {
        warn!(error = %e, "Invalid storefront config, using defaults");
    }

    let ports = Ports {
        csrf: Rc::new(DocumentCookies::new(&config.csrf_cookie)),
        toast_surface: Box::new(DomToastSurface::default()),
        scheduler: Rc::new(TimeoutScheduler),
        spawner: Rc::new(LocalSpawner),
        signals: Rc::new(DocumentSignals),
        navigator: Rc::new(WindowNavigator),
    };
    let storefront = Storefront::new(config, FetchTransport, ports);

    bind::breadcrumbs(&storefront);
    bind::newsletter(&storefront);
    bind::password_meter();
    bind::flash_messages(&storefront);
    bind::cart_badge(&storefront);
    bind::controls(&storefront);

    info!("Storefront booted");
    StorefrontHandle { storefront }
}

/// The storefront as seen by page scripts.
#[wasm_bindgen]
pub struct StorefrontHandle {
    storefront: Storefront<FetchTransport>,
}

#[wasm_bindgen]
impl StorefrontHandle {
    /// Show a toast. `kind` defaults to info and `durationMs` to 4000;
    /// 0 keeps the toast until closed. Returns the toast's handle.
    #[wasm_bindgen(js_name = showToast)]
    pub fn show_toast(
        &self,
        message: &str,
        kind: Option<String>,
        duration_ms: Option<u32>,
        title: Option<String>,
    ) -> u32 {
        let kind = kind.as_deref().map_or(ToastKind::Info, ToastKind::parse_lenient);
        let duration = duration_ms.map_or(DEFAULT_DURATION, |ms| Duration::from_millis(ms.into()));
        self.storefront
            .toasts()
            .show(message, kind, duration, title.as_deref())
            .get()
    }

    #[wasm_bindgen(js_name = dismissToast)]
    pub fn dismiss_toast(&self, id: u32) {
        self.storefront.toasts().dismiss(ToastId::new(id));
    }

    /// Replace the placeholders in `container` with the loaded markup and
    /// bind the controls it brings.
    #[wasm_bindgen(js_name = hideSkeletons)]
    pub fn hide_skeletons(&self, container: &Element, html: &str) {
        container.set_inner_html(html);
        bind::controls_within(&self.storefront, container);
    }

    /// Bind the controls of markup inserted into `root` after boot.
    #[wasm_bindgen(js_name = bindControls)]
    pub fn bind_controls(&self, root: &Element) {
        bind::controls_within(&self.storefront, root);
    }

    /// Toggle a product's wishlist membership, updating the `<i>` inside `button`.
    #[wasm_bindgen(js_name = toggleWishlist)]
    pub fn toggle_wishlist(&self, product_id: &str, button: &Element) {
        let wishlist = self.storefront.wishlist();
        let product_id = product_id.to_owned();
        let icon = button.query_selector("i").ok().flatten().map(DomIcon);
        spawn_local(async move {
            let icon = icon.as_ref().map(|icon| icon as &dyn WishlistIcon);
            wishlist.toggle_raw(&product_id, icon).await;
        });
    }
}

/// Fill `container` with placeholder cards while content loads.
#[wasm_bindgen(js_name = showSkeletons)]
pub fn show_skeletons(container: &Element, count: Option<usize>) {
    container.set_inner_html(&skeleton_markup(count.unwrap_or(DEFAULT_SKELETON_COUNT)));
}

