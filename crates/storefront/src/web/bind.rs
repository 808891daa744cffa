//! Attach components to the page.

use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use gloo_utils::document;
use tracing::{debug, warn};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, HtmlElement, HtmlInputElement, NodeList};

use super::fetch::FetchTransport;
use super::platform::LocalStorageCart;
use super::views::{DomBadge, DomNewsletter, DomPasswordMeter, DomTarget, element};
use crate::app::Storefront;
use crate::components::{BadgeView, FlashMessage, PasswordMeter, flash};

type Shop = Storefront<FetchTransport>;

const BADGE_ID: &str = "cart-counter";
const BREADCRUMB_CONTAINER: &str = ".breadcrumb-container";
const NEWSLETTER_FORM: &str = ".newsletter-form";
const PASSWORD_INPUT_ID: &str = "id_password1";
const PASSWORD_METER_ID: &str = "password-strength";

/// Set on a control once it has a click listener.
const BOUND_ATTR: &str = "data-storefront-bound";

fn elements(nodes: Result<NodeList, JsValue>) -> Vec<Element> {
    let Ok(nodes) = nodes else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// Every element matching `selector`, in document order.
fn select_all(selector: &str) -> Vec<Element> {
    elements(document().query_selector_all(selector))
}

/// Fetch the count now and again on every `cartUpdated`.
pub fn cart_badge(storefront: &Shop) {
    let view = document()
        .get_element_by_id(BADGE_ID)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        .map(|el| Rc::new(DomBadge(el)) as Rc<dyn BadgeView>);
    storefront.attach_cart_badge(
        view,
        Rc::new(LocalStorageCart::new(&storefront.config().cart_storage_key)),
    );
}

/// One click listener per rendered control, for every registered role.
pub fn controls(storefront: &Shop) {
    bind_controls(storefront, select_all);
}

/// Like [`controls`], limited to the controls inside `root`.
///
/// Controls that already have a listener are skipped, so a subtree can be
/// bound again after part of it is replaced.
pub fn controls_within(storefront: &Shop, root: &Element) {
    bind_controls(storefront, |selector| elements(root.query_selector_all(selector)));
}

fn bind_controls(storefront: &Shop, select: impl Fn(&str) -> Vec<Element>) {
    let registry = storefront.controls::<DomTarget>();
    for role in registry.roles() {
        let Some(handler) = registry.handler(role) else {
            continue;
        };
        let controls: Vec<Element> = select(role.selector())
            .into_iter()
            .filter(|control| !control.has_attribute(BOUND_ATTR))
            .collect();
        debug!(?role, count = controls.len(), "Binding controls");
        for control in controls {
            let handler = Rc::clone(&handler);
            let target = DomTarget(control.clone());
            EventListener::new(&control, "click", move |_| {
                spawn_local(handler(target.clone()));
            })
            .forget();
            if let Err(e) = control.set_attribute(BOUND_ATTR, "") {
                warn!(?role, error = ?e, "Failed to mark bound control");
            }
        }
    }
}

/// Submit `.newsletter-form` through the API instead of a page load.
pub fn newsletter(storefront: &Shop) {
    let Some(form) = document().query_selector(NEWSLETTER_FORM).ok().flatten() else {
        return;
    };
    let Some(view) = DomNewsletter::find(&form) else {
        warn!("Newsletter form is missing its input or button");
        return;
    };
    let view = Rc::new(view);
    let newsletter = storefront.newsletter();

    EventListener::new_with_options(
        &form,
        "submit",
        EventListenerOptions::enable_prevent_default(),
        move |event| {
            event.prevent_default();
            let view = Rc::clone(&view);
            let newsletter = newsletter.clone();
            spawn_local(async move {
                newsletter.submit(view.as_ref()).await;
            });
        },
    )
    .forget();
}

/// Mount the meter on the signup form, if this is the signup page.
pub fn password_meter() {
    let doc = document();
    let Some(input) = doc
        .get_element_by_id(PASSWORD_INPUT_ID)
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
    else {
        return;
    };
    let Some(container) = doc.get_element_by_id(PASSWORD_METER_ID) else {
        return;
    };
    let view = match DomPasswordMeter::mount(container) {
        Ok(view) => view,
        Err(e) => {
            warn!(error = ?e, "Failed to render password meter");
            return;
        }
    };
    let meter = PasswordMeter::new(Rc::new(view));
    let source = input.clone();
    EventListener::new(&input, "input", move |_| {
        meter.update(&source.value());
    })
    .forget();
}

/// Render the trail into `.breadcrumb-container`, if the page has one.
pub fn breadcrumbs(storefront: &Shop) {
    let Some(container) = document().query_selector(BREADCRUMB_CONTAINER).ok().flatten() else {
        return;
    };
    if let Err(e) = render_breadcrumbs(storefront, &container) {
        warn!(error = ?e, "Failed to render breadcrumbs");
    }
}

fn render_breadcrumbs(storefront: &Shop, container: &Element) -> Result<(), JsValue> {
    let list = element("ul", "breadcrumb", None)?;
    for (i, crumb) in storefront.breadcrumbs().into_iter().enumerate() {
        let item = element("li", "breadcrumb-item", None)?;
        if i > 0 {
            item.append_child(&element("span", "breadcrumb-separator", Some("/"))?)?;
        }
        let label = match &crumb.href {
            Some(href) => {
                let link = element("a", "", Some(&crumb.label))?;
                link.set_attribute("href", href)?;
                link
            }
            None => element("span", "active", Some(&crumb.label))?,
        };
        item.append_child(&label)?;
        list.append_child(&item)?;
    }
    container.set_text_content(None);
    container.append_child(&list)?;
    Ok(())
}

/// Turn server `.alert` boxes into toasts and remove them.
pub fn flash_messages(storefront: &Shop) {
    let messages: Vec<FlashMessage> = select_all(flash::ALERT_SELECTOR)
        .into_iter()
        .map(|alert| {
            let message =
                FlashMessage::from_alert(&alert.class_name(), &alert.text_content().unwrap_or_default());
            alert.remove();
            message
        })
        .collect();
    if !messages.is_empty() {
        debug!(count = messages.len(), "Relaying flash messages");
        storefront.relay_flash_messages(messages);
    }
}
