//! DOM-backed views.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use gloo_events::EventListener;
use gloo_utils::document;
use technest_core::Quantity;
use tracing::warn;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, HtmlButtonElement, HtmlElement, HtmlInputElement};

use crate::components::{
    BadgeView, CardLayout, NewsletterView, PasswordMeterView, ProductCard, QUANTITY_INPUT_SELECTOR,
    QuantityField, Requirement, StrengthTier, WishlistIcon,
};
use crate::registry::ControlTarget;
use crate::toast::{CloseHandler, Toast, ToastId, ToastSurface};

const TOAST_CONTAINER_CLASS: &str = "toast-container";

/// Create `<tag class="class">` with optional text.
pub fn element(tag: &str, class: &str, text: Option<&str>) -> Result<Element, JsValue> {
    let el = document().create_element(tag)?;
    el.set_class_name(class);
    if text.is_some() {
        el.set_text_content(text);
    }
    Ok(el)
}

fn query(root: &Element, selector: &str) -> Option<Element> {
    root.query_selector(selector).ok().flatten()
}

/// Toasts in a `.toast-container` appended to `<body>` on first use.
#[derive(Default)]
pub struct DomToastSurface {
    container: RefCell<Option<Element>>,
    nodes: RefCell<HashMap<ToastId, (Element, EventListener)>>,
}

impl DomToastSurface {
    fn container(&self) -> Result<Element, JsValue> {
        if let Some(container) = self.container.borrow().as_ref() {
            return Ok(container.clone());
        }
        let doc = document();
        let container = match doc.query_selector(&format!(".{TOAST_CONTAINER_CLASS}"))? {
            Some(existing) => existing,
            None => {
                let created = element("div", TOAST_CONTAINER_CLASS, None)?;
                doc.body()
                    .ok_or_else(|| JsValue::from_str("document has no body"))?
                    .append_child(&created)?;
                created
            }
        };
        *self.container.borrow_mut() = Some(container.clone());
        Ok(container)
    }

    fn render(toast: &Toast) -> Result<(Element, Element), JsValue> {
        let node = element("div", &format!("toast {}", toast.kind.as_str()), None)?;
        node.append_child(&element("div", "toast-icon", Some(toast.kind.icon()))?)?;

        let content = element("div", "toast-content", None)?;
        content.append_child(&element("div", "toast-title", Some(toast.title()))?)?;
        content.append_child(&element("div", "toast-message", Some(&toast.message))?)?;
        node.append_child(&content)?;

        let close = element("button", "toast-close", Some("\u{d7}"))?;
        close.set_attribute("aria-label", "Close")?;
        node.append_child(&close)?;
        Ok((node, close))
    }

    fn mount_node(&self, id: ToastId, toast: &Toast, on_close: CloseHandler) -> Result<(), JsValue> {
        let container = self.container()?;
        let (node, close) = Self::render(toast)?;
        let listener = EventListener::new(&close, "click", move |_| on_close());
        container.append_child(&node)?;
        self.nodes.borrow_mut().insert(id, (node, listener));
        Ok(())
    }

    fn add_class(&self, id: ToastId, class: &str) {
        let nodes = self.nodes.borrow();
        let Some((node, _)) = nodes.get(&id) else {
            return;
        };
        if let Err(e) = node.class_list().add_1(class) {
            warn!(id = id.get(), class, error = ?e, "Failed to update toast");
        }
    }
}

impl ToastSurface for DomToastSurface {
    fn mount(&self, id: ToastId, toast: &Toast, on_close: CloseHandler) {
        if let Err(e) = self.mount_node(id, toast, on_close) {
            warn!(id = id.get(), error = ?e, "Failed to render toast");
        }
    }

    fn reveal(&self, id: ToastId) {
        self.add_class(id, "show");
    }

    fn begin_hide(&self, id: ToastId) {
        self.add_class(id, "hiding");
    }

    fn remove(&self, id: ToastId) {
        let removed = self.nodes.borrow_mut().remove(&id);
        if let Some((node, _listener)) = removed {
            node.remove();
        }
    }
}

/// `#cart-counter`.
pub struct DomBadge(pub HtmlElement);

impl BadgeView for DomBadge {
    fn text(&self) -> String {
        self.0.text_content().unwrap_or_default()
    }

    fn show(&self, text: &str) {
        self.0.set_text_content(Some(text));
        let shown = self
            .0
            .style()
            .set_property("display", "inline-flex")
            .and_then(|()| self.0.class_list().add_1("has-items"));
        if let Err(e) = shown {
            warn!(error = ?e, "Failed to show cart badge");
        }
    }

    fn hide(&self) {
        let hidden = self
            .0
            .style()
            .set_property("display", "none")
            .and_then(|()| self.0.class_list().remove_1("has-items"));
        if let Err(e) = hidden {
            warn!(error = ?e, "Failed to hide cart badge");
        }
    }
}

/// A `.quantity-input`.
pub struct DomQuantityField(pub HtmlInputElement);

impl QuantityField for DomQuantityField {
    fn raw_value(&self) -> String {
        self.0.value()
    }

    fn max_attr(&self) -> Option<String> {
        self.0.get_attribute("max")
    }

    fn set_value(&self, quantity: Quantity) {
        self.0.set_value(&quantity.to_string());
    }
}

/// A product card of any [`CardLayout`].
pub struct DomProductCard(pub Element);

impl DomProductCard {
    fn quantity_input(&self) -> Option<HtmlInputElement> {
        query(&self.0, QUANTITY_INPUT_SELECTOR).and_then(|el| el.dyn_into().ok())
    }
}

impl ProductCard for DomProductCard {
    fn product_id(&self) -> Option<String> {
        self.0.get_attribute("data-product-id")
    }

    fn quantity_value(&self) -> Option<String> {
        self.quantity_input().map(|input| input.value())
    }

    fn max_attr(&self) -> Option<String> {
        self.quantity_input()
            .and_then(|input| input.get_attribute("max"))
    }
}

/// The `<i>` heart inside a `.wishlist-btn`.
pub struct DomIcon(pub Element);

impl WishlistIcon for DomIcon {
    fn set_active(&self, active: bool) {
        let list = self.0.class_list();
        let result = if active {
            list.add_1("active")
        } else {
            list.remove_1("active")
        };
        if let Err(e) = result {
            warn!(error = ?e, "Failed to update wishlist icon");
        }
    }
}

/// A clicked control.
#[derive(Clone)]
pub struct DomTarget(pub Element);

impl DomTarget {
    fn card(&self) -> Option<Element> {
        self.0
            .closest(&CardLayout::any_container_selector())
            .ok()
            .flatten()
    }
}

impl ControlTarget for DomTarget {
    fn quantity_field(&self) -> Option<Rc<dyn QuantityField>> {
        let input = query(&self.card()?, QUANTITY_INPUT_SELECTOR)?
            .dyn_into::<HtmlInputElement>()
            .ok()?;
        Some(Rc::new(DomQuantityField(input)))
    }

    fn product_card(&self) -> Option<Rc<dyn ProductCard>> {
        self.card()
            .map(|card| Rc::new(DomProductCard(card)) as Rc<dyn ProductCard>)
    }

    fn product_id(&self) -> Option<String> {
        self.0.get_attribute("data-product-id")
    }

    fn icon(&self) -> Option<Rc<dyn WishlistIcon>> {
        query(&self.0, "i").map(|icon| Rc::new(DomIcon(icon)) as Rc<dyn WishlistIcon>)
    }
}

/// `.newsletter-form` with its input and button.
pub struct DomNewsletter {
    pub input: HtmlInputElement,
    pub button: HtmlButtonElement,
}

impl DomNewsletter {
    /// Find the input and button inside `form`.
    pub fn find(form: &Element) -> Option<Self> {
        Some(Self {
            input: query(form, ".newsletter-input")?.dyn_into().ok()?,
            button: query(form, ".newsletter-button")?.dyn_into().ok()?,
        })
    }
}

impl NewsletterView for DomNewsletter {
    fn email_value(&self) -> String {
        self.input.value()
    }

    fn clear_email(&self) {
        self.input.set_value("");
    }

    fn button_label(&self) -> String {
        self.button.text_content().unwrap_or_default()
    }

    fn set_button(&self, label: &str, enabled: bool) {
        self.button.set_text_content(Some(label));
        self.button.set_disabled(!enabled);
    }
}

/// Bar, text and requirement list rendered into `#password-strength`.
pub struct DomPasswordMeter {
    container: Element,
    fill: Element,
    text: Element,
}

impl DomPasswordMeter {
    /// Render the meter's markup into `container`, replacing its content.
    pub fn mount(container: Element) -> Result<Self, JsValue> {
        container.set_text_content(None);

        let bar = element("div", "password-strength-bar", None)?;
        let fill = element("div", "password-strength-fill", None)?;
        bar.append_child(&fill)?;
        container.append_child(&bar)?;

        let text = element("div", "password-strength-text", None)?;
        container.append_child(&text)?;

        let requirements = element("div", "password-requirements", None)?;
        let list = element("ul", "", None)?;
        for requirement in Requirement::ALL {
            let item = element(
                "li",
                &format!("{} invalid", requirement.class_name()),
                Some(requirement.label()),
            )?;
            list.append_child(&item)?;
        }
        requirements.append_child(&list)?;
        container.append_child(&requirements)?;

        Ok(Self {
            container,
            fill,
            text,
        })
    }
}

impl PasswordMeterView for DomPasswordMeter {
    fn set_requirement(&self, requirement: Requirement, met: bool) {
        let Some(item) = query(&self.container, &format!(".{}", requirement.class_name())) else {
            return;
        };
        let list = item.class_list();
        let result = list
            .toggle_with_force("valid", met)
            .and_then(|_| list.toggle_with_force("invalid", !met));
        if let Err(e) = result {
            warn!(error = ?e, "Failed to update password requirement");
        }
    }

    fn set_strength(&self, tier: StrengthTier, text: &str) {
        self.fill
            .set_class_name(&format!("password-strength-fill {}", tier.as_str()));
        self.text
            .set_class_name(&format!("password-strength-text {}", tier.as_str()));
        self.text.set_text_content(Some(text));
    }
}
