//! Footer newsletter signup.

use std::rc::Rc;

use technest_core::Email;
use tracing::{info, instrument, warn};

use crate::api::{ApiClient, Transport};
use crate::error::ClientError;
use crate::toast::ToastManager;

/// Button label while the request is in flight.
pub const SUBSCRIBING_LABEL: &str = "Subscribing...";

/// Toast after a successful subscribe.
pub const SUBSCRIBED_MESSAGE: &str = "Successfully subscribed to our newsletter!";

/// Toast when the server refuses without saying why.
pub const SUBSCRIBE_REFUSED_MESSAGE: &str = "Subscription failed. Please try again.";

/// Toast when the request itself fails.
pub const SUBSCRIBE_FAILED_MESSAGE: &str = "An error occurred. Please try again later.";

/// The newsletter form.
pub trait NewsletterView {
    /// Current value of the email field.
    fn email_value(&self) -> String;
    /// Empty the email field.
    fn clear_email(&self);
    /// Current submit button label.
    fn button_label(&self) -> String;
    /// Relabel and enable/disable the submit button.
    fn set_button(&self, label: &str, enabled: bool);
}

/// Result of a form submission.
#[derive(Debug)]
pub enum SubscribeOutcome {
    Subscribed,
    /// Rejected before any request was made.
    InvalidEmail,
    Failed(ClientError),
}

/// Restores the submit button when the submission ends, however it ends.
struct BusyButton<'a> {
    view: &'a dyn NewsletterView,
    label: String,
}

impl<'a> BusyButton<'a> {
    fn engage(view: &'a dyn NewsletterView) -> Self {
        let label = view.button_label();
        view.set_button(SUBSCRIBING_LABEL, false);
        Self { view, label }
    }
}

impl Drop for BusyButton<'_> {
    fn drop(&mut self) {
        self.view.set_button(&self.label, true);
    }
}

/// Submits the newsletter form.
pub struct NewsletterForm<T> {
    api: Rc<ApiClient<T>>,
    toasts: ToastManager,
}

impl<T> Clone for NewsletterForm<T> {
    fn clone(&self) -> Self {
        Self {
            api: Rc::clone(&self.api),
            toasts: self.toasts.clone(),
        }
    }
}

impl<T: Transport> NewsletterForm<T> {
    #[must_use]
    pub const fn new(api: Rc<ApiClient<T>>, toasts: ToastManager) -> Self {
        Self { api, toasts }
    }

    /// Validate and submit the form.
    ///
    /// An invalid address is rejected with a toast and no request. While the
    /// request runs the button is disabled and relabelled; its label and
    /// enabled state are restored afterwards on every path.
    #[instrument(skip_all)]
    pub async fn submit(&self, view: &dyn NewsletterView) -> SubscribeOutcome {
        let email = match Email::parse(view.email_value().trim()) {
            Ok(email) => email,
            Err(e) => {
                info!(error = %e, "Rejected newsletter address");
                self.toasts.error(ClientError::from(e).user_message());
                return SubscribeOutcome::InvalidEmail;
            }
        };

        let _busy = BusyButton::engage(view);

        match self.api.subscribe(&email).await {
            Ok(()) => {
                info!("Newsletter subscription accepted");
                self.toasts.success(SUBSCRIBED_MESSAGE);
                view.clear_email();
                SubscribeOutcome::Subscribed
            }
            Err(e) => {
                warn!(error = %e, "Newsletter subscription failed");
                let message = match &e {
                    ClientError::Status {
                        message: Some(message),
                        ..
                    } => message.clone(),
                    ClientError::Status { .. } => SUBSCRIBE_REFUSED_MESSAGE.to_string(),
                    _ => SUBSCRIBE_FAILED_MESSAGE.to_string(),
                };
                self.toasts.error(message);
                SubscribeOutcome::Failed(e)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::testing::{FakeNewsletter, Harness, ScriptedTransport, json_response, text_response};
    use crate::toast::ToastKind;

    #[tokio::test]
    async fn test_success_clears_field_and_restores_button() {
        let harness = Harness::new(ScriptedTransport::new([json_response(
            200,
            &json!({"status": "success"}),
        )]));
        let view = FakeNewsletter::new("  reader@example.com ", "Subscribe");

        let outcome = harness.storefront.newsletter().submit(&view).await;
        assert!(matches!(outcome, SubscribeOutcome::Subscribed));
        assert_eq!(view.email(), "");
        assert_eq!(
            view.button_history(),
            vec![
                (SUBSCRIBING_LABEL.to_string(), false),
                ("Subscribe".to_string(), true)
            ]
        );
        assert_eq!(
            harness.surface.shown(),
            vec![(ToastKind::Success, SUBSCRIBED_MESSAGE.to_string())]
        );

        let sent = harness.storefront.api().transport().requests();
        assert_eq!(sent[0].body.as_deref(), Some(r#"{"email":"reader@example.com"}"#));
    }

    #[tokio::test]
    async fn test_invalid_email_sends_nothing() {
        let harness = Harness::new(ScriptedTransport::new([]));
        for address in ["", "   ", "no-at-sign", "a@b", "a b@c.de", "a@@b.co", "@b.co"] {
            let view = FakeNewsletter::new(address, "Subscribe");
            let outcome = harness.storefront.newsletter().submit(&view).await;
            assert!(matches!(outcome, SubscribeOutcome::InvalidEmail), "{address}");
            assert!(view.button_history().is_empty());
        }
        assert!(harness.storefront.api().transport().requests().is_empty());
        assert!(
            harness
                .surface
                .shown()
                .iter()
                .all(|(kind, message)| *kind == ToastKind::Error
                    && message == "Please enter a valid email address")
        );
    }

    #[tokio::test]
    async fn test_server_message_on_refusal() {
        let harness = Harness::new(ScriptedTransport::new([
            json_response(400, &json!({"message": "Already subscribed"})),
            json_response(400, &json!({"status": "error"})),
        ]));
        let view = FakeNewsletter::new("a@b.co", "Join");

        harness.storefront.newsletter().submit(&view).await;
        harness.storefront.newsletter().submit(&view).await;

        assert_eq!(view.email(), "a@b.co");
        assert_eq!(
            harness.surface.shown(),
            vec![
                (ToastKind::Error, "Already subscribed".to_string()),
                (ToastKind::Error, SUBSCRIBE_REFUSED_MESSAGE.to_string()),
            ]
        );
        assert_eq!(view.button_history().last(), Some(&("Join".to_string(), true)));
    }

    #[tokio::test]
    async fn test_transport_failure_restores_button() {
        let harness = Harness::new(ScriptedTransport::new([Err(ClientError::Transport(
            "offline".to_string(),
        ))]));
        let view = FakeNewsletter::new("a@b.co", "Subscribe");

        let outcome = harness.storefront.newsletter().submit(&view).await;
        assert!(matches!(outcome, SubscribeOutcome::Failed(ClientError::Transport(_))));
        assert_eq!(view.button_history().last(), Some(&("Subscribe".to_string(), true)));
        assert_eq!(
            harness.surface.shown(),
            vec![(ToastKind::Error, SUBSCRIBE_FAILED_MESSAGE.to_string())]
        );
    }

    #[tokio::test]
    async fn test_ok_status_without_json_still_subscribes() {
        let harness = Harness::new(ScriptedTransport::new([text_response(204, "")]));
        let view = FakeNewsletter::new("a@b.co", "Subscribe");
        let outcome = harness.storefront.newsletter().submit(&view).await;
        assert!(matches!(outcome, SubscribeOutcome::Subscribed));
    }
}
