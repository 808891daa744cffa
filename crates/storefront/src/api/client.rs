//! Typed client for the storefront endpoints.

use std::rc::Rc;

use technest_core::api::{
    AddToCartRequest, CartCountResponse, StatusResponse, SubscribeRequest,
};
use technest_core::{CartCount, Email, ProductId, Quantity};
use tracing::{debug, instrument, warn};

use super::{ApiRequest, ApiResponse, Transport};
use crate::config::Endpoints;
use crate::csrf::CsrfSource;
use crate::error::ClientError;

/// Client for the storefront's JSON endpoints.
///
/// Attaches the CSRF token to every mutating request. Never retries.
pub struct ApiClient<T> {
    transport: T,
    endpoints: Endpoints,
    csrf: Rc<dyn CsrfSource>,
}

impl<T: Transport> ApiClient<T> {
    /// Create a new API client.
    #[must_use]
    pub fn new(transport: T, endpoints: Endpoints, csrf: Rc<dyn CsrfSource>) -> Self {
        Self {
            transport,
            endpoints,
            csrf,
        }
    }

    /// The underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Configured endpoint paths.
    #[must_use]
    pub const fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Fetch the current cart item count.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-2xx status, or a body
    /// that is not JSON.
    #[instrument(skip(self))]
    pub async fn cart_count(&self) -> Result<CartCount, ClientError> {
        let response = self
            .transport
            .send(ApiRequest::get(&self.endpoints.cart_count))
            .await?;

        if !response.is_success() {
            return Err(status_error(&response));
        }

        let body: CartCountResponse = response.json()?;
        let count = body.cart_count();
        debug!(count = count.get(), "Fetched cart count");
        Ok(count)
    }

    /// Add a product to the cart.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Status` when the server answers with anything
    /// but `{"status": "success"}`, carrying the server's message if present.
    #[instrument(skip(self))]
    pub async fn add_to_cart(
        &self,
        product_id: ProductId,
        quantity: Quantity,
    ) -> Result<(), ClientError> {
        let request = ApiRequest::post(&self.endpoints.add_to_cart)
            .json(&AddToCartRequest {
                product_id,
                quantity,
            })?
            .csrf(self.csrf.csrf_token());

        let response = self.transport.send(request).await?;

        // The server reports failures in the body, often with a 400 status.
        let body: StatusResponse = match response.json() {
            Ok(body) => body,
            Err(e) if response.is_success() => return Err(e),
            Err(_) => return Err(status_error(&response)),
        };

        if body.is_success() {
            Ok(())
        } else {
            warn!(status = response.status, message = ?body.message, "Add to cart rejected");
            Err(ClientError::Status {
                status: response.status,
                message: body.message().map(str::to_owned),
            })
        }
    }

    /// Toggle a product's wishlist membership.
    ///
    /// Returns the raw response: the wishlist flow has to look at redirects
    /// and content type before it may touch the body.
    ///
    /// # Errors
    ///
    /// Returns an error only on transport failure.
    #[instrument(skip(self))]
    pub async fn toggle_wishlist(&self, product_id: ProductId) -> Result<ApiResponse, ClientError> {
        let request = ApiRequest::post(self.endpoints.wishlist_for(product_id))
            .csrf(self.csrf.csrf_token());
        self.transport.send(request).await
    }

    /// Subscribe an address to the newsletter.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Status` on a non-2xx answer, carrying the
    /// server's `message` if the body has one.
    #[instrument(skip(self, email))]
    pub async fn subscribe(&self, email: &Email) -> Result<(), ClientError> {
        let request = ApiRequest::post(&self.endpoints.newsletter_subscribe)
            .json(&SubscribeRequest {
                email: email.clone(),
            })?
            .csrf(self.csrf.csrf_token());

        let response = self.transport.send(request).await?;

        if response.is_success() {
            Ok(())
        } else {
            Err(status_error(&response))
        }
    }
}

/// Build a status error, pulling `message` out of a JSON body when possible.
fn status_error(response: &ApiResponse) -> ClientError {
    let message = response
        .json::<StatusResponse>()
        .ok()
        .and_then(|body| body.message().map(str::to_owned));
    ClientError::Status {
        status: response.status,
        message,
    }
}
