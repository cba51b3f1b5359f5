//! Checkout: turn the cart into an order
//!
//! The order row is written first, then one item row per cart line. When the
//! items fail the order row is deleted again so no order is left without
//! items. The cart is cleared only after both writes succeed.

use crate::error::CheckoutError;
use boutique_backend::Backend;
use boutique_cart::CartStore;
use boutique_catalog::{FieldError, NewOrder, NewOrderItem, Order, OrderStatus, ValidationError};
use boutique_storage::KeyValueStore;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\S+@\S+\.\S+").expect("valid email regex"));

const REQUIRED: &str = "This field is required";
const INVALID_EMAIL: &str = "Invalid email format";

/// Customer details entered at checkout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutForm {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub shipping_address: String,
}

impl CheckoutForm {
    pub fn new(
        customer_name: impl Into<String>,
        customer_email: impl Into<String>,
        customer_phone: impl Into<String>,
        shipping_address: impl Into<String>,
    ) -> Self {
        Self {
            customer_name: customer_name.into(),
            customer_email: customer_email.into(),
            customer_phone: customer_phone.into(),
            shipping_address: shipping_address.into(),
        }
    }

    /// Check every field, reporting all problems together
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();
        if self.customer_name.trim().is_empty() {
            errors.push(FieldError::new("customer_name", REQUIRED));
        }
        if self.customer_email.trim().is_empty() {
            errors.push(FieldError::new("customer_email", REQUIRED));
        } else if !EMAIL_RE.is_match(&self.customer_email) {
            errors.push(FieldError::new("customer_email", INVALID_EMAIL));
        }
        if self.customer_phone.trim().is_empty() {
            errors.push(FieldError::new("customer_phone", REQUIRED));
        }
        if self.shipping_address.trim().is_empty() {
            errors.push(FieldError::new("shipping_address", REQUIRED));
        }
        ValidationError::check(errors)
    }
}

/// Submits carts as orders
#[derive(Clone)]
pub struct CheckoutService {
    backend: Arc<dyn Backend>,
}

impl CheckoutService {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Place an order for everything in `cart`
    ///
    /// On success the returned order carries its item rows and the cart is
    /// empty. On any error the cart is left untouched.
    pub async fn submit<S: KeyValueStore>(
        &self,
        form: &CheckoutForm,
        cart: &mut CartStore<S>,
    ) -> Result<Order, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        form.validate()?;

        let new_order = NewOrder {
            customer_name: form.customer_name.trim().to_string(),
            customer_email: form.customer_email.trim().to_string(),
            customer_phone: form.customer_phone.trim().to_string(),
            shipping_address: form.shipping_address.trim().to_string(),
            total_amount: cart.total(),
            status: OrderStatus::Pending,
        };
        let mut order = self
            .backend
            .insert_order(&new_order)
            .await
            .map_err(CheckoutError::OrderInsert)?;

        let items: Vec<NewOrderItem> = cart
            .lines()
            .iter()
            .map(|line| NewOrderItem {
                order_id: order.id.clone(),
                product_id: line.product_id().clone(),
                quantity: line.quantity.get(),
                price_each: line.price,
            })
            .collect();

        match self.backend.insert_order_items(&items).await {
            Ok(rows) => order.items = rows,
            Err(source) => {
                tracing::warn!(order = %order.id, error = %source, "order items failed, rolling back order");
                let rolled_back = match self.backend.delete_order(&order.id).await {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::warn!(order = %order.id, error = %e, "order rollback failed");
                        false
                    }
                };
                return Err(CheckoutError::ItemsInsert {
                    source,
                    rolled_back,
                });
            }
        }

        cart.clear();
        tracing::info!(
            order = %order.id,
            lines = order.items.len(),
            total = %order.total_amount,
            "order submitted"
        );
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn valid_form() -> CheckoutForm {
        CheckoutForm::new("Amina", "amina@example.com", "0555 12 34 56", "Alger")
    }

    #[test]
    fn valid_form_passes() {
        assert!(valid_form().validate().is_ok());
    }

    #[test]
    fn blank_form_reports_every_field() {
        let err = CheckoutForm::default().validate().unwrap_err();
        let fields: Vec<&str> = err.fields.iter().map(|f| f.field).collect();
        assert_eq!(
            fields,
            vec!["customer_name", "customer_email", "customer_phone", "shipping_address"]
        );
    }

    #[test]
    fn email_shape_is_checked() {
        for bad in ["amina", "amina@example", "@.", "a @b.c"] {
            let form = CheckoutForm {
                customer_email: bad.into(),
                ..valid_form()
            };
            let err = form.validate().unwrap_err();
            assert_eq!(err.fields[0].message, INVALID_EMAIL, "{bad}");
        }
        let form = CheckoutForm {
            customer_email: "a@b.dz".into(),
            ..valid_form()
        };
        assert!(form.validate().is_ok());
    }
}
