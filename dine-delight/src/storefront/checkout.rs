use async_trait::async_trait;
use dine_core::TenantContext;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::services::{internal_params, App};

use super::cart::Cart;
use super::notice::Notice;

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("customer name is required")]
    Validation,
    #[error("cart is empty")]
    EmptyCart,
    #[error("order total is too large")]
    TotalTooLarge,
    /// The order did not reach the kitchen; the cart is untouched.
    #[error("order submission failed: {0}")]
    Network(#[source] anyhow::Error),
}

impl CheckoutError {
    pub fn notice(&self) -> Notice {
        match self {
            CheckoutError::Validation => Notice::name_required(),
            CheckoutError::EmptyCart => Notice::empty_cart(),
            CheckoutError::TotalTooLarge => Notice::total_too_large(),
            CheckoutError::Network(_) => Notice::order_failed(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CheckoutForm {
    pub customer_name: String,
    pub table_number: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CheckoutDialog {
    pub open: bool,
    pub form: CheckoutForm,
}

impl CheckoutDialog {
    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }
}

/// Where submitted orders go.
#[async_trait]
pub trait OrderSink: Send + Sync {
    async fn place_order(&self, tenant_id: &str, order: Value) -> anyhow::Result<Value>;
}

#[async_trait]
impl OrderSink for App {
    async fn place_order(&self, tenant_id: &str, order: Value) -> anyhow::Result<Value> {
        self.service("orders")?
            .create(TenantContext::new(tenant_id), order, internal_params())
            .await
    }
}

#[derive(Clone, Debug)]
pub struct Submitted {
    pub order: Value,
    pub notice: Notice,
}

fn trimmed(s: &str) -> Option<String> {
    let t = s.trim();
    (!t.is_empty()).then(|| t.to_string())
}

/// Send the cart to the kitchen.
///
/// The name is checked before anything is sent. Success empties the
/// cart and closes the dialog; failure leaves both as they were.
pub async fn submit_order(
    sink: &dyn OrderSink,
    tenant_id: &str,
    dialog: &mut CheckoutDialog,
    cart: &mut Cart,
) -> Result<Submitted, CheckoutError> {
    let customer_name = trimmed(&dialog.form.customer_name).ok_or(CheckoutError::Validation)?;
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    let total_amount = cart.total_amount().ok_or(CheckoutError::TotalTooLarge)?;

    let order = json!({
        "customer_name": customer_name,
        "table_number": trimmed(&dialog.form.table_number),
        "items": cart.to_order_lines(),
        "total_amount": total_amount,
        "status": "new",
    });

    let order = sink
        .place_order(tenant_id, order)
        .await
        .map_err(CheckoutError::Network)?;

    cart.clear();
    dialog.close();
    dialog.form = CheckoutForm::default();

    Ok(Submitted {
        order,
        notice: Notice::order_sent(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::money::Money;

    #[derive(Default)]
    struct RecordingSink {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl OrderSink for RecordingSink {
        async fn place_order(&self, tenant_id: &str, order: Value) -> anyhow::Result<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("connection reset");
            }
            let mut order = order;
            order["tenant_id"] = json!(tenant_id);
            Ok(order)
        }
    }

    fn cart() -> Cart {
        let mut cart = Cart::new();
        cart.add_line("b", "Burger", Money::from_cents(1299), None, 1);
        cart
    }

    fn dialog(name: &str) -> CheckoutDialog {
        CheckoutDialog {
            open: true,
            form: CheckoutForm {
                customer_name: name.to_string(),
                table_number: " 4 ".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn blank_name_is_rejected_before_sending() {
        let sink = RecordingSink::default();
        let mut cart = cart();
        let mut dialog = dialog("   ");

        let err = submit_order(&sink, "t1", &mut dialog, &mut cart).await.unwrap_err();

        assert!(matches!(err, CheckoutError::Validation));
        assert_eq!(err.notice().title, "Please enter your name");
        assert_eq!(sink.calls.load(Ordering::SeqCst), 0);
        assert!(dialog.open);
        assert!(!cart.is_empty());
    }

    #[tokio::test]
    async fn success_clears_cart_and_closes_dialog() {
        let sink = RecordingSink::default();
        let mut cart = cart();
        let mut dialog = dialog(" Sam ");

        let done = submit_order(&sink, "t1", &mut dialog, &mut cart).await.unwrap();

        assert_eq!(done.order["customer_name"], "Sam");
        assert_eq!(done.order["table_number"], "4");
        assert_eq!(done.order["total_amount"], json!(12.99));
        assert_eq!(done.notice.title, "Order sent to kitchen!");
        assert!(cart.is_empty());
        assert!(!dialog.open);
    }

    #[tokio::test]
    async fn oversized_total_never_reaches_the_kitchen() {
        let sink = RecordingSink::default();
        let mut cart = Cart::new();
        cart.add_line("g", "Gold", Money::from_f64(1.0e15).unwrap(), None, 100_000);
        let mut dialog = dialog("Sam");

        let err = submit_order(&sink, "t1", &mut dialog, &mut cart).await.unwrap_err();

        assert!(matches!(err, CheckoutError::TotalTooLarge));
        assert_eq!(err.notice().title, "Order total is too large");
        assert_eq!(sink.calls.load(Ordering::SeqCst), 0);
        assert!(dialog.open);
        assert_eq!(cart.lines().len(), 1);
    }

    #[tokio::test]
    async fn failure_keeps_cart_for_manual_retry() {
        let sink = RecordingSink {
            fail: true,
            ..RecordingSink::default()
        };
        let mut cart = cart();
        let mut dialog = dialog("Sam");

        let err = submit_order(&sink, "t1", &mut dialog, &mut cart).await.unwrap_err();

        assert!(matches!(err, CheckoutError::Network(_)));
        assert!(err.notice().retryable);
        assert_eq!(cart.lines().len(), 1);
        assert!(dialog.open);
        assert_eq!(dialog.form.customer_name, "Sam");
        assert_eq!(sink.calls.load(Ordering::SeqCst), 1);
    }
}
