//! The order submitter.

use std::sync::atomic::{AtomicBool, Ordering};

use domain::{
    CartSnapshot, CartStore, CustomerInfo, NewOrderHeader, NewOrderLineItem, generate_order_number,
};
use order_store::OrderStore;

use crate::error::{CheckoutError, ValidationError};

/// Drives the two-write submission protocol against the order record
/// service.
///
/// One submitter serves one interactive session. A single in-flight flag
/// rejects a concurrent duplicate submission, which would otherwise
/// generate two order numbers for the same cart. There is no cancellation
/// of an in-flight submission: once a write has been sent it runs to
/// completion or failure.
pub struct OrderSubmitter<S: OrderStore> {
    store: S,
    in_flight: AtomicBool,
}

/// Releases the in-flight flag on every exit path.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl<S: OrderStore> OrderSubmitter<S> {
    /// Creates a submitter writing to the given order store.
    pub fn new(store: S) -> Self {
        Self {
            store,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Returns true while a submission is in flight. The UI uses this to
    /// disable the submit action.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Submits the cart as an order.
    ///
    /// Protocol:
    /// 1. Validate the snapshot and customer fields before any remote
    ///    call.
    /// 2. Write the order header (status and payment both `pending`). On
    ///    failure the cart is untouched; a retry generates a new order
    ///    number.
    /// 3. Write all line items as one batch. On failure, compensate by
    ///    cancelling the header; if the compensation itself fails the
    ///    pending header stays behind as an orphan, which is logged. The
    ///    cart is untouched either way.
    /// 4. On success of both writes, clear the cart and return the order
    ///    number.
    #[tracing::instrument(skip_all, fields(customer = %customer.name))]
    pub async fn submit(
        &self,
        cart: &mut CartStore,
        customer: &CustomerInfo,
    ) -> Result<String, CheckoutError> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Err(CheckoutError::SubmissionInFlight);
        }
        let _guard = InFlightGuard(&self.in_flight);

        metrics::counter!("checkout_submissions_total").increment(1);
        let started = std::time::Instant::now();

        let snapshot = cart.snapshot();
        validate(&snapshot, customer)?;

        let order_number = generate_order_number();
        let header_input = NewOrderHeader::pending(
            order_number.clone(),
            customer,
            snapshot.total_price(),
        );

        let header = match self.store.create_order_header(header_input).await {
            Ok(header) => header,
            Err(e) => {
                metrics::counter!("checkout_failures_total").increment(1);
                tracing::warn!(error = %e, %order_number, "order header write failed");
                return Err(CheckoutError::Persistence(e));
            }
        };

        let items: Vec<NewOrderLineItem> = snapshot
            .lines()
            .iter()
            .map(NewOrderLineItem::from_cart_line)
            .collect();

        if let Err(e) = self.store.create_order_line_items(header.id, items).await {
            metrics::counter!("checkout_failures_total").increment(1);
            tracing::warn!(error = %e, %order_number, "line item write failed, compensating header");
            match self.store.cancel_order_header(header.id).await {
                Ok(()) => {
                    metrics::counter!("checkout_compensations_total").increment(1);
                }
                Err(cancel_err) => {
                    tracing::error!(
                        error = %cancel_err,
                        %order_number,
                        "compensation failed, pending header left orphaned"
                    );
                }
            }
            return Err(CheckoutError::Persistence(e));
        }

        cart.clear();

        metrics::histogram!("checkout_duration_seconds").record(started.elapsed().as_secs_f64());
        tracing::info!(
            %order_number,
            total_cents = snapshot.total_price().cents(),
            lines = snapshot.lines().len(),
            "order submitted"
        );
        Ok(order_number)
    }
}

/// Pre-flight validation; runs before any network interaction.
fn validate(snapshot: &CartSnapshot, customer: &CustomerInfo) -> Result<(), ValidationError> {
    if snapshot.is_empty() {
        return Err(ValidationError::EmptyCart);
    }
    if customer.name.trim().is_empty() {
        return Err(ValidationError::MissingName);
    }
    if customer.phone.trim().is_empty() {
        return Err(ValidationError::MissingPhone);
    }
    Ok(())
}
