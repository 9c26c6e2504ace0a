//! # Pricing & Order Builder
//!
//! Turns a client-submitted cart into a server-validated, priced
//! order. Prices always come from the catalog; anything a client sends
//! beyond (id, quantity) is ignored.
//!
//! Resolution has two policies:
//! - `build_order` / `resolve_best_effort`: unknown ids are dropped
//!   and the order proceeds with what resolved (post-payment
//!   reconciliation is best-effort).
//! - `resolve_all`: any unknown id fails the whole operation (the
//!   customer is about to pay and must see a correct cart).

use crate::catalog::Catalog;
use crate::error::{ShopError, ShopResult};
use crate::order::{CartLine, Customer, Order, OrderLine};
use std::sync::Arc;
use tracing::warn;

/// Builds validated orders against an injected read-only catalog
#[derive(Clone)]
pub struct OrderBuilder {
    catalog: Arc<Catalog>,
}

impl OrderBuilder {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    /// Build an order from customer details and cart lines.
    ///
    /// Validates the customer, drops lines that do not resolve against
    /// the catalog, and computes the total from catalog prices.
    ///
    /// # Errors
    /// - `InvalidCustomer` for a missing name or malformed email
    /// - `EmptyCart` when no lines were submitted
    /// - `InvalidOrder` when no line survived resolution
    pub fn build_order(&self, customer: &Customer, lines: &[CartLine]) -> ShopResult<Order> {
        if customer.name.trim().is_empty() {
            return Err(ShopError::InvalidCustomer("missing name".to_string()));
        }
        if !is_valid_email(&customer.email) {
            return Err(ShopError::InvalidCustomer("malformed email".to_string()));
        }
        if lines.is_empty() {
            return Err(ShopError::EmptyCart);
        }

        let items = self.resolve_best_effort(lines);
        if items.is_empty() {
            return Err(ShopError::InvalidOrder);
        }

        Ok(Order::from_lines(customer.clone(), items))
    }

    /// Resolve cart lines, silently dropping unknown ids
    pub fn resolve_best_effort(&self, lines: &[CartLine]) -> Vec<OrderLine> {
        lines
            .iter()
            .filter_map(|line| {
                let resolved = self.resolve(line);
                if resolved.is_none() {
                    warn!(product_id = %line.id, "dropping unresolvable cart line");
                }
                resolved
            })
            .collect()
    }

    /// Resolve cart lines strictly: any unknown id aborts
    pub fn resolve_all(&self, lines: &[CartLine]) -> ShopResult<Vec<OrderLine>> {
        lines
            .iter()
            .map(|line| {
                self.resolve(line).ok_or_else(|| ShopError::UnknownItem {
                    product_id: line.id.clone(),
                })
            })
            .collect()
    }

    fn resolve(&self, line: &CartLine) -> Option<OrderLine> {
        let product = self.catalog.get(&line.id)?;
        Some(OrderLine {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            quantity: line.quantity.max(1),
        })
    }
}

/// Minimal syntactic email check: non-empty local part, one `@`, and a
/// dotted domain. Deliverability is the mail transport's problem.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}
