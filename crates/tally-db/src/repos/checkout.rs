//! Checkout flow: a cart of items taken out of stock for an active project.

use tally_core::entities::InventoryTransaction;
use tally_core::enums::{CartKind, ProjectStatus, TransactionType};
use tally_core::responses::CartResponse;

use crate::error::DatabaseError;
use crate::repos::cart::{cart_response, insert_cart, merge_lines};
use crate::repos::item::{audit_stock_change, decrement_stock, fetch_item};
use crate::repos::project::fetch_project;
use crate::repos::transaction::{LedgerEntry, insert_transaction};
use crate::service::{TallyService, finish};

impl TallyService {
    /// Check a cart out against an active project.
    ///
    /// Every line is priced at the item's current unit cost. Either every
    /// line is written or none is.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty cart, a non-positive or
    /// oversized quantity or a project that is not active, and
    /// `CoreError::InsufficientStock` when any line exceeds stock on hand.
    pub async fn checkout(
        &self,
        project_id: &str,
        lines: &[(String, i64)],
        notes: Option<&str>,
        actor: &str,
    ) -> Result<CartResponse, DatabaseError> {
        let merged = merge_lines(lines)?;

        let tx = self.begin().await?;
        let result = checkout_in(&tx, project_id, &merged, notes, actor).await;
        let response = finish(tx, result).await?;
        tracing::debug!(
            cart = %response.cart.id,
            project = %project_id,
            lines = response.transactions.len(),
            total = %response.total_cost,
            "checkout committed"
        );
        Ok(response)
    }
}

async fn checkout_in(
    conn: &libsql::Connection,
    project_id: &str,
    lines: &[(String, i64)],
    notes: Option<&str>,
    actor: &str,
) -> Result<CartResponse, DatabaseError> {
    let project = fetch_project(conn, project_id).await?;
    if project.status != ProjectStatus::Active {
        return Err(DatabaseError::validation(format!(
            "project '{}' is {}; only active projects accept checkouts",
            project.name, project.status
        )));
    }

    let cart = insert_cart(conn, CartKind::Checkout, Some(&project.id), notes, actor).await?;

    let mut transactions: Vec<InventoryTransaction> = Vec::with_capacity(lines.len());
    for (item_id, quantity) in lines {
        let item = fetch_item(conn, item_id).await?;
        decrement_stock(conn, &item, *quantity).await?;
        let transaction = insert_transaction(
            conn,
            &LedgerEntry {
                item_id,
                project_id: Some(&project.id),
                transaction_type: TransactionType::Checkout,
                quantity: *quantity,
                unit_cost: item.unit_cost,
                notes,
                reconciliation_id: None,
                cart_id: Some(&cart.id),
                created_by: actor,
            },
        )
        .await?;
        audit_stock_change(
            conn,
            actor,
            &item.id,
            item.current_stock,
            item.current_stock - quantity,
            Some(&transaction.id),
        )
        .await?;
        transactions.push(transaction);
    }

    cart_response(cart, transactions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{ACTOR, seed_item, seed_project, test_service};
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use tally_core::errors::CoreError;

    #[tokio::test]
    async fn checkout_decrements_and_totals() {
        let svc = test_service().await;
        let paint = seed_item(&svc, "Eggshell White", "PNT-EW", 10, 2, 3250).await;
        let tape = seed_item(&svc, "Blue Tape", "TP-BL", 20, 5, 499).await;
        let project = seed_project(&svc, "Smith House").await;

        let cart = svc
            .checkout(
                &project.id,
                &[
                    (paint.id.clone(), 2),
                    (tape.id.clone(), 3),
                    (paint.id.clone(), 1),
                ],
                Some("exterior trim"),
                ACTOR,
            )
            .await
            .unwrap();

        assert_eq!(cart.cart.kind, CartKind::Checkout);
        assert_eq!(cart.cart.project_id.as_deref(), Some(project.id.as_str()));
        assert_eq!(cart.transactions.len(), 2);
        assert_eq!(cart.transactions[0].quantity, 3);
        assert_eq!(cart.transactions[0].total_cost, Decimal::new(9750, 2));
        assert_eq!(cart.total_cost, Decimal::new(11247, 2));
        assert!(cart
            .transactions
            .iter()
            .all(|t| t.project_id.as_deref() == Some(project.id.as_str())));

        assert_eq!(svc.get_item(&paint.id).await.unwrap().current_stock, 7);
        assert_eq!(svc.get_item(&tape.id).await.unwrap().current_stock, 17);
    }

    #[tokio::test]
    async fn failing_line_rolls_back_whole_cart() {
        let svc = test_service().await;
        let paint = seed_item(&svc, "Eggshell White", "PNT-EW", 10, 2, 3250).await;
        let tape = seed_item(&svc, "Blue Tape", "TP-BL", 1, 5, 499).await;
        let project = seed_project(&svc, "Smith House").await;

        let result = svc
            .checkout(
                &project.id,
                &[(paint.id.clone(), 2), (tape.id.clone(), 3)],
                None,
                ACTOR,
            )
            .await;
        assert!(matches!(
            result,
            Err(DatabaseError::Core(CoreError::InsufficientStock {
                requested: 3,
                available: 1,
                ..
            }))
        ));

        assert_eq!(svc.get_item(&paint.id).await.unwrap().current_stock, 10);
        let expenses = svc.project_expenses(&project.id).await.unwrap();
        assert!(expenses.lines.is_empty());
    }

    #[tokio::test]
    async fn rejects_empty_cart_and_inactive_project() {
        let svc = test_service().await;
        let paint = seed_item(&svc, "Eggshell White", "PNT-EW", 10, 2, 3250).await;
        let project = seed_project(&svc, "Smith House").await;

        let empty = svc.checkout(&project.id, &[], None, ACTOR).await;
        assert!(matches!(empty, Err(DatabaseError::Core(CoreError::Validation(_)))));

        svc.transition_project(&project.id, ProjectStatus::Completed, ACTOR)
            .await
            .unwrap();
        let closed = svc
            .checkout(&project.id, &[(paint.id.clone(), 1)], None, ACTOR)
            .await;
        assert!(matches!(closed, Err(DatabaseError::Core(CoreError::Validation(_)))));

        let missing = svc
            .checkout("prj-missing", &[(paint.id.clone(), 1)], None, ACTOR)
            .await;
        assert!(matches!(
            missing,
            Err(DatabaseError::Core(CoreError::NotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn rejects_overflowing_duplicate_lines() {
        let svc = test_service().await;
        let paint = seed_item(&svc, "Eggshell White", "PNT-EW", 10, 2, 3250).await;
        let project = seed_project(&svc, "Smith House").await;

        let result = svc
            .checkout(
                &project.id,
                &[(paint.id.clone(), i64::MAX), (paint.id.clone(), 1)],
                None,
                ACTOR,
            )
            .await;
        assert!(matches!(
            result,
            Err(DatabaseError::Core(CoreError::Validation(_)))
        ));
        assert_eq!(svc.get_item(&paint.id).await.unwrap().current_stock, 10);
    }
}
