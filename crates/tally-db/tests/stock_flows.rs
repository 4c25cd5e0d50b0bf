//! Stock flow integration tests
//!
//! End-to-end runs through the public service API:
//! - Cart checkout, delivery receipt and reconciliation keeping ledger and
//!   stored stock in agreement
//! - Voids and reconciliation deletes reversing their effects
//! - Audit trail coverage of a stock flow
//! - File-backed databases surviving a reopen

use rust_decimal::Decimal;
use tempfile::TempDir;

use tally_core::enums::{AuditAction, EntityType, ProjectStatus, TransactionType};
use tally_core::errors::CoreError;
use tally_db::error::DatabaseError;
use tally_db::repos::audit::AuditFilter;
use tally_db::repos::item::NewItem;
use tally_db::repos::receive::ReceiveLine;
use tally_db::repos::transaction::TransactionFilter;
use tally_db::service::TallyService;

const ACTOR: &str = "dana";

async fn test_service() -> TallyService {
    TallyService::new_local(":memory:").await.unwrap()
}

async fn item(svc: &TallyService, name: &str, sku: &str, stock: i64, cents: i64) -> String {
    svc.create_item(
        &NewItem {
            name: name.into(),
            sku: sku.into(),
            current_stock: stock,
            minimum_stock: 2,
            unit_cost: Decimal::new(cents, 2),
            ..NewItem::default()
        },
        ACTOR,
    )
    .await
    .unwrap()
    .id
}

async fn assert_consistent(svc: &TallyService) {
    for row in svc.reconciliation_sheet().await.unwrap() {
        assert_eq!(
            row.stored_quantity, row.derived_quantity,
            "{} drifted from its ledger",
            row.name
        );
    }
}

// ---------------------------------------------------------------------------
// Full flow
// ---------------------------------------------------------------------------

#[tokio::test]
async fn week_of_work_keeps_ledger_and_stock_in_step() {
    let svc = test_service().await;
    let paint = item(&svc, "Eggshell White", "PNT-EW", 12, 3250).await;
    let tape = item(&svc, "Blue Tape", "TP-BL", 30, 499).await;
    let project = svc
        .create_project("Smith House", Some("Exterior"), None, None, ACTOR)
        .await
        .unwrap();

    let cart = svc
        .checkout(
            &project.id,
            &[(paint.clone(), 4), (tape.clone(), 6)],
            Some("day one"),
            ACTOR,
        )
        .await
        .unwrap();
    assert_eq!(cart.total_cost, Decimal::new(15994, 2));
    assert_consistent(&svc).await;

    svc.receive(
        &[ReceiveLine::new(paint.clone(), 10, Some(Decimal::new(3100, 2)))],
        Some("PO 2231"),
        ACTOR,
    )
    .await
    .unwrap();
    assert_consistent(&svc).await;

    svc.reconcile(&[(paint.clone(), 17), (tape.clone(), 24)], "Sam", None)
        .await
        .unwrap();
    assert_consistent(&svc).await;

    svc.checkout(&project.id, &[(paint.clone(), 2)], None, ACTOR)
        .await
        .unwrap();
    assert_consistent(&svc).await;

    let paint_now = svc.get_item(&paint).await.unwrap();
    assert_eq!(paint_now.current_stock, 15);
    assert_eq!(paint_now.unit_cost, Decimal::new(3100, 2));

    let expenses = svc.project_expenses(&project.id).await.unwrap();
    assert_eq!(expenses.lines.len(), 3);
    // 4 × 32.50 + 6 × 4.99 + 2 × 31.00
    assert_eq!(expenses.total_cost, Decimal::new(22194, 2));
}

#[tokio::test]
async fn closed_project_blocks_checkout_until_reopened() {
    let svc = test_service().await;
    let paint = item(&svc, "Eggshell White", "PNT-EW", 12, 3250).await;
    let project = svc
        .create_project("Smith House", None, None, None, ACTOR)
        .await
        .unwrap();
    svc.transition_project(&project.id, ProjectStatus::Completed, ACTOR)
        .await
        .unwrap();

    let blocked = svc
        .checkout(&project.id, &[(paint.clone(), 1)], None, ACTOR)
        .await;
    assert!(matches!(
        blocked,
        Err(DatabaseError::Core(CoreError::Validation(_)))
    ));

    svc.transition_project(&project.id, ProjectStatus::Active, ACTOR)
        .await
        .unwrap();
    svc.checkout(&project.id, &[(paint.clone(), 1)], None, ACTOR)
        .await
        .unwrap();
    assert_eq!(svc.get_item(&paint).await.unwrap().current_stock, 11);
}

// ---------------------------------------------------------------------------
// Reversals
// ---------------------------------------------------------------------------

#[tokio::test]
async fn void_then_delete_count_restores_history() {
    let svc = test_service().await;
    let paint = item(&svc, "Eggshell White", "PNT-EW", 10, 3250).await;
    let project = svc
        .create_project("Smith House", None, None, None, ACTOR)
        .await
        .unwrap();

    let cart = svc
        .checkout(&project.id, &[(paint.clone(), 3)], None, ACTOR)
        .await
        .unwrap();
    let rec = svc
        .reconcile(&[(paint.clone(), 6)], "Sam", None)
        .await
        .unwrap();
    assert_eq!(svc.get_item(&paint).await.unwrap().current_stock, 6);

    let adjustment = svc
        .list_transactions(&TransactionFilter {
            transaction_type: Some(TransactionType::Adjustment),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(adjustment.len(), 1);
    assert!(svc.void_transaction(&adjustment[0].id, ACTOR).await.is_err());

    svc.delete_reconciliation(&rec.reconciliation.id, ACTOR)
        .await
        .unwrap();
    assert_eq!(svc.get_item(&paint).await.unwrap().current_stock, 7);

    svc.void_transaction(&cart.transactions[0].id, ACTOR)
        .await
        .unwrap();
    assert_eq!(svc.get_item(&paint).await.unwrap().current_stock, 10);
    assert_consistent(&svc).await;
}

// ---------------------------------------------------------------------------
// Audit
// ---------------------------------------------------------------------------

#[tokio::test]
async fn checkout_is_fully_audited() {
    let svc = test_service().await;
    let paint = item(&svc, "Eggshell White", "PNT-EW", 10, 3250).await;
    let project = svc
        .create_project("Smith House", None, None, None, ACTOR)
        .await
        .unwrap();
    let cart = svc
        .checkout(&project.id, &[(paint.clone(), 3)], None, ACTOR)
        .await
        .unwrap();

    let stock = svc
        .query_audit(&AuditFilter {
            entity_type: Some(EntityType::Item),
            entity_id: Some(paint.clone()),
            action: Some(AuditAction::StockChanged),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(stock.len(), 1);
    let detail = stock[0].detail.as_ref().unwrap();
    assert_eq!(detail["from"], 10);
    assert_eq!(detail["to"], 7);
    assert_eq!(detail["source_id"], cart.transactions[0].id.as_str());

    let by_actor = svc
        .query_audit(&AuditFilter {
            actor: Some(ACTOR.into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(by_actor.iter().all(|e| e.actor.as_deref() == Some(ACTOR)));
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

#[tokio::test]
async fn file_database_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tally.db");
    let path = path.to_str().unwrap();

    let paint = {
        let svc = TallyService::new_local(path).await.unwrap();
        item(&svc, "Eggshell White", "PNT-EW", 10, 3250).await
    };

    let svc = TallyService::new_local(path).await.unwrap();
    let reopened = svc.get_item(&paint).await.unwrap();
    assert_eq!(reopened.current_stock, 10);
    assert_eq!(svc.derive_quantity(&paint).await.unwrap(), 10);
}
