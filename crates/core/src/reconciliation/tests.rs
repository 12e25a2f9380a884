use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use uuid::Uuid;

use super::service::BalanceReconciler;
use super::types::{BalanceSource, ReconciliationInput};
use crate::enrollment::{Enrollment, EnrollmentStatus, EnrollmentType, Plan, Professor, StudentRef};
use crate::reports::{ReportService, ReportSettings};
use crate::testing::InMemoryStore;

fn enrollment(professor_id: Uuid, plan_id: Uuid, balance: Decimal) -> Enrollment {
    Enrollment {
        id: Uuid::new_v4(),
        professor_id,
        students: vec![StudentRef {
            id: Uuid::new_v4(),
            name: "Marta Ruiz".to_string(),
        }],
        plan_id,
        enrollment_type: EnrollmentType::Single,
        alias: None,
        start_date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2024, 6, 28).unwrap(),
        status: EnrollmentStatus::Active,
        available_balance: dec!(100),
        total_amount: dec!(60),
        balance,
        penalization_count: 0,
    }
}

fn store_with(balances: &[Decimal]) -> (Arc<InMemoryStore>, Vec<Uuid>) {
    let store = Arc::new(InMemoryStore::default());
    let ids = balances
        .iter()
        .map(|b| {
            let e = enrollment(Uuid::new_v4(), Uuid::new_v4(), *b);
            let id = e.id;
            store.add_enrollment(e);
            id
        })
        .collect();
    (store, ids)
}

fn details(entries: &[(Value, Value)]) -> Value {
    let items: Vec<Value> = entries
        .iter()
        .map(|(id, balance)| json!({ "enrollmentId": id, "balancereamaining": balance }))
        .collect();
    json!({ "details": items })
}

fn directive(id: Uuid, balance: i64) -> (Value, Value) {
    (json!(id), json!(balance))
}

#[tokio::test]
async fn test_higher_tier_overwrites_lower_tier() {
    let (store, ids) = store_with(&[dec!(10)]);
    let x = ids[0];
    let reconciler = BalanceReconciler::new(Arc::clone(&store));

    let result = reconciler
        .reconcile_balances(
            Some(json!([details(&[directive(x, 50)])])),
            Some(details(&[directive(x, 70)])),
            Some(details(&[directive(x, 90)])),
        )
        .await;

    assert!(result.is_complete());
    assert_eq!(store.balance_of(x), Some(dec!(90)));

    let trail: Vec<(BalanceSource, Decimal, Decimal)> = result
        .updated
        .iter()
        .map(|u| (u.source, u.old_balance, u.new_balance))
        .collect();
    assert_eq!(
        trail,
        vec![
            (BalanceSource::Report, dec!(10), dec!(50)),
            (BalanceSource::SpecialProfessorReport, dec!(50), dec!(70)),
            (BalanceSource::Excedents, dec!(70), dec!(90)),
        ]
    );
}

#[tokio::test]
async fn test_lower_tier_survives_when_not_overridden() {
    let (store, ids) = store_with(&[dec!(0), dec!(0)]);
    let (a, b) = (ids[0], ids[1]);
    let reconciler = BalanceReconciler::new(Arc::clone(&store));

    let result = reconciler
        .reconcile_balances(
            Some(details(&[directive(a, 15), directive(b, 25)])),
            None,
            Some(details(&[directive(b, 5)])),
        )
        .await;

    assert_eq!(result.updated.len(), 3);
    assert_eq!(store.balance_of(a), Some(dec!(15)));
    assert_eq!(store.balance_of(b), Some(dec!(5)));
}

#[tokio::test]
async fn test_invalid_directive_does_not_stop_the_batch() {
    let (store, ids) = store_with(&[dec!(0), dec!(0)]);
    let (a, b) = (ids[0], ids[1]);
    let reconciler = BalanceReconciler::new(Arc::clone(&store));

    let excedents = details(&[
        directive(a, 40),
        (json!("not-a-uuid"), json!(10)),
        directive(b, 60),
    ]);
    let result = reconciler.reconcile_balances(None, None, Some(excedents)).await;

    assert_eq!(result.updated.len(), 2);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].enrollment_id, "not-a-uuid");
    assert_eq!(result.errors[0].source, BalanceSource::Excedents);
    assert_eq!(store.balance_of(a), Some(dec!(40)));
    assert_eq!(store.balance_of(b), Some(dec!(60)));
}

#[tokio::test]
async fn test_unknown_enrollment_is_reported() {
    let (store, ids) = store_with(&[dec!(3)]);
    let missing = Uuid::new_v4();
    let reconciler = BalanceReconciler::new(Arc::clone(&store));

    let result = reconciler
        .reconcile_balances(
            Some(details(&[directive(missing, 12), directive(ids[0], 8)])),
            None,
            None,
        )
        .await;

    assert_eq!(result.updated.len(), 1);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].enrollment_id, missing.to_string());
    assert!(result.errors[0].message.contains(&missing.to_string()));
    assert_eq!(store.balance_of(ids[0]), Some(dec!(8)));
}

#[tokio::test]
async fn test_failed_write_is_isolated() {
    let (store, ids) = store_with(&[dec!(1), dec!(2)]);
    let (a, b) = (ids[0], ids[1]);
    store.fail_writes_for(a);
    let reconciler = BalanceReconciler::new(Arc::clone(&store));

    let result = reconciler
        .reconcile_balances(
            None,
            Some(details(&[directive(a, 11), directive(b, 22)])),
            None,
        )
        .await;

    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].enrollment_id, a.to_string());
    assert_eq!(result.errors[0].source, BalanceSource::SpecialProfessorReport);
    assert_eq!(store.balance_of(a), Some(dec!(1)));
    assert_eq!(store.balance_of(b), Some(dec!(22)));
}

#[tokio::test]
async fn test_missing_or_bad_balance_is_rejected() {
    let (store, ids) = store_with(&[dec!(9)]);
    let reconciler = BalanceReconciler::new(Arc::clone(&store));

    let fragment = json!({ "details": [
        { "enrollmentId": ids[0] },
        { "enrollmentId": ids[0], "balancereamaining": "abc" },
    ]});
    let result = reconciler.reconcile_balances(Some(fragment), None, None).await;

    assert!(result.updated.is_empty());
    assert_eq!(result.errors.len(), 2);
    assert_eq!(store.balance_of(ids[0]), Some(dec!(9)));
}

#[tokio::test]
async fn test_no_fragments_is_a_no_op() {
    let (store, ids) = store_with(&[dec!(4)]);
    let reconciler = BalanceReconciler::new(Arc::clone(&store));

    let result = reconciler
        .apply_reconciliation(&ReconciliationInput::default())
        .await;

    assert!(result.updated.is_empty());
    assert!(result.is_complete());
    assert_eq!(store.balance_of(ids[0]), Some(dec!(4)));
}

#[tokio::test]
async fn test_store_outage_reports_every_directive() {
    let (store, ids) = store_with(&[dec!(4), dec!(5)]);
    store.set_unavailable();
    let reconciler = BalanceReconciler::new(Arc::clone(&store));

    let result = reconciler
        .reconcile_balances(
            Some(details(&[directive(ids[0], 1), directive(ids[1], 2)])),
            None,
            None,
        )
        .await;

    assert!(result.updated.is_empty());
    assert_eq!(result.errors.len(), 2);
}

#[tokio::test]
async fn test_generated_report_feeds_reconciliation() {
    let store = Arc::new(InMemoryStore::default());
    let professor = Professor {
        id: Uuid::new_v4(),
        name: "Laura Medina".to_string(),
        professor_type_id: None,
    };
    let plan = Plan {
        id: Uuid::new_v4(),
        name: "Plan Mensual".to_string(),
        monthly_classes: 4,
        pricing: HashMap::from([(EnrollmentType::Single, dec!(150))]),
    };
    let e = enrollment(professor.id, plan.id, Decimal::ZERO);
    let enrollment_id = e.id;
    store.add_professor(professor.clone());
    store.add_plan(plan);
    store.add_enrollment(e);

    let reports = ReportService::new(Arc::clone(&store), ReportSettings::default());
    let report = reports
        .generate_report(professor.id, "2024-03")
        .await
        .unwrap();
    let expected = report.lines[0].balance_remaining;

    let reconciler = BalanceReconciler::new(Arc::clone(&store));
    let input: ReconciliationInput = serde_json::from_value(json!({
        "report": [serde_json::to_value(&report).unwrap()],
    }))
    .unwrap();
    let result = reconciler.apply_reconciliation(&input).await;

    assert!(result.is_complete());
    assert_eq!(result.updated.len(), 1);
    assert_eq!(store.balance_of(enrollment_id), Some(expected));
    assert_eq!(expected, dec!(100));
}
