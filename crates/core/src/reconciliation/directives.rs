//! Extraction of balance directives from opaque report fragments.
//!
//! A fragment is any JSON document. Every element of a `details` array that
//! carries an `enrollmentId` is a directive; its `balancereamaining` value is
//! the balance to assign. Elements without `enrollmentId` (bonus details,
//! for instance) are searched for nested fragments instead.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;
use uuid::Uuid;

use super::error::ReconcileError;
use super::types::BalanceDirective;

const DETAILS_KEY: &str = "details";
const ENROLLMENT_KEY: &str = "enrollmentId";
const BALANCE_KEY: &str = "balancereamaining";

/// A directive element that could not be read.
#[derive(Debug)]
pub struct RejectedDirective {
    /// Enrollment ID as written in the fragment.
    pub raw_id: String,
    /// Reason.
    pub error: ReconcileError,
}

/// Collects every directive in `fragment`, in document order.
#[must_use]
pub fn collect_directives(fragment: &Value) -> Vec<Result<BalanceDirective, RejectedDirective>> {
    let mut out = Vec::new();
    walk(fragment, &mut out);
    out
}

fn walk(value: &Value, out: &mut Vec<Result<BalanceDirective, RejectedDirective>>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                match child {
                    Value::Array(items) if key == DETAILS_KEY => {
                        for item in items {
                            if is_directive(item) {
                                out.push(parse_directive(item));
                            } else {
                                walk(item, out);
                            }
                        }
                    }
                    _ => walk(child, out),
                }
            }
        }
        Value::Array(items) => items.iter().for_each(|item| walk(item, out)),
        _ => {}
    }
}

fn is_directive(item: &Value) -> bool {
    item.get(ENROLLMENT_KEY).is_some_and(|id| !id.is_null())
}

fn parse_directive(item: &Value) -> Result<BalanceDirective, RejectedDirective> {
    let raw_id = match item.get(ENROLLMENT_KEY) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    };

    let reject = |error: ReconcileError| RejectedDirective {
        raw_id: raw_id.clone(),
        error,
    };

    let enrollment_id = Uuid::parse_str(raw_id.trim())
        .map_err(|_| reject(ReconcileError::invalid(format!("invalid enrollment id '{raw_id}'"))))?;

    let new_balance = match item.get(BALANCE_KEY) {
        Some(Value::Number(n)) => parse_decimal(&n.to_string()),
        Some(Value::String(s)) => parse_decimal(s.trim()),
        _ => None,
    }
    .ok_or_else(|| reject(ReconcileError::invalid(format!("missing or invalid {BALANCE_KEY}"))))?;

    Ok(BalanceDirective {
        enrollment_id,
        new_balance,
    })
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_collects_flat_details() {
        let id = Uuid::new_v4();
        let fragment = json!({ "details": [{ "enrollmentId": id, "balancereamaining": 50 }] });

        let found = collect_directives(&fragment);
        assert_eq!(found.len(), 1);
        let directive = found[0].as_ref().unwrap();
        assert_eq!(directive.enrollment_id, id);
        assert_eq!(directive.new_balance, dec!(50));
    }

    #[test]
    fn test_collects_nested_professor_reports() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let fragment = json!([
            {
                "professorId": Uuid::new_v4(),
                "details": [{ "enrollmentId": a, "balancereamaining": "12.50" }],
                "abonos": { "total": "20", "details": [{ "id": Uuid::new_v4(), "amount": "20" }] }
            },
            { "details": [{ "enrollmentId": b, "balancereamaining": -3.25 }] }
        ]);

        let found: Vec<_> = collect_directives(&fragment)
            .into_iter()
            .map(|r| r.unwrap())
            .collect();

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].enrollment_id, a);
        assert_eq!(found[0].new_balance, dec!(12.5));
        assert_eq!(found[1].enrollment_id, b);
        assert_eq!(found[1].new_balance, dec!(-3.25));
    }

    #[test]
    fn test_rejects_malformed_id() {
        let fragment = json!({
            "details": [{ "enrollmentId": "not-a-uuid", "balancereamaining": 1 }]
        });

        let found = collect_directives(&fragment);
        assert_eq!(found.len(), 1);
        let rejected = found[0].as_ref().unwrap_err();
        assert_eq!(rejected.raw_id, "not-a-uuid");
        assert!(matches!(rejected.error, ReconcileError::InvalidDirective(_)));
    }

    #[test]
    fn test_rejects_missing_balance() {
        let fragment = json!({ "details": [{ "enrollmentId": Uuid::new_v4() }] });
        assert!(collect_directives(&fragment)[0].is_err());
    }

    #[test]
    fn test_ignores_values_outside_details() {
        let fragment = json!({
            "enrollmentId": Uuid::new_v4(),
            "balancereamaining": 5,
            "subtotal": { "total": 10 }
        });
        assert!(collect_directives(&fragment).is_empty());
        assert!(collect_directives(&Value::Null).is_empty());
    }
}
