//! Fee percentage enrichment.

use serde_json::Value;
use across_types::{BridgeError, Quote, Result};

/// `fee / input * 100`, or 0 when the input amount is zero.
pub fn fee_pct(fee_amount: f64, input_amount: f64) -> f64 {
    if input_amount > 0.0 {
        fee_amount / input_amount * 100.0
    } else {
        0.0
    }
}

/// Write `fees.totalFeePct` into the quote when it carries `fees.total`.
///
/// `fees.total` may be a bare number, a numeric string, or an object with
/// an `amount` field. Returns the computed percentage, if any.
pub fn annotate_fee_pct(quote: &mut Quote, input_amount: &str) -> Result<Option<f64>> {
    let Some(fees) = quote.fees_mut() else {
        return Ok(None);
    };
    let Some(total) = fees.get("total") else {
        return Ok(None);
    };

    let fee_amount = match total {
        Value::Object(obj) => {
            let amount = obj.get("amount").ok_or_else(|| {
                BridgeError::Parse("fees.total has no amount field".into())
            })?;
            numeric(amount)?
        }
        other => numeric(other)?,
    };
    let input = input_amount
        .parse::<f64>()
        .map_err(|_| BridgeError::Parse(format!("input amount {:?} is not numeric", input_amount)))?;

    let pct = fee_pct(fee_amount, input);
    let number = serde_json::Number::from_f64(pct)
        .ok_or_else(|| BridgeError::Parse(format!("fee percentage {} is not finite", pct)))?;
    fees.insert("totalFeePct".into(), Value::Number(number));
    Ok(Some(pct))
}

fn numeric(v: &Value) -> Result<f64> {
    match v {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| BridgeError::Parse(format!("fee amount {} is out of range", n))),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| BridgeError::Parse(format!("fee amount {:?} is not numeric", s))),
        other => Err(BridgeError::Parse(format!("unexpected fee amount {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn quote(v: Value) -> Quote {
        Quote::from_json(v).unwrap()
    }

    #[test]
    fn test_fee_pct_formula() {
        assert_eq!(fee_pct(25.0, 1000.0), 2.5);
        assert_eq!(fee_pct(1000.0, 1000.0), 100.0);
        assert_eq!(fee_pct(0.0, 1000.0), 0.0);
        assert_eq!(fee_pct(5.0, 0.0), 0.0);
    }

    #[test]
    fn test_fee_pct_known_values() {
        assert!((fee_pct(1.0, 3.0) - 33.333_333_333_333_336).abs() < 1e-9);
        assert!((fee_pct(2.0, 3.0) - 66.666_666_666_666_67).abs() < 1e-9);
        assert_eq!(fee_pct(7.0, 7.0), 100.0);
        assert_eq!(fee_pct(4_624_539_426_727_526.0, 4_624_539_426_727_526.0), 100.0);
        assert_eq!(fee_pct(1.0, 8.0), 12.5);
        assert_eq!(fee_pct(0.0, 5.0), 0.0);
    }

    #[test]
    fn test_annotate_bare_string() {
        let mut q = quote(json!({"fees": {"total": "50000"}}));
        let pct = annotate_fee_pct(&mut q, "5000000").unwrap();
        assert_eq!(pct, Some(1.0));
        assert_eq!(q.total_fee_pct(), Some(1.0));
        // Original fields are untouched.
        assert_eq!(q.as_json()["fees"]["total"], "50000");
    }

    #[test]
    fn test_annotate_nested_amount() {
        let mut q = quote(json!({"fees": {"total": {"amount": "250", "pct": "ignored"}}}));
        annotate_fee_pct(&mut q, "1000").unwrap();
        assert_eq!(q.total_fee_pct(), Some(25.0));

        let mut q = quote(json!({"fees": {"total": {"amount": 10}}}));
        annotate_fee_pct(&mut q, "1000").unwrap();
        assert_eq!(q.total_fee_pct(), Some(1.0));
    }

    #[test]
    fn test_annotate_zero_input() {
        let mut q = quote(json!({"fees": {"total": "12"}}));
        assert_eq!(annotate_fee_pct(&mut q, "0").unwrap(), Some(0.0));
        assert_eq!(q.total_fee_pct(), Some(0.0));
    }

    #[test]
    fn test_annotate_without_fees() {
        let mut q = quote(json!({"outputAmount": "1"}));
        assert_eq!(annotate_fee_pct(&mut q, "100").unwrap(), None);
        assert!(q.as_json().get("fees").is_none());

        let mut q = quote(json!({"fees": {"lpFee": "1"}}));
        assert_eq!(annotate_fee_pct(&mut q, "100").unwrap(), None);
    }

    #[test]
    fn test_annotate_malformed_fee() {
        let mut q = quote(json!({"fees": {"total": "lots"}}));
        assert!(matches!(annotate_fee_pct(&mut q, "100"), Err(BridgeError::Parse(_))));

        let mut q = quote(json!({"fees": {"total": {"pct": "1"}}}));
        assert!(matches!(annotate_fee_pct(&mut q, "100"), Err(BridgeError::Parse(_))));
    }
}
