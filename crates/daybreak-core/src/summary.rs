//! # Daily Sales Summary
//!
//! Read-only aggregation over committed sale transactions. Periodic
//! reporting collaborators consume this; nothing here mutates the ledger.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{PaymentMethod, SaleTransaction};

/// Aggregated figures for one day, optionally scoped to one outlet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySalesSummary {
    pub date: NaiveDate,
    /// `None` means all outlets.
    pub outlet_scope: Option<String>,
    pub transaction_count: usize,
    pub units_sold: i64,
    pub gross_cents: i64,
    /// Gross cents per payment method.
    pub by_method: HashMap<PaymentMethod, i64>,
}

impl DailySalesSummary {
    /// Aggregates the transactions committed on `date`.
    ///
    /// Transactions on other days are ignored; `outlet_scope` of `None`
    /// covers every outlet.
    pub fn from_transactions(
        sales: &[SaleTransaction],
        date: NaiveDate,
        outlet_scope: Option<&str>,
    ) -> Self {
        let mut summary = DailySalesSummary {
            date,
            outlet_scope: outlet_scope.map(str::to_string),
            transaction_count: 0,
            units_sold: 0,
            gross_cents: 0,
            by_method: HashMap::new(),
        };

        for sale in sales {
            if sale.created_at.date_naive() != date {
                continue;
            }
            if let Some(outlet) = outlet_scope {
                if sale.outlet_code != outlet {
                    continue;
                }
            }

            summary.transaction_count += 1;
            summary.units_sold += sale.units();
            summary.gross_cents += sale.total_cents;
            *summary.by_method.entry(sale.payment_method).or_insert(0) += sale.total_cents;
        }

        summary
    }

    /// Gross total as Money.
    pub fn gross(&self) -> Money {
        Money::from_cents(self.gross_cents)
    }
}

impl std::fmt::Display for DailySalesSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Report [{}] | Scope: {} | Txns: {} | Total: {}",
            self.date,
            self.outlet_scope.as_deref().unwrap_or("All"),
            self.transaction_count,
            self.gross()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SaleLine;

    fn sale(outlet: &str, at: &str, method: PaymentMethod, totals: &[(i64, i64)]) -> SaleTransaction {
        let lines: Vec<SaleLine> = totals
            .iter()
            .map(|(qty, cents)| SaleLine {
                model_code: "X1".to_string(),
                quantity: *qty,
                unit_price_cents: cents / qty,
                subtotal_cents: *cents,
            })
            .collect();
        let total_cents = lines.iter().map(|l| l.subtotal_cents).sum();
        SaleTransaction {
            id: "s-1".to_string(),
            outlet_code: outlet.to_string(),
            customer_name: "Walk-in".to_string(),
            payment_method: method,
            employee_id: "E001".to_string(),
            employee_name: "Farah".to_string(),
            created_at: at.parse().unwrap(),
            lines,
            total_cents,
        }
    }

    #[test]
    fn test_summary_filters_by_date_and_outlet() {
        let sales = vec![
            sale("C60", "2026-03-02T10:00:00Z", PaymentMethod::Cash, &[(2, 20000)]),
            sale("C60", "2026-03-02T12:00:00Z", PaymentMethod::Card, &[(1, 10000)]),
            sale("K12", "2026-03-02T13:00:00Z", PaymentMethod::Cash, &[(5, 5000)]),
            sale("C60", "2026-03-03T09:00:00Z", PaymentMethod::Cash, &[(9, 9000)]),
        ];

        let date = "2026-03-02".parse().unwrap();
        let all = DailySalesSummary::from_transactions(&sales, date, None);
        assert_eq!(all.transaction_count, 3);
        assert_eq!(all.units_sold, 8);
        assert_eq!(all.gross_cents, 35000);
        assert_eq!(all.by_method[&PaymentMethod::Cash], 25000);
        assert_eq!(all.by_method[&PaymentMethod::Card], 10000);

        let c60 = DailySalesSummary::from_transactions(&sales, date, Some("C60"));
        assert_eq!(c60.transaction_count, 2);
        assert_eq!(c60.gross_cents, 30000);
    }

    #[test]
    fn test_display() {
        let summary = DailySalesSummary {
            date: "2026-03-02".parse().unwrap(),
            outlet_scope: None,
            transaction_count: 2,
            units_sold: 3,
            gross_cents: 30000,
            by_method: HashMap::new(),
        };
        assert_eq!(
            summary.to_string(),
            "Report [2026-03-02] | Scope: All | Txns: 2 | Total: RM300.00"
        );
    }
}
