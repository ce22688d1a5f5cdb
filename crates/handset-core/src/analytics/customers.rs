//! Customer lifetime value.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Customer, EntityId, Sale};

/// Lifetime spend of one customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CustomerLifetimeValue {
    pub customer_id: EntityId,
    pub customer_code: String,
    pub name: String,
    pub email: String,
    pub total_spent: Money,
    pub purchase_count: usize,
    pub average_order_value: Money,
    #[ts(as = "String")]
    pub first_purchase: DateTime<Utc>,
    #[ts(as = "String")]
    pub last_purchase: DateTime<Utc>,
}

/// Computes CLV for every customer with at least one sale.
///
/// Walk-in sales and sales pointing at unknown customers are skipped.
/// Sorted by `total_spent`, highest first; equal spenders keep customer
/// order. The result is unbounded, callers take a prefix for display.
pub fn lifetime_values(sales: &[Sale], customers: &[Customer]) -> Vec<CustomerLifetimeValue> {
    struct Tally {
        total: Money,
        count: usize,
        first: DateTime<Utc>,
        last: DateTime<Utc>,
    }

    let mut tallies: HashMap<EntityId, Tally> = HashMap::new();
    for sale in sales {
        let Some(customer_id) = sale.customer_id else {
            continue;
        };
        tallies
            .entry(customer_id)
            .and_modify(|t| {
                t.total += sale.total;
                t.count += 1;
                t.first = t.first.min(sale.timestamp);
                t.last = t.last.max(sale.timestamp);
            })
            .or_insert(Tally {
                total: sale.total,
                count: 1,
                first: sale.timestamp,
                last: sale.timestamp,
            });
    }

    let mut values: Vec<CustomerLifetimeValue> = customers
        .iter()
        .filter_map(|customer| {
            let tally = tallies.get(&customer.id)?;
            Some(CustomerLifetimeValue {
                customer_id: customer.id,
                customer_code: customer.customer_code.clone(),
                name: customer.name.clone(),
                email: customer.email.clone(),
                total_spent: tally.total,
                purchase_count: tally.count,
                average_order_value: Money::average(tally.total, tally.count),
                first_purchase: tally.first,
                last_purchase: tally.last,
            })
        })
        .collect();

    values.sort_by(|a, b| b.total_spent.cmp(&a.total_spent));
    values
}

/// Mean total spend across the given CLV rows, zero when there are none.
pub fn average_lifetime_value(values: &[CustomerLifetimeValue]) -> Money {
    let total: Money = values.iter().map(|v| v.total_spent).sum();
    Money::average(total, values.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PaymentMethod;
    use chrono::{Duration, TimeZone};

    fn customer(id: EntityId, name: &str) -> Customer {
        Customer {
            id,
            customer_code: format!("CUST{id:03}"),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: "555-0100".to_string(),
            registration_date: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            purchase_history: vec![],
            repair_history: vec![],
            store_credit: Money::zero(),
        }
    }

    fn sale(id: EntityId, customer_id: Option<EntityId>, total: i64, day: i64) -> Sale {
        Sale {
            id,
            sale_code: format!("SALE{id:03}"),
            customer_id,
            items: vec![],
            subtotal: Money::from_major(total),
            discount: Money::zero(),
            discount_bps: 0,
            tax: Money::zero(),
            total: Money::from_major(total),
            payment_method: PaymentMethod::Cash,
            timestamp: Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap() + Duration::days(day),
        }
    }

    #[test]
    fn test_two_sales_clv() {
        let customers = vec![customer(1, "Alice")];
        let sales = vec![sale(1, Some(1), 100, 0), sale(2, Some(1), 50, 3)];
        let clv = lifetime_values(&sales, &customers);

        assert_eq!(clv.len(), 1);
        assert_eq!(clv[0].total_spent, Money::from_major(150));
        assert_eq!(clv[0].purchase_count, 2);
        assert_eq!(clv[0].average_order_value, Money::from_major(75));
        assert_eq!(clv[0].first_purchase, sales[0].timestamp);
        assert_eq!(clv[0].last_purchase, sales[1].timestamp);
    }

    #[test]
    fn test_customers_without_sales_are_omitted() {
        let customers = vec![customer(1, "Alice"), customer(2, "Bob")];
        let sales = vec![sale(1, Some(2), 80, 0), sale(2, None, 500, 1)];
        let clv = lifetime_values(&sales, &customers);

        assert_eq!(clv.len(), 1);
        assert_eq!(clv[0].name, "Bob");
    }

    #[test]
    fn test_sorted_by_spend_and_sums_match() {
        let customers = vec![customer(1, "Alice"), customer(2, "Bob"), customer(3, "Cara")];
        let sales = vec![
            sale(1, Some(1), 100, 0),
            sale(2, Some(2), 400, 1),
            sale(3, Some(3), 250, 2),
            sale(4, Some(1), 120, 3),
        ];
        let clv = lifetime_values(&sales, &customers);

        let order: Vec<EntityId> = clv.iter().map(|c| c.customer_id).collect();
        assert_eq!(order, vec![2, 3, 1]);

        for row in &clv {
            let own: Vec<&Sale> = sales.iter().filter(|s| s.customer_id == Some(row.customer_id)).collect();
            assert_eq!(row.purchase_count, own.len());
            assert_eq!(row.total_spent, own.iter().map(|s| s.total).sum::<Money>());
        }

        assert_eq!(average_lifetime_value(&clv), Money::from_cents(29_000));
    }

    #[test]
    fn test_average_of_no_rows() {
        assert!(average_lifetime_value(&[]).is_zero());
    }
}
