//! End-to-end flows over the embedded fixture set.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use handset_core::checkout::{CartLine, CheckoutRequest};
use handset_core::drafts::{NewCustomer, NewWarrantyClaim, WarrantyClaimUpdate};
use handset_core::reorder::ReorderPriority;
use handset_core::{Money, PaymentMethod, SupplierOrderStatus, WarrantyClaimStatus};
use handset_store::{Clock, Database, FixtureSet, ShopConfig, StoreError};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 30, 18, 0, 0).unwrap()
}

fn store() -> Database {
    Database::new(ShopConfig::default())
        .unwrap()
        .with_clock(Clock::Fixed(now()))
}

fn cart(customer_id: Option<u32>, lines: &[(u32, i64)]) -> CheckoutRequest {
    CheckoutRequest {
        customer_id,
        lines: lines
            .iter()
            .map(|&(device_id, quantity)| CartLine { device_id, quantity })
            .collect(),
        discount_bps: 0,
        payment_method: PaymentMethod::DebitCard,
    }
}

#[tokio::test]
async fn test_new_customer_checkout_shows_up_everywhere() {
    let db = store();

    let customer = db
        .customers()
        .create(NewCustomer {
            name: "Ines Moreau".to_string(),
            email: "ines.moreau@example.com".to_string(),
            phone: "555-0110".to_string(),
        })
        .await
        .unwrap();

    // iPad Air: 599.00 + 8% tax = 646.92
    let sale = db
        .sales()
        .complete_sale(cart(Some(customer.id), &[(9, 1)]))
        .await
        .unwrap();
    assert_eq!(sale.total, Money::from_cents(64_692));

    let dashboard = db.insights().dashboard().await;
    assert_eq!(dashboard.today_sales, 2);
    assert_eq!(dashboard.today_revenue, Money::from_cents(64_584 + 64_692));
    assert_eq!(dashboard.total_revenue, Money::from_cents(871_249 + 64_692));
    assert_eq!(dashboard.recent_sales[0].id, sale.id);

    let insights = db.insights().business_insights(90).await;
    let clv = insights
        .customer_lifetime_values
        .iter()
        .find(|c| c.customer_id == customer.id)
        .unwrap();
    assert_eq!(clv.purchase_count, 1);
    assert_eq!(clv.total_spent, sale.total);

    let refreshed = db.customers().get_by_id(customer.id).await.unwrap();
    assert_eq!(refreshed.purchase_history, vec![sale.id]);
}

#[tokio::test]
async fn test_failed_checkout_leaves_store_untouched() {
    let db = store();
    let before = db.snapshot().await;

    let err = db
        .sales()
        .complete_sale(cart(Some(2), &[(1, 1), (4, 1)]))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Galaxy S21"));

    let after = db.snapshot().await;
    assert_eq!(before.sales, after.sales);
    assert_eq!(before.devices, after.devices);
    assert_eq!(before.customers, after.customers);
}

#[tokio::test]
async fn test_reorder_cycle_restocks_devices() {
    let db = store();
    let orders = db.supplier_orders();

    let suggestions = orders.get_suggested_items().await;
    assert_eq!(suggestions[0].device_id, 10);
    assert_eq!(suggestions[0].priority, ReorderPriority::High);
    assert_eq!(suggestions[0].days_of_stock, 10.0);

    // Galaxy S21 is out of stock but has not sold recently, so it is not suggested.
    assert!(suggestions.iter().all(|s| s.device_id != 4));

    let order = orders
        .create_from_suggestions(2, &suggestions, "Weekly reorder")
        .await
        .unwrap();
    orders.update_status(order.id, SupplierOrderStatus::Ordered).await.unwrap();
    orders.update_status(order.id, SupplierOrderStatus::Received).await.unwrap();

    assert_eq!(db.devices().get_by_id(10).await.unwrap().quantity, 6);
    assert_eq!(db.devices().get_by_id(6).await.unwrap().quantity, 3);
    assert!(orders.get_suggested_items().await.is_empty());
    assert_eq!(orders.get_by_status(SupplierOrderStatus::Received).await.len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_checkouts_never_oversell() {
    let db = Arc::new(store());

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let db = Arc::clone(&db);
            tokio::spawn(async move { db.sales().complete_sale(cart(None, &[(8, 5)])).await })
        })
        .collect();

    let mut completed = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            completed += 1;
        }
    }

    // 40 chargers on hand, 5 per sale
    assert_eq!(completed, 8);
    assert_eq!(db.devices().get_by_id(8).await.unwrap().quantity, 0);
    assert_eq!(db.sales().get_all().await.len(), 12 + 8);
}

#[tokio::test]
async fn test_warranty_claim_lifecycle() {
    let db = store();
    let claims = db.warranty_claims();

    let claim = claims
        .create(NewWarrantyClaim {
            sale_id: 11,
            supplier_id: 1,
            issue_description: "Touchscreen dead zone".to_string(),
            serial_number: "F2LXK0A1302".to_string(),
            claim_amount: Money::from_cents(20_000),
        })
        .await
        .unwrap();

    for status in [
        WarrantyClaimStatus::Submitted,
        WarrantyClaimStatus::Approved,
        WarrantyClaimStatus::Closed,
    ] {
        claims
            .update(
                claim.id,
                WarrantyClaimUpdate {
                    status: Some(status),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
    }

    let closed = claims.get_by_id(claim.id).await.unwrap();
    assert_eq!(closed.status, WarrantyClaimStatus::Closed);
    assert_eq!(closed.resolution_date, Some(now()));

    let stats = claims.claim_statistics().await;
    assert_eq!(stats.total, 5);
    assert_eq!(stats.count_of(WarrantyClaimStatus::Closed), 1);
    assert_eq!(stats.approved_amount, Money::from_cents(42_000));
}

#[tokio::test]
async fn test_config_drives_checkout_and_dashboard() {
    let config = ShopConfig::from_toml(
        r#"
        [shop]
        name = "Tax Free Phones"
        tax_rate_bps = 0

        [inventory]
        low_stock_threshold = 5
        "#,
    )
    .unwrap();
    let db = Database::new(config).unwrap().with_clock(Clock::Fixed(now()));

    let sale = db.sales().complete_sale(cart(None, &[(8, 1)])).await.unwrap();
    assert!(sale.tax.is_zero());
    assert_eq!(sale.total, Money::from_cents(2_999));

    let dashboard = db.insights().dashboard().await;
    assert_eq!(dashboard.shop_name, "Tax Free Phones");
    // 0 < quantity < 5: Galaxy S23 Ultra, Pixel 6, Spigen case
    assert_eq!(dashboard.low_stock_count, 3);
}

#[tokio::test]
async fn test_fixture_directory_overrides_single_file() {
    let dir = std::env::temp_dir().join(format!("handset-fixtures-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("devices.json"), "[]").unwrap();

    let mut config = ShopConfig::default();
    config.fixtures.dir = Some(dir.clone());
    let db = Database::new(config).unwrap();

    assert!(db.devices().get_all().await.is_empty());
    assert_eq!(db.customers().get_all().await.len(), 7);

    std::fs::write(dir.join("sales.json"), "{ not json").unwrap();
    let mut config = ShopConfig::default();
    config.fixtures.dir = Some(dir.clone());
    let err = Database::new(config).unwrap_err();
    assert!(matches!(err, StoreError::Fixture { ref name, .. } if name == "sales.json"));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn test_duplicate_fixture_ids_are_rejected() {
    let mut set = FixtureSet::embedded().unwrap();
    let copy = set.customers[0].clone();
    set.customers.push(copy);

    let err = Database::from_fixtures(set, ShopConfig::default()).unwrap_err();
    assert!(matches!(err, StoreError::DuplicateId { entity: "Customer", id: 1 }));
}
