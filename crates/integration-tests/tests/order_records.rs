//! The delivery ZIP code recorded on orders.
//!
//! Requires a migrated `PostgreSQL` database (`zipgate migrate all`).

#![allow(clippy::unwrap_used)]

use sqlx::PgPool;
use uuid::Uuid;
use zipgate_core::PostalCode;
use zipgate_core::checkout::delivery_zipcode_to_record;
use zipgate_storefront::db::{OrderRepository, RepositoryError};
use zipgate_storefront::models::{NewOrder, Order};

async fn place_order(pool: &PgPool, postcode: &str) -> Order {
    let email = format!("orders-{}@example.com", Uuid::new_v4());
    OrderRepository::new(pool)
        .create(&NewOrder {
            email: &email,
            shipping_name: "Test Shopper",
            shipping_address: "1 Main St",
            shipping_city: "Colorado Springs",
            shipping_postcode: postcode,
            payment_method: "card",
        })
        .await
        .unwrap()
}

#[tokio::test]
#[ignore = "Requires a migrated PostgreSQL database"]
async fn test_new_order_has_no_delivery_zipcode() {
    let pool = zipgate_integration_tests::connect_pool().await.unwrap();

    let order = place_order(&pool, "80902").await;
    assert!(order.delivery_zipcode.is_none());
}

#[tokio::test]
#[ignore = "Requires a migrated PostgreSQL database"]
async fn test_delivery_zipcode_is_written_once() {
    let pool = zipgate_integration_tests::connect_pool().await.unwrap();
    let orders = OrderRepository::new(&pool);
    let order = place_order(&pool, "80902").await;

    let first = PostalCode::parse("80902").unwrap();
    let second = PostalCode::parse("80903").unwrap();
    assert!(orders.record_delivery_zipcode(order.id, &first).await.unwrap());
    assert!(!orders.record_delivery_zipcode(order.id, &second).await.unwrap());

    let stored = orders.get_by_id(order.id).await.unwrap().unwrap();
    assert_eq!(stored.delivery_zipcode, Some(first));
}

#[tokio::test]
#[ignore = "Requires a migrated PostgreSQL database"]
async fn test_blank_postcode_leaves_delivery_zipcode_unset() {
    let pool = zipgate_integration_tests::connect_pool().await.unwrap();
    let orders = OrderRepository::new(&pool);
    let order = place_order(&pool, "").await;

    // Checkout only records a value when there is one to record.
    assert!(delivery_zipcode_to_record(Some(order.shipping_postcode.as_str())).is_none());

    let stored = orders.get_by_id(order.id).await.unwrap().unwrap();
    assert!(stored.delivery_zipcode.is_none());
    assert_eq!(stored.shipping_postcode, "");
}

#[tokio::test]
#[ignore = "Requires a migrated PostgreSQL database"]
async fn test_recording_on_unknown_order_is_not_found() {
    let pool = zipgate_integration_tests::connect_pool().await.unwrap();
    let code = PostalCode::parse("80902").unwrap();

    let result = OrderRepository::new(&pool)
        .record_delivery_zipcode(Uuid::new_v4(), &code)
        .await;
    assert!(matches!(result, Err(RepositoryError::NotFound)));
}
