//! Billing engine running on the file-backed record store

use std::sync::Arc;

use rust_decimal_macros::dec;
use serde_json::json;

use domain_billing::{BillStatus, BillingEngine};
use infra_store::{Collection, JsonRecordStore, StoreConfig};
use test_utils::{assert_money_eq, HostelFixtures, IdFixtures, TemporalFixtures};

async fn seeded_store(config: StoreConfig) -> Arc<JsonRecordStore> {
    let store = JsonRecordStore::open(config).await.unwrap();
    store.save(Collection::Users, &HostelFixtures::users()).await.unwrap();
    store.save(Collection::MealRecords, &HostelFixtures::meals()).await.unwrap();
    store.save(Collection::Messes, &HostelFixtures::messes()).await.unwrap();
    Arc::new(store)
}

fn engine(store: &Arc<JsonRecordStore>) -> BillingEngine {
    BillingEngine::new(store.clone(), store.clone(), store.clone(), store.clone())
}

#[tokio::test]
async fn test_bills_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let store = seeded_store(StoreConfig::new(dir.path())).await;

    let report = engine(&store)
        .generate_bills_for_month(TemporalFixtures::april_2024())
        .await
        .unwrap();
    let bill_id = report.generated_bill_ids()[0];
    engine(&store).update_bill_status(bill_id, BillStatus::Paid).await.unwrap();
    store.close().await.unwrap();
    drop(store);

    let reopened = Arc::new(JsonRecordStore::open(StoreConfig::new(dir.path())).await.unwrap());
    let engine = engine(&reopened);

    let bills = engine.get_all_bills().await.unwrap();
    assert_eq!(bills.len(), 3);
    let paid = engine.get_bill(bill_id).await.unwrap().unwrap();
    assert_eq!(paid.status, BillStatus::Paid);

    let again = engine
        .generate_bills_for_month(TemporalFixtures::april_2024())
        .await
        .unwrap();
    assert_eq!(again.generated_count(), 0);
}

#[tokio::test]
async fn test_bill_file_uses_camel_case_records() {
    let dir = tempfile::tempdir().unwrap();
    let store = seeded_store(StoreConfig::new(dir.path())).await;
    engine(&store)
        .generate_bills_for_month(TemporalFixtures::april_2024())
        .await
        .unwrap();

    let raw = std::fs::read_to_string(dir.path().join("mess_bills.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();

    let first = &json[0];
    assert_eq!(first["month"], "2024-04");
    assert_eq!(first["status"], "pending");
    assert!(first["studentId"].is_string());
    assert!(first["generatedAt"].is_string());
}

#[tokio::test]
async fn test_undecodable_bill_is_carried_through_generation() {
    let dir = tempfile::tempdir().unwrap();
    let store = seeded_store(StoreConfig::new(dir.path())).await;
    let report = engine(&store)
        .generate_bills_for_month(TemporalFixtures::april_2024())
        .await
        .unwrap();
    let paid_id = report.generated_bill_ids()[0];
    engine(&store).update_bill_status(paid_id, BillStatus::Paid).await.unwrap();
    store.close().await.unwrap();
    drop(store);

    let path = dir.path().join("mess_bills.json");
    let mut stored: Vec<serde_json::Value> =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    stored.push(json!({"id": "1712345678901user-x", "studentId": "user-x", "totalAmount": 120}));
    std::fs::write(&path, serde_json::to_vec(&stored).unwrap()).unwrap();

    let reopened = Arc::new(JsonRecordStore::open(StoreConfig::new(dir.path())).await.unwrap());
    let engine = engine(&reopened);
    assert_eq!(engine.get_all_bills().await.unwrap().len(), 3);

    let march = engine
        .generate_bills_for_month(TemporalFixtures::march_2024())
        .await
        .unwrap();
    assert_eq!(march.generated_count(), 1);

    let on_disk: Vec<serde_json::Value> =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk.len(), 5);
    assert!(on_disk.iter().any(|b| b["id"] == "1712345678901user-x"));
    let paid = on_disk
        .iter()
        .find(|b| b["id"] == paid_id.as_uuid().to_string())
        .unwrap();
    assert_eq!(paid["status"], "paid");
}

#[tokio::test]
async fn test_unreadable_bill_file_is_kept_as_backup() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("mess_bills.json"), "[{\"id\": 42},").unwrap();
    let store = seeded_store(StoreConfig::new(dir.path())).await;
    let engine = engine(&store);

    assert!(engine.get_all_bills().await.unwrap().is_empty());
    let report = engine
        .generate_bills_for_month(TemporalFixtures::april_2024())
        .await
        .unwrap();
    assert_eq!(report.generated_count(), 3);

    let backup = std::fs::read_to_string(dir.path().join("mess_bills.json.corrupt")).unwrap();
    assert_eq!(backup, "[{\"id\": 42},");
}

#[tokio::test]
async fn test_failed_save_does_not_leave_bills_behind() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data");
    let store = seeded_store(StoreConfig::new(&data)).await;
    let engine = engine(&store);

    std::fs::remove_dir_all(&data).unwrap();
    let failed = engine
        .generate_bills_for_month(TemporalFixtures::april_2024())
        .await;
    assert!(failed.is_err());
    assert!(engine.get_all_bills().await.unwrap().is_empty());

    std::fs::create_dir_all(&data).unwrap();
    let retried = engine
        .generate_bills_for_month(TemporalFixtures::april_2024())
        .await
        .unwrap();
    assert_eq!(retried.generated_count(), 3);
    assert!(data.join("mess_bills.json").exists());
}

#[tokio::test]
async fn test_in_memory_store_serves_reports() {
    let store = seeded_store(StoreConfig::in_memory()).await;
    let engine = engine(&store);

    let consumption = engine
        .get_mess_daily_consumption(&IdFixtures::south_mess(), TemporalFixtures::date(2024, 4, 2))
        .await
        .unwrap();

    assert_eq!(consumption.meal_count, 1);
    assert_money_eq(&consumption.total_amount, dec!(60));
}
