use chrono::NaiveDate;
use sea_orm::Database;

use engine::{Engine, Period, TransactionKind, TransactionNew};
use migration::MigratorTrait;

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn record(
    engine: &Engine,
    owner_id: &str,
    kind: TransactionKind,
    amount_minor: i64,
    category_id: Option<uuid::Uuid>,
    occurred_on: NaiveDate,
) {
    engine
        .create_transaction(
            owner_id,
            TransactionNew {
                kind,
                amount_minor,
                category_id,
                description: None,
                occurred_on,
            },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn month_summary_covers_boundary_days_only() {
    let engine = engine_with_db().await;
    let rent = engine.create_category("alice", "Rent").await.unwrap();
    let food = engine.create_category("alice", "Food").await.unwrap();

    record(&engine, "alice", TransactionKind::Income, 300_000, None, date(2024, 2, 1)).await;
    record(&engine, "alice", TransactionKind::Expense, 90_000, Some(rent.id), date(2024, 2, 3)).await;
    record(&engine, "alice", TransactionKind::Expense, 4_000, Some(food.id), date(2024, 2, 20)).await;
    record(&engine, "alice", TransactionKind::Expense, 6_000, Some(food.id), date(2024, 2, 29)).await;
    // Outside the month.
    record(&engine, "alice", TransactionKind::Expense, 1_000, Some(food.id), date(2024, 1, 31)).await;
    record(&engine, "alice", TransactionKind::Income, 1_000, None, date(2024, 3, 1)).await;
    // Another owner.
    record(&engine, "bob", TransactionKind::Expense, 7_777, None, date(2024, 2, 10)).await;

    let period = Period::parse_month("2024-02").unwrap();
    let summary = engine.summary("alice", period, None).await.unwrap();

    assert_eq!(summary.income_minor, 300_000);
    assert_eq!(summary.expense_minor, 100_000);
    assert_eq!(summary.net_minor, 200_000);
    let by_category: Vec<_> = summary
        .by_category
        .iter()
        .map(|t| (t.category_id, t.total_minor))
        .collect();
    assert_eq!(by_category, vec![(rent.id, 90_000), (food.id, 10_000)]);
}

#[tokio::test]
async fn kind_filter_restricts_rows() {
    let engine = engine_with_db().await;
    record(&engine, "alice", TransactionKind::Income, 5_000, None, date(2024, 5, 2)).await;
    record(&engine, "alice", TransactionKind::Expense, 2_000, None, date(2024, 5, 3)).await;

    let period = Period::parse_month("2024-05").unwrap();
    let summary = engine
        .summary("alice", period, Some(TransactionKind::Income))
        .await
        .unwrap();
    assert_eq!(summary.income_minor, 5_000);
    assert_eq!(summary.expense_minor, 0);
    assert_eq!(summary.net_minor, 5_000);
}

#[tokio::test]
async fn empty_period_and_repeat_calls() {
    let engine = engine_with_db().await;
    record(&engine, "alice", TransactionKind::Expense, 2_000, None, date(2024, 5, 3)).await;

    let empty = engine
        .summary("alice", Period::parse_month("2023-05").unwrap(), None)
        .await
        .unwrap();
    assert_eq!((empty.income_minor, empty.expense_minor, empty.net_minor), (0, 0, 0));
    assert!(empty.by_category.is_empty());

    let period = Period::parse_month("2024-05").unwrap();
    let first = engine.summary("alice", period.clone(), None).await.unwrap();
    let second = engine.summary("alice", period, None).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn deleted_category_rows_fall_out_of_breakdown() {
    let engine = engine_with_db().await;
    let fun = engine.create_category("alice", "Fun").await.unwrap();
    record(&engine, "alice", TransactionKind::Expense, 3_000, Some(fun.id), date(2024, 6, 1)).await;

    engine.delete_category("alice", fun.id).await.unwrap();

    let summary = engine
        .summary("alice", Period::parse_month("2024-06").unwrap(), None)
        .await
        .unwrap();
    assert_eq!(summary.expense_minor, 3_000);
    assert!(summary.by_category.is_empty());
}
