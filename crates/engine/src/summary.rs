//! Period summaries: income, expense, net and a per-category breakdown.
//!
//! The fold is independent from the store: anything implementing
//! [`TransactionSource`] can feed it, and [`summarize_rows`] is a pure
//! function over the fetched rows.

use std::{collections::HashMap, future::Future};

use uuid::Uuid;

use crate::{EngineError, Period, ResultEngine, TransactionKind};

/// The slice of a transaction row the summary needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryRow {
    pub kind: TransactionKind,
    /// Unsigned magnitude in minor units.
    pub amount_minor: i64,
    pub category_id: Option<Uuid>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category_id: Uuid,
    pub total_minor: i64,
}

/// Derived report for one owner over one [`Period`]. Never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Summary {
    pub period: Period,
    pub income_minor: i64,
    pub expense_minor: i64,
    /// `income_minor - expense_minor`.
    pub net_minor: i64,
    /// Ordered by descending total; ties keep first-seen order.
    pub by_category: Vec<CategoryTotal>,
}

/// Read capability over the transaction store.
pub trait TransactionSource {
    /// Rows of `owner_id` with `occurred_on` inside `period` (both ends
    /// inclusive), restricted to `kind` when given.
    fn fetch_for_period(
        &self,
        owner_id: &str,
        period: &Period,
        kind: Option<TransactionKind>,
    ) -> impl Future<Output = ResultEngine<Vec<SummaryRow>>> + Send;
}

/// Fetches the owner's rows for `period` and folds them into a [`Summary`].
///
/// A failed fetch fails the whole call; there is no partial result and no
/// retry.
pub async fn summarize<S>(
    source: &S,
    owner_id: &str,
    period: Period,
    kind: Option<TransactionKind>,
) -> ResultEngine<Summary>
where
    S: TransactionSource + Sync,
{
    let rows = source.fetch_for_period(owner_id, &period, kind).await?;
    tracing::debug!(owner_id, %period, rows = rows.len(), "summarizing period");
    summarize_rows(period, rows)
}

/// Single pass over `rows`.
pub fn summarize_rows<I>(period: Period, rows: I) -> ResultEngine<Summary>
where
    I: IntoIterator<Item = SummaryRow>,
{
    let mut income_minor = 0i64;
    let mut expense_minor = 0i64;
    let mut by_category: Vec<CategoryTotal> = Vec::new();
    let mut index: HashMap<Uuid, usize> = HashMap::new();

    for row in rows {
        match row.kind {
            TransactionKind::Income => income_minor = add(income_minor, row.amount_minor)?,
            TransactionKind::Expense => expense_minor = add(expense_minor, row.amount_minor)?,
        }

        let Some(category_id) = row.category_id else {
            continue;
        };
        let slot = *index.entry(category_id).or_insert_with(|| {
            by_category.push(CategoryTotal {
                category_id,
                total_minor: 0,
            });
            by_category.len() - 1
        });
        by_category[slot].total_minor = add(by_category[slot].total_minor, row.amount_minor)?;
    }

    let net_minor = income_minor
        .checked_sub(expense_minor)
        .ok_or_else(overflow)?;
    // Stable: equal totals stay in first-seen order.
    by_category.sort_by(|a, b| b.total_minor.cmp(&a.total_minor));

    Ok(Summary {
        period,
        income_minor,
        expense_minor,
        net_minor,
        by_category,
    })
}

fn add(acc: i64, amount_minor: i64) -> ResultEngine<i64> {
    acc.checked_add(amount_minor).ok_or_else(overflow)
}

fn overflow() -> EngineError {
    EngineError::InvalidAmount("summary total overflows".to_string())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn period() -> Period {
        Period::parse_month("2024-02").unwrap()
    }

    fn row(kind: TransactionKind, amount_minor: i64, category_id: Option<Uuid>) -> SummaryRow {
        SummaryRow {
            kind,
            amount_minor,
            category_id,
        }
    }

    struct FixedSource {
        rows: Vec<SummaryRow>,
        calls: AtomicUsize,
    }

    impl TransactionSource for FixedSource {
        async fn fetch_for_period(
            &self,
            _owner_id: &str,
            _period: &Period,
            kind: Option<TransactionKind>,
        ) -> ResultEngine<Vec<SummaryRow>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .rows
                .iter()
                .filter(|r| kind.is_none_or(|k| r.kind == k))
                .cloned()
                .collect())
        }
    }

    struct FailingSource;

    impl TransactionSource for FailingSource {
        async fn fetch_for_period(
            &self,
            _owner_id: &str,
            _period: &Period,
            _kind: Option<TransactionKind>,
        ) -> ResultEngine<Vec<SummaryRow>> {
            Err(EngineError::Database(sea_orm::DbErr::Custom(
                "store unavailable".to_string(),
            )))
        }
    }

    #[test]
    fn empty_period_yields_zeros() {
        let summary = summarize_rows(period(), Vec::new()).unwrap();
        assert_eq!(summary.income_minor, 0);
        assert_eq!(summary.expense_minor, 0);
        assert_eq!(summary.net_minor, 0);
        assert!(summary.by_category.is_empty());
    }

    #[test]
    fn categories_are_ordered_by_descending_total() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let rows = vec![
            row(TransactionKind::Expense, 20, Some(a)),
            row(TransactionKind::Expense, 50, Some(b)),
            row(TransactionKind::Expense, 10, Some(c)),
            row(TransactionKind::Expense, 10, Some(a)),
        ];
        let summary = summarize_rows(period(), rows).unwrap();
        let order: Vec<(Uuid, i64)> = summary
            .by_category
            .iter()
            .map(|t| (t.category_id, t.total_minor))
            .collect();
        assert_eq!(order, vec![(b, 50), (a, 30), (c, 10)]);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let rows = vec![
            row(TransactionKind::Expense, 10, Some(a)),
            row(TransactionKind::Income, 10, Some(b)),
        ];
        let summary = summarize_rows(period(), rows).unwrap();
        assert_eq!(summary.by_category[0].category_id, a);
        assert_eq!(summary.by_category[1].category_id, b);
    }

    #[test]
    fn uncategorized_rows_only_count_toward_totals() {
        let groceries = Uuid::new_v4();
        let rows = vec![
            row(TransactionKind::Income, 300_000, None),
            row(TransactionKind::Expense, 4_550, Some(groceries)),
            row(TransactionKind::Expense, 1_200, None),
        ];
        let summary = summarize_rows(period(), rows).unwrap();
        assert_eq!(summary.income_minor, 300_000);
        assert_eq!(summary.expense_minor, 5_750);
        assert_eq!(summary.net_minor, 300_000 - 5_750);
        assert_eq!(
            summary.by_category,
            vec![CategoryTotal {
                category_id: groceries,
                total_minor: 4_550
            }]
        );
    }

    #[test]
    fn net_is_income_minus_expense() {
        let rows = vec![
            row(TransactionKind::Income, 1_000, None),
            row(TransactionKind::Expense, 2_500, None),
            row(TransactionKind::Income, 700, None),
        ];
        let summary = summarize_rows(period(), rows).unwrap();
        assert_eq!(summary.income_minor - summary.expense_minor, summary.net_minor);
        assert_eq!(summary.net_minor, -800);
    }

    #[test]
    fn overflow_is_an_error() {
        let rows = vec![
            row(TransactionKind::Income, i64::MAX, None),
            row(TransactionKind::Income, 1, None),
        ];
        let err = summarize_rows(period(), rows).unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount(_)));
    }

    #[tokio::test]
    async fn summarize_is_idempotent() {
        let food = Uuid::new_v4();
        let source = FixedSource {
            rows: vec![
                row(TransactionKind::Income, 5_000, None),
                row(TransactionKind::Expense, 1_250, Some(food)),
            ],
            calls: AtomicUsize::new(0),
        };
        let first = summarize(&source, "alice", period(), None).await.unwrap();
        let second = summarize(&source, "alice", period(), None).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn kind_filter_is_passed_to_the_source() {
        let source = FixedSource {
            rows: vec![
                row(TransactionKind::Income, 5_000, None),
                row(TransactionKind::Expense, 1_250, None),
            ],
            calls: AtomicUsize::new(0),
        };
        let summary = summarize(&source, "alice", period(), Some(TransactionKind::Expense))
            .await
            .unwrap();
        assert_eq!(summary.income_minor, 0);
        assert_eq!(summary.expense_minor, 1_250);
    }

    #[tokio::test]
    async fn fetch_failure_fails_the_summary() {
        let err = summarize(&FailingSource, "alice", period(), None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("store unavailable"));
    }
}
