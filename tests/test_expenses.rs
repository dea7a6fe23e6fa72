//! Expense store integration tests against an in-memory database.

mod common;

use ledgerkit::models::{ExpenseFilter, ExpenseUpdate, NewExpense};
use ledgerkit::{LedgerError, UserScope};

// ---------------------------------------------------------------------------
// create
// ---------------------------------------------------------------------------

#[test]
fn create_returns_stored_row() {
    let ledger = common::setup_ledger();
    let scope = UserScope::default();

    let expense = ledger
        .expenses(scope)
        .create(&NewExpense {
            amount: 12.5,
            category_id: None,
            description: Some("lunch".to_string()),
            date: "2024-01-15".to_string(),
            payment_method: Some("card".to_string()),
            tags: Some("work,food".to_string()),
        })
        .unwrap();

    assert!(expense.id >= 1);
    assert_eq!(expense.user_id, scope.id());
    assert_eq!(expense.amount, 12.5);
    assert_eq!(expense.date, "2024-01-15");
    assert_eq!(expense.description.as_deref(), Some("lunch"));
    assert_eq!(expense.payment_method.as_deref(), Some("card"));
    assert_eq!(expense.tags.as_deref(), Some("work,food"));
    assert!(expense.created_at.is_some());
}

#[test]
fn create_rejects_non_positive_amount() {
    let ledger = common::setup_ledger();
    let result = ledger.expenses(UserScope::default()).create(&NewExpense {
        amount: 0.0,
        category_id: None,
        description: None,
        date: "2024-01-15".to_string(),
        payment_method: None,
        tags: None,
    });
    assert!(matches!(result, Err(LedgerError::InvalidParameter(_))));
}

#[test]
fn create_rejects_malformed_date() {
    let ledger = common::setup_ledger();
    let result = ledger.expenses(UserScope::default()).create(&NewExpense {
        amount: 5.0,
        category_id: None,
        description: None,
        date: "15/01/2024".to_string(),
        payment_method: None,
        tags: None,
    });
    assert!(matches!(result, Err(LedgerError::InvalidParameter(_))));
}

#[test]
fn create_rejects_unknown_category() {
    let ledger = common::setup_ledger();
    let result = ledger.expenses(UserScope::default()).create(&NewExpense {
        amount: 5.0,
        category_id: Some(9999),
        description: None,
        date: "2024-01-15".to_string(),
        payment_method: None,
        tags: None,
    });
    assert!(matches!(result, Err(LedgerError::InvalidParameter(_))));
}

#[test]
fn create_rejects_category_from_another_scope() {
    let ledger = common::setup_ledger();
    let foreign = common::add_category(&ledger, UserScope(2), "Foreign");

    let result = ledger.expenses(UserScope(1)).create(&NewExpense {
        amount: 5.0,
        category_id: Some(foreign.id),
        description: None,
        date: "2024-01-15".to_string(),
        payment_method: None,
        tags: None,
    });
    assert!(matches!(result, Err(LedgerError::InvalidParameter(_))));
}

// ---------------------------------------------------------------------------
// get / list
// ---------------------------------------------------------------------------

#[test]
fn get_finds_expense_with_category_name() {
    let ledger = common::setup_ledger();
    let scope = UserScope::default();
    let cat = common::add_category(&ledger, scope, "Coffee");
    let created = common::add_expense(&ledger, scope, 4.5, "2024-02-01", Some(cat.id));

    let fetched = ledger.expenses(scope).get(created.id).unwrap().unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.category_id, Some(cat.id));
    assert_eq!(fetched.category_name.as_deref(), Some("Coffee"));
}

#[test]
fn get_returns_none_for_unknown_id() {
    let ledger = common::setup_ledger();
    let result = ledger.expenses(UserScope::default()).get(9999).unwrap();
    assert!(result.is_none());
}

#[test]
fn list_orders_newest_first() {
    let ledger = common::setup_ledger();
    let scope = UserScope::default();
    common::add_expense(&ledger, scope, 10.0, "2024-01-01", None);
    common::add_expense(&ledger, scope, 20.0, "2024-03-01", None);
    common::add_expense(&ledger, scope, 30.0, "2024-02-01", None);

    let rows = ledger
        .expenses(scope)
        .list(&ExpenseFilter::default())
        .unwrap();
    let dates: Vec<&str> = rows.iter().map(|e| e.date.as_str()).collect();
    assert_eq!(dates, vec!["2024-03-01", "2024-02-01", "2024-01-01"]);
}

#[test]
fn list_applies_date_range_filter() {
    let ledger = common::setup_ledger();
    let scope = UserScope::default();
    common::add_expense(&ledger, scope, 10.0, "2024-01-01", None);
    common::add_expense(&ledger, scope, 20.0, "2024-01-15", None);
    common::add_expense(&ledger, scope, 30.0, "2024-02-01", None);

    let rows = ledger
        .expenses(scope)
        .list(&ExpenseFilter {
            start_date: Some("2024-01-10".to_string()),
            end_date: Some("2024-01-31".to_string()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].date, "2024-01-15");
}

#[test]
fn list_date_bounds_are_inclusive() {
    let ledger = common::setup_ledger();
    let scope = UserScope::default();
    common::add_expense(&ledger, scope, 10.0, "2024-01-01", None);
    common::add_expense(&ledger, scope, 20.0, "2024-01-31", None);

    let rows = ledger
        .expenses(scope)
        .list(&ExpenseFilter {
            start_date: Some("2024-01-01".to_string()),
            end_date: Some("2024-01-31".to_string()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(rows.len(), 2);
}

#[test]
fn list_applies_category_and_amount_filters() {
    let ledger = common::setup_ledger();
    let scope = UserScope::default();
    let cat = common::add_category(&ledger, scope, "Travel");
    common::add_expense(&ledger, scope, 5.0, "2024-01-01", Some(cat.id));
    common::add_expense(&ledger, scope, 50.0, "2024-01-02", Some(cat.id));
    common::add_expense(&ledger, scope, 500.0, "2024-01-03", None);

    let rows = ledger
        .expenses(scope)
        .list(&ExpenseFilter {
            category_id: Some(cat.id),
            min_amount: Some(10.0),
            max_amount: Some(100.0),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].amount, 50.0);
}

#[test]
fn list_rejects_malformed_filter_date() {
    let ledger = common::setup_ledger();
    let result = ledger.expenses(UserScope::default()).list(&ExpenseFilter {
        start_date: Some("not-a-date".to_string()),
        ..Default::default()
    });
    assert!(matches!(result, Err(LedgerError::InvalidParameter(_))));
}

#[test]
fn list_does_not_resolve_category_names_across_scopes() {
    let ledger = common::setup_ledger();
    let foreign = common::add_category(&ledger, UserScope(2), "Foreign");

    // A dangling reference can only exist via raw SQL; the store rejects it.
    ledger
        .sql(
            "INSERT INTO expenses (user_id, amount, date, category_id) \
             VALUES (1, 10.0, CAST('2024-01-01' AS DATE), ?) RETURNING id",
            &[foreign.id.to_string()],
        )
        .unwrap();

    let rows = ledger
        .expenses(UserScope(1))
        .list(&ExpenseFilter::default())
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].category_id, Some(foreign.id));
    assert_eq!(rows[0].category_name, None);
}

#[test]
fn list_is_scoped_to_one_user() {
    let ledger = common::setup_ledger();
    common::add_expense(&ledger, UserScope(1), 10.0, "2024-01-01", None);
    common::add_expense(&ledger, UserScope(2), 99.0, "2024-01-01", None);

    let rows = ledger
        .expenses(UserScope(1))
        .list(&ExpenseFilter::default())
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].amount, 10.0);
}

// ---------------------------------------------------------------------------
// update
// ---------------------------------------------------------------------------

#[test]
fn update_changes_only_provided_fields() {
    let ledger = common::setup_ledger();
    let scope = UserScope::default();
    let created = common::add_expense(&ledger, scope, 10.0, "2024-01-01", None);

    let updated = ledger
        .expenses(scope)
        .update(
            created.id,
            &ExpenseUpdate {
                amount: Some(15.0),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();

    assert_eq!(updated.amount, 15.0);
    assert_eq!(updated.date, "2024-01-01");
}

#[test]
fn update_with_no_fields_returns_current_row() {
    let ledger = common::setup_ledger();
    let scope = UserScope::default();
    let created = common::add_expense(&ledger, scope, 10.0, "2024-01-01", None);

    let unchanged = ledger
        .expenses(scope)
        .update(created.id, &ExpenseUpdate::default())
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.amount, 10.0);
}

#[test]
fn update_returns_none_for_unknown_id() {
    let ledger = common::setup_ledger();
    let result = ledger
        .expenses(UserScope::default())
        .update(
            9999,
            &ExpenseUpdate {
                amount: Some(1.0),
                ..Default::default()
            },
        )
        .unwrap();
    assert!(result.is_none());
}

#[test]
fn update_rejects_unknown_category() {
    let ledger = common::setup_ledger();
    let scope = UserScope::default();
    let created = common::add_expense(&ledger, scope, 10.0, "2024-01-01", None);

    let result = ledger.expenses(scope).update(
        created.id,
        &ExpenseUpdate {
            category_id: Some(9999),
            ..Default::default()
        },
    );
    assert!(matches!(result, Err(LedgerError::InvalidParameter(_))));
}

#[test]
fn update_rejects_category_from_another_scope() {
    let ledger = common::setup_ledger();
    let foreign = common::add_category(&ledger, UserScope(2), "Foreign");
    let created = common::add_expense(&ledger, UserScope(1), 10.0, "2024-01-01", None);

    let result = ledger.expenses(UserScope(1)).update(
        created.id,
        &ExpenseUpdate {
            category_id: Some(foreign.id),
            ..Default::default()
        },
    );
    assert!(matches!(result, Err(LedgerError::InvalidParameter(_))));
}

#[test]
fn update_rejects_malformed_date() {
    let ledger = common::setup_ledger();
    let scope = UserScope::default();
    let created = common::add_expense(&ledger, scope, 10.0, "2024-01-01", None);

    let result = ledger.expenses(scope).update(
        created.id,
        &ExpenseUpdate {
            date: Some("January 1st".to_string()),
            ..Default::default()
        },
    );
    assert!(matches!(result, Err(LedgerError::InvalidParameter(_))));
}

// ---------------------------------------------------------------------------
// delete / count
// ---------------------------------------------------------------------------

#[test]
fn delete_removes_row() {
    let ledger = common::setup_ledger();
    let scope = UserScope::default();
    let created = common::add_expense(&ledger, scope, 10.0, "2024-01-01", None);

    assert!(ledger.expenses(scope).delete(created.id).unwrap());
    assert!(ledger.expenses(scope).get(created.id).unwrap().is_none());
}

#[test]
fn delete_returns_false_for_unknown_id() {
    let ledger = common::setup_ledger();
    assert!(!ledger.expenses(UserScope::default()).delete(9999).unwrap());
}

#[test]
fn count_respects_filter() {
    let ledger = common::setup_ledger();
    let scope = UserScope::default();
    common::add_expense(&ledger, scope, 10.0, "2024-01-01", None);
    common::add_expense(&ledger, scope, 20.0, "2024-02-01", None);

    let all = ledger
        .expenses(scope)
        .count(&ExpenseFilter::default())
        .unwrap();
    assert_eq!(all, 2);

    let january = ledger
        .expenses(scope)
        .count(&ExpenseFilter {
            end_date: Some("2024-01-31".to_string()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(january, 1);
}

// ---------------------------------------------------------------------------
// persistence
// ---------------------------------------------------------------------------

#[test]
fn file_backed_database_persists_across_reopen() {
    let tmp = tempfile::tempdir().unwrap();
    let scope = UserScope::default();

    {
        let ledger = ledgerkit::LedgerKit::builder()
            .data_dir(tmp.path())
            .build()
            .unwrap();
        common::add_expense(&ledger, scope, 42.0, "2024-01-01", None);
    }

    let reopened = ledgerkit::LedgerKit::builder()
        .data_dir(tmp.path())
        .build()
        .unwrap();
    let rows = reopened
        .expenses(scope)
        .list(&ExpenseFilter::default())
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].amount, 42.0);
}
