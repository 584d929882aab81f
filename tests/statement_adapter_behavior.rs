//! Behavior tests for the statement table adapter: the tabular-to-record
//! conversion that gives both backends one uniform record shape.

use finbridge_core::{normalize_label, report_period_label, statements_from_table, StatementTable};

fn filings_table() -> StatementTable {
    let mut table = StatementTable::with_columns(vec![
        String::from("2023-09-30"),
        String::from("2022-09-30"),
        String::from("2021-09-30"),
        String::from("2020-09-30"),
    ]);
    table.push_row(
        "Total Revenue",
        vec![
            Some(383_285_000_000.0),
            Some(394_328_000_000.0),
            Some(365_817_000_000.0),
            Some(274_515_000_000.0),
        ],
    );
    table.push_row(
        "Gross Profit",
        vec![Some(169_148_000_000.0), None, Some(152_836_000_000.0), None],
    );
    table.push_row(
        "Basic EPS",
        vec![Some(6.16), Some(6.15), Some(5.67), Some(3.31)],
    );
    table
}

#[test]
fn series_length_never_exceeds_the_limit() {
    let table = filings_table();

    for limit in 0..8 {
        let statements = statements_from_table(&table, limit);
        assert!(statements.len() <= limit, "limit {limit} violated");
    }

    // And the limit truncates, keeping native most-recent-first order.
    let statements = statements_from_table(&table, 2);
    assert_eq!(statements.len(), 2);
    assert_eq!(statements[0].report_period, "2023-09-30");
    assert_eq!(statements[1].report_period, "2022-09-30");
}

#[test]
fn field_name_normalization_is_deterministic() {
    assert_eq!(normalize_label("Total Revenue"), "total_revenue");
    assert_eq!(normalize_label("Total Revenue"), normalize_label("Total Revenue"));
    assert_eq!(normalize_label("Net PPE"), "net_ppe");
    assert_eq!(normalize_label("EBITDA"), "ebitda");

    let statements = statements_from_table(&filings_table(), 1);
    assert_eq!(statements[0].value("basic_eps"), Some(6.16));
}

#[test]
fn missing_markers_never_surface_as_values() {
    let statements = statements_from_table(&filings_table(), 10);

    // 2022 gross profit is the table's missing marker: carried, but absent.
    assert!(statements[1].contains("gross_profit"));
    assert_eq!(statements[1].value("gross_profit"), None);

    for statement in &statements {
        for (_, value) in statement.fields() {
            if let Some(v) = value {
                assert!(v.is_finite(), "non-finite value leaked into a statement");
            }
        }
    }
}

#[test]
fn zero_column_table_yields_an_empty_sequence_not_an_error() {
    let empty = StatementTable::default();
    assert!(statements_from_table(&empty, 10).is_empty());

    let mut no_columns = StatementTable::with_columns(Vec::new());
    no_columns.push_row("Total Revenue", Vec::new());
    assert!(statements_from_table(&no_columns, 10).is_empty());
}

#[test]
fn report_periods_format_date_like_labels_as_iso_dates() {
    assert_eq!(report_period_label("2023-09-30"), "2023-09-30");
    assert_eq!(report_period_label("2023-09-30 00:00:00"), "2023-09-30");
    assert_eq!(report_period_label("FY2023"), "FY2023");

    let statements = statements_from_table(&filings_table(), 1);
    assert_eq!(statements[0].report_period, "2023-09-30");
}

#[test]
fn every_row_lands_in_every_retained_record() {
    let statements = statements_from_table(&filings_table(), 10);

    assert_eq!(statements.len(), 4);
    for statement in &statements {
        assert_eq!(statement.field_count(), 3);
        assert!(statement.contains("total_revenue"));
        assert!(statement.contains("gross_profit"));
        assert!(statement.contains("basic_eps"));
    }
}
