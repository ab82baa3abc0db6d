//! Forward-then-reverse conversion behavior.
//!
//! Round-tripping is best-effort: reversible rewrites (NVL, SYSDATE, row
//! limits, concatenation) come back in their original dialect form, while
//! one-way rewrites (DECODE) stay in their converted form and are flagged.

use sql_select_converter::convert::{
    WarningCategory, convert_azure_to_oracle, convert_oracle_to_azure
};

#[test]
fn test_nvl_round_trips() {
    let forward = convert_oracle_to_azure("SELECT NVL(commission, 0) FROM emp");
    let back = convert_azure_to_oracle(&forward.sql);
    assert_eq!(back.sql, "SELECT NVL(commission, 0) FROM emp");
}

#[test]
fn test_sysdate_round_trips() {
    let forward = convert_oracle_to_azure("SELECT SYSDATE FROM t");
    let back = convert_azure_to_oracle(&forward.sql);
    assert!(back.sql.contains("SYSDATE"));
    assert!(!back.sql.to_uppercase().contains("GETDATE"));
}

#[test]
fn test_rownum_bound_round_trips() {
    let forward = convert_oracle_to_azure("SELECT * FROM emp WHERE ROWNUM <= 10");
    assert!(forward.sql.starts_with("SELECT TOP 10"));
    let back = convert_azure_to_oracle(&forward.sql);
    assert!(back.sql.contains("ROWNUM <= 10"));
    assert!(!back.sql.to_uppercase().contains("TOP"));
}

#[test]
fn test_concat_round_trips_with_flag() {
    let forward = convert_oracle_to_azure("SELECT a || ' ' || b FROM t");
    assert!(forward.sql.contains("a + ' ' + b"));
    let back = convert_azure_to_oracle(&forward.sql);
    assert!(back.sql.contains("a || ' ' || b"));
    assert!(
        back.warnings
            .iter()
            .any(|w| w.category == WarningCategory::StructuralAmbiguity)
    );
}

#[test]
fn test_decode_stays_expanded() {
    let forward = convert_oracle_to_azure("SELECT DECODE(flag, 'Y', 1, 0) FROM t");
    let back = convert_azure_to_oracle(&forward.sql);
    assert!(back.sql.contains("CASE WHEN flag = 'Y' THEN 1 ELSE 0 END"));
    assert!(!back.sql.to_uppercase().contains("DECODE"));
    assert!(
        back.warnings
            .iter()
            .any(|w| w.category == WarningCategory::StructuralAmbiguity)
    );
}

#[test]
fn test_trunc_round_trips() {
    let forward = convert_oracle_to_azure("SELECT TRUNC(order_date) FROM orders");
    assert!(forward.sql.contains("CAST(order_date AS DATE)"));
    let back = convert_azure_to_oracle(&forward.sql);
    assert!(back.sql.contains("TRUNC(order_date)"));
}
