use sqlite_session::{ParamSet, SqlValue, SqliteConfig, SqliteDbError, SqliteSession};

fn session_with_table() -> Result<SqliteSession, Box<dyn std::error::Error>> {
    let mut db = SqliteSession::new(SqliteConfig::new(":memory:"));
    db.execute(
        "CREATE TABLE t (id INTEGER PRIMARY KEY, a INTEGER)",
        &ParamSet::empty(),
    )?;
    Ok(db)
}

fn row_count(db: &mut SqliteSession) -> Result<i64, Box<dyn std::error::Error>> {
    let mut executed = db.execute("SELECT COUNT(*) AS n FROM t", &ParamSet::empty())?;
    let row = executed.rows().next().expect("count row")?;
    Ok(row.get("n").and_then(|v| v.as_int()).expect("count value"))
}

#[test]
fn commit_makes_writes_visible() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = session_with_table()?;
    db.begin_transaction()?;
    db.execute(
        "INSERT INTO t (a) VALUES (?)",
        &ParamSet::positional(vec![SqlValue::Int(1)]),
    )?;
    db.commit_transaction()?;
    assert_eq!(row_count(&mut db)?, 1);
    Ok(())
}

#[test]
fn rollback_discards_writes() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = session_with_table()?;
    db.begin_transaction()?;
    db.execute(
        "INSERT INTO t (a) VALUES (?)",
        &ParamSet::positional(vec![SqlValue::Int(1)]),
    )?;
    db.rollback_transaction()?;
    assert_eq!(row_count(&mut db)?, 0);
    Ok(())
}

#[test]
fn commit_without_open_transaction_errors() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = session_with_table()?;
    let err = db
        .commit_transaction()
        .expect_err("no transaction is active");
    assert!(matches!(err, SqliteDbError::Transaction { .. }));
    Ok(())
}

#[test]
fn nested_begin_surfaces_driver_error() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = session_with_table()?;
    db.begin_transaction()?;
    let err = db.begin_transaction().expect_err("no nesting support");
    assert!(matches!(err, SqliteDbError::Transaction { .. }));
    db.rollback_transaction()?;
    Ok(())
}

#[test]
fn transaction_control_connects_lazily_and_counts_queries()
-> Result<(), Box<dyn std::error::Error>> {
    let mut db = SqliteSession::new(SqliteConfig::new(":memory:"));
    assert!(!db.is_connected());

    db.begin_transaction()?;
    assert!(db.is_connected());
    db.rollback_transaction()?;

    // Both control labels went through the query counter, debug mode off.
    assert_eq!(db.query_counter(), 2);
    Ok(())
}
