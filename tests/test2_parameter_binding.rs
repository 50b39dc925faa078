use sqlite_session::{
    ParamKey, ParamSet, SqlValue, SqliteConfig, SqliteDbError, SqliteSession, build_in_clause,
};

fn seeded_session() -> Result<SqliteSession, SqliteDbError> {
    let mut db = SqliteSession::new(SqliteConfig::new(":memory:"));
    db.execute(
        "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT, score REAL)",
        &ParamSet::empty(),
    )?;
    for (id, name, score) in [(1, "alice", 1.5), (2, "bob", 2.5), (3, "carol", 3.5)] {
        db.execute(
            "INSERT INTO users (id, name, score) VALUES (?, ?, ?)",
            &ParamSet::positional(vec![
                SqlValue::Int(id),
                SqlValue::Text(name.into()),
                SqlValue::Float(score),
            ]),
        )?;
    }
    Ok(db)
}

#[test]
fn positional_binding_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = seeded_session()?;
    let mut executed = db.execute(
        "SELECT name, score FROM users WHERE id = ?",
        &ParamSet::positional(vec![SqlValue::Int(2)]),
    )?;
    let row = executed.rows().next().expect("one row")?;
    assert_eq!(row.get("name").and_then(|v| v.as_text()), Some("bob"));
    assert_eq!(row.get("score").and_then(|v| v.as_float()), Some(2.5));
    Ok(())
}

#[test]
fn named_binding_drops_unused_names() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = seeded_session()?;
    // `:name` never appears in the SQL; without filtering, binding it would
    // fail as an unknown parameter.
    let mut executed = db.execute(
        "SELECT name FROM users WHERE id = :id",
        &ParamSet::named(vec![
            ("id", SqlValue::Int(1)),
            ("name", SqlValue::Text("x".into())),
        ]),
    )?;
    let row = executed.rows().next().expect("one row")?;
    assert_eq!(row.get("name").and_then(|v| v.as_text()), Some("alice"));
    Ok(())
}

#[test]
fn inferred_classification_binds_through_execute() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = seeded_session()?;

    // Contiguous integer keys behave exactly like a positional sequence.
    let positional = ParamSet::from_entries(vec![(ParamKey::Index(0), SqlValue::Int(3))]);
    {
        let mut executed = db.execute("SELECT name FROM users WHERE id = ?", &positional)?;
        let row = executed.rows().next().expect("one row")?;
        assert_eq!(row.get("name").and_then(|v| v.as_text()), Some("carol"));
    }

    // A string key makes the whole collection named.
    let named = ParamSet::from_entries(vec![(
        ParamKey::Name("id".into()),
        SqlValue::Int(1),
    )]);
    let mut executed = db.execute("SELECT name FROM users WHERE id = :id", &named)?;
    let row = executed.rows().next().expect("one row")?;
    assert_eq!(row.get("name").and_then(|v| v.as_text()), Some("alice"));

    Ok(())
}

#[test]
fn in_clause_expands_to_positional_placeholders() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = seeded_session()?;
    let sql = format!(
        "SELECT name FROM users WHERE id IN ({}) ORDER BY id",
        build_in_clause(2)
    );
    let mut executed = db.execute(
        &sql,
        &ParamSet::positional(vec![SqlValue::Int(1), SqlValue::Int(3)]),
    )?;
    let names: Result<Vec<_>, _> = executed
        .rows()
        .map(|row| row.map(|r| r.get("name").and_then(|v| v.as_text().map(String::from))))
        .collect();
    assert_eq!(
        names?,
        vec![Some("alice".to_string()), Some("carol".to_string())]
    );
    Ok(())
}

#[test]
fn positional_arity_mismatch_is_an_execution_error() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = seeded_session()?;
    let err = db
        .execute(
            "SELECT name FROM users WHERE id = ? AND score > ?",
            &ParamSet::positional(vec![SqlValue::Int(1)]),
        )
        .expect_err("one value for two placeholders");
    assert!(matches!(err, SqliteDbError::Execution { .. }));
    Ok(())
}

#[test]
fn null_binds_as_sql_null() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = seeded_session()?;
    db.execute(
        "UPDATE users SET name = ? WHERE id = ?",
        &ParamSet::positional(vec![SqlValue::Null, SqlValue::Int(1)]),
    )?;
    let mut executed = db.execute(
        "SELECT name FROM users WHERE id = 1",
        &ParamSet::empty(),
    )?;
    let row = executed.rows().next().expect("one row")?;
    assert!(row.get("name").expect("column present").is_null());
    Ok(())
}

#[test]
fn list_values_refuse_to_bind() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = seeded_session()?;
    let err = db
        .execute(
            "SELECT name FROM users WHERE id IN (?)",
            &ParamSet::positional(vec![SqlValue::List(vec![
                SqlValue::Int(1),
                SqlValue::Int(2),
            ])]),
        )
        .expect_err("lists are display-only");
    assert!(matches!(err, SqliteDbError::Execution { .. }));
    Ok(())
}
