use sql_facade::named_params;
use sql_facade::prelude::*;

#[test]
fn rewrites_tokens_in_occurrence_order() -> Result<(), Box<dyn std::error::Error>> {
    let params = named_params! { "name" => "x", "id" => 1 };
    let prepared = prepare("update T set name=@name where id=@id", Some(&params))?;
    assert_eq!(prepared.sql, "update T set name=$1 where id=$2");
    assert_eq!(
        prepared.values,
        vec![RowValues::Text("x".to_string()), RowValues::Int(1)]
    );
    Ok(())
}

#[test]
fn no_tokens_means_no_values() -> Result<(), Box<dyn std::error::Error>> {
    let prepared = prepare("select * from T where a = 1", None)?;
    assert_eq!(prepared.sql, "select * from T where a = 1");
    assert!(prepared.values.is_empty());

    // Unused parameters are ignored.
    let params = named_params! { "unused" => 3 };
    let prepared = prepare("select 1", Some(&params))?;
    assert_eq!(prepared.sql, "select 1");
    assert!(!prepared.has_params());
    Ok(())
}

#[test]
fn repeated_names_bind_once_per_occurrence() -> Result<(), Box<dyn std::error::Error>> {
    let params = NamedParams::new().with("tag", "red");
    let prepared = prepare(
        "select * from T where a = @tag or b = @tag or c = @tag",
        Some(&params),
    )?;
    assert_eq!(prepared.sql, "select * from T where a = $1 or b = $2 or c = $3");
    assert_eq!(prepared.values.len(), 3);
    assert!(prepared.values.iter().all(|v| v.as_text() == Some("red")));
    Ok(())
}

#[test]
fn token_stops_at_first_non_identifier_char() -> Result<(), Box<dyn std::error::Error>> {
    let params = named_params! { "user_id" => 9, "x" => 1 };
    let prepared = prepare("select @user_id, @x2, (@x)", Some(&params))?;
    assert_eq!(prepared.sql, "select $1, $22, ($3)");
    assert_eq!(
        prepared.values,
        vec![RowValues::Int(9), RowValues::Int(1), RowValues::Int(1)]
    );
    Ok(())
}

#[test]
fn null_values_are_bound() -> Result<(), Box<dyn std::error::Error>> {
    let params = NamedParams::new().with("v", Option::<i64>::None);
    let prepared = prepare("insert into T (v) values (@v)", Some(&params))?;
    assert_eq!(prepared.sql, "insert into T (v) values ($1)");
    assert_eq!(prepared.values, vec![RowValues::Null]);
    Ok(())
}

#[test]
fn missing_parameter_is_an_error() {
    let params = named_params! { "name" => "x" };
    let err = prepare("update T set name=@name where id=@id", Some(&params)).unwrap_err();
    match err {
        SqlFacadeError::MissingParameter { token } => assert_eq!(token, "@id"),
        other => panic!("unexpected error: {other}"),
    }

    let err = prepare("select @a", None).unwrap_err();
    assert!(matches!(err, SqlFacadeError::MissingParameter { .. }));
}

#[test]
fn styles_use_their_prefix() -> Result<(), Box<dyn std::error::Error>> {
    let params = named_params! { "a" => 1, "b" => 2 };
    let sql = "select @a, @b";
    assert_eq!(
        prepare_with_style(sql, Some(&params), PlaceholderStyle::Postgres)?.sql,
        "select $1, $2"
    );
    assert_eq!(
        prepare_with_style(sql, Some(&params), PlaceholderStyle::Sqlite)?.sql,
        "select ?1, ?2"
    );
    assert_eq!(
        prepare_with_style(sql, Some(&params), PlaceholderStyle::Custom(":"))?.sql,
        "select :1, :2"
    );
    assert_eq!(
        DatabaseType::Sqlite.placeholder_style(),
        PlaceholderStyle::Sqlite
    );
    Ok(())
}
