#![cfg(feature = "sqlite")]

use serde::Deserialize;
use sql_facade::named_params;
use sql_facade::prelude::*;
use tokio::runtime::Runtime;

const SCHEMA: &str = "
    CREATE TABLE T (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        score REAL,
        active BOOLEAN,
        note TEXT
    );
";

async fn open_db(dir: &tempfile::TempDir) -> Result<Database, SqlFacadeError> {
    let path = dir.path().join("facade.db");
    let db = Database::new(format!("sqlite://{}", path.display())).await?;
    db.execute_batch(SCHEMA).await?;
    Ok(db)
}

#[test]
fn insert_then_read_back() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let rt = Runtime::new()?;
    rt.block_on(async {
        let db = open_db(&dir).await?;
        assert_eq!(db.database_type(), DatabaseType::Sqlite);
        assert_eq!(db.placeholder_style(), PlaceholderStyle::Sqlite);

        let inserted = db
            .insert("T", &["name"], &[RowValues::from("x")])
            .await?;
        assert_eq!(inserted.affected_rows, 1);
        assert_eq!(inserted.changed_rows, 0);
        let id = inserted.insert_id.expect("generated id");
        assert!(id >= 1);

        let second = db
            .insert("T", &["name", "score"], &[RowValues::from("y"), 2.5.into()])
            .await?;
        assert_eq!(second.insert_id, Some(id + 1));

        let params = named_params! { "id" => id };
        let name = db
            .get_value("name", "select name from T where id = @id", Some(&params))
            .await?;
        assert_eq!(name, Some(RowValues::Text("x".to_string())));

        let row = db
            .get_one("select * from T where id = @id", Some(&params))
            .await?
            .expect("row exists");
        assert_eq!(row.get("name").and_then(RowValues::as_text), Some("x"));
        assert_eq!(row.get("score"), Some(&RowValues::Null));

        let rows = db.query("select * from T order by id", None).await?;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get("score").and_then(RowValues::as_float), Some(2.5));

        db.close().await;
        Ok::<_, Box<dyn std::error::Error>>(())
    })
}

#[test]
fn update_reports_affected_rows() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let rt = Runtime::new()?;
    rt.block_on(async {
        let db = open_db(&dir).await?;
        let id = db
            .insert("T", &["name"], &[RowValues::from("x")])
            .await?
            .insert_id
            .expect("generated id");

        let params = named_params! { "name" => "z", "id" => id };
        let updated = db
            .execute("update T set name=@name where id=@id", Some(&params))
            .await?;
        assert_eq!(
            updated,
            ExecuteResult {
                affected_rows: 1,
                changed_rows: 1
            }
        );

        let missing = named_params! { "name" => "z", "id" => id + 100 };
        let untouched = db
            .execute("update T set name=@name where id=@id", Some(&missing))
            .await?;
        assert_eq!(untouched.affected_rows, 0);

        let name = db
            .get_value("name", "select name from T where id = @id", Some(&params))
            .await?;
        assert_eq!(name, Some(RowValues::Text("z".to_string())));

        db.close().await;
        Ok::<_, Box<dyn std::error::Error>>(())
    })
}

#[test]
fn empty_results() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let rt = Runtime::new()?;
    rt.block_on(async {
        let db = open_db(&dir).await?;
        let params = named_params! { "id" => -1 };
        let sql = "select * from T where id = @id";

        assert!(!db.exists(sql, Some(&params)).await?);
        assert!(db.query(sql, Some(&params)).await?.is_empty());
        assert!(db.get_one(sql, Some(&params)).await?.is_none());
        assert_eq!(db.get_value("name", sql, Some(&params)).await?, None);

        db.close().await;
        Ok::<_, Box<dyn std::error::Error>>(())
    })
}

#[test]
fn null_field_is_distinct_from_no_row() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let rt = Runtime::new()?;
    rt.block_on(async {
        let db = open_db(&dir).await?;
        let id = db
            .insert(
                "T",
                &["name", "note"],
                &[RowValues::from("x"), RowValues::Null],
            )
            .await?
            .insert_id
            .expect("generated id");

        let params = named_params! { "id" => id };
        let note = db
            .get_value("note", "select note from T where id = @id", Some(&params))
            .await?;
        assert_eq!(note, Some(RowValues::Null));

        // Unknown column on an existing row.
        let other = db
            .get_value("nope", "select note from T where id = @id", Some(&params))
            .await?;
        assert_eq!(other, None);

        db.close().await;
        Ok::<_, Box<dyn std::error::Error>>(())
    })
}

#[test]
fn repeated_parameter_binds_each_occurrence() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let rt = Runtime::new()?;
    rt.block_on(async {
        let db = open_db(&dir).await?;
        db.insert("T", &["name", "note"], &["same".into(), "same".into()])
            .await?;
        db.insert("T", &["name", "note"], &["same".into(), "other".into()])
            .await?;

        let params = named_params! { "v" => "same" };
        let rows = db
            .query("select id from T where name = @v and note = @v", Some(&params))
            .await?;
        assert_eq!(rows.len(), 1);

        db.close().await;
        Ok::<_, Box<dyn std::error::Error>>(())
    })
}

#[test]
fn missing_parameter_fails_before_querying() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let rt = Runtime::new()?;
    rt.block_on(async {
        let db = open_db(&dir).await?;
        let params = named_params! { "name" => "z" };
        let err = db
            .execute("update T set name=@name where id=@id", Some(&params))
            .await
            .unwrap_err();
        assert!(matches!(err, SqlFacadeError::MissingParameter { ref token } if token == "@id"));

        db.close().await;
        // Validation happens before the pool is consulted.
        let err = db.query("select @x", None).await.unwrap_err();
        assert!(matches!(err, SqlFacadeError::MissingParameter { .. }));
        Ok::<_, Box<dyn std::error::Error>>(())
    })
}

#[test]
fn insert_count_mismatch_issues_no_query() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let rt = Runtime::new()?;
    rt.block_on(async {
        let db = open_db(&dir).await?;
        let err = db
            .insert("T", &["name", "note"], &[RowValues::from("x")])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SqlFacadeError::ColumnValueMismatch {
                columns: 2,
                values: 1
            }
        ));
        assert!(!db.exists("select 1 from T", None).await?);

        // Reported even when the pool is closed.
        db.close().await;
        let err = db.insert("T", &["name"], &[]).await.unwrap_err();
        assert!(matches!(err, SqlFacadeError::ColumnValueMismatch { .. }));
        Ok::<_, Box<dyn std::error::Error>>(())
    })
}

#[test]
fn rows_deserialize_into_structs() -> Result<(), Box<dyn std::error::Error>> {
    #[derive(Debug, Deserialize, PartialEq)]
    struct Entry {
        id: i64,
        name: String,
        score: Option<f64>,
    }

    let dir = tempfile::tempdir()?;
    let rt = Runtime::new()?;
    rt.block_on(async {
        let db = open_db(&dir).await?;
        for (name, score) in [("a", Some(1.5)), ("b", None)] {
            db.insert("T", &["name", "score"], &[name.into(), score.into()])
                .await?;
        }

        let entries: Vec<Entry> = db.query_as("select id, name, score from T order by id", None).await?;
        assert_eq!(
            entries,
            vec![
                Entry {
                    id: 1,
                    name: "a".to_string(),
                    score: Some(1.5)
                },
                Entry {
                    id: 2,
                    name: "b".to_string(),
                    score: None
                },
            ]
        );

        let params = named_params! { "name" => "b" };
        let one: Option<Entry> = db
            .get_one_as("select id, name, score from T where name = @name", Some(&params))
            .await?;
        assert_eq!(one.map(|e| e.id), Some(2));

        // `name` is NOT NULL in the struct but the query does not select it.
        let err = db
            .query_as::<Entry>("select id from T", None)
            .await
            .unwrap_err();
        assert!(matches!(err, SqlFacadeError::RowDecode(_)));

        db.close().await;
        Ok::<_, Box<dyn std::error::Error>>(())
    })
}

#[test]
fn driver_errors_surface() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let rt = Runtime::new()?;
    rt.block_on(async {
        let db = open_db(&dir).await?;
        let err = db.query("select * from no_such_table", None).await.unwrap_err();
        assert!(matches!(err, SqlFacadeError::SqliteError(_)));

        let err = db
            .insert("no_such_table", &["name"], &[RowValues::from("x")])
            .await
            .unwrap_err();
        assert!(matches!(err, SqlFacadeError::SqliteError(_)));

        db.close().await;
        Ok::<_, Box<dyn std::error::Error>>(())
    })
}

#[test]
fn get_value_on_first_row() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let rt = Runtime::new()?;
    rt.block_on(async {
        let db = open_db(&dir).await?;
        let sql = "select * from T limit 1";
        assert_eq!(db.get_value("name", sql, None).await?, None);

        db.insert("T", &["name"], &[RowValues::from("x")]).await?;
        assert_eq!(
            db.get_value("name", sql, None).await?,
            Some(RowValues::Text("x".to_string()))
        );

        db.close().await;
        Ok::<_, Box<dyn std::error::Error>>(())
    })
}

#[test]
fn execute_ignores_returned_rows() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let rt = Runtime::new()?;
    rt.block_on(async {
        let db = open_db(&dir).await?;
        let id = db
            .insert("T", &["name"], &[RowValues::from("x")])
            .await?
            .insert_id
            .expect("generated id");

        let params = named_params! { "name" => "y", "id" => id };
        let updated = db
            .execute(
                "update T set name=@name where id=@id returning id",
                Some(&params),
            )
            .await?;
        assert_eq!(updated, ExecuteResult::from_affected(1));

        // A read-only statement changes nothing, even right after a write.
        let selected = db.execute("select * from T", None).await?;
        assert_eq!(selected, ExecuteResult::from_affected(0));

        let name = db
            .get_value("name", "select name from T where id = @id", Some(&params))
            .await?;
        assert_eq!(name, Some(RowValues::Text("y".to_string())));

        db.close().await;
        Ok::<_, Box<dyn std::error::Error>>(())
    })
}

#[test]
fn insert_without_columns_uses_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let rt = Runtime::new()?;
    rt.block_on(async {
        let db = open_db(&dir).await?;
        db.execute_batch("CREATE TABLE D (id INTEGER PRIMARY KEY, note TEXT DEFAULT 'none');")
            .await?;

        let inserted = db.insert("D", &[], &[]).await?;
        assert_eq!(inserted.affected_rows, 1);
        assert_eq!(inserted.insert_id, Some(1));

        let note = db.get_value("note", "select note from D", None).await?;
        assert_eq!(note, Some(RowValues::Text("none".to_string())));

        db.close().await;
        Ok::<_, Box<dyn std::error::Error>>(())
    })
}
