use diesel::{prelude::*, result::Error, sql_types::Jsonb};

// The search table is owned elsewhere, so rows come back as plain JSON objects
#[derive(QueryableByName)]
struct SearchRow {
    #[diesel(sql_type = Jsonb)]
    search_row: serde_json::Value,
}

pub fn get_all(conn: &mut PgConnection) -> Result<Vec<serde_json::Value>, Error> {
    let rows: Vec<SearchRow> =
        diesel::sql_query("SELECT row_to_json(search)::jsonb AS search_row FROM search").load(conn)?;

    Ok(rows.into_iter().map(|r| r.search_row).collect())
}
