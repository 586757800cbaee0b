//! PostgreSQL-backed record store.
//!
//! Expects two tables:
//!
//! ```sql
//! CREATE TABLE images (id SERIAL PRIMARY KEY, file_path TEXT NOT NULL);
//! CREATE TABLE annotations (
//!     id SERIAL PRIMARY KEY,
//!     image_id INTEGER REFERENCES images(id),
//!     x_center REAL, y_center REAL, width REAL, height REAL,
//!     class_name TEXT NOT NULL
//! );
//! ```

use postgres::{Client, NoTls, Row};

use super::{ClassCount, RecordStore};
use crate::config::ConnectionSettings;
use crate::error::YoloPrepError;
use crate::record::AnnotationRecord;

// Box columns are fetched as text so each value keeps the precision it is
// stored with; widening a REAL to float8 would surface binary noise.
const FETCH_FILTERED_SQL: &str = "
    SELECT i.file_path, a.x_center::text, a.y_center::text,
           a.width::text, a.height::text, a.class_name::text
    FROM images i
    JOIN annotations a ON i.id = a.image_id
    WHERE a.class_name::text = ANY($1)
    LIMIT $2";

const COUNT_IMAGES_SQL: &str = "SELECT COUNT(*) FROM images";

const COUNT_BY_CLASS_SQL: &str = "
    SELECT class_name::text, COUNT(*)
    FROM annotations
    GROUP BY class_name
    ORDER BY class_name";

const FETCH_RANDOM_SQL: &str = "
    SELECT i.file_path, a.x_center::text, a.y_center::text,
           a.width::text, a.height::text, a.class_name::text
    FROM images i
    JOIN annotations a ON i.id = a.image_id
    WHERE i.id = (SELECT id FROM images ORDER BY RANDOM() LIMIT 1)";

/// A [`RecordStore`] holding one open PostgreSQL connection.
///
/// The connection is opened by [`PostgresStore::connect`] and closed when the
/// store is dropped.
pub struct PostgresStore {
    client: Client,
}

impl PostgresStore {
    /// Open a connection using the given settings.
    pub fn connect(settings: &ConnectionSettings) -> Result<Self, YoloPrepError> {
        let pg_config = settings.to_pg_config()?;
        let client = pg_config.connect(NoTls)?;
        tracing::debug!("PostgreSQL connection established");
        Ok(Self { client })
    }
}

fn row_to_record(row: &Row) -> Result<AnnotationRecord, YoloPrepError> {
    Ok(AnnotationRecord {
        file_path: row.try_get(0)?,
        x_center: coordinate(row, 1, "x_center")?,
        y_center: coordinate(row, 2, "y_center")?,
        width: coordinate(row, 3, "width")?,
        height: coordinate(row, 4, "height")?,
        class_name: row.try_get(5)?,
    })
}

fn coordinate(row: &Row, idx: usize, column: &'static str) -> Result<f64, YoloPrepError> {
    let text: String = row.try_get(idx)?;
    parse_coordinate(column, &text)
}

/// Parse PostgreSQL's text rendering of a numeric column.
pub(crate) fn parse_coordinate(column: &'static str, text: &str) -> Result<f64, YoloPrepError> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| YoloPrepError::InvalidValue {
            column,
            value: text.to_string(),
        })
}

fn count_to_usize(count: i64) -> usize {
    usize::try_from(count).unwrap_or(0)
}

impl RecordStore for PostgresStore {
    fn fetch(
        &mut self,
        class_filter: &[String],
        limit: usize,
    ) -> Result<Vec<AnnotationRecord>, YoloPrepError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = self
            .client
            .query(FETCH_FILTERED_SQL, &[&class_filter, &limit])?;
        tracing::debug!(rows = rows.len(), "fetched filtered annotation rows");
        rows.iter().map(row_to_record).collect()
    }

    fn count_images(&mut self) -> Result<usize, YoloPrepError> {
        let row = self.client.query_one(COUNT_IMAGES_SQL, &[])?;
        let count: i64 = row.try_get(0)?;
        Ok(count_to_usize(count))
    }

    fn count_by_class(&mut self) -> Result<Vec<ClassCount>, YoloPrepError> {
        let rows = self.client.query(COUNT_BY_CLASS_SQL, &[])?;
        rows.iter()
            .map(|row| -> Result<ClassCount, YoloPrepError> {
                let class_name: String = row.try_get(0)?;
                let count: i64 = row.try_get(1)?;
                Ok(ClassCount::new(class_name, count_to_usize(count)))
            })
            .collect()
    }

    fn fetch_random_with_annotations(&mut self) -> Result<Vec<AnnotationRecord>, YoloPrepError> {
        let rows = self.client.query(FETCH_RANDOM_SQL, &[])?;
        rows.iter().map(row_to_record).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn real_columns_keep_their_stored_digits() {
        // PostgreSQL renders REAL 0.1 as "0.1"; parsing the text avoids the
        // 0.10000000149011612 a float4 -> float8 cast would produce.
        let record = AnnotationRecord::new(
            "a.jpg",
            parse_coordinate("x_center", "0.1").expect("x"),
            parse_coordinate("y_center", "0.3").expect("y"),
            parse_coordinate("width", "1").expect("w"),
            parse_coordinate("height", "0.2").expect("h"),
            "0",
        );
        assert_eq!(record.to_label_line(), "0 0.1 0.3 1.0 0.2");
    }

    #[test]
    fn numeric_and_double_renderings_parse() {
        assert_eq!(parse_coordinate("width", "0.250").expect("numeric"), 0.25);
        assert_eq!(
            parse_coordinate("width", "0.30000000000000004").expect("float8"),
            0.30000000000000004
        );
    }

    #[test]
    fn unparsable_value_names_its_column() {
        let err = parse_coordinate("height", "NaN-ish").unwrap_err();
        assert!(matches!(
            err,
            YoloPrepError::InvalidValue {
                column: "height",
                ..
            }
        ));
        assert!(err.to_string().contains("height"));
    }
}
