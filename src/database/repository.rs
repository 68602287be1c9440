use sqlx::{sqlite::SqliteRow, FromRow, SqlitePool};

use crate::database::manager::DatabaseError;

/// Typed read access to a single table.
///
/// `columns` is the select list used for every query, so a repository over
/// `requests` can leave the invoice blob out of list views.
pub struct Repository<T> {
    table_name: &'static str,
    columns: &'static str,
    pool: SqlitePool,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Repository<T>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    pub fn new(table_name: &'static str, columns: &'static str, pool: SqlitePool) -> Self {
        Self {
            table_name,
            columns,
            pool,
            _phantom: std::marker::PhantomData,
        }
    }

    pub async fn select_all(&self, order_by: &str) -> Result<Vec<T>, DatabaseError> {
        let order_by = Self::identifier(order_by)?;
        let sql = format!(
            "SELECT {} FROM {} ORDER BY {}",
            self.columns, self.table_name, order_by
        );
        Ok(sqlx::query_as::<_, T>(&sql).fetch_all(&self.pool).await?)
    }

    pub async fn select_by(&self, column: &str, value: &str) -> Result<Vec<T>, DatabaseError> {
        let column = Self::identifier(column)?;
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ? ORDER BY rowid",
            self.columns, self.table_name, column
        );
        Ok(sqlx::query_as::<_, T>(&sql)
            .bind(value)
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn select_one(&self, column: &str, value: &str) -> Result<Option<T>, DatabaseError> {
        let column = Self::identifier(column)?;
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ? LIMIT 1",
            self.columns, self.table_name, column
        );
        Ok(sqlx::query_as::<_, T>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn select_404(&self, column: &str, value: &str) -> Result<T, DatabaseError> {
        self.select_one(column, value)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("{} '{}' not found", self.table_name, value)))
    }

    pub async fn count_by(&self, column: &str, value: &str) -> Result<i64, DatabaseError> {
        let column = Self::identifier(column)?;
        let sql = format!("SELECT COUNT(*) FROM {} WHERE {} = ?", self.table_name, column);
        let (count,): (i64,) = sqlx::query_as(&sql).bind(value).fetch_one(&self.pool).await?;
        Ok(count)
    }

    /// Column names are interpolated, so only plain identifiers are accepted
    fn identifier(name: &str) -> Result<&str, DatabaseError> {
        let valid = !name.is_empty()
            && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
            && !name.starts_with(|c: char| c.is_ascii_digit());
        if valid {
            Ok(name)
        } else {
            Err(DatabaseError::QueryError(format!("invalid column name '{}'", name)))
        }
    }
}
