//! Dynamic `SELECT` used by every list endpoint: AND-combined equality and
//! multi-value filters, a fixed sort key and an optional row cap.

use sqlx::postgres::PgRow;
use sqlx::{Encode, FromRow, PgPool, Postgres, QueryBuilder, Type};

pub struct ListQuery<'a> {
    builder: QueryBuilder<'a, Postgres>,
    has_condition: bool,
}

impl<'a> ListQuery<'a> {
    pub fn new(table: &'static str) -> Self {
        Self {
            builder: QueryBuilder::new(format!("SELECT * FROM {table}")),
            has_condition: false,
        }
    }

    fn condition(&mut self, column: &'static str) -> &mut QueryBuilder<'a, Postgres> {
        self.builder
            .push(if self.has_condition { " AND " } else { " WHERE " })
            .push(column);
        self.has_condition = true;
        &mut self.builder
    }

    /// `column = value`, skipped when `value` is `None`.
    pub fn eq<T>(mut self, column: &'static str, value: Option<T>) -> Self
    where
        T: 'a + Encode<'a, Postgres> + Type<Postgres> + Send,
    {
        if let Some(value) = value {
            self.condition(column).push(" = ").push_bind(value);
        }
        self
    }

    /// `column IN (...)` for two or more values, plain equality for one,
    /// nothing for none.
    pub fn any_of<T>(mut self, column: &'static str, values: Vec<T>) -> Self
    where
        T: 'a + Encode<'a, Postgres> + Type<Postgres> + Send,
    {
        if values.len() == 1 {
            return self.eq(column, values.into_iter().next());
        }
        if !values.is_empty() {
            let builder = self.condition(column);
            builder.push(" IN (");
            let mut separated = builder.separated(", ");
            for value in values {
                separated.push_bind(value);
            }
            separated.push_unseparated(")");
        }
        self
    }

    pub async fn fetch_all<T>(
        self,
        pool: &PgPool,
        order_by: &'static str,
        limit: Option<i64>,
    ) -> Result<Vec<T>, sqlx::Error>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let mut builder = self.builder;
        builder.push(" ORDER BY ").push(order_by);
        if let Some(limit) = limit {
            builder.push(" LIMIT ").push_bind(limit);
        }
        builder.build_query_as::<T>().fetch_all(pool).await
    }

    #[cfg(test)]
    fn sql(&self) -> &str {
        self.builder.sql()
    }
}
