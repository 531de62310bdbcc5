use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use shared::{Invoice, InvoiceStatus};
use sqlx::{migrate::MigrateDatabase, Row, Sqlite, SqlitePool};
use std::sync::Arc;

// The database URL for the production database
const DATABASE_URL: &str = "sqlite:invoices.db";

/// DbConnection manages all invoice persistence. Every statement binds its
/// values as parameters; untrusted input never reaches the SQL text.
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Create a new database connection
    pub async fn new(url: &str) -> Result<Self> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?
        }

        // Connect to the database
        let pool = SqlitePool::connect(url).await?;

        // Setup database schema
        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Initialize the standard database
    pub async fn init() -> Result<Self> {
        Self::new(DATABASE_URL).await
    }

    /// Initialize a test database with a unique name
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        // Generate a unique database name for tests
        let test_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);

        Self::new(&db_url).await
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        // Amount is integer cents; date is ISO 8601 day precision
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS invoices (
                id TEXT PRIMARY KEY,
                customer_id TEXT NOT NULL,
                amount INTEGER NOT NULL,
                status TEXT NOT NULL,
                date TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Get the underlying SQLite pool
    pub fn pool(&self) -> &SqlitePool {
        &*self.pool
    }

    /// Insert a new invoice and return its generated id.
    pub async fn insert_invoice(
        &self,
        customer_id: &str,
        amount_cents: i64,
        status: InvoiceStatus,
        date: NaiveDate,
    ) -> Result<String> {
        let id = uuid::Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO invoices (id, customer_id, amount, status, date) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(customer_id)
        .bind(amount_cents)
        .bind(status.as_str())
        .bind(date.format("%Y-%m-%d").to_string())
        .execute(&*self.pool)
        .await?;
        Ok(id)
    }

    /// Overwrite the mutable fields of an existing invoice. The id and the
    /// date column are never touched after creation.
    pub async fn update_invoice(
        &self,
        id: &str,
        customer_id: &str,
        amount_cents: i64,
        status: InvoiceStatus,
    ) -> Result<()> {
        sqlx::query("UPDATE invoices SET customer_id = ?, amount = ?, status = ? WHERE id = ?")
            .bind(customer_id)
            .bind(amount_cents)
            .bind(status.as_str())
            .bind(id)
            .execute(&*self.pool)
            .await?;
        Ok(())
    }

    /// Delete an invoice by id. Returns whether a row was removed.
    pub async fn delete_invoice(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = ?")
            .bind(id)
            .execute(&*self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Retrieve an invoice by id
    pub async fn get_invoice(&self, id: &str) -> Result<Option<Invoice>> {
        let row = sqlx::query("SELECT id, customer_id, amount, status, date FROM invoices WHERE id = ?")
            .bind(id)
            .fetch_optional(&*self.pool)
            .await?;

        match row {
            Some(r) => {
                let status_text: String = r.get("status");
                let status = InvoiceStatus::parse(&status_text)
                    .ok_or_else(|| anyhow!("Invalid status in invoices row: {}", status_text))?;
                let date_text: String = r.get("date");
                let date = NaiveDate::parse_from_str(&date_text, "%Y-%m-%d")?;
                Ok(Some(Invoice {
                    id: r.get("id"),
                    customer_id: r.get("customer_id"),
                    amount_cents: r.get("amount"),
                    status,
                    date,
                }))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Setup a new test database for each test
    async fn setup_test() -> DbConnection {
        DbConnection::init_test().await.expect("Failed to create test database")
    }

    fn test_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).expect("valid date")
    }

    #[tokio::test]
    async fn test_insert_and_get_invoice() {
        let db = setup_test().await;

        let id = db
            .insert_invoice("cust-42", 25099, InvoiceStatus::Pending, test_date())
            .await
            .expect("Failed to insert invoice");

        let invoice = db
            .get_invoice(&id)
            .await
            .expect("Failed to get invoice")
            .expect("Invoice should exist");

        assert_eq!(invoice.id, id);
        assert_eq!(invoice.customer_id, "cust-42");
        assert_eq!(invoice.amount_cents, 25099);
        assert_eq!(invoice.status, InvoiceStatus::Pending);
        assert_eq!(invoice.date, test_date());
    }

    #[tokio::test]
    async fn test_get_nonexistent_invoice() {
        let db = setup_test().await;

        let result = db.get_invoice("no-such-id").await.expect("Query failed");

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_update_overwrites_fields_but_not_date() {
        let db = setup_test().await;

        let id = db
            .insert_invoice("cust-1", 1000, InvoiceStatus::Pending, test_date())
            .await
            .expect("Failed to insert invoice");

        db.update_invoice(&id, "cust-2", 7550, InvoiceStatus::Paid)
            .await
            .expect("Failed to update invoice");

        let invoice = db
            .get_invoice(&id)
            .await
            .expect("Failed to get invoice")
            .expect("Invoice should exist");

        assert_eq!(invoice.customer_id, "cust-2");
        assert_eq!(invoice.amount_cents, 7550);
        assert_eq!(invoice.status, InvoiceStatus::Paid);
        // Date is immutable after creation
        assert_eq!(invoice.date, test_date());
    }

    #[tokio::test]
    async fn test_delete_invoice() {
        let db = setup_test().await;

        let id = db
            .insert_invoice("cust-1", 500, InvoiceStatus::Paid, test_date())
            .await
            .expect("Failed to insert invoice");

        let deleted = db.delete_invoice(&id).await.expect("Failed to delete invoice");
        assert!(deleted, "Invoice should have been deleted");

        let gone = db.get_invoice(&id).await.expect("Failed to check after deletion");
        assert!(gone.is_none());

        // Deleting again finds nothing
        let deleted_again = db.delete_invoice(&id).await.expect("Failed to re-delete invoice");
        assert!(!deleted_again, "Invoice should not exist to be deleted");
    }

    #[tokio::test]
    async fn test_hostile_values_stay_data() {
        let db = setup_test().await;

        // Parameter binding must keep SQL metacharacters inert
        let hostile = r#"cust'); DROP TABLE invoices;--"#;
        let id = db
            .insert_invoice(hostile, 100, InvoiceStatus::Pending, test_date())
            .await
            .expect("Failed to insert invoice");

        let invoice = db
            .get_invoice(&id)
            .await
            .expect("Table should still exist")
            .expect("Invoice should exist");

        assert_eq!(invoice.customer_id, hostile);
    }
}
