use async_trait::async_trait;
use chrono::Utc;
use common::OrderId;
use domain::{
    MenuItemId, Money, NewOrderHeader, NewOrderLineItem, OrderHeader, OrderLineItem, OrderRecord,
    OrderStatus, PaymentMethod, PaymentStatus,
};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::error::{OrderStoreError, Result};
use crate::store::OrderStore;

/// PostgreSQL-backed order store implementation.
#[derive(Clone)]
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    /// Creates a new PostgreSQL order store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_header(row: PgRow) -> Result<OrderHeader> {
        let status_raw: String = row.try_get("status")?;
        let status = OrderStatus::parse(&status_raw)
            .ok_or_else(|| OrderStoreError::InvalidRecord(format!("status {status_raw:?}")))?;

        let payment_status_raw: String = row.try_get("payment_status")?;
        let payment_status = PaymentStatus::parse(&payment_status_raw).ok_or_else(|| {
            OrderStoreError::InvalidRecord(format!("payment_status {payment_status_raw:?}"))
        })?;

        let payment_method_raw: String = row.try_get("payment_method")?;
        let payment_method = PaymentMethod::parse(&payment_method_raw).ok_or_else(|| {
            OrderStoreError::InvalidRecord(format!("payment_method {payment_method_raw:?}"))
        })?;

        Ok(OrderHeader {
            id: OrderId::from_uuid(row.try_get::<Uuid, _>("id")?),
            order_number: row.try_get("order_number")?,
            customer_name: row.try_get("customer_name")?,
            customer_phone: row.try_get("customer_phone")?,
            customer_notes: row.try_get("customer_notes")?,
            payment_method,
            total_amount: Money::from_cents(row.try_get("total_amount_cents")?),
            status,
            payment_status,
            created_at: row.try_get("created_at")?,
        })
    }

    fn row_to_item(row: PgRow) -> Result<OrderLineItem> {
        let quantity: i32 = row.try_get("quantity")?;
        let quantity = u32::try_from(quantity)
            .map_err(|_| OrderStoreError::InvalidRecord(format!("quantity {quantity}")))?;

        Ok(OrderLineItem {
            order_id: OrderId::from_uuid(row.try_get::<Uuid, _>("order_id")?),
            item_id: MenuItemId::new(row.try_get::<String, _>("menu_item_id")?),
            quantity,
            unit_price: Money::from_cents(row.try_get("unit_price_cents")?),
            total_price: Money::from_cents(row.try_get("total_price_cents")?),
            special_instructions: row.try_get("special_instructions")?,
        })
    }
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    async fn create_order_header(&self, header: NewOrderHeader) -> Result<OrderHeader> {
        let id = OrderId::new();
        let created_at = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO orders (id, order_number, customer_name, customer_phone, customer_notes,
                                payment_method, total_amount_cents, status, payment_status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(id.as_uuid())
        .bind(&header.order_number)
        .bind(&header.customer_name)
        .bind(&header.customer_phone)
        .bind(&header.customer_notes)
        .bind(header.payment_method.as_str())
        .bind(header.total_amount.cents())
        .bind(header.status.as_str())
        .bind(header.payment_status.as_str())
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        Ok(OrderHeader::from_input(id, header, created_at))
    }

    async fn create_order_line_items(
        &self,
        order_id: OrderId,
        items: Vec<NewOrderLineItem>,
    ) -> Result<()> {
        // One transaction so the batch is all-or-nothing.
        let mut tx = self.pool.begin().await?;

        for item in &items {
            sqlx::query(
                r#"
                INSERT INTO order_items (order_id, menu_item_id, quantity, unit_price_cents,
                                         total_price_cents, special_instructions)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(order_id.as_uuid())
            .bind(item.item_id.as_str())
            .bind(item.quantity as i32)
            .bind(item.unit_price.cents())
            .bind(item.total_price.cents())
            .bind(&item.special_instructions)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn cancel_order_header(&self, order_id: OrderId) -> Result<()> {
        let updated = sqlx::query(
            "UPDATE orders SET status = 'cancelled' WHERE id = $1 AND status = 'pending'",
        )
        .bind(order_id.as_uuid())
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 1 {
            return Ok(());
        }

        // Nothing matched: either the header is gone or it already left
        // pending. Only the former is an error.
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM orders WHERE id = $1)")
            .bind(order_id.as_uuid())
            .fetch_one(&self.pool)
            .await?;

        if exists {
            Ok(())
        } else {
            Err(OrderStoreError::OrderNotFound(order_id))
        }
    }

    async fn find_by_number(&self, order_number: &str) -> Result<Option<OrderRecord>> {
        let row = sqlx::query("SELECT * FROM orders WHERE order_number = $1")
            .bind(order_number)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let header = Self::row_to_header(row)?;

        let item_rows = sqlx::query("SELECT * FROM order_items WHERE order_id = $1 ORDER BY id")
            .bind(header.id.as_uuid())
            .fetch_all(&self.pool)
            .await?;

        let items = item_rows
            .into_iter()
            .map(Self::row_to_item)
            .collect::<Result<Vec<_>>>()?;

        Ok(Some(OrderRecord { header, items }))
    }
}
