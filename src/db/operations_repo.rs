// src/db/operations_repo.rs

use chrono::Utc;
use sqlx::{Executor, QueryBuilder, Sqlite};

use crate::common::error::AppError;
use crate::common::money::Money;
use crate::models::operations::{OrderLine, OrderStatus, StaffCall, StaffCallStatus, TableOrder};
use crate::models::sales::PricedLine;

#[derive(Clone, Default)]
pub struct OperationsRepository;

impl OperationsRepository {
    pub fn new() -> Self {
        Self
    }

    // =========================================================================
    //  PEDIDOS DE MESA
    // =========================================================================

    pub async fn insert_order<'e, E>(
        &self,
        executor: E,
        company_id: i64,
        table_number: i64,
        total: Money,
        customer_name: Option<&str>,
        notes: Option<&str>,
    ) -> Result<TableOrder, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let now = Utc::now();
        let order = sqlx::query_as::<_, TableOrder>(
            r#"
            INSERT INTO table_orders (
                company_id, table_number, status, total, customer_name, notes, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(table_number)
        .bind(OrderStatus::Pending)
        .bind(total)
        .bind(customer_name)
        .bind(notes)
        .bind(now)
        .bind(now)
        .fetch_one(executor)
        .await?;
        Ok(order)
    }

    pub async fn insert_order_line<'e, E>(
        &self,
        executor: E,
        company_id: i64,
        order_id: i64,
        line: &PricedLine,
        notes: Option<&str>,
    ) -> Result<OrderLine, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let line = sqlx::query_as::<_, OrderLine>(
            r#"
            INSERT INTO table_order_items (company_id, order_id, product_id, quantity, unit_price, subtotal, notes)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(order_id)
        .bind(line.product_id)
        .bind(line.quantity)
        .bind(line.unit_price)
        .bind(line.subtotal)
        .bind(notes)
        .fetch_one(executor)
        .await?;
        Ok(line)
    }

    /// Todos os pedidos da mesa, mais recentes primeiro.
    pub async fn list_orders<'e, E>(
        &self,
        executor: E,
        company_id: i64,
        table_number: i64,
    ) -> Result<Vec<TableOrder>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let orders = sqlx::query_as::<_, TableOrder>(
            r#"
            SELECT * FROM table_orders
            WHERE company_id = ? AND table_number = ?
            ORDER BY id DESC
            "#,
        )
        .bind(company_id)
        .bind(table_number)
        .fetch_all(executor)
        .await?;
        Ok(orders)
    }

    /// Pedidos que ainda contam na conta da mesa (nem `closed` nem `cancelled`).
    pub async fn list_open_orders<'e, E>(
        &self,
        executor: E,
        company_id: i64,
        table_number: i64,
    ) -> Result<Vec<TableOrder>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let orders = sqlx::query_as::<_, TableOrder>(
            r#"
            SELECT * FROM table_orders
            WHERE company_id = ? AND table_number = ?
              AND status NOT IN ('closed', 'cancelled')
            ORDER BY id ASC
            "#,
        )
        .bind(company_id)
        .bind(table_number)
        .fetch_all(executor)
        .await?;
        Ok(orders)
    }

    /// Itens de um conjunto de pedidos, em ordem de pedido e de inserção.
    pub async fn list_lines_for_orders<'e, E>(
        &self,
        executor: E,
        company_id: i64,
        order_ids: &[i64],
    ) -> Result<Vec<OrderLine>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        if order_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT * FROM table_order_items WHERE company_id = ");
        builder.push_bind(company_id);
        builder.push(" AND order_id IN (");
        let mut separated = builder.separated(", ");
        for id in order_ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY order_id ASC, id ASC");

        let lines = builder
            .build_query_as::<OrderLine>()
            .fetch_all(executor)
            .await?;
        Ok(lines)
    }

    pub async fn find_order<'e, E>(
        &self,
        executor: E,
        company_id: i64,
        table_number: i64,
        order_id: i64,
    ) -> Result<Option<TableOrder>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let order = sqlx::query_as::<_, TableOrder>(
            "SELECT * FROM table_orders WHERE company_id = ? AND table_number = ? AND id = ?",
        )
        .bind(company_id)
        .bind(table_number)
        .bind(order_id)
        .fetch_optional(executor)
        .await?;
        Ok(order)
    }

    /// Grava o novo status só se o pedido ainda estiver em `expected`
    /// (evita sobrescrever um fechamento concorrente).
    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        company_id: i64,
        order_id: i64,
        expected: OrderStatus,
        status: OrderStatus,
    ) -> Result<Option<TableOrder>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let order = sqlx::query_as::<_, TableOrder>(
            r#"
            UPDATE table_orders SET status = ?, updated_at = ?
            WHERE company_id = ? AND id = ? AND status = ?
            RETURNING *
            "#,
        )
        .bind(status)
        .bind(Utc::now())
        .bind(company_id)
        .bind(order_id)
        .bind(expected)
        .fetch_optional(executor)
        .await?;
        Ok(order)
    }

    /// Marca como `closed` todos os pedidos abertos da mesa.
    pub async fn close_open_orders<'e, E>(
        &self,
        executor: E,
        company_id: i64,
        table_number: i64,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            r#"
            UPDATE table_orders SET status = 'closed', updated_at = ?
            WHERE company_id = ? AND table_number = ?
              AND status NOT IN ('closed', 'cancelled')
            "#,
        )
        .bind(Utc::now())
        .bind(company_id)
        .bind(table_number)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn count_open_tables<'e, E>(&self, executor: E, company_id: i64) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(DISTINCT table_number) FROM table_orders
            WHERE company_id = ? AND status NOT IN ('closed', 'cancelled')
            "#,
        )
        .bind(company_id)
        .fetch_one(executor)
        .await?;
        Ok(count)
    }

    // =========================================================================
    //  CHAMADAS DE GARÇOM
    // =========================================================================

    pub async fn insert_staff_call<'e, E>(
        &self,
        executor: E,
        company_id: i64,
        table_number: i64,
    ) -> Result<StaffCall, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let call = sqlx::query_as::<_, StaffCall>(
            r#"
            INSERT INTO staff_calls (company_id, table_number, status, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(table_number)
        .bind(StaffCallStatus::Pending)
        .bind(Utc::now())
        .fetch_one(executor)
        .await?;
        Ok(call)
    }

    pub async fn list_pending_calls<'e, E>(&self, executor: E, company_id: i64) -> Result<Vec<StaffCall>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let calls = sqlx::query_as::<_, StaffCall>(
            "SELECT * FROM staff_calls WHERE company_id = ? AND status = 'pending' ORDER BY id ASC",
        )
        .bind(company_id)
        .fetch_all(executor)
        .await?;
        Ok(calls)
    }

    pub async fn attend_call<'e, E>(
        &self,
        executor: E,
        company_id: i64,
        call_id: i64,
    ) -> Result<Option<StaffCall>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let call = sqlx::query_as::<_, StaffCall>(
            r#"
            UPDATE staff_calls SET status = 'attended', attended_at = ?
            WHERE company_id = ? AND id = ?
            RETURNING *
            "#,
        )
        .bind(Utc::now())
        .bind(company_id)
        .bind(call_id)
        .fetch_optional(executor)
        .await?;
        Ok(call)
    }
}
