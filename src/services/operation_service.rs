// src/services/operation_service.rs

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::{
    common::{db_utils::blank_to_none, error::AppError, money::Money},
    db::{
        sales_repo::NewSale, DashboardRepository, InventoryRepository, OperationsRepository, SalesRepository,
        TenantRegistry,
    },
    models::{
        lifecycle::HasLifecycle,
        operations::{
            CloseTablePayload, CreateOrderPayload, CreatedOrder, OrderLine, OrderStatus, StaffCall, TabClosure,
            TableOrder, TableOrderDetail, TableSummary,
        },
        sales::PricedLine,
    },
    services::sales_service::ensure_sale_references,
};

/// Soma bruta das linhas e total líquido com o desconto (nunca negativo).
pub fn tab_totals(lines: &[OrderLine], discount: Money) -> Result<(Money, Money), AppError> {
    let gross_total = Money::checked_sum(lines.iter().map(|l| l.subtotal))
        .ok_or_else(|| AppError::invalid_field("items", "O total da mesa excede o limite."))?;
    Ok((gross_total, gross_total.saturating_discount(discount)))
}

fn validate_table_number(table_number: i64) -> Result<i64, AppError> {
    if table_number <= 0 {
        return Err(AppError::NotFound("Mesa"));
    }
    Ok(table_number)
}

/// Pedidos de mesa, chamadas de garçom e fechamento de conta.
#[derive(Clone)]
pub struct OperationService {
    ops_repo: OperationsRepository,
    inventory_repo: InventoryRepository,
    sales_repo: SalesRepository,
    dashboard_repo: DashboardRepository,
    registry: Arc<TenantRegistry>,
    // Uma trava por (empresa, mesa): dois fechamentos da mesma mesa nunca
    // leem o mesmo conjunto de pedidos abertos.
    closure_locks: Arc<DashMap<(i64, i64), Arc<Mutex<()>>>>,
}

impl OperationService {
    pub fn new(
        ops_repo: OperationsRepository,
        inventory_repo: InventoryRepository,
        sales_repo: SalesRepository,
        dashboard_repo: DashboardRepository,
        registry: Arc<TenantRegistry>,
    ) -> Self {
        Self {
            ops_repo,
            inventory_repo,
            sales_repo,
            dashboard_repo,
            registry,
            closure_locks: Arc::new(DashMap::new()),
        }
    }

    // =========================================================================
    //  PEDIDOS
    // =========================================================================

    pub async fn create_order(
        &self,
        company_id: i64,
        table_number: i64,
        payload: &CreateOrderPayload,
    ) -> Result<CreatedOrder, AppError> {
        let table_number = validate_table_number(table_number)?;
        if payload.items.is_empty() {
            return Err(AppError::MissingField("items"));
        }

        let store = self.registry.store(company_id).await?;
        let mut tx = store.begin().await?;

        // O preço da linha é o informado no pedido; o produto só precisa existir e estar ativo.
        let mut lines = Vec::with_capacity(payload.items.len());
        for item in &payload.items {
            self.inventory_repo
                .find_product(&mut *tx, company_id, item.product_id)
                .await?
                .filter(|p| p.is_active())
                .ok_or(AppError::NotFound("Produto"))?;

            let line = PricedLine::new(item.product_id, item.quantity, item.unit_price)?;
            lines.push((line, blank_to_none(item.notes.as_deref())));
        }

        let priced: Vec<PricedLine> = lines.iter().map(|(line, _)| *line).collect();
        let total = PricedLine::total(&priced)?;

        let order = self
            .ops_repo
            .insert_order(
                &mut *tx,
                company_id,
                table_number,
                total,
                blank_to_none(payload.customer_name.as_deref()),
                blank_to_none(payload.notes.as_deref()),
            )
            .await?;

        for (line, notes) in &lines {
            self.ops_repo
                .insert_order_line(&mut *tx, company_id, order.id, line, *notes)
                .await?;
        }

        tx.commit().await?;

        tracing::info!(company_id, table_number, order_id = order.id, %total, "🍽️ Pedido criado");
        Ok(CreatedOrder {
            order_id: order.id,
            total: order.total,
            status: order.status,
        })
    }

    /// Todos os pedidos da mesa (inclusive fechados), mais recentes primeiro.
    pub async fn list_orders(&self, company_id: i64, table_number: i64) -> Result<Vec<TableOrderDetail>, AppError> {
        let table_number = validate_table_number(table_number)?;
        let store = self.registry.store(company_id).await?;

        let orders = self.ops_repo.list_orders(&store, company_id, table_number).await?;
        let ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
        let lines = self.ops_repo.list_lines_for_orders(&store, company_id, &ids).await?;

        Ok(attach_lines(orders, lines))
    }

    pub async fn set_status(
        &self,
        company_id: i64,
        table_number: i64,
        order_id: i64,
        status: OrderStatus,
    ) -> Result<TableOrder, AppError> {
        let table_number = validate_table_number(table_number)?;
        let store = self.registry.store(company_id).await?;

        let order = self
            .ops_repo
            .find_order(&store, company_id, table_number, order_id)
            .await?
            .ok_or(AppError::NotFound("Pedido"))?;

        if !order.status.can_transition_to(status) {
            return Err(AppError::InvalidTransition { from: order.status, to: status });
        }

        match self
            .ops_repo
            .update_status(&store, company_id, order.id, order.status, status)
            .await?
        {
            Some(updated) => {
                tracing::info!(company_id, order_id, from = %order.status, to = %status, "Status do pedido alterado");
                Ok(updated)
            }
            None => {
                // Mudou entre a leitura e a escrita (ex.: a mesa foi fechada).
                let current = self
                    .ops_repo
                    .find_order(&store, company_id, table_number, order_id)
                    .await?
                    .ok_or(AppError::NotFound("Pedido"))?;
                Err(AppError::InvalidTransition { from: current.status, to: status })
            }
        }
    }

    /// Cancela um pedido da mesa. Pedido de outra mesa é `NotFound`.
    pub async fn cancel_order(&self, company_id: i64, table_number: i64, order_id: i64) -> Result<TableOrder, AppError> {
        self.set_status(company_id, table_number, order_id, OrderStatus::Cancelled)
            .await
    }

    /// Consolidação dos pedidos abertos: o que a conta daria se fechada agora.
    pub async fn table_summary(&self, company_id: i64, table_number: i64) -> Result<TableSummary, AppError> {
        let table_number = validate_table_number(table_number)?;
        let store = self.registry.store(company_id).await?;

        let open = self.ops_repo.list_open_orders(&store, company_id, table_number).await?;
        let ids: Vec<i64> = open.iter().map(|o| o.id).collect();
        let lines = self.ops_repo.list_lines_for_orders(&store, company_id, &ids).await?;

        let (total, _) = tab_totals(&lines, Money::ZERO)?;
        let line_count = lines.len();
        let orders = attach_lines(open, lines);

        Ok(TableSummary {
            table_number,
            open_orders: orders.len(),
            line_count,
            total,
            orders,
        })
    }

    // =========================================================================
    //  FECHAMENTO DA CONTA
    // =========================================================================

    /// Converte todos os pedidos abertos da mesa em uma única venda.
    ///
    /// Tudo roda numa transação só: venda, itens, baixa de estoque, acumulados
    /// e fechamento dos pedidos. Qualquer erro desfaz tudo.
    ///
    /// A baixa de estoque aqui NÃO confere saldo (o pedido já foi servido);
    /// o checkout direto confere. As duas regras são intencionais.
    pub async fn close_table(
        &self,
        company_id: i64,
        table_number: i64,
        payload: &CloseTablePayload,
    ) -> Result<TabClosure, AppError> {
        let table_number = validate_table_number(table_number)?;
        let store = self.registry.store(company_id).await?;

        let lock = self
            .closure_locks
            .entry((company_id, table_number))
            .or_default()
            .clone();
        let _guard = lock.lock().await;

        let mut tx = store.begin().await?;

        ensure_sale_references(&mut *tx, company_id, payload.customer_id, payload.employee_id).await?;

        // 1. Pedidos abertos
        let open = self
            .ops_repo
            .list_open_orders(&mut *tx, company_id, table_number)
            .await?;
        if open.is_empty() {
            return Err(AppError::NothingToClose(table_number));
        }

        // 2-3. Linhas e totais
        let ids: Vec<i64> = open.iter().map(|o| o.id).collect();
        let lines = self
            .ops_repo
            .list_lines_for_orders(&mut *tx, company_id, &ids)
            .await?;
        let (gross_total, net_total) = tab_totals(&lines, payload.discount)?;

        // 4. Venda
        let note = format!("Mesa {table_number}");
        let sale = self
            .sales_repo
            .insert_sale(
                &mut *tx,
                company_id,
                NewSale {
                    customer_id: payload.customer_id,
                    employee_id: payload.employee_id,
                    table_number: Some(table_number),
                    total: net_total,
                    discount: payload.discount,
                    payment_method: payload.payment_method,
                    notes: Some(&note),
                },
            )
            .await?;

        // 5. Itens + baixa de estoque sem checagem de saldo
        for line in &lines {
            let priced = PricedLine {
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price: line.unit_price,
                subtotal: line.subtotal,
            };
            self.sales_repo
                .insert_sale_item(&mut *tx, company_id, sale.id, &priced)
                .await?;
            self.inventory_repo
                .decrement_stock(&mut *tx, company_id, line.product_id, line.quantity)
                .await?;
        }

        // 6. Acumulados
        self.dashboard_repo.record_sale(&mut *tx, company_id, net_total).await?;

        // 7. Fecha os pedidos
        let closed = self
            .ops_repo
            .close_open_orders(&mut *tx, company_id, table_number)
            .await?;

        tx.commit().await?;

        tracing::info!(
            company_id,
            table_number,
            sale_id = sale.id,
            orders = closed,
            gross = %gross_total,
            net = %net_total,
            "💰 Conta da mesa fechada"
        );

        // 8. Resumo
        Ok(TabClosure {
            sale_id: sale.id,
            table_number,
            net_total,
            gross_total,
            discount: payload.discount,
            orders_closed_count: open.len(),
            line_count: lines.len(),
        })
    }

    // =========================================================================
    //  CHAMADAS DE GARÇOM
    // =========================================================================

    pub async fn call_staff(&self, company_id: i64, table_number: i64) -> Result<StaffCall, AppError> {
        let table_number = validate_table_number(table_number)?;
        let store = self.registry.store(company_id).await?;
        let call = self.ops_repo.insert_staff_call(&store, company_id, table_number).await?;
        tracing::info!(company_id, table_number, "🔔 Mesa chamou o garçom");
        Ok(call)
    }

    pub async fn list_pending_calls(&self, company_id: i64) -> Result<Vec<StaffCall>, AppError> {
        let store = self.registry.store(company_id).await?;
        self.ops_repo.list_pending_calls(&store, company_id).await
    }

    pub async fn attend_call(&self, company_id: i64, call_id: i64) -> Result<StaffCall, AppError> {
        let store = self.registry.store(company_id).await?;
        self.ops_repo
            .attend_call(&store, company_id, call_id)
            .await?
            .ok_or(AppError::NotFound("Chamado"))
    }
}

/// Distribui as linhas pelos pedidos, preservando a ordem dos pedidos.
fn attach_lines(orders: Vec<TableOrder>, lines: Vec<OrderLine>) -> Vec<TableOrderDetail> {
    let mut by_order: HashMap<i64, Vec<OrderLine>> = HashMap::new();
    for line in lines {
        by_order.entry(line.order_id).or_default().push(line);
    }

    orders
        .into_iter()
        .map(|order| {
            let items = by_order.remove(&order.id).unwrap_or_default();
            TableOrderDetail { order, items }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn line(order_id: i64, quantity: i64, unit_price: Money) -> OrderLine {
        OrderLine {
            id: 0,
            company_id: 1,
            order_id,
            product_id: 1,
            quantity,
            unit_price,
            subtotal: unit_price * quantity,
            notes: None,
        }
    }

    #[test]
    fn net_total_subtracts_discount() {
        let lines = [line(1, 2, Money::new(dec!(7.50))), line(2, 1, Money::new(dec!(5.00)))];
        let (gross, net) = tab_totals(&lines, Money::new(dec!(2.00))).unwrap();
        assert_eq!(gross, Money::new(dec!(20.00)));
        assert_eq!(net, Money::new(dec!(18.00)));
    }

    #[test]
    fn discount_larger_than_total_floors_at_zero() {
        let lines = [line(1, 1, Money::new(dec!(10.00))), line(2, 2, Money::new(dec!(10.00)))];
        let (gross, net) = tab_totals(&lines, Money::new(dec!(50.00))).unwrap();
        assert_eq!(gross, Money::new(dec!(30.00)));
        assert_eq!(net, Money::ZERO);
    }

    #[test]
    fn lines_are_grouped_under_their_orders() {
        let now = Utc::now();
        let order = |id| TableOrder {
            id,
            company_id: 1,
            table_number: 3,
            status: OrderStatus::Pending,
            total: Money::ZERO,
            customer_name: None,
            notes: None,
            created_at: now,
            updated_at: now,
        };
        let lines = vec![line(2, 1, Money::ZERO), line(1, 1, Money::ZERO), line(2, 3, Money::ZERO)];

        let details = attach_lines(vec![order(2), order(1), order(5)], lines);
        assert_eq!(details.len(), 3);
        assert_eq!(details[0].items.len(), 2);
        assert_eq!(details[1].items.len(), 1);
        assert!(details[2].items.is_empty());
    }
}
