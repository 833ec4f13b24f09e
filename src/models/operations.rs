// src/models/operations.rs

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::common::money::Money;
use crate::models::inventory::validate_money_amount;
use crate::models::sales::PaymentMethod;

// --- Enums ---

/// Estado de um pedido de mesa.
///
/// `pending → {accepted, cancelled} → preparing → ready → closed`.
/// `closed` e `cancelled` são terminais e ficam fora de toda agregação de conta aberta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Accepted,
    Preparing,
    Ready,
    Closed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Accepted,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Closed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Accepted => "accepted",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Closed => "closed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Closed | OrderStatus::Cancelled)
    }

    /// Transições aceitas por uma atualização manual de status.
    ///
    /// Entre estados abertos qualquer salto é permitido (a cozinha pode voltar
    /// um pedido de "pronto" para "preparando"). Terminais não mudam mais, e
    /// `closed` só é alcançado pelo fechamento da conta da mesa.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        next != OrderStatus::Closed
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StaffCallStatus {
    Pending,
    Attended,
}

// --- Structs de Operação ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TableOrder {
    pub id: i64,
    #[schema(ignore)]
    pub company_id: i64,
    #[schema(example = 4)]
    pub table_number: i64,
    pub status: OrderStatus,
    pub total: Money,
    pub customer_name: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub id: i64,
    #[schema(ignore)]
    pub company_id: i64,
    pub order_id: i64,
    pub product_id: i64,
    #[schema(example = 2)]
    pub quantity: i64,
    pub unit_price: Money,
    pub subtotal: Money,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TableOrderDetail {
    #[serde(flatten)]
    pub order: TableOrder,
    pub items: Vec<OrderLine>,
}

/// Resposta da criação de um pedido.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedOrder {
    pub order_id: i64,
    pub total: Money,
    pub status: OrderStatus,
}

/// Consolidação de todos os pedidos abertos de uma mesa.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TableSummary {
    pub table_number: i64,
    pub open_orders: usize,
    pub line_count: usize,
    pub total: Money,
    pub orders: Vec<TableOrderDetail>,
}

/// Resultado do fechamento da conta de uma mesa.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TabClosure {
    pub sale_id: i64,
    pub table_number: i64,
    pub net_total: Money,
    pub gross_total: Money,
    pub discount: Money,
    pub orders_closed_count: usize,
    pub line_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffCall {
    pub id: i64,
    #[schema(ignore)]
    pub company_id: i64,
    pub table_number: i64,
    pub status: StaffCallStatus,
    pub created_at: DateTime<Utc>,
    pub attended_at: Option<DateTime<Utc>>,
}

// --- Payloads ---

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderLinePayload {
    pub product_id: i64,
    #[validate(range(min = 1, max = 1_000_000, message = "A quantidade deve estar entre 1 e 1.000.000."))]
    pub quantity: i64,
    #[validate(custom(function = "validate_money_amount"))]
    pub unit_price: Money,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderPayload {
    #[validate(nested)]
    pub items: Vec<OrderLinePayload>,
    pub customer_name: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetStatusPayload {
    pub status: OrderStatus,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CloseTablePayload {
    #[serde(default)]
    #[validate(custom(function = "validate_money_amount"))]
    pub discount: Money,
    pub payment_method: PaymentMethod,
    pub customer_id: Option<i64>,
    pub employee_id: Option<i64>,
    #[serde(default, alias = "company_id", alias = "empresa_id")]
    pub company_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states_are_frozen() {
        for next in OrderStatus::ALL {
            assert!(!OrderStatus::Closed.can_transition_to(next));
            assert!(!OrderStatus::Cancelled.can_transition_to(next));
        }
    }

    #[test]
    fn open_states_move_freely_except_to_closed() {
        let open = [
            OrderStatus::Pending,
            OrderStatus::Accepted,
            OrderStatus::Preparing,
            OrderStatus::Ready,
        ];
        for from in open {
            for to in open {
                assert!(from.can_transition_to(to), "{from} -> {to}");
            }
            assert!(from.can_transition_to(OrderStatus::Cancelled));
            assert!(!from.can_transition_to(OrderStatus::Closed));
        }
    }

    #[test]
    fn status_round_trips_through_json_tag() {
        let parsed: OrderStatus = serde_json::from_str("\"preparing\"").unwrap();
        assert_eq!(parsed, OrderStatus::Preparing);
        assert_eq!(parsed.to_string(), "preparing");
    }
}
