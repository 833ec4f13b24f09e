// src/common/money.rs

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::sqlite::{Sqlite, SqliteArgumentValue, SqliteTypeInfo, SqliteValueRef};
use sqlx::{Decode, Encode, Type};
use utoipa::ToSchema;

/// Valor monetário em reais.
///
/// Na API trafega como `Decimal`; no SQLite é gravado como centavos (`INTEGER`),
/// o que mantém somas e subtrações exatas dentro das próprias consultas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = f64, example = 12.5)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Maior valor aceito numa entrada da API (R$ 10.000.000,00).
    pub const MAX_INPUT: Money = Money(Decimal::from_parts(1_000_000_000, 0, 0, false, 2));

    pub fn new(amount: Decimal) -> Self {
        Money(amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
    }

    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, 2))
    }

    pub fn cents(&self) -> Result<i64, BoxDynError> {
        (self.0 * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .ok_or_else(|| format!("valor monetário fora do intervalo: {}", self.0).into())
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Soma que falha em vez de estourar; o resultado precisa caber em centavos `i64`.
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money).filter(Money::fits_storage)
    }

    pub fn checked_mul(self, quantity: i64) -> Option<Money> {
        self.0
            .checked_mul(Decimal::from(quantity))
            .map(Money)
            .filter(Money::fits_storage)
    }

    pub fn checked_sum<I: IntoIterator<Item = Money>>(values: I) -> Option<Money> {
        values.into_iter().try_fold(Money::ZERO, Money::checked_add)
    }

    fn fits_storage(&self) -> bool {
        self.cents().is_ok()
    }

    /// Subtrai um desconto sem deixar o resultado abaixo de zero.
    pub fn saturating_discount(self, discount: Money) -> Money {
        let net = self - discount;
        if net.is_negative() { Money::ZERO } else { net }
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Money::new(value)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R$ {:.2}", self.0)
    }
}

impl Add for Money {
    type Output = Money;
    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;
    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl Mul<i64> for Money {
    type Output = Money;
    fn mul(self, quantity: i64) -> Money {
        Money(self.0 * Decimal::from(quantity))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

// --- Integração com o SQLite (centavos) ---

impl Type<Sqlite> for Money {
    fn type_info() -> SqliteTypeInfo {
        <i64 as Type<Sqlite>>::type_info()
    }

    fn compatible(ty: &SqliteTypeInfo) -> bool {
        <i64 as Type<Sqlite>>::compatible(ty)
    }
}

impl<'q> Encode<'q, Sqlite> for Money {
    fn encode_by_ref(&self, buf: &mut Vec<SqliteArgumentValue<'q>>) -> Result<IsNull, BoxDynError> {
        let cents = self.cents()?;
        <i64 as Encode<'q, Sqlite>>::encode_by_ref(&cents, buf)
    }
}

impl<'r> Decode<'r, Sqlite> for Money {
    fn decode(value: SqliteValueRef<'r>) -> Result<Self, BoxDynError> {
        let cents = <i64 as Decode<'r, Sqlite>>::decode(value)?;
        Ok(Money::from_cents(cents))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn brl(s: &str) -> Money {
        Money::new(Decimal::from_str(s).unwrap())
    }

    #[test]
    fn cents_round_half_away_from_zero() {
        assert_eq!(brl("10.005").cents().unwrap(), 1001);
        assert_eq!(Money::from_cents(1999), brl("19.99"));
    }

    #[test]
    fn discount_never_goes_below_zero() {
        assert_eq!(brl("30.00").saturating_discount(brl("50.00")), Money::ZERO);
        assert_eq!(brl("30.00").saturating_discount(brl("7.50")), brl("22.50"));
    }

    #[test]
    fn checked_arithmetic_refuses_overflow() {
        let huge = Money::new(Decimal::MAX);
        assert_eq!(huge.checked_mul(1_000_000), None);
        assert_eq!(huge.checked_add(huge), None);
        // Cabe em Decimal mas não em centavos i64.
        assert_eq!(Money::new(Decimal::from(100_000_000_000_000_000_i64)).checked_mul(1), None);

        assert_eq!(brl("4.50").checked_mul(3), Some(brl("13.50")));
        assert_eq!(Money::checked_sum([brl("1.10"), brl("2.20")]), Some(brl("3.30")));
        assert_eq!(Money::MAX_INPUT, Money::from_cents(1_000_000_000));
    }

    #[test]
    fn line_subtotals_sum() {
        let lines = [brl("4.50") * 2, brl("10.00") * 1];
        assert_eq!(lines.iter().sum::<Money>(), brl("19.00"));
    }
}
