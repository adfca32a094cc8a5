//! Fixed-point currency helpers.

use rust_decimal::Decimal;

/// Smallest amount the payment gateway will transact (one currency unit).
pub const MIN_TRANSACTION_AMOUNT: Decimal = Decimal::ONE;

/// Largest amount an order can hold: the `NUMERIC(10, 2)` column maximum,
/// 99,999,999.99.
pub const MAX_TRANSACTION_AMOUNT: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

/// Currency amounts carry at most two fractional digits (cents).
pub const CURRENCY_SCALE: u32 = 2;

/// Whether `amount` can be charged: within the transaction bounds and no
/// sub-cent digits.
pub fn is_transactable(amount: Decimal) -> bool {
    (MIN_TRANSACTION_AMOUNT..=MAX_TRANSACTION_AMOUNT).contains(&amount)
        && amount.normalize().scale() <= CURRENCY_SCALE
}
