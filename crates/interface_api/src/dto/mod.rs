//! Request and response bodies

pub mod bills;
pub mod reports;

use core_kernel::Money;
use rust_decimal::Decimal;

/// Amount with exactly the currency's decimal places, e.g. `90.00`
pub(crate) fn display_amount(money: &Money) -> Decimal {
    let mut amount = money.round_to_currency().amount();
    amount.rescale(money.currency().decimal_places());
    amount
}
