use rust_decimal::Decimal;

/// A mid rate for one currency: `amount_in_target = amount_in_base / mid`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rate {
    pub currency: String,
    pub mid: Decimal,
}
