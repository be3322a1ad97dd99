//! Tax-aware asset withdrawals

/// Gross withdrawal whose after-tax amount equals `net`
///
/// Returns 0 for a non-positive need or an unusable tax rate.
pub fn gross_up(net: f64, tax_rate: f64) -> f64 {
    if net <= 0.0 || !net.is_finite() || !(0.0..1.0).contains(&tax_rate) {
        return 0.0;
    }
    net / (1.0 - tax_rate)
}

/// Outcome of drawing on investable assets
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Withdrawal {
    /// Amount taken out of assets
    pub gross: f64,
    /// Tax due on the gross amount
    pub tax: f64,
    /// After-tax amount available to cover the need
    pub covered: f64,
}

/// Withdraw enough (grossed up for tax) to cover `need`, limited by `available`
pub fn withdraw_from_assets(available: f64, need: f64, tax_rate: f64) -> Withdrawal {
    let wanted = gross_up(need, tax_rate);
    if wanted <= 0.0 || available <= 0.0 {
        return Withdrawal::default();
    }

    let gross = wanted.min(available);
    let tax = gross * tax_rate;
    let covered = if gross < wanted { gross - tax } else { need };

    Withdrawal { gross, tax, covered }
}
