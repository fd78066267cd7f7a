use std::fmt::Write;

use pay_core::{Category, PayCalculationState, PayPeriod, PeriodBreakdown, TaxBreakdown};
use rust_decimal::Decimal;

const LABEL_WIDTH: usize = 22;
const AMOUNT_WIDTH: usize = 14;

/// Copy of `state` with every breakdown rounded to `decimal_places`.
pub fn rounded_state(
    state: &PayCalculationState,
    decimal_places: u32,
) -> PayCalculationState {
    let round = |b: &PeriodBreakdown| b.rounded(decimal_places);
    PayCalculationState {
        gross_income: round(&state.gross_income),
        taxes: TaxBreakdown {
            social_security: round(&state.taxes.social_security),
            medicare: round(&state.taxes.medicare),
            federal: round(&state.taxes.federal),
        },
        total_taxes: round(&state.total_taxes),
        net_income: round(&state.net_income),
        ..state.clone()
    }
}

/// Formats `amount` with exactly `decimal_places` digits after the point.
pub fn format_amount(
    amount: Decimal,
    decimal_places: u32,
) -> String {
    format!("{:.*}", decimal_places as usize, amount)
}

/// Renders the breakdown as a fixed-width table, preceded by any message.
pub fn render_table(
    state: &PayCalculationState,
    decimal_places: u32,
) -> String {
    let state = rounded_state(state, decimal_places);
    let mut out = String::new();

    for message in [&state.input_error, &state.error_message] {
        if !message.is_empty() {
            let _ = writeln!(out, "{message}");
        }
    }

    let _ = write!(out, "{:<LABEL_WIDTH$}", "");
    for period in PayPeriod::ALL {
        let _ = write!(out, "{:>AMOUNT_WIDTH$}", period.as_str());
    }
    out.push('\n');

    for category in Category::ALL {
        let breakdown = state.breakdown(category);
        let _ = write!(out, "{:<LABEL_WIDTH$}", category.label());
        for period in PayPeriod::ALL {
            let amount = format_amount(breakdown.get(period), decimal_places);
            let _ = write!(out, "{amount:>AMOUNT_WIDTH$}");
        }
        out.push('\n');
    }

    out
}

/// Renders the state as pretty-printed JSON.
pub fn render_json(
    state: &PayCalculationState,
    decimal_places: u32,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&rounded_state(state, decimal_places))
}
