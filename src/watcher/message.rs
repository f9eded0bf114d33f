//! Chat message texts.

use crate::chain::SweepReceipt;
use crate::error::TransferError;
use crate::keys::SuiAddress;

use super::WatchedAddress;

/// Fraction digits shown in messages.
const DISPLAY_DIGITS: u32 = 4;

/// Unit amounts are shown in, e.g. SUI with 9 decimals over MIST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denomination {
    pub symbol: String,
    pub decimals: u8,
}

impl Denomination {
    pub fn sui() -> Self {
        Self {
            symbol: "SUI".to_string(),
            decimals: 9,
        }
    }

    /// `2500000000` → `2.5000 SUI`
    pub fn format(&self, raw: u128) -> String {
        format!("{} {}", format_units(raw, self.decimals), self.symbol)
    }
}

/// Render a raw amount with four fraction digits, rounding half up.
pub fn format_units(raw: u128, decimals: u8) -> String {
    let unit = 10u128.pow(u32::from(decimals));
    let display = 10u128.pow(DISPLAY_DIGITS);
    let scaled = raw.saturating_mul(display).saturating_add(unit / 2) / unit;
    format!(
        "{}.{:0width$}",
        scaled / display,
        scaled % display,
        width = DISPLAY_DIGITS as usize
    )
}

/// Signed difference, e.g. `+0.5000` or `-1.2500`.
pub fn format_delta(previous: u128, current: u128, decimals: u8) -> String {
    if current >= previous {
        format!("+{}", format_units(current - previous, decimals))
    } else {
        format!("-{}", format_units(previous - current, decimals))
    }
}

pub fn balance_changed(
    wallet: &WatchedAddress,
    previous: u128,
    current: u128,
    denom: &Denomination,
) -> String {
    let arrow = if current > previous { "🟢" } else { "🔴" };
    let delta = format_delta(previous, current, denom.decimals);
    let old = format_units(previous, denom.decimals);
    let new = format_units(current, denom.decimals);
    format!(
        "🚨 {name} balance changed\n\
         {arrow} {delta} {symbol}\n\
         💼 {name}: {old} → {new} {symbol}",
        name = wallet.name,
        symbol = denom.symbol,
    )
}

/// Amount and digests come from the receipt, i.e. what actually moved.
pub fn sweep_succeeded(
    wallet: &WatchedAddress,
    destination: &SuiAddress,
    receipt: &SweepReceipt,
    denom: &Denomination,
) -> String {
    let mut text = format!(
        "💸 Swept {} from {} to {}\n🔗 Tx: {}",
        denom.format(receipt.amount),
        wallet.name,
        destination.short(),
        receipt.digests.join(", ")
    );
    if let Some(reason) = &receipt.incomplete {
        text.push_str(&format!("\n⚠️ Sweep incomplete: {}", reason));
    }
    text
}

pub fn sweep_failed(wallet: &WatchedAddress, error: &TransferError) -> String {
    format!("⚠️ Sweep from {} failed: {}", wallet.name, error)
}

/// One line of the `/balance` reply.
pub fn balance_line(name: &str, balance: Option<u128>, denom: &Denomination) -> String {
    match balance {
        Some(raw) => format!("💰 {}: {}", name, denom.format(raw)),
        None => format!("❔ {}: unavailable", name),
    }
}
