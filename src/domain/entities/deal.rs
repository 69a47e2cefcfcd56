use crate::shared::utils::crm_time::parse_crm_timestamp;
use serde::{Deserialize, Serialize};

/// Installation project sold to a contact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    pub id: String,
    pub deal_id: String,
    pub name: String,
    pub stage: String,
    /// Display amount, e.g. `12 345 €`
    pub amount: String,
    pub close_date: Option<String>,
    pub created_date: Option<String>,
    pub pipeline: String,
    pub deal_type: Option<String>,
    pub address: String,
    pub postcode: String,
    pub installation_done_date: Option<String>,
    pub products: Vec<String>,
    pub is_quote_signed: bool,
    pub is_closed_lost: bool,
}

impl Deal {
    /// Only signed, still-open deals can carry a new ticket
    pub fn is_eligible(&self) -> bool {
        self.is_quote_signed && !self.is_closed_lost
    }
}

/// Raw CRM flag: `is_quote_signed` is `"1"` when signed
pub fn quote_signed_flag(raw: Option<&str>) -> bool {
    raw.map(str::trim) == Some("1")
}

/// Raw CRM flag: `hs_is_closed_lost` is `"true"` when lost
pub fn closed_lost_flag(raw: Option<&str>) -> bool {
    raw.map(|v| v.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Split the CRM multi-select `products` value
pub fn split_products(raw: Option<&str>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(';')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Format a raw CRM amount the way French locales print euros.
///
/// Thousands are grouped with a narrow no-break space, the decimal separator
/// is a comma and at most three fractional digits are kept.
pub fn format_amount_eur(raw: Option<&str>) -> String {
    let Some(value) = raw
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite())
    else {
        return "N/A".to_string();
    };

    let negative = value < 0.0;
    let rendered = format!("{:.3}", value.abs());
    let (int_part, frac_part) = rendered.split_once('.').unwrap_or((&rendered, ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::new();
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('\u{202F}');
        }
        grouped.push(digit);
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if !frac_part.is_empty() {
        out.push(',');
        out.push_str(frac_part);
    }
    out.push_str(" €");
    out
}

/// Drop ineligible deals and order the rest by installation date, most recent first.
///
/// Deals without a parseable installation date are placed last; the sort is
/// stable so ties keep CRM order.
pub fn eligible_by_installation_date(deals: Vec<Deal>) -> Vec<Deal> {
    let mut eligible: Vec<Deal> = deals.into_iter().filter(Deal::is_eligible).collect();
    eligible.sort_by(|a, b| {
        let a = a
            .installation_done_date
            .as_deref()
            .and_then(parse_crm_timestamp);
        let b = b
            .installation_done_date
            .as_deref()
            .and_then(parse_crm_timestamp);
        match (a, b) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }
    });
    eligible
}
