use anyhow::{anyhow, bail, Result};
use serde::Deserialize;
use std::str::FromStr;

use crate::data::datatable::{display_text, DataValue};

/// Named cell formats that fixture files can attach to a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum ColumnFormat {
    Plain,
    /// Number followed by a percent sign
    Percent,
    /// Fixed number of decimal places
    Decimal(u8),
    /// Booleans as Yes/No
    YesNo,
    Upper,
}

impl ColumnFormat {
    pub fn apply(self, value: Option<&DataValue>) -> String {
        match (self, value) {
            (ColumnFormat::Plain, v) => display_text(v),
            (ColumnFormat::Percent, Some(v)) if v.is_numeric() => format!("{}%", v),
            (ColumnFormat::Decimal(places), Some(v)) => match v.as_f64() {
                Some(n) => format!("{:.*}", places as usize, n),
                None => v.to_string(),
            },
            (ColumnFormat::YesNo, Some(DataValue::Boolean(b))) => {
                let text = if *b { "Yes" } else { "No" };
                text.to_string()
            }
            (ColumnFormat::Upper, v) => display_text(v).to_uppercase(),
            (_, v) => display_text(v),
        }
    }
}

impl FromStr for ColumnFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        if let Some(places) = lower.strip_prefix("decimal:") {
            let places: u8 = places
                .parse()
                .map_err(|_| anyhow!("Invalid decimal places in format '{}'", s))?;
            return Ok(ColumnFormat::Decimal(places));
        }

        match lower.as_str() {
            "plain" | "" => Ok(ColumnFormat::Plain),
            "percent" => Ok(ColumnFormat::Percent),
            "decimal" => Ok(ColumnFormat::Decimal(2)),
            "yes_no" => Ok(ColumnFormat::YesNo),
            "upper" => Ok(ColumnFormat::Upper),
            _ => bail!("Unknown column format '{}'", s),
        }
    }
}

impl TryFrom<String> for ColumnFormat {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}
