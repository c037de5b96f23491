use serde::{Deserialize, Serialize};

/// An expense report as stored, fields untouched.
#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Bill {
    pub id: String,
    pub email: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub bill_type: String,
    pub name: String,
    pub amount: i32,
    pub date: String,
    pub vat: String,
    pub pct: i32,
    pub commentary: String,
    pub file_url: String,
    pub file_name: String,
    pub status: String,
    pub comment_admin: Option<String>,
}

/// A bill ready for the bills table.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayBill {
    pub bill: Bill,
    pub formatted_date: String,
    pub status_label: String,
}

impl DisplayBill {
    /// Raw date, used for ordering.
    pub fn date(&self) -> &str {
        &self.bill.date
    }
}
