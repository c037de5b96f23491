use tracing::{debug, warn};

use crate::format::{format_date, format_status};
use crate::models::{Bill, DisplayBill};
use crate::routes::Route;
use crate::store::{Store, StoreError};

/// Receipt shown in the preview modal.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptPreview {
    pub file_url: String,
    pub file_name: String,
}

/// Employee bills page logic.
pub struct Bills<'a> {
    store: &'a dyn Store,
}

impl<'a> Bills<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Fetch bills and map them for display.
    pub async fn get_bills(&self) -> Result<Vec<DisplayBill>, StoreError> {
        let bills = self.store.list().await.map_err(|err| {
            warn!(status = err.status(), "listing bills failed");
            err
        })?;
        debug!(count = bills.len(), "fetched bills");

        Ok(bills.into_iter().map(to_display).collect())
    }

    pub fn handle_click_icon_eye(&self, bill: &DisplayBill) -> ReceiptPreview {
        ReceiptPreview {
            file_url: bill.bill.file_url.clone(),
            file_name: bill.bill.file_name.clone(),
        }
    }

    pub fn handle_click_new_bill(&self) -> Route {
        Route::NewBill
    }
}

/// Format the date and translate the status. A date that doesn't parse is kept raw.
pub fn to_display(bill: Bill) -> DisplayBill {
    let formatted_date = match format_date(&bill.date) {
        Ok(date) => date,
        Err(err) => {
            debug!(id = %bill.id, date = %bill.date, error = %err, "keeping unformattable date");
            bill.date.clone()
        }
    };
    let status_label = format_status(&bill.status);

    DisplayBill {
        bill,
        formatted_date,
        status_label,
    }
}

/// Latest first, comparing the raw date strings.
pub fn sort_anti_chrono(bills: &mut [DisplayBill]) {
    bills.sort_by(|a, b| b.date().cmp(a.date()));
}
