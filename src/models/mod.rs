mod bill;
mod bill_status;
mod expense_type;
mod user;

pub use bill::{Bill, DisplayBill};
pub use bill_status::BillStatus;
pub use expense_type::ExpenseType;
pub use user::User;
