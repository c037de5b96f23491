/// Pages of the employee area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Bills,
    NewBill,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Bills => "#employee/bills",
            Route::NewBill => "#employee/bill/new",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Bills => "Mes notes de frais",
            Route::NewBill => "Envoyer une note de frais",
        }
    }
}
