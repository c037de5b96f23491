/// The connected employee.
#[derive(Debug, Clone)]
pub struct User {
    pub email: String,
}

impl User {
    pub fn employee(email: impl Into<String>) -> Self {
        Self { email: email.into() }
    }
}
