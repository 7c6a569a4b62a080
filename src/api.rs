use crate::error::Result;
use crate::models::{
    Account, Employee, EmployeeInput, Expense, ExpenseFile, ExpenseInput, NewAccount, Upload,
    User, UserInput,
};

/// Every call the pages make against the backend. Pages only see this trait,
/// so they run unchanged against the HTTP client or an in-memory double.
pub trait Api: Send + Sync {
    fn list_users(&self) -> Result<Vec<User>>;
    fn create_user(&self, user: &UserInput) -> Result<User>;
    fn update_user(&self, id: i64, user: &UserInput) -> Result<User>;
    fn delete_user(&self, id: i64) -> Result<()>;

    fn list_accounts(&self) -> Result<Vec<Account>>;
    fn create_account(&self, account: &NewAccount) -> Result<Account>;

    fn list_expense_files(&self) -> Result<Vec<ExpenseFile>>;
    /// Success only; the stored record is picked up by the next list call.
    fn upload_expense_file(&self, upload: &Upload) -> Result<()>;
    /// Raw file bytes. A failed download keeps its body undecoded in
    /// `AppError::Server` so the caller can inspect it.
    fn download_expense_file(&self, id: i64) -> Result<Vec<u8>>;
    fn delete_expense_file(&self, id: i64) -> Result<()>;

    fn list_employees(&self) -> Result<Vec<Employee>>;
    fn create_employee(&self, employee: &EmployeeInput) -> Result<Employee>;
    fn update_employee(&self, id: i64, employee: &EmployeeInput) -> Result<Employee>;
    fn delete_employee(&self, id: i64) -> Result<()>;

    fn list_expenses(&self) -> Result<Vec<Expense>>;
    fn create_expense(&self, expense: &ExpenseInput) -> Result<Expense>;
    fn update_expense(&self, id: i64, expense: &ExpenseInput) -> Result<Expense>;
    fn delete_expense(&self, id: i64) -> Result<()>;
}
