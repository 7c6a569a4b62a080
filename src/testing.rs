//! In-memory backend used by page tests. Records every call by name.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::api::Api;
use crate::error::{AppError, Result, ServerError};
use crate::models::{
    Account, Employee, EmployeeInput, Expense, ExpenseFile, ExpenseInput, NewAccount, Upload,
    User, UserInput,
};

#[derive(Default)]
struct State {
    next_id: i64,
    users: Vec<User>,
    accounts: Vec<Account>,
    files: Vec<ExpenseFile>,
    blobs: HashMap<i64, Vec<u8>>,
    employees: Vec<Employee>,
    expenses: Vec<Expense>,
    uploads: Vec<Upload>,
}

#[derive(Default)]
pub struct FakeApi {
    state: Mutex<State>,
    calls: Mutex<Vec<String>>,
    failures: Mutex<HashMap<String, (u16, String)>>,
}

impl FakeApi {
    pub fn new() -> Self {
        let api = Self::default();
        api.state.lock().unwrap().next_id = 100;
        api
    }

    /// Make every call named `call` fail with `status` and a raw `body`.
    pub fn fail(&self, call: &str, status: u16, body: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(call.to_string(), (status, body.to_string()));
    }

    pub fn heal(&self, call: &str) {
        self.failures.lock().unwrap().remove(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == call).count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn uploads(&self) -> Vec<Upload> {
        self.state.lock().unwrap().uploads.clone()
    }

    pub fn with_user(self, id: i64, name: &str, email: &str) -> Self {
        self.state.lock().unwrap().users.push(User {
            id,
            name: name.into(),
            email: email.into(),
            created_at: Some("2024-03-05T14:22:07.123".into()),
        });
        self
    }

    pub fn with_account(self, id: i64, name: &str, kind: &str) -> Self {
        self.state.lock().unwrap().accounts.push(Account {
            id,
            account_name: name.into(),
            account_type: kind.into(),
            created_at: None,
        });
        self
    }

    /// Registers a file record; `bytes = None` leaves it without stored content.
    pub fn with_file(self, id: i64, name: &str, bytes: Option<&[u8]>) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.files.push(ExpenseFile {
                id,
                file_name: Some(name.into()),
                file_type: None,
                user_id: Some(1),
                account_id: Some(1),
                user_name: Some("Alice".into()),
                account_name: Some("HDFC Savings".into()),
                uploaded_at: Some("2024-03-05T14:22:07.123Z".into()),
            });
            if let Some(b) = bytes {
                state.blobs.insert(id, b.to_vec());
            }
        }
        self
    }

    pub fn with_employee(self, id: i64, first: &str, last: &str) -> Self {
        self.state.lock().unwrap().employees.push(Employee {
            id,
            first_name: first.into(),
            last_name: last.into(),
            email: format!("{}@example.com", first.to_lowercase()),
            department: "Finance".into(),
            created_at: None,
        });
        self
    }

    pub fn with_expense(self, id: i64, title: &str, amount: f64) -> Self {
        self.state.lock().unwrap().expenses.push(Expense {
            id,
            title: title.into(),
            amount: Some(amount),
            category: "Travel".into(),
            expense_date: Some("2024-02-01".into()),
            created_at: None,
        });
        self
    }

    /// Remove a record behind the client's back.
    pub fn drop_file_server_side(&self, id: i64) {
        self.state.lock().unwrap().files.retain(|f| f.id != id);
    }

    fn record(&self, call: &str) -> Result<()> {
        self.calls.lock().unwrap().push(call.to_string());
        match self.failures.lock().unwrap().get(call) {
            Some((status, body)) => Err(AppError::Server(ServerError {
                status: *status,
                body: body.as_bytes().to_vec(),
            })),
            None => Ok(()),
        }
    }

    fn next_id(state: &mut State) -> i64 {
        state.next_id += 1;
        state.next_id
    }
}

fn not_found() -> AppError {
    AppError::Server(ServerError {
        status: 404,
        body: br#"{"message":"Not found"}"#.to_vec(),
    })
}

impl Api for FakeApi {
    fn list_users(&self) -> Result<Vec<User>> {
        self.record("list_users")?;
        Ok(self.state.lock().unwrap().users.clone())
    }

    fn create_user(&self, user: &UserInput) -> Result<User> {
        self.record("create_user")?;
        let mut state = self.state.lock().unwrap();
        let created = User {
            id: Self::next_id(&mut state),
            name: user.name.clone(),
            email: user.email.clone(),
            created_at: Some("2024-04-01T09:00:00".into()),
        };
        state.users.push(created.clone());
        Ok(created)
    }

    fn update_user(&self, id: i64, user: &UserInput) -> Result<User> {
        self.record("update_user")?;
        let mut state = self.state.lock().unwrap();
        let existing = state.users.iter_mut().find(|u| u.id == id).ok_or_else(not_found)?;
        existing.name = user.name.clone();
        existing.email = user.email.clone();
        Ok(existing.clone())
    }

    fn delete_user(&self, id: i64) -> Result<()> {
        self.record("delete_user")?;
        self.state.lock().unwrap().users.retain(|u| u.id != id);
        Ok(())
    }

    fn list_accounts(&self) -> Result<Vec<Account>> {
        self.record("list_accounts")?;
        Ok(self.state.lock().unwrap().accounts.clone())
    }

    fn create_account(&self, account: &NewAccount) -> Result<Account> {
        self.record("create_account")?;
        let mut state = self.state.lock().unwrap();
        let created = Account {
            id: Self::next_id(&mut state),
            account_name: account.account_name.clone(),
            account_type: account.account_type.label().to_string(),
            created_at: None,
        };
        state.accounts.push(created.clone());
        Ok(created)
    }

    fn list_expense_files(&self) -> Result<Vec<ExpenseFile>> {
        self.record("list_expense_files")?;
        Ok(self.state.lock().unwrap().files.clone())
    }

    fn upload_expense_file(&self, upload: &Upload) -> Result<()> {
        self.record("upload_expense_file")?;
        let mut state = self.state.lock().unwrap();
        let id = Self::next_id(&mut state);
        let user_name = state
            .users
            .iter()
            .find(|u| u.id == upload.user_id)
            .map(|u| u.name.clone());
        let account_name = state
            .accounts
            .iter()
            .find(|a| a.id == upload.account_id)
            .map(|a| a.account_name.clone());
        state.files.push(ExpenseFile {
            id,
            file_name: Some(upload.file_name.clone()),
            file_type: None,
            user_id: Some(upload.user_id),
            account_id: Some(upload.account_id),
            user_name,
            account_name,
            uploaded_at: Some("2024-04-01T10:00:00.000Z".into()),
        });
        state.blobs.insert(id, upload.bytes.clone());
        state.uploads.push(upload.clone());
        Ok(())
    }

    fn download_expense_file(&self, id: i64) -> Result<Vec<u8>> {
        self.record("download_expense_file")?;
        let state = self.state.lock().unwrap();
        if !state.files.iter().any(|f| f.id == id) {
            return Err(not_found());
        }
        state.blobs.get(&id).cloned().ok_or_else(|| {
            AppError::Server(ServerError {
                status: 404,
                body: br#"{"code":"FILE_MISSING","message":"File not found on disk"}"#.to_vec(),
            })
        })
    }

    fn delete_expense_file(&self, id: i64) -> Result<()> {
        self.record("delete_expense_file")?;
        let mut state = self.state.lock().unwrap();
        state.files.retain(|f| f.id != id);
        state.blobs.remove(&id);
        Ok(())
    }

    fn list_employees(&self) -> Result<Vec<Employee>> {
        self.record("list_employees")?;
        Ok(self.state.lock().unwrap().employees.clone())
    }

    fn create_employee(&self, employee: &EmployeeInput) -> Result<Employee> {
        self.record("create_employee")?;
        let mut state = self.state.lock().unwrap();
        let created = Employee {
            id: Self::next_id(&mut state),
            first_name: employee.first_name.clone(),
            last_name: employee.last_name.clone(),
            email: employee.email.clone(),
            department: employee.department.clone(),
            created_at: None,
        };
        state.employees.push(created.clone());
        Ok(created)
    }

    fn update_employee(&self, id: i64, employee: &EmployeeInput) -> Result<Employee> {
        self.record("update_employee")?;
        let mut state = self.state.lock().unwrap();
        let existing = state
            .employees
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(not_found)?;
        existing.first_name = employee.first_name.clone();
        existing.last_name = employee.last_name.clone();
        existing.email = employee.email.clone();
        existing.department = employee.department.clone();
        Ok(existing.clone())
    }

    fn delete_employee(&self, id: i64) -> Result<()> {
        self.record("delete_employee")?;
        self.state.lock().unwrap().employees.retain(|e| e.id != id);
        Ok(())
    }

    fn list_expenses(&self) -> Result<Vec<Expense>> {
        self.record("list_expenses")?;
        Ok(self.state.lock().unwrap().expenses.clone())
    }

    fn create_expense(&self, expense: &ExpenseInput) -> Result<Expense> {
        self.record("create_expense")?;
        let mut state = self.state.lock().unwrap();
        let created = Expense {
            id: Self::next_id(&mut state),
            title: expense.title.clone(),
            amount: Some(expense.amount),
            category: expense.category.clone(),
            expense_date: Some(expense.expense_date.clone()),
            created_at: None,
        };
        state.expenses.push(created.clone());
        Ok(created)
    }

    fn update_expense(&self, id: i64, expense: &ExpenseInput) -> Result<Expense> {
        self.record("update_expense")?;
        let mut state = self.state.lock().unwrap();
        let existing = state
            .expenses
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(not_found)?;
        existing.title = expense.title.clone();
        existing.amount = Some(expense.amount);
        existing.category = expense.category.clone();
        existing.expense_date = Some(expense.expense_date.clone());
        Ok(existing.clone())
    }

    fn delete_expense(&self, id: i64) -> Result<()> {
        self.record("delete_expense")?;
        self.state.lock().unwrap().expenses.retain(|e| e.id != id);
        Ok(())
    }
}
