use std::time::Duration;

use reqwest::blocking::{multipart, Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::Api;
use crate::error::{AppError, Result, ServerError};
use crate::models::{
    Account, Employee, EmployeeInput, Expense, ExpenseFile, ExpenseInput, NewAccount, Upload,
    User, UserInput,
};

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Blocking JSON/multipart client rooted at the backend's API base path.
pub struct HttpClient {
    base_url: String,
    http: Client,
}

impl HttpClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs.max(1)))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn send(&self, method: &str, path: &str, request: RequestBuilder) -> Result<Response> {
        tracing::debug!("{method} {}", self.url(path));
        let response = request.send()?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.bytes().map(|b| b.to_vec()).unwrap_or_default();
        let err = ServerError {
            status: status.as_u16(),
            body,
        };
        tracing::warn!("{method} {path} failed: {err}");
        Err(AppError::Server(err))
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send("GET", path, self.http.get(self.url(path)))?;
        Ok(response.json()?)
    }

    fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let response = self.send("POST", path, self.http.post(self.url(path)).json(body))?;
        Ok(response.json()?)
    }

    fn put_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let response = self.send("PUT", path, self.http.put(self.url(path)).json(body))?;
        Ok(response.json()?)
    }

    fn delete(&self, path: &str) -> Result<()> {
        self.send("DELETE", path, self.http.delete(self.url(path)))?;
        Ok(())
    }
}

fn upload_mime(file_name: &str) -> &'static str {
    if file_name.to_lowercase().ends_with(".xlsx") {
        XLSX_MIME
    } else {
        "text/csv"
    }
}

impl Api for HttpClient {
    fn list_users(&self) -> Result<Vec<User>> {
        self.get_json("/users")
    }

    fn create_user(&self, user: &UserInput) -> Result<User> {
        self.post_json("/users", user)
    }

    fn update_user(&self, id: i64, user: &UserInput) -> Result<User> {
        self.put_json(&format!("/users/{id}"), user)
    }

    fn delete_user(&self, id: i64) -> Result<()> {
        self.delete(&format!("/users/{id}"))
    }

    fn list_accounts(&self) -> Result<Vec<Account>> {
        self.get_json("/accounts")
    }

    fn create_account(&self, account: &NewAccount) -> Result<Account> {
        self.post_json("/accounts", account)
    }

    fn list_expense_files(&self) -> Result<Vec<ExpenseFile>> {
        self.get_json("/expense-files")
    }

    fn upload_expense_file(&self, upload: &Upload) -> Result<()> {
        let path = "/expense-files/upload";
        let part = multipart::Part::bytes(upload.bytes.clone())
            .file_name(upload.file_name.clone())
            .mime_str(upload_mime(&upload.file_name))?;
        let form = multipart::Form::new()
            .part("file", part)
            .text("userId", upload.user_id.to_string())
            .text("accountId", upload.account_id.to_string());
        self.send("POST", path, self.http.post(self.url(path)).multipart(form))?;
        Ok(())
    }

    fn download_expense_file(&self, id: i64) -> Result<Vec<u8>> {
        let path = format!("/expense-files/{id}/download");
        let response = self.send("GET", &path, self.http.get(self.url(&path)))?;
        Ok(response.bytes()?.to_vec())
    }

    fn delete_expense_file(&self, id: i64) -> Result<()> {
        self.delete(&format!("/expense-files/{id}"))
    }

    fn list_employees(&self) -> Result<Vec<Employee>> {
        self.get_json("/employees")
    }

    fn create_employee(&self, employee: &EmployeeInput) -> Result<Employee> {
        self.post_json("/employees", employee)
    }

    fn update_employee(&self, id: i64, employee: &EmployeeInput) -> Result<Employee> {
        self.put_json(&format!("/employees/{id}"), employee)
    }

    fn delete_employee(&self, id: i64) -> Result<()> {
        self.delete(&format!("/employees/{id}"))
    }

    fn list_expenses(&self) -> Result<Vec<Expense>> {
        self.get_json("/expenses")
    }

    fn create_expense(&self, expense: &ExpenseInput) -> Result<Expense> {
        self.post_json("/expenses", expense)
    }

    fn update_expense(&self, id: i64, expense: &ExpenseInput) -> Result<Expense> {
        self.put_json(&format!("/expenses/{id}"), expense)
    }

    fn delete_expense(&self, id: i64) -> Result<()> {
        self.delete(&format!("/expenses/{id}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalised() {
        let client = HttpClient::new("http://localhost:8080/api/", 5).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/api");
        assert_eq!(client.url("/users"), "http://localhost:8080/api/users");
    }

    /// Answer one multipart request with a canned response. Returns the raw
    /// request text once served.
    fn serve_once(response: String) -> (String, std::thread::JoinHandle<String>) {
        use std::io::{Read, Write};

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}/api", listener.local_addr().unwrap());
        let handle = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut seen = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = stream.read(&mut buf).unwrap();
                seen.extend_from_slice(&buf[..n]);
                if n == 0 || seen.ends_with(b"--\r\n") {
                    break;
                }
            }
            stream.write_all(response.as_bytes()).unwrap();
            String::from_utf8_lossy(&seen).to_string()
        });
        (base, handle)
    }

    fn upload() -> Upload {
        Upload {
            file_name: "march.csv".into(),
            bytes: b"date,amount\n".to_vec(),
            user_id: 3,
            account_id: 7,
        }
    }

    #[test]
    fn test_upload_ignores_unexpected_success_body() {
        let (base, server) = serve_once(
            "HTTP/1.1 201 Created\r\nContent-Type: text/plain\r\nContent-Length: 6\r\nConnection: close\r\n\r\nstored"
                .to_string(),
        );
        let client = HttpClient::new(&base, 5).unwrap();
        client.upload_expense_file(&upload()).unwrap();

        let request = server.join().unwrap();
        assert!(request.starts_with("POST /api/expense-files/upload"));
        assert!(request.contains("name=\"userId\""));
        assert!(request.contains("filename=\"march.csv\""));
    }

    #[test]
    fn test_upload_error_keeps_server_body() {
        let body = r#"{"message":"Account not found"}"#;
        let response = format!(
            "HTTP/1.1 400 Bad Request\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let (base, server) = serve_once(response);
        let client = HttpClient::new(&base, 5).unwrap();
        let err = client.upload_expense_file(&upload()).unwrap_err();
        server.join().unwrap();
        assert_eq!(err.notice_text("Upload failed"), "Account not found");
    }

    #[test]
    fn test_upload_mime_by_extension() {
        assert_eq!(upload_mime("march.csv"), "text/csv");
        assert_eq!(upload_mime("Q1.XLSX"), XLSX_MIME);
    }
}
