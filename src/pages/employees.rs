use crate::api::Api;
use crate::error::Result;
use crate::models::{Employee, EmployeeInput};
use crate::pages::crud::{check_email, required, Resource};

pub struct Employees;

impl Resource for Employees {
    type Item = Employee;
    type Payload = EmployeeInput;

    const SINGULAR: &'static str = "employee";
    const PLURAL: &'static str = "employees";
    const HEADERS: &'static [&'static str] = &["ID", "First Name", "Last Name", "Email", "Department"];
    const FIELDS: &'static [&'static str] = &["First Name", "Last Name", "Email", "Department"];

    fn id(item: &Employee) -> i64 {
        item.id
    }

    fn row(item: &Employee) -> Vec<String> {
        vec![
            item.id.to_string(),
            item.first_name.clone(),
            item.last_name.clone(),
            item.email.clone(),
            item.department.clone(),
        ]
    }

    fn label(item: &Employee) -> String {
        format!("{} {}", item.first_name, item.last_name)
    }

    fn form_values(item: &Employee) -> Vec<String> {
        vec![
            item.first_name.clone(),
            item.last_name.clone(),
            item.email.clone(),
            item.department.clone(),
        ]
    }

    fn payload(values: &[String]) -> Result<EmployeeInput> {
        let v = required(values, Self::FIELDS)?;
        check_email(v[2])?;
        Ok(EmployeeInput {
            first_name: v[0].to_string(),
            last_name: v[1].to_string(),
            email: v[2].to_string(),
            department: v[3].to_string(),
        })
    }

    fn list(api: &dyn Api) -> Result<Vec<Employee>> {
        api.list_employees()
    }

    fn create(api: &dyn Api, payload: &EmployeeInput) -> Result<()> {
        api.create_employee(payload).map(|_| ())
    }

    fn update(api: &dyn Api, id: i64, payload: &EmployeeInput) -> Result<()> {
        api.update_employee(id, payload).map(|_| ())
    }

    fn delete(api: &dyn Api, id: i64) -> Result<()> {
        api.delete_employee(id)
    }
}
