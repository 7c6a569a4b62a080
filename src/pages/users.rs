use crate::api::Api;
use crate::error::Result;
use crate::fmt;
use crate::models::{User, UserInput};
use crate::pages::crud::{check_email, required, Resource};

pub struct Users;

impl Resource for Users {
    type Item = User;
    type Payload = UserInput;

    const SINGULAR: &'static str = "user";
    const PLURAL: &'static str = "users";
    const HEADERS: &'static [&'static str] = &["ID", "Name", "Email", "Created At"];
    const FIELDS: &'static [&'static str] = &["Name", "Email"];

    fn id(item: &User) -> i64 {
        item.id
    }

    fn row(item: &User) -> Vec<String> {
        vec![
            item.id.to_string(),
            item.name.clone(),
            item.email.clone(),
            fmt::timestamp(item.created_at.as_deref()),
        ]
    }

    fn label(item: &User) -> String {
        item.name.clone()
    }

    fn form_values(item: &User) -> Vec<String> {
        vec![item.name.clone(), item.email.clone()]
    }

    fn payload(values: &[String]) -> Result<UserInput> {
        let v = required(values, Self::FIELDS)?;
        check_email(v[1])?;
        Ok(UserInput {
            name: v[0].to_string(),
            email: v[1].to_string(),
        })
    }

    fn list(api: &dyn Api) -> Result<Vec<User>> {
        api.list_users()
    }

    fn create(api: &dyn Api, payload: &UserInput) -> Result<()> {
        api.create_user(payload).map(|_| ())
    }

    fn update(api: &dyn Api, id: i64, payload: &UserInput) -> Result<()> {
        api.update_user(id, payload).map(|_| ())
    }

    fn delete(api: &dyn Api, id: i64) -> Result<()> {
        api.delete_user(id)
    }
}
