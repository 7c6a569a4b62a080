pub mod accounts;
pub mod config;
pub mod crud;
pub mod crud_manager;
pub mod dashboard;
pub mod files;
pub mod files_manager;
pub mod form;

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::error::{AppError, Result};
use crate::models::AccountType;
use crate::pages::Notice;

#[derive(Parser)]
#[command(
    name = "expdesk",
    about = "Terminal admin client for the expense analyser backend.",
    version
)]
pub struct Cli {
    /// Backend base URL, e.g. http://localhost:8080/api
    #[arg(long = "api-url", global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage users.
    Users {
        #[command(subcommand)]
        command: UsersCommands,
    },
    /// Manage employees.
    Employees {
        #[command(subcommand)]
        command: EmployeesCommands,
    },
    /// Manage expenses.
    Expenses {
        #[command(subcommand)]
        command: ExpensesCommands,
    },
    /// Manage bank and credit card accounts.
    Accounts {
        #[command(subcommand)]
        command: AccountsCommands,
    },
    /// Upload, download and delete expense statements.
    Files {
        #[command(subcommand)]
        command: FilesCommands,
    },
    /// Show or change local settings.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Print shell completions.
    Completions {
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum UsersCommands {
    /// List all users.
    List,
    /// Add a user.
    Add {
        name: String,
        #[arg(long)]
        email: String,
    },
    /// Update a user. Omitted fields keep their current value.
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Delete a user.
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum EmployeesCommands {
    /// List all employees.
    List,
    /// Add an employee.
    Add {
        #[arg(long = "first-name")]
        first_name: String,
        #[arg(long = "last-name")]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        department: String,
    },
    /// Update an employee. Omitted fields keep their current value.
    Update {
        id: i64,
        #[arg(long = "first-name")]
        first_name: Option<String>,
        #[arg(long = "last-name")]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        department: Option<String>,
    },
    /// Delete an employee.
    Delete {
        id: i64,
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum ExpensesCommands {
    /// List all expenses.
    List,
    /// Add an expense.
    Add {
        title: String,
        #[arg(long)]
        amount: String,
        #[arg(long)]
        category: String,
        /// Expense date: YYYY-MM-DD
        #[arg(long)]
        date: String,
    },
    /// Update an expense. Omitted fields keep their current value.
    Update {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        amount: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        date: Option<String>,
    },
    /// Delete an expense.
    Delete {
        id: i64,
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum AccountsCommands {
    /// List all accounts.
    List,
    /// Create an account.
    Add {
        /// Account name, e.g. 'HDFC Savings'
        name: String,
        #[arg(long = "type", value_enum, default_value_t = AccountType::BankAccount)]
        account_type: AccountType,
    },
}

#[derive(Subcommand)]
pub enum FilesCommands {
    /// List uploaded files.
    List,
    /// Upload a CSV or XLSX statement for a user and account.
    Upload {
        /// Statement to upload (.csv or .xlsx)
        path: Option<PathBuf>,
        /// User ID (see `expdesk users list`)
        #[arg(long)]
        user: Option<i64>,
        /// Account ID (see `expdesk accounts list`)
        #[arg(long)]
        account: Option<i64>,
    },
    /// Download a file's content.
    Download {
        id: i64,
        /// Directory to save into (default: configured download dir)
        #[arg(long = "output-dir")]
        output_dir: Option<PathBuf>,
        /// Remove the record without asking if its content is gone
        #[arg(long, short)]
        yes: bool,
    },
    /// Delete an uploaded file.
    Delete {
        id: i64,
        #[arg(long, short)]
        yes: bool,
    },
    /// Show the first rows of a local statement before uploading it.
    Preview {
        path: PathBuf,
        #[arg(long, default_value = "10")]
        rows: usize,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective settings.
    Show,
    /// Save the backend base URL.
    SetUrl { url: String },
    /// Save the default download directory.
    SetDownloadDir { dir: String },
}

/// Ask a yes/no question on stdin. `assume_yes` answers without asking.
pub(crate) fn confirm(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Print a success notice; an error notice fails the command.
pub(crate) fn report(notice: Option<&Notice>) -> Result<()> {
    match notice {
        Some(Notice::Error(msg)) => Err(AppError::Other(msg.clone())),
        Some(Notice::Success(msg)) => {
            println!("{msg}");
            Ok(())
        }
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_api_url_is_global() {
        let cli = Cli::parse_from(["expdesk", "users", "list", "--api-url", "http://h:1/api"]);
        assert_eq!(cli.api_url.as_deref(), Some("http://h:1/api"));
        assert!(matches!(
            cli.command,
            Some(Commands::Users { command: UsersCommands::List })
        ));
    }

    #[test]
    fn test_account_type_values() {
        let cli = Cli::parse_from(["expdesk", "accounts", "add", "Amex", "--type", "credit-card"]);
        match cli.command {
            Some(Commands::Accounts {
                command: AccountsCommands::Add { account_type, .. },
            }) => assert_eq!(account_type, AccountType::CreditCard),
            _ => panic!("wrong command"),
        }
    }

    #[test]
    fn test_report_maps_notices() {
        assert!(report(None).is_ok());
        assert!(report(Some(&Notice::Success("ok".into()))).is_ok());
        let err = report(Some(&Notice::Error("Failed to load users".into()))).unwrap_err();
        assert_eq!(err.to_string(), "Failed to load users");
    }
}
