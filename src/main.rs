mod api;
mod cli;
mod client;
mod error;
mod fmt;
mod logging;
mod models;
mod pages;
mod preview;
mod settings;
#[cfg(test)]
mod testing;
mod tui;

use clap::{CommandFactory, Parser};

use cli::{
    AccountsCommands, Cli, Commands, ConfigCommands, EmployeesCommands, ExpensesCommands,
    FilesCommands, UsersCommands,
};
use client::HttpClient;
use error::Result;
use pages::{employees::Employees, expenses::Expenses, users::Users};
use settings::Settings;

fn connect(settings: &Settings, flag: Option<&str>) -> Result<HttpClient> {
    let url = settings.resolve_api_url(flag);
    tracing::debug!("using backend {url}");
    HttpClient::new(&url, settings.timeout_secs)
}

fn run(cli: Cli, settings: Settings) -> Result<()> {
    let flag = cli.api_url.as_deref();
    let Some(command) = cli.command else {
        let api = connect(&settings, flag)?;
        let base_url = api.base_url().to_string();
        return cli::dashboard::run(Box::new(api), &base_url, settings.download_path());
    };

    match command {
        Commands::Users { command } => {
            let api = connect(&settings, flag)?;
            match command {
                UsersCommands::List => cli::crud::list::<Users>(&api),
                UsersCommands::Add { name, email } => cli::crud::add::<Users>(&api, &[name, email]),
                UsersCommands::Update { id, name, email } => {
                    cli::crud::update::<Users>(&api, id, &[name, email])
                }
                UsersCommands::Delete { id, yes } => cli::crud::delete::<Users>(&api, id, yes),
            }
        }
        Commands::Employees { command } => {
            let api = connect(&settings, flag)?;
            match command {
                EmployeesCommands::List => cli::crud::list::<Employees>(&api),
                EmployeesCommands::Add {
                    first_name,
                    last_name,
                    email,
                    department,
                } => cli::crud::add::<Employees>(&api, &[first_name, last_name, email, department]),
                EmployeesCommands::Update {
                    id,
                    first_name,
                    last_name,
                    email,
                    department,
                } => cli::crud::update::<Employees>(
                    &api,
                    id,
                    &[first_name, last_name, email, department],
                ),
                EmployeesCommands::Delete { id, yes } => {
                    cli::crud::delete::<Employees>(&api, id, yes)
                }
            }
        }
        Commands::Expenses { command } => {
            let api = connect(&settings, flag)?;
            match command {
                ExpensesCommands::List => cli::crud::list::<Expenses>(&api),
                ExpensesCommands::Add {
                    title,
                    amount,
                    category,
                    date,
                } => cli::crud::add::<Expenses>(&api, &[title, amount, category, date]),
                ExpensesCommands::Update {
                    id,
                    title,
                    amount,
                    category,
                    date,
                } => cli::crud::update::<Expenses>(&api, id, &[title, amount, category, date]),
                ExpensesCommands::Delete { id, yes } => {
                    cli::crud::delete::<Expenses>(&api, id, yes)
                }
            }
        }
        Commands::Accounts { command } => {
            let api = connect(&settings, flag)?;
            match command {
                AccountsCommands::List => cli::accounts::list(&api),
                AccountsCommands::Add { name, account_type } => {
                    cli::accounts::add(&api, &name, account_type)
                }
            }
        }
        Commands::Files { command } => match command {
            FilesCommands::Preview { path, rows } => cli::files::preview(&path, rows),
            FilesCommands::List => cli::files::list(&connect(&settings, flag)?),
            FilesCommands::Upload {
                path,
                user,
                account,
            } => cli::files::upload(&connect(&settings, flag)?, path.as_deref(), user, account),
            FilesCommands::Download {
                id,
                output_dir,
                yes,
            } => {
                let dir = output_dir.unwrap_or_else(|| settings.download_path());
                cli::files::download(&connect(&settings, flag)?, id, &dir, yes)
            }
            FilesCommands::Delete { id, yes } => {
                cli::files::delete(&connect(&settings, flag)?, id, yes)
            }
        },
        Commands::Config { command } => match command {
            ConfigCommands::Show => cli::config::show(flag),
            ConfigCommands::SetUrl { url } => cli::config::set_url(&url),
            ConfigCommands::SetDownloadDir { dir } => cli::config::set_download_dir(&dir),
        },
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "expdesk", &mut std::io::stdout());
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let settings = settings::load_settings();
    if let Err(e) = logging::init(&settings) {
        eprintln!("Warning: logging disabled: {e}");
    }

    if let Err(e) = run(cli, settings) {
        tracing::error!("{e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
