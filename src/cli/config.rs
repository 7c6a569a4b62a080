use colored::Colorize;

use crate::error::{AppError, Result};
use crate::settings::{load_settings, save_settings, settings_file, shellexpand_path, API_URL_ENV};

pub fn show(api_url_flag: Option<&str>) -> Result<()> {
    let settings = load_settings();
    println!("Settings file:  {}", settings_file().display());
    println!("API base URL:   {}", settings.resolve_api_url(api_url_flag));
    if std::env::var(API_URL_ENV).is_ok() && api_url_flag.is_none() {
        println!("                (from {API_URL_ENV})");
    }
    println!("Timeout:        {}s", settings.timeout_secs);
    println!("Download dir:   {}", settings.download_path().display());
    println!("Log level:      {}", settings.log_level);
    Ok(())
}

pub fn set_url(url: &str) -> Result<()> {
    let url = url.trim().trim_end_matches('/');
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(AppError::Validation(format!(
            "'{url}' is not an http(s) URL"
        )));
    }
    let mut settings = load_settings();
    settings.api_base_url = url.to_string();
    save_settings(&settings)?;
    println!("{} API base URL: {url}", "Saved".green());
    Ok(())
}

pub fn set_download_dir(dir: &str) -> Result<()> {
    let expanded = shellexpand_path(dir.trim());
    if !std::path::Path::new(&expanded).is_dir() {
        return Err(AppError::Validation(format!("{expanded} is not a directory")));
    }
    let mut settings = load_settings();
    settings.download_dir = Some(dir.trim().to_string());
    save_settings(&settings)?;
    println!("{} download directory: {expanded}", "Saved".green());
    Ok(())
}
