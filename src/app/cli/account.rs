//! Sign-in and account commands.

use super::print_json;
use crate::app::api::connect;
use crate::app::config::token_from_env;
use crate::domain::{AppConfig, AppError};

pub fn run_auth_url(config: &AppConfig, state: &str) -> Result<(), AppError> {
    let ctx = connect(config)?;
    print_json(ctx.account().authorization_url(state).as_str())
}

pub fn run_exchange(config: &AppConfig, code: &str) -> Result<(), AppError> {
    let ctx = connect(config)?;
    let token = ctx.account().exchange_code(code)?;
    print_json(&token)
}

pub fn run_whoami(config: &AppConfig) -> Result<(), AppError> {
    let token = token_from_env()?;
    let ctx = connect(config)?;
    print_json(&ctx.account().get_user(&token)?)
}

pub fn run_repos(config: &AppConfig) -> Result<(), AppError> {
    let token = token_from_env()?;
    let ctx = connect(config)?;
    print_json(&ctx.account().list_repositories(&token)?)
}
