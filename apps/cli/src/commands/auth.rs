//! Sign in, sign up, sign out, profile.

use clap::Args;
use serde::Serialize;
use tavola_core::format::format_date_time;
use tavola_core::{SignupRequest, UserProfile};

use crate::error::CliResult;
use crate::render::{Render, Rendered};
use crate::App;

#[derive(Debug, Args)]
pub struct SignupArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long, env = "TAVOLA_PASSWORD", hide_env_values = true)]
    pub password: String,

    #[arg(long)]
    pub phone: String,

    #[arg(long)]
    pub address: String,
}

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub user: UserProfile,
    pub expires_at: Option<String>,
}

impl Render for SessionView {
    fn render(&self) -> String {
        let mut out = format!("{} <{}>", self.user.name, self.user.email);
        if let Some(phone) = &self.user.phone_number {
            out.push_str(&format!("\nPhone:   {}", phone));
        }
        if let Some(address) = &self.user.address {
            out.push_str(&format!("\nAddress: {}", address));
        }
        if let Some(at) = &self.expires_at {
            out.push_str(&format!("\nSession valid until {}", at));
        }
        out
    }
}

async fn session_view(app: &App, user: UserProfile) -> CliResult<Rendered> {
    let expires_at = app
        .session
        .session()
        .expires_at()
        .await
        .map(|at| format_date_time(&at));
    Rendered::view(&SessionView { user, expires_at })
}

pub async fn login(app: &App, email: &str, password: &str) -> CliResult<Rendered> {
    let user = app.session.login(email, password).await?;
    session_view(app, user).await
}

pub async fn signup(app: &App, args: SignupArgs) -> CliResult<Rendered> {
    let request = SignupRequest {
        name: args.name,
        email: args.email,
        password: args.password,
        phone_number: args.phone,
        address: args.address,
    };
    let user = app.session.signup(request).await?;
    session_view(app, user).await
}

pub async fn logout(app: &App) -> CliResult<Rendered> {
    app.session.logout().await?;
    Ok(Rendered::message("Signed out."))
}

/// Fetches the profile from the backend so phone and address are current.
pub async fn profile(app: &App) -> CliResult<Rendered> {
    let user = app.session.session().refresh_profile().await?;
    session_view(app, user).await
}
