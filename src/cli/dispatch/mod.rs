use crate::cli::{actions::Action, globals::GlobalArgs};
use anyhow::Result;
use secrecy::SecretString;

pub fn handler(matches: &clap::ArgMatches) -> Result<(Action, GlobalArgs)> {
    let token_secret = matches
        .get_one::<String>("token-secret")
        .map(|secret| SecretString::from(secret.clone()))
        .ok_or_else(|| anyhow::anyhow!("missing required argument: --token-secret"))?;

    let mut globals = GlobalArgs::new(token_secret);
    globals.production = matches
        .get_one::<String>("env")
        .is_some_and(|mode| mode == "production");
    globals.email_api_url = matches.get_one::<String>("email-api-url").cloned();

    let action = Action::Server {
        port: matches.get_one::<u16>("port").copied().unwrap_or(8080),
        dsn: matches
            .get_one("dsn")
            .map(|s: &String| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --dsn"))?,
        frontend_url: matches
            .get_one("frontend-url")
            .map(|s: &String| s.to_string())
            .unwrap_or_else(|| "http://localhost:3000".to_string()),
    };

    Ok((action, globals))
}
