use secrecy::SecretString;

#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub token_secret: SecretString,
    pub production: bool,
    pub email_api_url: Option<String>,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(token_secret: SecretString) -> Self {
        Self {
            token_secret,
            production: false,
            email_api_url: None,
        }
    }
}
