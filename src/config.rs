use std::env;

use crate::models::Principal;
use crate::services::lookup::PhoneLookup;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    /// Deployment owner; always resolves to admin.
    pub owner_principal: Option<Principal>,
    pub token_secret: String,
    pub phone_lookup: PhoneLookup,
    pub dev_mode: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "ridebook.db".to_string()),
            owner_principal: env::var("OWNER_PRINCIPAL")
                .ok()
                .and_then(|v| Principal::parse(v.trim())),
            token_secret: env::var("TOKEN_SECRET").unwrap_or_default(),
            phone_lookup: env::var("PHONE_LOOKUP")
                .ok()
                .and_then(|v| PhoneLookup::parse(v.trim()))
                .unwrap_or_default(),
            dev_mode: env::var("DEV_MODE")
                .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
                .unwrap_or(false),
        }
    }
}
