use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

/// Branding printed on every invoice.
#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceConfig {
    pub company_name: String,
    pub company_address: String,
    pub company_website: String,
    pub admin_name: String,
    pub thank_you: String,
    pub currency: String,
}

impl Default for InvoiceConfig {
    fn default() -> Self {
        Self {
            company_name: "Reseller".into(),
            company_address: String::new(),
            company_website: String::new(),
            admin_name: "Administrator".into(),
            thank_you: "Thank you for your business!".into(),
            currency: "BDT".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub invoice: InvoiceConfig,
    pub cookie_secure: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "resellboard".into()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "resellboard-admins".into()),
            ttl_minutes: parse_or("JWT_TTL_MINUTES", 60),
            refresh_ttl_minutes: parse_or("JWT_REFRESH_TTL_MINUTES", 60 * 24 * 14),
        };

        let defaults = InvoiceConfig::default();
        let invoice = InvoiceConfig {
            company_name: std::env::var("INVOICE_COMPANY_NAME").unwrap_or(defaults.company_name),
            company_address: std::env::var("INVOICE_COMPANY_ADDRESS")
                .unwrap_or(defaults.company_address),
            company_website: std::env::var("INVOICE_COMPANY_WEBSITE")
                .unwrap_or(defaults.company_website),
            admin_name: std::env::var("INVOICE_ADMIN_NAME").unwrap_or(defaults.admin_name),
            thank_you: std::env::var("INVOICE_THANK_YOU").unwrap_or(defaults.thank_you),
            currency: std::env::var("INVOICE_CURRENCY").unwrap_or(defaults.currency),
        };

        let cookie_secure = std::env::var("COOKIE_SECURE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        Ok(Self {
            database_url,
            jwt,
            invoice,
            cookie_secure,
        })
    }
}

fn parse_or(key: &str, default: i64) -> i64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(default)
}
