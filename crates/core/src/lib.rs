pub mod domain;
pub mod forecast;
pub mod pricing;
pub mod profile;
pub mod time;

pub const SERVICE_NAME: &str = "GridX AI Forecasting";

/// Rounds half away from zero to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub mod config {
    use anyhow::Context;

    pub const DEFAULT_PORT: u16 = 8000;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub port: u16,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Self::from_lookup(|key| std::env::var(key).ok())
        }

        pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
            let port = match lookup("PORT") {
                Some(v) => v
                    .trim()
                    .parse()
                    .with_context(|| format!("PORT must be a valid port number (got {v:?})"))?,
                None => DEFAULT_PORT,
            };

            let sentry_dsn = lookup("SENTRY_DSN").filter(|s| !s.trim().is_empty());

            Ok(Self { port, sentry_dsn })
        }

        pub fn bind_addr(&self) -> std::net::SocketAddr {
            std::net::SocketAddr::from(([0, 0, 0, 0], self.port))
        }
    }

}
