use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub admin_public_key: PathBuf,
    /// Firebase service-account JSON.
    pub firebase_admin: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .context("PORT must be a port number")?;
        let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

        let database_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| "quill.db".into());
        let admin_public_key: PathBuf = std::env::var("ADMIN_PUBLIC_KEY")
            .unwrap_or_else(|_| "public.pem".into())
            .into();
        let firebase_admin = std::env::var("FIREBASE_ADMIN").context("FIREBASE_ADMIN is not set")?;

        Ok(Self {
            addr,
            database_url,
            admin_public_key,
            firebase_admin,
        })
    }
}
