use std::net::SocketAddr;

use anyhow::Context;
use reqwest::Url;

pub const DEFAULT_ADDR: &str = "0.0.0.0:5876";
pub const DEFAULT_API_BASE: &str = "https://670fb93da85f4164ef2ba7dd.mockapi.io/api";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub api_base: Url,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let addr = lookup("TODOLISTS_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let base = lookup("TODOLISTS_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let bind_addr = addr
            .parse::<SocketAddr>()
            .with_context(|| format!("parsing TODOLISTS_ADDR {addr:?}"))?;
        let api_base = Url::parse(&base).with_context(|| format!("parsing TODOLISTS_API_BASE {base:?}"))?;
        if api_base.cannot_be_a_base() {
            anyhow::bail!("TODOLISTS_API_BASE {base:?} cannot carry path segments");
        }

        Ok(Self { bind_addr, api_base })
    }
}
