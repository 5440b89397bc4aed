use std::{env, net::{SocketAddr, ToSocketAddrs as _}, path::PathBuf};

use sea_orm::ConnectOptions;
use thiserror::Error;
use tracing::info;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;

pub struct Config {
    pub host_address: SocketAddr,

    pub database_opt: ConnectOptions,

    pub jwt_key: String,

    pub log_file: PathBuf,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment `{0}` is required to be set")]
    Missing(&'static str),
    #[error("environment `{name}` is not valid: {reason}")]
    Invalid {
        name: &'static str,
        reason: String,
    },
}

pub fn load() -> Result<Config, ConfigError> {
    Ok(Config {
        host_address: load_host_address()?,
        database_opt: load_database_opt()?,
        jwt_key: load_jwt_key()?,
        log_file: load_log_file(),
    })
}

fn load_host_address() -> Result<SocketAddr, ConfigError> {
    info!("Loading environment `HOST_ADDRESS`");

    let var = env::var("HOST_ADDRESS").unwrap_or_else(|_| "127.0.0.1:0".to_string());

    var.to_socket_addrs()
        .map_err(|err| ConfigError::Invalid { name: "HOST_ADDRESS", reason: err.to_string() })?
        .next()
        .ok_or_else(|| ConfigError::Invalid { name: "HOST_ADDRESS", reason: "unable to resolve host".to_owned() })
}

fn load_database_opt() -> Result<ConnectOptions, ConfigError> {
    info!("Loading environment `DATABASE_URL`");

    let url = env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

    info!("Loading environment `DATABASE_MAX_CONNECTIONS`");

    let max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
        Ok(var) => var.parse()
            .map_err(|err: std::num::ParseIntError| ConfigError::Invalid { name: "DATABASE_MAX_CONNECTIONS", reason: err.to_string() })?,
        Err(_) => DEFAULT_MAX_CONNECTIONS,
    };

    let mut opt = ConnectOptions::new(url);
    opt.max_connections(max_connections)
        .sqlx_logging(false);

    Ok(opt)
}

fn load_jwt_key() -> Result<String, ConfigError> {
    info!("Loading environment `JWT_SECRET`");

    env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))
}

fn load_log_file() -> PathBuf {
    env::var("LOG_FILE").unwrap_or_else(|_| "trace.log".to_owned()).into()
}
