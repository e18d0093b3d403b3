use log::{debug, error, info, warn};

/// Initialize the logger
pub fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

/// Log an informational message
pub fn log_info(message: &str) {
    info!("{}", message);
}

/// Log a debug message
pub fn log_debug(message: &str) {
    debug!("{}", message);
}

/// Log a warning message
pub fn log_warning(message: &str) {
    warn!("{}", message);
}

/// Log an error message
pub fn log_error(message: &str) {
    error!("{}", message);
}

/// Log checkpoint store connection details with the password masked
pub fn log_database_connection_details(url: &str) {
    info!("Checkpoint store connection details: {}", mask_password(url));
}

/// Log ledger gateway connection details
pub fn log_gateway_connection_details(channel: &str, peer: &str, url: &str, identity: &str) {
    info!(
        "Ledger gateway for channel {}: peer {} at {} as {}",
        channel, peer, url, identity
    );
}

fn mask_password(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let Some((userinfo, host)) = rest.split_once('@') else {
        return url.to_string();
    };
    match userinfo.split_once(':') {
        Some((user, _)) => format!("{}://{}:***@{}", scheme, user, host),
        None => url.to_string(),
    }
}
