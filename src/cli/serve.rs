use crate::{config::Config, error, server};

pub async fn serve(addr: Option<String>, open: bool) {
    let mut config = match Config::load() {
        Ok(config) => config,
        Err(e) => error!("Cannot load configuration. Err: {}", e),
    };

    if let Some(addr) = addr {
        config.server_addr = addr;
    }

    if let Err(e) = server::start_api_server(config, open).await {
        error!("Server stopped. Err: {}", e);
    }
}
