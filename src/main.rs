use tokio::net::TcpListener;

use dftr::logger::Logger;
use dftr::{router, AppState, Config, WikiError};

#[tokio::main]
async fn main() -> Result<(), WikiError> {
    if let Err(e) = Logger::init() {
        eprintln!("Failed to install logger: {}", e);
    }

    let config = Config::new();
    std::fs::create_dir_all(config.data_dir.as_path())?;

    let addr = config.socket_addr();
    log::info!("AlDftr v{} storing pages in {:?}", config.version, config.data_dir);

    let app = router(AppState::new(config));
    let listener = TcpListener::bind(addr).await?;
    println!("AlDftr running on http://{}", addr);
    println!("Please keep this window open");
    axum::serve(listener, app).await.map_err(WikiError::from)
}
