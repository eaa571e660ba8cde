use cloud_metrics_dashboard::{
    api,
    config::DashboardConfig,
    logging,
};

#[tokio::main]
async fn main() {
    // Values from a local .env file join the process environment
    dotenv::dotenv().ok();

    if let Err(e) = logging::init_logger() {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    let config = DashboardConfig::from_env();

    if let Err(e) = api::start_dashboard_server(config).await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}
