use database::{DatabaseConnectionInfo, PgStore};
use tracking::{client::Client, config::TrackingConfig};
use web::{start_web_server, WebState};

#[tokio::main]
async fn main() {
    env_logger::init();

    // database
    let connection_info = DatabaseConnectionInfo::from_env()
        .expect("expected database connection info in env.");
    let store = PgStore::connect(connection_info)
        .await
        .expect("could not connect to database.");

    // domain client
    let config = TrackingConfig::from_env();
    let course_path = config.course_path.clone();
    let tracking_client = Client::new(store, config);

    // optional course pre-load; the first leaderboard refresh loads lazily
    // when this is not configured or fails
    if let Some(path) = course_path {
        if let Err(why) = tracking_client.load_course(&path, false).await {
            log::warn!("could not preload course \"{}\": {:?}", path, why);
        }
    }

    // web server
    let web_future = start_web_server(WebState { tracking_client });

    let _ = web_future.await;
}
