use chrono::Local;
use std::{env, net::SocketAddr, time::Duration};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};
use wooden_fish::models::{PROFILE_KEY, STATS_KEY, SESSION_KEY, ClickStatistics, Session, UserProfile};
use wooden_fish::session::ZEN_QUOTE_ROTATION_SECS;
use wooden_fish::state::AppState;
use wooden_fish::{handlers, router, stats, storage};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let data_path = storage::resolve_data_path();
    storage::ensure_parent_dir(&data_path).await?;

    let mut store = storage::Store::load(data_path).await;
    let session = store.get(SESSION_KEY, Session::default());
    let mut click_stats = store.get(STATS_KEY, ClickStatistics::default());
    let profile = store.get(PROFILE_KEY, None::<UserProfile>);

    // Rollups may be stale if the app was idle across a day boundary.
    stats::refresh(&mut click_stats, Local::now().naive_local());

    let state = AppState::new(store, session, click_stats, profile);
    spawn_quote_rotation(state.clone());

    let app = router(state);

    let port = env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn spawn_quote_rotation(state: AppState) {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(ZEN_QUOTE_ROTATION_SECS)).await;
            handlers::rotate_zen_quote(&state).await;
        }
    });
}
