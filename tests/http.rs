use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionBody {
    merit: u64,
    today_taps: u64,
    combo: u32,
    volume: f64,
    selected_sound: String,
    is_auto_tapping: bool,
    is_meditating: bool,
    meditation_time: u64,
    wishes: Vec<WishBody>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WishBody {
    content: String,
    merit_cost: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TapBody {
    merit: u64,
    today_taps: u64,
    combo: u32,
    total_clicks: u64,
    current_streak: u32,
    new_achievements: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StreakBody {
    current_streak: u32,
    longest_streak: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatsBody {
    total_clicks: u64,
    today_clicks: u64,
    week_clicks: u64,
    month_clicks: u64,
    streak_data: StreakBody,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileBody {
    id: String,
    nickname: String,
    signature: Option<String>,
    created_at: String,
    updated_at: String,
}

#[derive(Debug, Deserialize)]
struct AchievementBody {
    id: String,
    unlocked: bool,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::Once;
    use std::sync::atomic::{AtomicI32, Ordering};

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("wooden_fish_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/session")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let data_path = unique_data_path();
    let child = Command::new(env!("CARGO_BIN_EXE_wooden_fish"))
        .env("PORT", port.to_string())
        .env("WOODEN_FISH_DATA_PATH", data_path)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn get_session(client: &Client, base_url: &str) -> SessionBody {
    client
        .get(format!("{base_url}/api/session"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn tap(client: &Client, base_url: &str) -> TapBody {
    let response = client
        .post(format!("{base_url}/api/tap"))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    response.json().await.unwrap()
}

#[tokio::test]
async fn http_tap_accumulates_merit_and_combo() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = get_session(&client, &server.base_url).await;

    let first = tap(&client, &server.base_url).await;
    let second = tap(&client, &server.base_url).await;

    assert_eq!(second.merit, before.merit + 2);
    assert_eq!(second.today_taps, before.today_taps + 2);
    assert_eq!(second.combo, first.combo + 1);
    assert_eq!(second.total_clicks, first.total_clicks + 1);
    assert!(second.current_streak >= 1);
}

#[tokio::test]
async fn http_tap_updates_statistics() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before: StatsBody = client
        .get(format!("{}/api/stats", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    tap(&client, &server.base_url).await;

    let after: StatsBody = client
        .get(format!("{}/api/stats", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(after.total_clicks, before.total_clicks + 1);
    assert_eq!(after.today_clicks, before.today_clicks + 1);
    assert_eq!(after.week_clicks, before.week_clicks + 1);
    assert_eq!(after.month_clicks, before.month_clicks + 1);
    assert!(after.streak_data.current_streak >= 1);
    assert!(after.streak_data.longest_streak >= after.streak_data.current_streak);
}

#[tokio::test]
async fn http_first_tap_unlocks_achievement() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    tap(&client, &server.base_url).await;

    let achievements: Vec<AchievementBody> = client
        .get(format!("{}/api/achievements", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let first_tap = achievements
        .iter()
        .find(|a| a.id == "first-tap")
        .expect("catalog lists first-tap");
    assert!(first_tap.unlocked);
}

#[tokio::test]
async fn http_profile_lifecycle() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let reset = client
        .delete(format!("{}/api/profile", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(reset.status(), StatusCode::NO_CONTENT);

    let missing = client
        .get(format!("{}/api/profile", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let created: ProfileBody = client
        .post(format!("{}/api/profile", server.base_url))
        .json(&serde_json::json!({ "nickname": "陈" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(created.nickname, "陈");
    assert!(created.id.starts_with("user_"));
    assert_eq!(created.created_at, created.updated_at);

    let duplicate = client
        .post(format!("{}/api/profile", server.base_url))
        .json(&serde_json::json!({ "nickname": "再来一个" }))
        .send()
        .await
        .unwrap();
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    // Cross a second boundary so the updated instant sorts after creation.
    sleep(Duration::from_millis(1100)).await;

    let updated: ProfileBody = client
        .patch(format!("{}/api/profile", server.base_url))
        .json(&serde_json::json!({ "signature": "x" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(updated.nickname, "陈");
    assert_eq!(updated.signature.as_deref(), Some("x"));
    assert!(updated.updated_at > updated.created_at);
}

#[tokio::test]
async fn http_profile_reset_clears_statistics() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    tap(&client, &server.base_url).await;

    let reset = client
        .delete(format!("{}/api/profile", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(reset.status(), StatusCode::NO_CONTENT);

    let stats: StatsBody = client
        .get(format!("{}/api/stats", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats.total_clicks, 0);
    assert_eq!(stats.today_clicks, 0);
    assert_eq!(stats.streak_data.current_streak, 0);
}

#[tokio::test]
async fn http_invalid_nickname_is_rejected() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let reset = client
        .delete(format!("{}/api/profile", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(reset.status(), StatusCode::NO_CONTENT);

    let response = client
        .post(format!("{}/api/profile", server.base_url))
        .json(&serde_json::json!({ "nickname": "bad!name@" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_wish_deducts_merit_or_rejects() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let unaffordable = client
        .post(format!("{}/api/wish", server.base_url))
        .json(&serde_json::json!({ "content": "暴富", "meritCost": 1_000_000 }))
        .send()
        .await
        .unwrap();
    assert_eq!(unaffordable.status(), StatusCode::BAD_REQUEST);

    for _ in 0..12 {
        tap(&client, &server.base_url).await;
    }
    let before = get_session(&client, &server.base_url).await;

    let session: SessionBody = client
        .post(format!("{}/api/wish", server.base_url))
        .json(&serde_json::json!({ "content": "世界和平" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(session.merit, before.merit - 10);
    let wish = session.wishes.last().expect("wish recorded");
    assert_eq!(wish.content, "世界和平");
    assert_eq!(wish.merit_cost, 10);
}

#[tokio::test]
async fn http_settings_round_trip() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let session: SessionBody = client
        .post(format!("{}/api/settings", server.base_url))
        .json(&serde_json::json!({ "volume": 0.4, "sound": "temple" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(session.volume, 0.4);
    assert_eq!(session.selected_sound, "temple");
}

#[tokio::test]
async fn http_meditation_toggles() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let started: SessionBody = client
        .post(format!("{}/api/meditation", server.base_url))
        .json(&serde_json::json!({ "action": "start" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(started.is_meditating);

    let before_time = started.meditation_time;
    let stopped: SessionBody = client
        .post(format!("{}/api/meditation", server.base_url))
        .json(&serde_json::json!({ "action": "stop", "seconds": 120 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(!stopped.is_meditating);
    assert_eq!(stopped.meditation_time, before_time + 120);

    let invalid = client
        .post(format!("{}/api/meditation", server.base_url))
        .json(&serde_json::json!({ "action": "levitate" }))
        .send()
        .await
        .unwrap();
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_auto_tap_arms_and_disarms() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let invalid = client
        .post(format!("{}/api/auto-tap", server.base_url))
        .json(&serde_json::json!({ "enabled": true, "speed": 100.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

    let armed: SessionBody = client
        .post(format!("{}/api/auto-tap", server.base_url))
        .json(&serde_json::json!({ "enabled": true, "speed": 5.0, "duration": 1 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(armed.is_auto_tapping);

    let before = get_session(&client, &server.base_url).await;
    sleep(Duration::from_millis(900)).await;
    let during = get_session(&client, &server.base_url).await;
    assert!(during.merit > before.merit);

    let disarmed: SessionBody = client
        .post(format!("{}/api/auto-tap", server.base_url))
        .json(&serde_json::json!({ "enabled": false }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(!disarmed.is_auto_tapping);
}
