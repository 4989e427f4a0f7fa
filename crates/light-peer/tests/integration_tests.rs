//! End-to-end tests: two clients syncing through a real relay.

use light_core::{GameState, SecretKind};
use light_peer::{relay, RelayState, RoomConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, Mutex};
use tokio::time::{sleep, timeout};

async fn spawn_relay() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = Arc::new(RelayState::new(RoomConfig::default()));
    tokio::spawn(relay::serve(listener, state));
    format!("ws://{}", addr)
}

struct TestClient {
    game: Arc<Mutex<GameState>>,
    changes: mpsc::UnboundedSender<()>,
}

fn spawn_client(url: &str, room: &str) -> TestClient {
    let game = Arc::new(Mutex::new(GameState::new()));
    let (tx, rx) = mpsc::unbounded_channel();
    let handle = Arc::clone(&game);
    let url = url.to_string();
    let room = room.to_string();
    tokio::spawn(async move {
        let _ = light_peer::run_client(&url, &room, RoomConfig::default(), handle, rx).await;
    });
    TestClient { game, changes: tx }
}

/// Poll until `check` passes or the deadline hits.
async fn wait_for<F>(game: &Arc<Mutex<GameState>>, check: F)
where
    F: Fn(&GameState) -> bool,
{
    timeout(Duration::from_secs(5), async {
        loop {
            if check(&*game.lock().await) {
                return;
            }
            sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("peer state never converged");
}

#[tokio::test]
async fn test_two_clients_converge_through_relay() {
    let url = spawn_relay().await;
    let a = spawn_client(&url, "abendrunde");
    let b = spawn_client(&url, "abendrunde");

    // Give both sockets a moment to join
    sleep(Duration::from_millis(200)).await;

    // A starts a round and announces the change
    {
        let mut state = a.game.lock().await;
        let mut rng = StdRng::seed_from_u64(1);
        state.start_game_with_rng(&mut rng).unwrap();
    }
    a.changes.send(()).unwrap();

    wait_for(&b.game, |s| s.placed_tiles.len() == 3).await;

    let (a_secrets, water) = {
        let state = a.game.lock().await;
        let water = state
            .secrets
            .iter()
            .find(|t| t.kind == Some(SecretKind::Water))
            .map(|t| t.coord)
            .unwrap();
        (state.secrets.clone(), water)
    };
    {
        let state = b.game.lock().await;
        assert_eq!(state.secrets, a_secrets);
        assert_eq!(state.tiles_left, 7);
    }

    // A places on a water secret; B sees the move and the budget reset
    {
        let mut state = a.game.lock().await;
        state.give_hint("lake").unwrap();
        state.place_tile(water).unwrap();
    }
    a.changes.send(()).unwrap();

    wait_for(&b.game, |s| s.placed_tiles.len() == 4).await;

    let state = b.game.lock().await;
    assert_eq!(state.tiles_left, 7, "water hard-resets the shared budget");
    assert_eq!(
        state.placed_tiles.last().unwrap().word.as_deref(),
        Some("lake")
    );
    // B's local-only fields never crossed the wire
    assert_eq!(state.current_hint, None);
    assert_eq!(state.selected_tile, None);
    assert_eq!(state.found_secrets.water, 0);
}

#[tokio::test]
async fn test_rooms_are_isolated() {
    let url = spawn_relay().await;
    let a = spawn_client(&url, "zimmer-eins");
    let b = spawn_client(&url, "zimmer-zwei");

    sleep(Duration::from_millis(200)).await;

    {
        let mut state = a.game.lock().await;
        let mut rng = StdRng::seed_from_u64(2);
        state.start_game_with_rng(&mut rng).unwrap();
    }
    a.changes.send(()).unwrap();

    // Long enough for the payload to have arrived if it were routed
    sleep(Duration::from_millis(500)).await;

    let state = b.game.lock().await;
    assert!(state.placed_tiles.is_empty());
    assert_eq!(state.tiles_left, 0);
}
