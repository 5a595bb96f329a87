use birdle::{build_server, AppState, BirdStore, DBConnection, DatabaseSettings};
use log::info;
use std::sync::Arc;
use tokio::net::TcpListener;

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    pub db: DBConnection,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }
}

/// Starts the service on a random port backed by a seeded in-memory database.
/// `name` keeps each test on its own database.
pub async fn spawn_app(name: &str) -> TestApp {
    let _ = env_logger::builder().is_test(true).try_init();

    let db = DBConnection::connect(&DatabaseSettings::in_memory(name))
        .await
        .expect("failed to create test database");
    seed_sightings(&db).await;

    let app_state = AppState {
        title: String::from("Birdle"),
        birds: Arc::new(BirdStore::new(db.clone())),
    };

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind random port");
    let address = format!("http://{}", listener.local_addr().unwrap());
    let server = build_server(listener, app_state, vec![]);
    tokio::spawn(async move { server.await });
    info!("test app listening on {}", address);

    TestApp {
        address,
        client: reqwest::Client::new(),
        db,
    }
}

/// Europe and Africa have sightings, Asia has none
async fn seed_sightings(db: &DBConnection) {
    sqlx::query("INSERT INTO region (id, name) VALUES (1, 'Europe'), (2, 'Africa'), (3, 'Asia')")
        .execute(db.write())
        .await
        .unwrap();

    sqlx::query(
        "INSERT INTO bird (id, name, family) VALUES
            (1, 'Robin', 'Turdidae'),
            (2, 'Jay', 'Corvidae'),
            (3, 'Village Weaver', 'Ploceidae'),
            (4, 'House Sparrow', 'Passeridae')",
    )
    .execute(db.write())
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO bird_region (bird_id, region_id) VALUES
            (1, 1), (2, 1), (4, 1), (3, 2), (4, 2)",
    )
    .execute(db.write())
    .await
    .unwrap();
}
