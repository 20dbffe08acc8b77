pub mod health;
pub mod players;
pub mod seasons;
pub mod streaks;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SortParams {
    pub sort: Option<String>,
}

#[cfg(test)]
pub(crate) mod testing {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::{TimeZone, Utc};
    use serde_json::Value;
    use tower::util::ServiceExt;

    use crate::api::build_router;
    use crate::api::state::AppState;
    use crate::calculate::SortKey;
    use crate::storage::{LeagueStore, StorageConfig};

    pub async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    /// Alice, Bob, Carol and Dave in an active "Spring" season.
    ///
    /// g1: Alice+Bob beat Carol+Dave
    /// g2: Alice+Carol beat Bob+Dave
    /// g3: Alice+Dave beat Bob+Carol
    pub fn seeded_store(dir: &std::path::Path) -> LeagueStore {
        let store = LeagueStore::new(StorageConfig::new(dir.to_path_buf()));
        for name in ["Alice", "Bob", "Carol", "Dave"] {
            store.create_player(name).unwrap();
        }
        store.create_season("Spring").unwrap();
        store.activate_season("Spring").unwrap();

        let games = [
            (["Alice", "Bob"], ["Carol", "Dave"]),
            (["Alice", "Carol"], ["Bob", "Dave"]),
            (["Alice", "Dave"], ["Bob", "Carol"]),
        ];
        for (day, (winners, losers)) in games.iter().enumerate() {
            let played_at = Utc
                .with_ymd_and_hms(2024, 3, day as u32 + 1, 18, 0, 0)
                .unwrap();
            store
                .create_game(&names(winners), &names(losers), Some(played_at))
                .unwrap();
        }

        store
    }

    pub fn app(store: LeagueStore) -> axum::Router {
        build_router(AppState::new(store, SortKey::PointsRatio))
    }
}
