//! Shared fixtures for the behavioral specs

use chrono::NaiveDate;
use rota_adapters::{FakeIdentityAdapter, FakePresenceAdapter};
use rota_core::{EngineConfig, FakeClock, Gender, Post, RoutineType, SequentialIdGen, User};
use rota_engine::Engine;
use rota_storage::{RosterStore, StoreConfig};
use std::path::Path;

pub type SpecEngine =
    Engine<FakePresenceAdapter, FakeIdentityAdapter, FakeClock, SequentialIdGen>;

pub struct Fixture {
    pub engine: SpecEngine,
    pub presence: FakePresenceAdapter,
    pub identity: FakeIdentityAdapter,
    pub clock: FakeClock,
}

/// Engine over a fresh store in a temp dir
pub fn fixture() -> Fixture {
    let store = RosterStore::open_temp().expect("temp store");
    fixture_with_store(store)
}

/// Engine over a store rooted at `dir`, for reopen scenarios
pub fn fixture_at(dir: &Path) -> Fixture {
    let store = RosterStore::open(dir, StoreConfig::default()).expect("store");
    fixture_with_store(store)
}

fn fixture_with_store(store: RosterStore) -> Fixture {
    let presence = FakePresenceAdapter::new();
    let identity = FakeIdentityAdapter::new("admin");
    let clock = FakeClock::default();
    let engine = Engine::new(
        store,
        presence.clone(),
        identity.clone(),
        clock.clone(),
        SequentialIdGen::new("id"),
        &EngineConfig::default(),
    );
    Fixture {
        engine,
        presence,
        identity,
        clock,
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn user(id: &str, cohort: &str) -> User {
    User::new(id, "x", cohort, 2025, "infantry", Gender::Male)
}

/// Three cohort-"2" users, two open posts, one Normal draft day
pub async fn seed_roster(engine: &SpecEngine, day: NaiveDate) {
    for id in ["u-1", "u-2", "u-3"] {
        engine.add_user(user(id, "2")).await.unwrap();
    }
    engine
        .add_post(Post::new("p-1", "Main Gate", ["2"]))
        .await
        .unwrap();
    engine
        .add_post(Post::new("p-2", "Armory", ["2"]))
        .await
        .unwrap();
    engine.create_day(day, RoutineType::Normal).await.unwrap();
}
