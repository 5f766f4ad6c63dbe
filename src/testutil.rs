//! In-memory engine for tests.
//!
//! [`MockEngine`] models just enough of the game world to exercise the
//! coordinator: connected participants with health/mode/position, chat
//! capture, a configurable forced-respawn behavior, and a temp directory
//! as the world root.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::engine::{Engine, GameMode, ParticipantId, Position};
use crate::error::EngineError;

/// How the mock answers forced-respawn requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RespawnMode {
    /// Respawn succeeds; the participant comes back alive.
    Succeed,
    /// Every request is transiently rejected.
    Reject,
    /// The operation is unsupported in this context.
    Unsupported,
}

#[derive(Clone, Debug)]
pub(crate) struct MockParticipant {
    pub name: String,
    pub connected: bool,
    pub dead: bool,
    pub health: f64,
    pub max_health: f64,
    pub food: u32,
    pub mode: GameMode,
    pub flight: bool,
    pub position: Position,
    pub respawn_mode: RespawnMode,
    pub respawn_requests: u32,
}

#[derive(Default)]
struct World {
    participants: HashMap<ParticipantId, MockParticipant>,
    broadcasts: Vec<String>,
    messages: HashMap<ParticipantId, Vec<String>>,
    shutdowns: u32,
    spawn: Option<Position>,
}

pub(crate) struct MockEngine {
    world: Mutex<World>,
    root: PathBuf,
    _dir: tempfile::TempDir,
}

impl MockEngine {
    pub fn new() -> Arc<Self> {
        let dir = tempfile::tempdir().expect("temp world root");
        Arc::new(Self {
            world: Mutex::new(World::default()),
            root: dir.path().to_path_buf(),
            _dir: dir,
        })
    }

    pub fn add_participant(&self, name: &str) -> ParticipantId {
        let id = ParticipantId::random();
        let mut w = self.world.lock().unwrap();
        w.participants.insert(
            id,
            MockParticipant {
                name: name.to_string(),
                connected: true,
                dead: false,
                health: 20.0,
                max_health: 20.0,
                food: 20,
                mode: GameMode::Survival,
                flight: false,
                position: Position::new(0.0, 64.0, 0.0),
                respawn_mode: RespawnMode::Succeed,
                respawn_requests: 0,
            },
        );
        id
    }

    pub fn kill(&self, id: ParticipantId) {
        let mut w = self.world.lock().unwrap();
        if let Some(p) = w.participants.get_mut(&id) {
            p.dead = true;
            p.health = 0.0;
        }
    }

    pub fn disconnect(&self, id: ParticipantId) {
        let mut w = self.world.lock().unwrap();
        if let Some(p) = w.participants.get_mut(&id) {
            p.connected = false;
        }
    }

    pub fn set_respawn_mode(&self, id: ParticipantId, mode: RespawnMode) {
        let mut w = self.world.lock().unwrap();
        if let Some(p) = w.participants.get_mut(&id) {
            p.respawn_mode = mode;
        }
    }

    pub fn set_world_spawn(&self, spawn: Option<Position>) {
        self.world.lock().unwrap().spawn = spawn;
    }

    pub fn participant(&self, id: ParticipantId) -> MockParticipant {
        self.world.lock().unwrap().participants[&id].clone()
    }

    pub fn broadcasts(&self) -> Vec<String> {
        self.world.lock().unwrap().broadcasts.clone()
    }

    pub fn messages_for(&self, id: ParticipantId) -> Vec<String> {
        self.world
            .lock()
            .unwrap()
            .messages
            .get(&id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn shutdown_count(&self) -> u32 {
        self.world.lock().unwrap().shutdowns
    }

    pub fn flag_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

#[async_trait]
impl Engine for MockEngine {
    async fn connected_participants(&self) -> Vec<ParticipantId> {
        let w = self.world.lock().unwrap();
        w.participants
            .iter()
            .filter(|(_, p)| p.connected)
            .map(|(id, _)| *id)
            .collect()
    }

    async fn is_connected(&self, id: ParticipantId) -> bool {
        let w = self.world.lock().unwrap();
        w.participants.get(&id).map_or(false, |p| p.connected)
    }

    async fn participant_name(&self, id: ParticipantId) -> Option<String> {
        let w = self.world.lock().unwrap();
        w.participants.get(&id).map(|p| p.name.clone())
    }

    async fn is_dead(&self, id: ParticipantId) -> bool {
        let w = self.world.lock().unwrap();
        w.participants.get(&id).map_or(false, |p| p.dead)
    }

    async fn health(&self, id: ParticipantId) -> f64 {
        let w = self.world.lock().unwrap();
        w.participants.get(&id).map_or(0.0, |p| p.health)
    }

    async fn max_health(&self, id: ParticipantId) -> f64 {
        let w = self.world.lock().unwrap();
        w.participants.get(&id).map_or(20.0, |p| p.max_health)
    }

    async fn set_health(&self, id: ParticipantId, health: f64) {
        let mut w = self.world.lock().unwrap();
        if let Some(p) = w.participants.get_mut(&id) {
            p.health = health;
            if health <= 0.0 {
                p.dead = true;
            }
        }
    }

    async fn set_food_level(&self, id: ParticipantId, level: u32) {
        let mut w = self.world.lock().unwrap();
        if let Some(p) = w.participants.get_mut(&id) {
            p.food = level;
        }
    }

    async fn teleport(&self, id: ParticipantId, target: Position) {
        let mut w = self.world.lock().unwrap();
        if let Some(p) = w.participants.get_mut(&id) {
            p.position = target;
        }
    }

    async fn set_mode(&self, id: ParticipantId, mode: GameMode) {
        let mut w = self.world.lock().unwrap();
        if let Some(p) = w.participants.get_mut(&id) {
            p.mode = mode;
        }
    }

    async fn set_flight(&self, id: ParticipantId, enabled: bool) {
        let mut w = self.world.lock().unwrap();
        if let Some(p) = w.participants.get_mut(&id) {
            p.flight = enabled;
        }
    }

    async fn force_respawn(&self, id: ParticipantId) -> Result<(), EngineError> {
        let mut w = self.world.lock().unwrap();
        let Some(p) = w.participants.get_mut(&id) else {
            return Err(EngineError::Disconnected);
        };
        p.respawn_requests += 1;
        match p.respawn_mode {
            RespawnMode::Succeed => {
                p.dead = false;
                p.health = 1.0;
                Ok(())
            }
            RespawnMode::Reject => Err(EngineError::Rejected {
                reason: "client not ready".into(),
            }),
            RespawnMode::Unsupported => Err(EngineError::Unsupported {
                reason: "no forced respawn here".into(),
            }),
        }
    }

    async fn broadcast(&self, message: &str) {
        self.world.lock().unwrap().broadcasts.push(message.to_string());
    }

    async fn send_message(&self, id: ParticipantId, message: &str) {
        self.world
            .lock()
            .unwrap()
            .messages
            .entry(id)
            .or_default()
            .push(message.to_string());
    }

    async fn world_spawn(&self) -> Option<Position> {
        self.world.lock().unwrap().spawn
    }

    fn world_root(&self) -> PathBuf {
        self.root.clone()
    }

    async fn shutdown(&self) {
        self.world.lock().unwrap().shutdowns += 1;
    }
}
