//! Game lifecycle orchestration: persistence plus event emission.
//!
//! [`GameService`] owns the load-mutate-persist cycle for game records
//! and fans lifecycle events out to each session player's connection.
//! Every mutating operation persists the snapshot before returning, so
//! a reader never sees a committed transition that is not yet stored.

use gridfall_events::{EventNotifier, LifecycleEvent};
use gridfall_game::{Game, GameRepository, GameSnapshot};
use gridfall_player::{PlayerProfile, PlayerService};
use gridfall_protocol::{GameId, PublicId};
use gridfall_store::{KvStore, ProfileStore};
use tracing::{info, warn};

use crate::MatchmakingError;

/// Service facade over the game repository.
#[derive(Clone)]
pub struct GameService<K, P> {
    games: GameRepository<K>,
    players: PlayerService<K, P>,
    notifier: EventNotifier,
}

impl<K: KvStore, P: ProfileStore> GameService<K, P> {
    pub fn new(
        games: GameRepository<K>,
        players: PlayerService<K, P>,
        notifier: EventNotifier,
    ) -> Self {
        Self {
            games,
            players,
            notifier,
        }
    }

    /// Creates and persists a new game from a batch of profiles.
    pub async fn create(
        &self,
        batch: &[PlayerProfile],
    ) -> Result<GameSnapshot, MatchmakingError> {
        let game = Game::new(batch, &mut rand::rng());
        self.games.save(game.snapshot()).await?;
        Ok(game.into_snapshot())
    }

    /// Reads the current snapshot of a game.
    pub async fn snapshot(
        &self,
        game_id: GameId,
    ) -> Result<GameSnapshot, MatchmakingError> {
        Ok(self.games.load(game_id).await?.into_snapshot())
    }

    /// Marks one player ready and persists. Returns whether the player
    /// is a member of the game; nothing is written when they are not.
    pub async fn mark_ready(
        &self,
        game_id: GameId,
        public_id: PublicId,
    ) -> Result<bool, MatchmakingError> {
        let mut game = self.games.load(game_id).await?;
        if !game.mark_ready(public_id) {
            return Ok(false);
        }
        self.games.save(game.snapshot()).await?;
        Ok(true)
    }

    /// True when every player in the game has confirmed readiness.
    pub async fn all_ready(
        &self,
        game_id: GameId,
    ) -> Result<bool, MatchmakingError> {
        Ok(self.games.load(game_id).await?.all_ready())
    }

    /// Membership test by public id.
    pub async fn player_in_game(
        &self,
        game_id: GameId,
        public_id: PublicId,
    ) -> Result<bool, MatchmakingError> {
        Ok(self.games.load(game_id).await?.contains(public_id))
    }

    /// Starts the game if every player is ready.
    ///
    /// Returns false (and emits nothing) while confirmations are still
    /// outstanding. On the start transition the snapshot is persisted
    /// first, then a `GameStart` event is delivered to each player.
    pub async fn start_game(
        &self,
        game_id: GameId,
    ) -> Result<bool, MatchmakingError> {
        let mut game = self.games.load(game_id).await?;
        if !game.all_ready() {
            return Ok(false);
        }

        game.start();
        self.games.save(game.snapshot()).await?;
        self.broadcast(game.snapshot(), |snap| LifecycleEvent::GameStart {
            game: snap,
        })
        .await?;
        Ok(true)
    }

    /// Advances the game one round and emits `RoundStart` per player.
    pub async fn advance_round(
        &self,
        game_id: GameId,
    ) -> Result<GameSnapshot, MatchmakingError> {
        let mut game = self.games.load(game_id).await?;
        game.advance_round(&mut rand::rng());
        self.games.save(game.snapshot()).await?;
        info!(%game_id, round = game.snapshot().round, "round advanced");

        self.broadcast(game.snapshot(), |snap| LifecycleEvent::RoundStart {
            game: snap,
        })
        .await?;
        Ok(game.into_snapshot())
    }

    /// Emits `GameEnd` with the final snapshot to each player. The
    /// record itself is left in place; cleanup is driven externally.
    pub async fn end_game(
        &self,
        game_id: GameId,
    ) -> Result<(), MatchmakingError> {
        let game = self.games.load(game_id).await?;
        self.broadcast(game.snapshot(), |snap| LifecycleEvent::GameEnd {
            game: snap,
        })
        .await
    }

    /// Deletes the stored game record.
    pub async fn destroy(
        &self,
        game_id: GameId,
    ) -> Result<(), MatchmakingError> {
        self.games.delete(game_id).await?;
        info!(%game_id, "game destroyed");
        Ok(())
    }

    /// Delivers one event, built from the snapshot, to every player in
    /// the session. Players whose identity mapping is gone (they
    /// disconnected) are skipped.
    async fn broadcast(
        &self,
        snapshot: &GameSnapshot,
        make_event: impl Fn(GameSnapshot) -> LifecycleEvent,
    ) -> Result<(), MatchmakingError> {
        for player in &snapshot.players {
            match self.players.by_public_id(player.public_id).await? {
                Some(profile) => {
                    self.notifier.send_to(
                        &profile.socket_id,
                        make_event(snapshot.clone()),
                    );
                }
                None => {
                    warn!(
                        public_id = %player.public_id,
                        game_id = %snapshot.id,
                        "no connection for session player, skipping event"
                    );
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use gridfall_protocol::SocketId;
    use gridfall_store::{MemoryKv, MemoryProfiles};
    use gridfall_player::PlayerRepository;
    use tokio::sync::mpsc::UnboundedReceiver;

    use super::*;

    struct Fixture {
        service: GameService<MemoryKv, MemoryProfiles>,
        players: PlayerService<MemoryKv, MemoryProfiles>,
        notifier: EventNotifier,
    }

    fn fixture() -> Fixture {
        let kv = MemoryKv::new();
        let profiles = MemoryProfiles::new();
        let players = PlayerService::new(PlayerRepository::new(
            kv.clone(),
            profiles.clone(),
        ));
        let notifier = EventNotifier::new();
        let service = GameService::new(
            GameRepository::new(kv),
            players.clone(),
            notifier.clone(),
        );
        Fixture {
            service,
            players,
            notifier,
        }
    }

    /// Registers four connected players and their event receivers.
    async fn batch(
        fx: &Fixture,
    ) -> (Vec<PlayerProfile>, Vec<UnboundedReceiver<LifecycleEvent>>) {
        let mut profiles = Vec::new();
        let mut receivers = Vec::new();
        for i in 0..4 {
            let socket = SocketId::new(format!("s{i}"));
            receivers.push(fx.notifier.register(socket.clone()));
            let profile = fx
                .players
                .load_player(None, socket, &format!("p{i}"))
                .await
                .unwrap();
            profiles.push(profile);
        }
        (profiles, receivers)
    }

    #[tokio::test]
    async fn test_create_persists_snapshot() {
        let fx = fixture();
        let (profiles, _rx) = batch(&fx).await;

        let snapshot = fx.service.create(&profiles).await.unwrap();

        let loaded = fx.service.snapshot(snapshot.id).await.unwrap();
        assert_eq!(loaded, snapshot);
        assert_eq!(loaded.players.len(), 4);
    }

    #[tokio::test]
    async fn test_mark_ready_persists_flag() {
        let fx = fixture();
        let (profiles, _rx) = batch(&fx).await;
        let snapshot = fx.service.create(&profiles).await.unwrap();

        let found = fx
            .service
            .mark_ready(snapshot.id, profiles[0].public_id)
            .await
            .unwrap();
        assert!(found);

        let loaded = fx.service.snapshot(snapshot.id).await.unwrap();
        let confirmed = loaded
            .players
            .iter()
            .filter(|p| p.ready)
            .count();
        assert_eq!(confirmed, 1);
    }

    #[tokio::test]
    async fn test_mark_ready_non_member_writes_nothing() {
        let fx = fixture();
        let (profiles, _rx) = batch(&fx).await;
        let snapshot = fx.service.create(&profiles).await.unwrap();

        let found = fx
            .service
            .mark_ready(snapshot.id, PublicId::new())
            .await
            .unwrap();
        assert!(!found);

        let loaded = fx.service.snapshot(snapshot.id).await.unwrap();
        assert!(loaded.players.iter().all(|p| !p.ready));
    }

    #[tokio::test]
    async fn test_start_game_refuses_until_all_ready() {
        let fx = fixture();
        let (profiles, mut receivers) = batch(&fx).await;
        let snapshot = fx.service.create(&profiles).await.unwrap();

        for profile in &profiles[..3] {
            fx.service
                .mark_ready(snapshot.id, profile.public_id)
                .await
                .unwrap();
            assert!(!fx.service.start_game(snapshot.id).await.unwrap());
        }
        for rx in &mut receivers {
            assert!(rx.try_recv().is_err(), "no event before full readiness");
        }

        fx.service
            .mark_ready(snapshot.id, profiles[3].public_id)
            .await
            .unwrap();
        assert!(fx.service.start_game(snapshot.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_start_game_emits_start_to_every_player() {
        let fx = fixture();
        let (profiles, mut receivers) = batch(&fx).await;
        let snapshot = fx.service.create(&profiles).await.unwrap();
        for profile in &profiles {
            fx.service
                .mark_ready(snapshot.id, profile.public_id)
                .await
                .unwrap();
        }

        fx.service.start_game(snapshot.id).await.unwrap();

        for rx in &mut receivers {
            match rx.try_recv().unwrap() {
                LifecycleEvent::GameStart { game } => {
                    assert!(game.started);
                    assert_eq!(game.id, snapshot.id);
                    assert_eq!(game.round, 0);
                }
                other => panic!("expected GameStart, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_advance_round_emits_round_start() {
        let fx = fixture();
        let (profiles, mut receivers) = batch(&fx).await;
        let snapshot = fx.service.create(&profiles).await.unwrap();

        let updated = fx.service.advance_round(snapshot.id).await.unwrap();
        assert_eq!(updated.round, 1);
        assert_eq!(updated.turn, 1);

        for rx in &mut receivers {
            match rx.try_recv().unwrap() {
                LifecycleEvent::RoundStart { game } => {
                    assert_eq!(game.round, 1);
                }
                other => panic!("expected RoundStart, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_destroy_removes_record() {
        let fx = fixture();
        let (profiles, _rx) = batch(&fx).await;
        let snapshot = fx.service.create(&profiles).await.unwrap();

        fx.service.destroy(snapshot.id).await.unwrap();

        assert!(fx.service.snapshot(snapshot.id).await.is_err());
    }

    #[tokio::test]
    async fn test_broadcast_skips_disconnected_player() {
        let fx = fixture();
        let (profiles, mut receivers) = batch(&fx).await;
        let snapshot = fx.service.create(&profiles).await.unwrap();
        for profile in &profiles {
            fx.service
                .mark_ready(snapshot.id, profile.public_id)
                .await
                .unwrap();
        }

        // One player's identity mapping vanishes before the start.
        fx.players
            .disconnected(&profiles[0].socket_id)
            .await
            .unwrap();

        assert!(fx.service.start_game(snapshot.id).await.unwrap());

        assert!(receivers[0].try_recv().is_err());
        for rx in &mut receivers[1..] {
            assert!(matches!(
                rx.try_recv().unwrap(),
                LifecycleEvent::GameStart { .. }
            ));
        }
    }
}
