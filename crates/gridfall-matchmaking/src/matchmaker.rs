//! Batch formation, the readiness handshake, and its compensation.

use gridfall_events::{CredentialFault, EventNotifier, LifecycleEvent};
use gridfall_lobby::Lobby;
use gridfall_player::{PlayerProfile, PlayerService};
use gridfall_protocol::{GameId, PlayerId, PublicId, SocketId};
use gridfall_store::{KvStore, ProfileStore};
use tokio::time::sleep;
use tracing::{info, warn};

use crate::{GameService, MatchConfig, MatchmakingError};

/// Drives the lobby-to-session pipeline.
///
/// One attempt claims the admission lock, pulls a full batch out of the
/// lobby, creates the session, and notifies every batch member to
/// confirm. Confirmation arrives through [`Matchmaker::confirm_ready`];
/// the attempt itself just waits out the readiness window and either
/// observes a fully confirmed session or compensates by returning the
/// batch to the lobby.
#[derive(Clone)]
pub struct Matchmaker<K, P> {
    lobby: Lobby<K>,
    games: GameService<K, P>,
    players: PlayerService<K, P>,
    notifier: EventNotifier,
    config: MatchConfig,
}

impl<K: KvStore, P: ProfileStore> Matchmaker<K, P> {
    pub fn new(
        lobby: Lobby<K>,
        games: GameService<K, P>,
        players: PlayerService<K, P>,
        notifier: EventNotifier,
        config: MatchConfig,
    ) -> Self {
        Self {
            lobby,
            games,
            players,
            notifier,
            config,
        }
    }

    /// Runs one matchmaking attempt.
    ///
    /// Waits for the admission lock to clear, then claims a batch if
    /// the lobby holds one. Returns `Ok(true)` when a session formed
    /// and every player confirmed, `Ok(false)` when the lobby was too
    /// small or the batch timed out and was requeued.
    pub async fn try_matchmake(&self) -> Result<bool, MatchmakingError> {
        self.wait_for_unlock().await?;

        let batch = self.lobby.available(self.config.batch_size).await?;
        if batch.len() < self.config.batch_size {
            return Ok(false);
        }

        self.initialize_batch(batch).await
    }

    /// Handles one player's readiness confirmation.
    ///
    /// The claimed identity triple is checked against the stored
    /// record, then the claim of membership against the session. A
    /// mismatch emits `invalid_credentials` to the offending connection
    /// and mutates nothing. On a valid confirmation the player is
    /// marked ready and, once the whole batch has confirmed, the
    /// session starts.
    pub async fn confirm_ready(
        &self,
        socket_id: &SocketId,
        player_id: PlayerId,
        public_id: PublicId,
        game_id: GameId,
    ) -> Result<bool, MatchmakingError> {
        let valid = self
            .players
            .validate_credentials(socket_id, player_id, public_id)
            .await?;
        if !valid {
            warn!(%socket_id, %player_id, "readiness claim failed identity check");
            let known = self.players.by_socket_id(socket_id).await?;
            self.notifier.send_to(
                socket_id,
                LifecycleEvent::InvalidCredentials {
                    invalid: CredentialFault::Identity {
                        claimed_player: player_id,
                        claimed_public: public_id,
                    },
                    valid: known,
                },
            );
            return Ok(false);
        }

        if !self.games.player_in_game(game_id, public_id).await? {
            warn!(%public_id, %game_id, "readiness claim for wrong session");
            self.notifier.send_to(
                socket_id,
                LifecycleEvent::InvalidCredentials {
                    invalid: CredentialFault::Membership { game_id },
                    valid: None,
                },
            );
            return Ok(false);
        }

        self.games.mark_ready(game_id, public_id).await?;
        self.games.start_game(game_id).await?;
        Ok(true)
    }

    /// Polls the admission lock until it clears.
    ///
    /// Each attempt checks the flag and then sleeps for the configured
    /// interval. Exhausting the attempt budget is a fatal
    /// [`MatchmakingError::LockTimeout`].
    async fn wait_for_unlock(&self) -> Result<(), MatchmakingError> {
        for attempt in 0..self.config.lock_poll_attempts {
            if !self.lobby.is_locked().await? {
                return Ok(());
            }
            info!(attempt, "lobby locked, backing off");
            sleep(self.config.lock_poll_interval).await;
        }
        Err(MatchmakingError::LockTimeout)
    }

    /// Locks the lobby, runs the batch, and releases the lock on every
    /// exit path. A failed unlock is logged rather than masking the
    /// batch outcome.
    async fn initialize_batch(
        &self,
        batch: Vec<PlayerProfile>,
    ) -> Result<bool, MatchmakingError> {
        self.lobby.set_locked(true).await?;

        let outcome = self.run_batch(batch).await;

        if let Err(err) = self.lobby.set_locked(false).await {
            warn!(%err, "failed to release admission lock");
        }
        outcome
    }

    async fn run_batch(
        &self,
        batch: Vec<PlayerProfile>,
    ) -> Result<bool, MatchmakingError> {
        let snapshot = self.games.create(&batch).await?;
        info!(game_id = %snapshot.id, "batch claimed, session created");

        for player in &batch {
            self.lobby.remove(player.id).await?;
            self.notifier.send_to(
                &player.socket_id,
                LifecycleEvent::ReadyCheck {
                    player_id: player.id,
                    game_id: snapshot.id,
                },
            );
        }

        self.await_readiness(snapshot.id).await
    }

    /// Sleeps out the readiness window and resolves from a single poll.
    /// The timer is not re-armed and a disconnect does not cut it
    /// short.
    async fn await_readiness(
        &self,
        game_id: GameId,
    ) -> Result<bool, MatchmakingError> {
        sleep(self.config.ready_wait).await;

        if self.games.all_ready(game_id).await? {
            info!(%game_id, "all players confirmed");
            return Ok(true);
        }

        warn!(%game_id, "readiness window elapsed, requeueing batch");
        self.requeue_batch(game_id).await?;
        Ok(false)
    }

    /// Returns every session player to the lobby and discards the
    /// session. Players whose profile is no longer resolvable (they
    /// disconnected during the wait) are skipped.
    async fn requeue_batch(
        &self,
        game_id: GameId,
    ) -> Result<(), MatchmakingError> {
        let snapshot = self.games.snapshot(game_id).await?;
        for player in &snapshot.players {
            match self.players.by_public_id(player.public_id).await? {
                Some(profile) => self.lobby.add(&profile).await?,
                None => {
                    warn!(
                        public_id = %player.public_id,
                        "cannot requeue vanished player"
                    );
                }
            }
        }
        self.games.destroy(game_id).await
    }
}
