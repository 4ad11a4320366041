//! Transport-facing entry points: admission, confirmation, disconnect.
//!
//! The transport collaborator owns connections and wire encoding. For
//! each named inbound message it calls the matching method here with
//! already-decoded arguments, and delivers whatever reply shape comes
//! back. Lifecycle traffic in the other direction never passes through
//! this type; it travels over the [`EventNotifier`] channels the
//! transport registered at accept time.
//!
//! Internal failures are converted to generic failure replies at this
//! boundary rather than leaking error details to clients.

use gridfall_events::EventNotifier;
use gridfall_lobby::Lobby;
use gridfall_matchmaking::Matchmaker;
use gridfall_player::{PlayerError, PlayerProfile, PlayerService};
use gridfall_protocol::{GameId, JoinReply, LobbyJoined, PlayerId, PublicId, SocketId};
use gridfall_store::{KvStore, ProfileStore};
use tracing::{error, info, warn};

use crate::GridfallError;

/// The inbound face of the backend.
#[derive(Clone)]
pub struct Gateway<K, P> {
    lobby: Lobby<K>,
    players: PlayerService<K, P>,
    matchmaker: Matchmaker<K, P>,
    notifier: EventNotifier,
}

impl<K, P> Gateway<K, P>
where
    K: KvStore + Clone,
    P: ProfileStore + Clone,
{
    pub fn new(
        lobby: Lobby<K>,
        players: PlayerService<K, P>,
        matchmaker: Matchmaker<K, P>,
        notifier: EventNotifier,
    ) -> Self {
        Self {
            lobby,
            players,
            matchmaker,
            notifier,
        }
    }

    /// Registers a connection's event channel with the notifier.
    pub fn connected(
        &self,
        socket_id: SocketId,
    ) -> tokio::sync::mpsc::UnboundedReceiver<gridfall_events::LifecycleEvent>
    {
        self.notifier.register(socket_id)
    }

    /// Handles `join-lobby`.
    ///
    /// Loads or creates the player's profile, admits them to the
    /// waiting pool, and kicks off a background matchmaking attempt.
    /// A rejected profile (bad arguments) gets a retryable error; an
    /// internal failure gets a fatal one.
    pub async fn join_lobby(
        &self,
        socket_id: SocketId,
        claimed_id: Option<&str>,
        username: &str,
    ) -> LobbyJoined<PlayerProfile> {
        match self.admit(socket_id, claimed_id, username).await {
            Ok(player) => {
                self.spawn_matchmaking_attempt();
                LobbyJoined::Success { player }
            }
            Err(GridfallError::Player(PlayerError::Incomplete(field))) => {
                warn!(%field, "lobby join rejected");
                LobbyJoined::Error { retry: true }
            }
            Err(err) => {
                error!(%err, "lobby join failed");
                LobbyJoined::FatalError { retry: false }
            }
        }
    }

    /// Handles `join-game`, the readiness confirmation.
    ///
    /// The happy path is silent; only an internal failure produces a
    /// reply. Invalid credentials are reported through the event
    /// notifier, not here.
    pub async fn join_game(
        &self,
        socket_id: &SocketId,
        player_id: PlayerId,
        public_id: PublicId,
        game_id: GameId,
    ) -> Option<JoinReply> {
        match self
            .matchmaker
            .confirm_ready(socket_id, player_id, public_id, game_id)
            .await
        {
            Ok(_) => None,
            Err(err) => {
                error!(%err, %game_id, "readiness confirmation failed");
                Some(JoinReply::FatalError { retry: false })
            }
        }
    }

    /// Handles a dropped connection.
    ///
    /// Removes the player from the waiting pool and clears their
    /// identity mapping, then kicks off a fresh matchmaking attempt in
    /// case the departure unblocked a batch. A drop during an open
    /// readiness window does not touch the pending session; the window
    /// runs out and compensation handles the absence.
    pub async fn disconnect(&self, socket_id: SocketId) {
        if let Err(err) = self.cleanup(&socket_id).await {
            error!(%err, %socket_id, "disconnect cleanup failed");
        }
        self.notifier.unregister(&socket_id);
        self.spawn_matchmaking_attempt();
    }

    /// Reserved hook for the position-select message. Accepted and
    /// dropped until placement mechanics exist upstream.
    pub async fn select_position(&self, socket_id: &SocketId) {
        info!(%socket_id, "select_position received, not yet handled");
    }

    /// Reserved hook for the animation-complete message.
    pub async fn animation_complete(&self, socket_id: &SocketId) {
        info!(%socket_id, "animation_complete received, not yet handled");
    }

    async fn admit(
        &self,
        socket_id: SocketId,
        claimed_id: Option<&str>,
        username: &str,
    ) -> Result<PlayerProfile, GridfallError> {
        let player = self
            .players
            .load_player(claimed_id, socket_id, username)
            .await?;
        self.lobby.add(&player).await?;
        info!(player_id = %player.id, %username, "player admitted to lobby");
        Ok(player)
    }

    async fn cleanup(&self, socket_id: &SocketId) -> Result<(), GridfallError> {
        if let Some(player) = self.players.by_socket_id(socket_id).await? {
            self.lobby.remove(player.id).await?;
        }
        self.players.disconnected(socket_id).await?;
        Ok(())
    }

    /// Runs one matchmaking attempt off the caller's flow. Attempt
    /// failures are logged; the triggering request already got its
    /// reply.
    fn spawn_matchmaking_attempt(&self) {
        let matchmaker = self.matchmaker.clone();
        tokio::spawn(async move {
            if let Err(err) = matchmaker.try_matchmake().await {
                warn!(%err, "matchmaking attempt failed");
            }
        });
    }
}
