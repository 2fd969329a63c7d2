use crate::battle::engine;
use crate::battle::state::{BattleState, EventBus, TurnRng, Winner};
use crate::battle::view::{snapshot, StateView};
use crate::config::BattleConfig;
use crate::errors::{BattleResult, BattleStateError, DataResult};
use crate::player::{PlayerAction, Side};
use crate::species::SpeciesProvider;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Opaque capability identifying one side of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SideToken(u128);

impl SideToken {
    fn generate() -> Self {
        SideToken(rand::random::<u128>())
    }
}

impl fmt::Display for SideToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

struct SessionInner {
    state: BattleState,
    rng: TurnRng,
}

/// A battle shared between two independent callers.
///
/// Every mutation goes through one lock, so "both slots filled, resolve" is
/// observed and acted upon atomically. With `auto_resolve` on, the submission
/// that completes the turn resolves it and is the only caller that receives
/// the turn's events.
pub struct BattleSession {
    battle_id: String,
    tokens: [SideToken; 2],
    auto_resolve: bool,
    inner: Mutex<SessionInner>,
}

impl BattleSession {
    /// Build a session from two rosters of species names.
    /// Returns the session and the tokens for side A and side B.
    pub fn create<P, S>(
        provider: &P,
        roster_a: &[S],
        roster_b: &[S],
        config: &BattleConfig,
    ) -> DataResult<(Self, SideToken, SideToken)>
    where
        P: SpeciesProvider + ?Sized,
        S: AsRef<str>,
    {
        let battle_id = format!("battle-{:08x}", rand::random::<u32>());
        let state = BattleState::from_rosters(battle_id, provider, roster_a, roster_b, config.rules)?;
        let session = Self::with_state(state, config.make_rng(), config.auto_resolve);
        let [token_a, token_b] = session.tokens;
        Ok((session, token_a, token_b))
    }

    /// Wrap an already-built battle.
    pub fn with_state(state: BattleState, rng: TurnRng, auto_resolve: bool) -> Self {
        let token_a = SideToken::generate();
        let mut token_b = SideToken::generate();
        while token_b == token_a {
            token_b = SideToken::generate();
        }

        Self {
            battle_id: state.battle_id.clone(),
            tokens: [token_a, token_b],
            auto_resolve,
            inner: Mutex::new(SessionInner { state, rng }),
        }
    }

    pub fn battle_id(&self) -> &str {
        &self.battle_id
    }

    pub fn token(&self, side: Side) -> SideToken {
        self.tokens[side.to_index()]
    }

    pub fn select_move(&self, token: &SideToken, move_index: usize) -> BattleResult<Option<EventBus>> {
        self.submit(token, PlayerAction::UseMove { move_index })
    }

    pub fn select_switch(&self, token: &SideToken, team_index: usize) -> BattleResult<Option<EventBus>> {
        self.submit(token, PlayerAction::SwitchPokemon { team_index })
    }

    /// Resolve the current turn explicitly. Fails unless every required side has acted.
    pub fn resolve_turn(&self) -> BattleResult<EventBus> {
        let mut inner = self.lock();
        let SessionInner { state, rng } = &mut *inner;
        engine::resolve_turn(state, rng)
    }

    pub fn snapshot(&self, token: &SideToken) -> BattleResult<StateView> {
        let side = self.side_for(token)?;
        Ok(snapshot(&self.lock().state, side))
    }

    /// Legal actions for the token's side right now.
    pub fn valid_actions(&self, token: &SideToken) -> BattleResult<Vec<PlayerAction>> {
        let side = self.side_for(token)?;
        Ok(engine::get_valid_actions(&self.lock().state, side))
    }

    pub fn is_decided(&self) -> bool {
        self.lock().state.is_decided()
    }

    pub fn winner(&self) -> Option<Winner> {
        self.lock().state.winner()
    }

    fn submit(&self, token: &SideToken, action: PlayerAction) -> BattleResult<Option<EventBus>> {
        let side = self.side_for(token)?;
        let mut inner = self.lock();
        let SessionInner { state, rng } = &mut *inner;

        engine::set_player_action(state, side, action)?;

        if self.auto_resolve && engine::ready_for_turn_resolution(state) {
            return engine::resolve_turn(state, rng).map(Some);
        }
        Ok(None)
    }

    fn side_for(&self, token: &SideToken) -> BattleResult<Side> {
        Side::BOTH
            .into_iter()
            .find(|side| self.tokens[side.to_index()] == *token)
            .ok_or_else(|| BattleStateError::UnknownSideToken.into())
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for BattleSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BattleSession")
            .field("battle_id", &self.battle_id)
            .field("auto_resolve", &self.auto_resolve)
            .finish_non_exhaustive()
    }
}
