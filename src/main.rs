use pokemon_duel::{
    BattleConfig, BattleResult, BattleSession, PlayerAction, SideToken, SpeciesCatalog,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

const ROSTER_SIZE: usize = 3;
const POLL_INTERVAL: Duration = Duration::from_millis(5);
const MATCH_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // Usage: pokemon-duel [config.ron]
    let config = match std::env::args().nth(1) {
        Some(path) => BattleConfig::load(&PathBuf::from(path))?,
        None => BattleConfig::default(),
    };
    let catalog = SpeciesCatalog::load(&config.data_path)?;

    let base_seed = config.seed.unwrap_or_else(rand::random);
    let quick = catalog.quick_battle(ROSTER_SIZE, &mut StdRng::seed_from_u64(base_seed))?;
    tracing::info!(
        roster_a = ?quick.roster_a,
        roster_b = ?quick.roster_b,
        score_a = quick.score_a,
        score_b = quick.score_b,
        favourite = ?quick.winner,
        "rosters drawn"
    );

    let (session, token_a, token_b) =
        BattleSession::create(&catalog, &quick.roster_a, &quick.roster_b, &config)?;
    let session = Arc::new(session);
    tracing::info!(battle_id = session.battle_id(), "duel started");

    let player_a = tokio::spawn(play(Arc::clone(&session), token_a, base_seed));
    let player_b = tokio::spawn(play(Arc::clone(&session), token_b, base_seed.wrapping_add(1)));

    match tokio::time::timeout(MATCH_TIMEOUT, async { tokio::join!(player_a, player_b) }).await {
        Ok((a, b)) => {
            a??;
            b??;
        }
        Err(_) => tracing::warn!("duel stalled, printing the current state"),
    }

    let view_a = session.snapshot(&token_a)?;
    for line in &view_a.log {
        println!("{}", line);
    }
    println!();
    println!("{}", serde_json::to_string_pretty(&view_a)?);
    println!("{}", serde_json::to_string_pretty(&session.snapshot(&token_b)?)?);

    Ok(())
}

/// A simulated remote participant picking random legal actions.
async fn play(session: Arc<BattleSession>, token: SideToken, seed: u64) -> BattleResult<()> {
    let mut rng = StdRng::seed_from_u64(seed);

    loop {
        let view = session.snapshot(&token)?;
        if view.decided {
            return Ok(());
        }
        if !view.can_act {
            tokio::time::sleep(POLL_INTERVAL).await;
            continue;
        }

        let actions = session.valid_actions(&token)?;
        let Some(action) = choose_action(&actions, &mut rng) else {
            tracing::warn!(%token, "no legal action left");
            return Ok(());
        };

        let submitted = match action {
            PlayerAction::UseMove { move_index } => session.select_move(&token, move_index),
            PlayerAction::SwitchPokemon { team_index } => session.select_switch(&token, team_index),
        };
        match submitted {
            Ok(Some(bus)) => tracing::info!(turn = view.turn, events = bus.len(), "turn resolved"),
            Ok(None) => {}
            // The state moved between the snapshot and the submission; look again.
            Err(err) => tracing::debug!(%token, %err, "submission rejected"),
        }
        tokio::task::yield_now().await;
    }
}

// Attacks most of the time, switches occasionally.
fn choose_action(actions: &[PlayerAction], rng: &mut StdRng) -> Option<PlayerAction> {
    let (moves, switches): (Vec<PlayerAction>, Vec<PlayerAction>) = actions
        .iter()
        .partition(|action| matches!(action, PlayerAction::UseMove { .. }));

    let pool = if switches.is_empty() || (!moves.is_empty() && rng.random_range(0..10) < 8) {
        moves
    } else {
        switches
    };

    if pool.is_empty() {
        return None;
    }
    Some(pool[rng.random_range(0..pool.len())])
}
