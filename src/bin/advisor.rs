//! Strategy Advisor
//! Deals a fresh board and prints every agent's opening turn advice

use clap::Parser;
use conquest_ai::ai::{Archetype, Persona, StrategyAgent, TurnAdvice};
use conquest_ai::board::{Board, BoardView};
use conquest_ai::core::types::PlayerId;
use conquest_ai::core::StrategyConfig;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;

/// Strategy Advisor - recommendations for one turn of a conquest game
#[derive(Parser, Debug)]
#[command(name = "advisor")]
#[command(about = "Print AI turn advice for a freshly dealt board")]
struct Args {
    /// Board TOML file (classic 42-territory map when omitted)
    #[arg(long)]
    board: Option<PathBuf>,

    /// Player names; historical names pick their persona
    #[arg(long, value_delimiter = ',', default_value = "Napoleon,Sun Tzu,Elizabeth")]
    players: Vec<String>,

    /// Archetype for players whose name matches no persona
    #[arg(long)]
    archetype: Option<String>,

    /// Extra persona TOML files, assigned to players in order
    #[arg(long, value_delimiter = ',')]
    persona: Vec<PathBuf>,

    /// Armies placed on every territory when dealing
    #[arg(long, default_value_t = 3)]
    armies: u32,

    /// Random seed for reproducible runs
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Strategy tuning overrides
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print advice as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("conquest_ai=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => StrategyConfig::load(path)?,
        None => StrategyConfig::default(),
    };

    let mut board = match &args.board {
        Some(path) => Board::load(path)?,
        None => Board::classic(),
    };

    let archetype = match args.archetype.as_deref() {
        Some(name) => Some(
            Archetype::from_name(name).ok_or_else(|| format!("unknown archetype: {}", name))?,
        ),
        None => None,
    };

    let players: Vec<PlayerId> = args.players.iter().map(|p| PlayerId::new(p.trim())).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    board.deal(&players, args.armies, &mut rng)?;

    tracing::info!(
        territories = board.territories().len(),
        continents = board.continents().len(),
        players = players.len(),
        seed = args.seed,
        "board dealt"
    );

    let mut advice: Vec<TurnAdvice> = Vec::with_capacity(players.len());
    for (i, player) in players.iter().enumerate() {
        let persona = match args.persona.get(i) {
            Some(path) => Persona::load(path)?,
            None => Persona::select(player.as_str(), archetype),
        };
        let mut agent =
            StrategyAgent::new(player.clone(), persona, &mut rng).with_config(config.clone())?;
        advice.push(agent.plan_turn(&board, &mut rng)?);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&advice)?);
        return Ok(());
    }

    for turn in &advice {
        print_advice(turn);
    }
    Ok(())
}

fn print_advice(turn: &TurnAdvice) {
    println!("=== {} ({}) ===", turn.player, turn.persona);
    match &turn.target_continent {
        Some(continent) => println!("  Target continent: {}", continent),
        None => println!("  Target continent: none"),
    }

    let reinforce: Vec<&str> = turn.reinforcement.iter().take(5).map(|t| t.as_str()).collect();
    println!("  Reinforce: {}", reinforce.join(", "));

    println!("  Attacks:");
    for plan in turn.attacks.iter().take(5) {
        println!(
            "    {} -> {} with {} (score {:.3})",
            plan.source, plan.target, plan.committed, plan.score
        );
    }
    if turn.attacks.is_empty() {
        println!("    none");
    }

    match &turn.fortification {
        Some(m) => println!(
            "  Fortify: {} -> {} moving {} via {} steps",
            m.source,
            m.destination,
            m.amount,
            m.path.len().saturating_sub(1)
        ),
        None => println!("  Fortify: none"),
    }
    println!();
}
