use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use map::UnitAction;
use rules::Ruleset;
use unciv_sim::files::{load_game, save_game};
use unciv_sim::{GameInfo, GameParameters, GameStarter};

#[derive(Parser, Debug)]
#[command(author, version, about = "Runs the turn engine headless", long_about = None)]
struct Args {
    /// JSON file with game parameters
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Number of turns to play
    #[arg(short, long, default_value_t = 20)]
    turns: u32,
    /// Map seed, overrides the config
    #[arg(long)]
    seed: Option<u64>,
    /// Map radius, overrides the config
    #[arg(long)]
    radius: Option<i32>,
    /// Civilization name, overrides the config
    #[arg(long)]
    civ: Option<String>,
    /// Where to write the game when done
    #[arg(long)]
    save: Option<PathBuf>,
    /// Continue from this save instead of starting a new game
    #[arg(long)]
    load: Option<PathBuf>,
    /// Write the save gzipped and base64 encoded
    #[arg(long)]
    zip: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut params = match &args.config {
        Some(path) => GameParameters::load(path)?,
        None => GameParameters::default(),
    };
    if let Some(seed) = args.seed {
        params.seed = seed;
    }
    if let Some(radius) = args.radius {
        params.map_radius = radius;
    }
    if let Some(civ) = &args.civ {
        params.civilization_name = civ.clone();
    }

    let ruleset = match &params.ruleset {
        Some(dir) => Ruleset::load_from_dir(dir).with_context(|| format!("loading ruleset from {}", dir.display()))?,
        None => Ruleset::vanilla()?,
    };
    let ruleset = Arc::new(ruleset);

    let mut game = match &args.load {
        Some(path) => match load_game(path, Arc::clone(&ruleset)) {
            Ok(game) => game,
            Err(err) => {
                warn!(path = %path.display(), %err, "no valid save, starting a new game");
                GameStarter::start_new_game(&params, Arc::clone(&ruleset))?
            }
        },
        None => GameStarter::start_new_game(&params, Arc::clone(&ruleset))?,
    };

    prepare_empire(&mut game)?;
    for _ in 0..args.turns {
        spend_free_techs(&mut game)?;
        pick_research(&mut game)?;
        pick_policies(&mut game)?;
        game.next_turn()?;
    }

    let civ = game.current_civ()?;
    info!(
        turn = game.turns,
        civ = %civ.civ_name,
        cities = civ.cities.len(),
        gold = civ.gold,
        techs = civ.tech.techs_researched.len(),
        policies = civ.policies.adopted_policies.len(),
        "simulation finished"
    );
    for notification in &civ.notifications {
        info!(text = %notification.text, "notification");
    }

    if let Some(path) = &args.save {
        save_game(&game, path, args.zip).with_context(|| format!("saving to {}", path.display()))?;
    }
    Ok(())
}

/// Founds the capital with the starting settler and automates idle workers
fn prepare_empire(game: &mut GameInfo) -> anyhow::Result<()> {
    let civ_name = game.current_civ()?.civ_name.clone();
    let own_units: Vec<(map::HexCoord, String, Option<UnitAction>)> = game
        .tile_map
        .tiles()
        .filter_map(|t| t.unit.as_ref().map(|u| (t.position, u)))
        .filter(|(_, u)| u.owner == civ_name)
        .map(|(position, u)| (position, u.name.clone(), u.action.clone()))
        .collect();

    if game.current_civ()?.cities.is_empty() {
        let settler = own_units
            .iter()
            .find(|(_, name, _)| game.ruleset().unit(name).is_some_and(|u| u.founds_city()))
            .map(|(position, _, _)| *position);
        if let Some(position) = settler {
            game.found_city(position)?;
        }
    }
    for (position, name, action) in own_units {
        let is_worker = game.ruleset().unit(&name).is_some_and(|u| u.can_build_improvements());
        if is_worker && action.is_none() {
            game.set_unit_automated(position, true)?;
        }
    }
    Ok(())
}

fn spend_free_techs(game: &mut GameInfo) -> anyhow::Result<()> {
    while game.current_civ()?.tech.free_techs > 0 {
        let Some(tech) = game.current_civ()?.tech.default_free_technology(game.ruleset()) else {
            break;
        };
        if !game.get_free_technology(&tech)? {
            break;
        }
    }
    Ok(())
}

/// Keeps something in the research queue
fn pick_research(game: &mut GameInfo) -> anyhow::Result<()> {
    let civ = game.current_civ()?;
    if civ.tech.current_technology().is_some() {
        return Ok(());
    }
    if let Some(tech) = civ.tech.default_free_technology(game.ruleset()) {
        game.queue_technology(&tech)?;
    }
    Ok(())
}

/// Adopts policies in ruleset order while culture allows
fn pick_policies(game: &mut GameInfo) -> anyhow::Result<()> {
    loop {
        let civ = game.current_civ()?;
        let ruleset = game.ruleset();
        if !civ.policies.can_adopt_policy(civ.culture_needed_for_next_policy(ruleset)) {
            return Ok(());
        }
        let Some(policy) = ruleset
            .policies
            .keys()
            .find(|p| civ.policies.is_adoptable(p, ruleset))
            .cloned()
        else {
            return Ok(());
        };
        if !game.adopt_policy(&policy)? {
            return Ok(());
        }
    }
}
