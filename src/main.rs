use galaxy_trader::autoplay::{play_session, Autopilot, SessionReport};
use galaxy_trader::core::config::ArcadeConfig;
use galaxy_trader::core::engine::RewardStatus;
use galaxy_trader::economy::ledger::{load_user, today};
use galaxy_trader::economy::progression::check_daily_streak;
use galaxy_trader::economy::store::{DocumentStore, JsonFileStore, MemoryStore};
use galaxy_trader::identity::{IdentityProvider, LocalIdentity};
use galaxy_trader::utils::build_info;
use galaxy_trader::{Arcade, GameId};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

/// Host time allowed per session before giving up.
const SESSION_LIMIT_MS: u64 = 15 * 60 * 1000;
const PILOT_SKILL: f64 = 0.8;

struct Options {
    games: Vec<GameId>,
    seed: u64,
    user: String,
    store: Option<PathBuf>,
    save: bool,
}

fn print_help() {
    println!("Galaxy Trader - headless mini-game runner\n");
    println!("Usage: galaxy-trader [OPTIONS]\n");
    println!("Options:");
    println!("  --game <id>     Play one game (catcher, shooter, slicer, runner,");
    println!("                  match3, memory, connector, sliding, chess)");
    println!("  --all           Play every game (default)");
    println!("  --seed <n>      Seed for boards and the autopilot");
    println!("  --user <name>   Local player name");
    println!("  --store <path>  Persist the economy to a JSON file");
    println!("  --save          Persist the economy to ~/.galaxy-trader/store.json");
    println!("  --version       Show version information");
    println!("  --help          Show this help message");
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options {
        games: GameId::ALL.to_vec(),
        seed: 7,
        user: "pilot".to_string(),
        store: None,
        save: false,
    };
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut value = |name: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("{name} needs a value"))
        };
        match arg.as_str() {
            "--game" => options.games = vec![value("--game")?.parse()?],
            "--all" => options.games = GameId::ALL.to_vec(),
            "--seed" => {
                options.seed = value("--seed")?
                    .parse()
                    .map_err(|e| format!("bad --seed: {e}"))?
            }
            "--user" => options.user = value("--user")?,
            "--store" => options.store = Some(PathBuf::from(value("--store")?)),
            "--save" => options.save = true,
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(options)
}

fn print_report(report: &SessionReport) {
    let reward = match &report.reward {
        RewardStatus::Committed { amount } => format!("+{amount}"),
        RewardStatus::AlreadyRewarded => "already rewarded today".to_string(),
        RewardStatus::Failed(e) => format!("failed: {e}"),
        RewardStatus::Pending => "pending".to_string(),
        RewardStatus::NotDue => "-".to_string(),
    };
    println!(
        "{:<10} {:<8} {:>5}/{:<5} {:>6.1}s  ads {}  reward {}",
        report.game.as_str(),
        format!("{:?}", report.state),
        report.score,
        report.target_score,
        report.simulated_ms as f64 / 1000.0,
        report.ads_watched,
        reward
    );
    for toast in &report.toasts {
        println!("           [{:?}] {}", toast.level, toast.message);
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return;
    }
    if args.iter().any(|a| a == "--version" || a == "-v") {
        println!("{}", build_info::banner());
        return;
    }
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Run 'galaxy-trader --help' for usage.");
            process::exit(2);
        }
    };

    let file_store = match (&options.store, options.save) {
        (Some(path), _) => Some(JsonFileStore::open(path)),
        (None, true) => Some(JsonFileStore::open_default()),
        (None, false) => None,
    };
    let store: Arc<dyn DocumentStore> = match file_store {
        Some(Ok(store)) => {
            log::info!("economy stored in {}", store.file_path().display());
            Arc::new(store)
        }
        Some(Err(e)) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
        None => Arc::new(MemoryStore::new()),
    };

    let identity = Arc::new(LocalIdentity::new());
    let email = format!("{}@galaxy.local", options.user.to_ascii_lowercase());
    let password = format!("{}-local-pass", options.user);
    let user = match identity.sign_in(&email, &password).await {
        Ok(user) => user,
        Err(_) => match identity.sign_up(&email, &password, Some(&options.user)).await {
            Ok(user) => user,
            Err(e) => {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        },
    };

    println!("{}", build_info::banner());
    match check_daily_streak(store.as_ref(), &user.uid, today()).await {
        Ok(streak) => println!(
            "{} signed in, streak {} (+{} credits)\n",
            options.user, streak.streak, streak.credits_granted
        ),
        Err(e) => println!("{} signed in ({})\n", options.user, e.to_toast().message),
    }

    let mut arcade = Arcade::new(Arc::clone(&store), identity, ArcadeConfig::load());
    let mut pilot = Autopilot::new(options.seed, PILOT_SKILL);
    let mut wins = 0;
    let mut clock = 0;
    for (i, game) in options.games.iter().enumerate() {
        let mut engine = arcade.mount(*game, options.seed.wrapping_add(i as u64));
        let report = play_session(&mut arcade, &mut engine, &mut pilot, clock, SESSION_LIMIT_MS).await;
        arcade.exit(&mut engine);
        clock += report.frames * galaxy_trader::core::constants::FRAME_MS;
        if report.won() {
            wins += 1;
        }
        print_report(&report);
    }

    println!("\n{wins}/{} won", options.games.len());
    match load_user(store.as_ref(), &user.uid).await {
        Ok(economy) => println!(
            "credits {}  diamonds {}  xp {}  level {}",
            economy.credits, economy.diamonds, economy.xp, economy.level
        ),
        Err(e) => log::warn!("could not read balances: {e}"),
    }
}
