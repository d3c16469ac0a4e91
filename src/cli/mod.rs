pub mod assistant;
pub mod day;
pub mod history;
pub mod output;
pub mod session;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use day::{
    ensure_today, parse_weight, set_minutes, toggle_diet, toggle_exercise, Counter, DayArgs,
    ExerciseKind, Meal,
};
use session::{run_session, SessionKind};
use tracing::{error, info, level_filters::LevelFilter};

use crate::{
    briefing::gemini::GeminiGenerator,
    storage::{
        backend::{FileBackend, StorageBackend},
        entities::{DayPart, DayRecord},
        record_storage::RecordStore,
    },
    utils::{
        clock::{Clock, DefaultClock},
        config::Config,
        dir::{create_application_default_path, ensure_dir},
        logging::{enable_logging, CLI_PREFIX},
        time::date_to_record_key,
    },
};

const RECORDS_DIR: &str = "records";

#[derive(Parser, Debug)]
#[command(name = "Rhythm", version, long_about = None)]
#[command(about = "Daily habit tracker for diet, exercise, meditation and study", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, global = true, help = "Enable logging")]
    log: bool,
    #[arg(
        long,
        global = true,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Show everything recorded for a day")]
    Show {
        #[command(flatten)]
        day: DayArgs,
    },
    #[command(about = "Toggle a diet check-in")]
    Diet {
        meal: Meal,
        #[command(flatten)]
        day: DayArgs,
    },
    #[command(about = "Toggle an exercise check-in")]
    Exercise {
        kind: ExerciseKind,
        #[command(flatten)]
        day: DayArgs,
    },
    #[command(about = "Set the weight in kg. Without a value the weight is cleared")]
    Weight {
        value: Option<String>,
        #[command(flatten)]
        day: DayArgs,
    },
    #[command(about = "Replace the study notes")]
    Notes {
        text: String,
        #[command(flatten)]
        day: DayArgs,
    },
    #[command(about = "Set the minutes of a meditation or study counter for today")]
    Minutes {
        counter: Counter,
        value: u32,
        #[command(flatten)]
        day: DayArgs,
    },
    #[command(about = "Start a focus study stopwatch, Ctrl-C finishes it")]
    Focus {},
    #[command(about = "Start a guided meditation stopwatch, Ctrl-C finishes it")]
    Meditate { part: DayPart },
    #[command(about = "List all recorded days, newest first")]
    History {},
    #[command(about = "Write all records into a backup file")]
    Export {
        #[arg(
            long,
            short,
            help = "Backup file. Defaults to rhythm_backup_<today>.json in the current directory"
        )]
        output: Option<PathBuf>,
    },
    #[command(about = "Replace all records with a backup file")]
    Import { file: PathBuf },
    #[command(about = "Generate and store the daily review of a day")]
    Briefing {
        #[command(flatten)]
        day: DayArgs,
    },
    #[command(about = "Generate a commendation for what was done on a day")]
    Report {
        #[command(flatten)]
        day: DayArgs,
    },
    #[command(about = "Print the configuration in use")]
    Config {},
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = args
        .dir
        .map_or_else(create_application_default_path, ensure_dir)?;

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(CLI_PREFIX, &app_dir, logging_level, args.log)?;

    let config = Config::load(&app_dir)?;
    let store = RecordStore::with_key(
        FileBackend::new(app_dir.join(RECORDS_DIR))?,
        config.storage_key.clone(),
    );
    let clock = DefaultClock;

    match args.commands {
        Commands::Show { day } => {
            let date = date_to_record_key(day.resolve(clock.time())?);
            println!("{}", output::format_record(&store.get_record_for_date(&date)));
        }
        Commands::Diet { meal, day } => {
            let date = date_to_record_key(day.resolve(clock.time())?);
            let record = update_record(&store, &date, |record| {
                toggle_diet(record, meal);
                Ok(())
            })?;
            println!("{}", output::format_record(&record));
        }
        Commands::Exercise { kind, day } => {
            let date = date_to_record_key(day.resolve(clock.time())?);
            let record = update_record(&store, &date, |record| {
                toggle_exercise(record, kind);
                Ok(())
            })?;
            println!("{}", output::format_record(&record));
        }
        Commands::Weight { value, day } => {
            let date = date_to_record_key(day.resolve(clock.time())?);
            let weight = parse_weight(value.as_deref().unwrap_or_default())?;
            let record = update_record(&store, &date, |record| {
                record.weight = weight;
                Ok(())
            })?;
            println!("{}", output::format_record(&record));
        }
        Commands::Notes { text, day } => {
            let date = date_to_record_key(day.resolve(clock.time())?);
            let record = update_record(&store, &date, |record| {
                record.focus.notes = text;
                Ok(())
            })?;
            println!("{}", output::format_record(&record));
        }
        Commands::Minutes {
            counter,
            value,
            day,
        } => {
            let day = day.resolve(clock.time())?;
            ensure_today(day, clock.today())?;
            let record = update_record(&store, &date_to_record_key(day), |record| {
                set_minutes(record, counter, value);
                Ok(())
            })?;
            println!("{}", output::format_record(&record));
        }
        Commands::Focus {} => {
            run_session(&store, Box::new(DefaultClock), SessionKind::Focus).await?;
        }
        Commands::Meditate { part } => {
            run_session(&store, Box::new(DefaultClock), SessionKind::Meditation(part)).await?;
        }
        Commands::History {} => history::print_history(&store),
        Commands::Export { output } => {
            let path = output
                .unwrap_or_else(|| PathBuf::from(history::default_backup_name(clock.today())));
            history::export_backup(&store, &path)?;
            println!("Exported into {}", path.display());
        }
        Commands::Import { file } => {
            let count = history::import_backup(&store, &file)?;
            println!("Imported {count} days");
        }
        Commands::Briefing { day } => {
            let day = day.resolve(clock.time())?;
            let generator = GeminiGenerator::new(&config, Config::api_key())?;
            println!("{}", assistant::write_briefing(&store, &generator, day).await);
        }
        Commands::Report { day } => {
            let day = day.resolve(clock.time())?;
            let generator = GeminiGenerator::new(&config, Config::api_key())?;
            println!("{}", assistant::hero_report(&store, &generator, day).await);
        }
        Commands::Config {} => {
            println!("# {}", Config::path(&app_dir).display());
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }
    Ok(())
}

/// Read-modify-write of a single day. The record is saved even if saving fails to be logged,
/// the updated value is returned either way.
fn update_record<B: StorageBackend>(
    store: &RecordStore<B>,
    date: &str,
    update: impl FnOnce(&mut DayRecord) -> Result<()>,
) -> Result<DayRecord> {
    let mut record = store.get_record_for_date(date);
    update(&mut record)?;
    save_logged(store, &record);
    Ok(record)
}

/// Failed saves don't stop the command, the error is only reported.
fn save_logged<B: StorageBackend>(store: &RecordStore<B>, record: &DayRecord) {
    match store.save_record(record) {
        Ok(()) => info!("Saved record for {}", record.date),
        Err(e) => {
            error!("Failed to save record for {}: {e}", record.date);
            eprintln!("Failed to save {}: {e}", record.date);
        }
    }
}
