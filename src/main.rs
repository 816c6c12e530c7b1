use anyhow::Result;
use clap::Parser;
use foodoiliq::cli::{Cli, Commands, GlobalArgs};
use foodoiliq::commands;
use foodoiliq::config::FoodOilConfig;
use foodoiliq::formatting::FormattingConfig;
use foodoiliq::io::output::create_writer;
use foodoiliq::progress::ProgressConfig;
use foodoiliq::store::{InMemoryAlertRepository, InMemoryBatchRepository};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.global.verbosity);
    run_command(cli.command, &cli.global)
}

fn run_command(command: Commands, global: &GlobalArgs) -> Result<()> {
    // init writes the config file, so it must not require one
    let config = match command {
        Commands::Init { .. } => FoodOilConfig::default(),
        _ => commands::resolve_config(global.config.as_deref())?,
    };
    let mut writer = create_writer(
        global.format.into(),
        create_formatting_config(global.plain),
    );
    let writer = writer.as_mut();

    match command {
        Commands::Classify { value, limit } => {
            commands::classify::classify_value(value, limit, writer)
        }
        Commands::Assess {
            ffa,
            tpc,
            pv,
            confidence,
            standard,
        } => commands::assess::assess_readings(
            commands::assess::AssessArgs {
                ffa,
                tpc,
                pv,
                confidence,
                standard: standard.map(Into::into),
            },
            &config,
            writer,
        ),
        Commands::Report { input, output } => {
            commands::report::generate_report(&input, output.as_deref(), &config, writer)
        }
        Commands::Test {
            batch,
            seed,
            report_dir,
            offline_api,
        } => {
            let batches = InMemoryBatchRepository::with_sample_data();
            let alerts = InMemoryAlertRepository::new();
            commands::test::run_test(
                &commands::test::TestArgs {
                    batch,
                    seed,
                    report_dir,
                    offline_api,
                },
                &config,
                &batches,
                &alerts,
                &ProgressConfig::from_env(global.quiet),
                writer,
            )
        }
        Commands::Batches { station, status } => commands::batches::list_batches(
            &InMemoryBatchRepository::with_sample_data(),
            station,
            status.map(Into::into),
            writer,
        ),
        Commands::Standards => commands::standards::list_standards(writer),
        Commands::Init { force } => commands::init::init_config(force),
    }
}

// RUST_LOG, when set, wins over -v
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).format_timestamp(None);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

fn create_formatting_config(plain: bool) -> FormattingConfig {
    if plain {
        FormattingConfig::plain()
    } else {
        FormattingConfig::from_env()
    }
}
