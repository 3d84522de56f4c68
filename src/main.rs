//! leveled-log demo
//!
//! Binds the `--log.*` flags next to its own arguments, builds a logger and
//! writes a burst of sample records in every call shape, including records
//! that arrive through the `tracing` redirect.
//!
//! ```text
//! leveled-log --log.format=json --log.level=debug --repeat 3
//! ```

use std::time::Duration;

use clap::{CommandFactory, FromArgMatches, Parser};

use leveled_log::{context, field, global, kv, Logger, Options, KEY_REQUEST_ID, KEY_USER_NAME};

#[derive(Parser, Debug)]
#[command(name = "leveled-log")]
#[command(about = "Write sample records through a configured logger", long_about = None)]
struct Cli {
    /// How many times the sample burst is written
    #[arg(long, default_value_t = 1)]
    repeat: u32,

    /// Print the effective logger options as JSON and exit
    #[arg(long)]
    print_options: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut options = Options::default();
    let matches = options.add_flags(Cli::command()).get_matches();
    let cli = Cli::from_arg_matches(&matches)?;
    options.apply_flags(&matches);
    options.validate()?;

    if cli.print_options {
        println!("{options}");
        return Ok(());
    }

    let logger = Logger::try_new(&options)?;
    global::init(logger.clone());

    logger.info(
        "leveled-log starting",
        &[
            field::string("format", &options.format),
            field::string("level", &options.level),
        ],
    );

    for i in 0..cli.repeat {
        logger.debugf(format_args!("burst {} of {}", i + 1, cli.repeat));
        logger.infow(
            "request handled",
            &kv![
                KEY_REQUEST_ID,
                format!("req-{i}"),
                KEY_USER_NAME,
                "demo",
                "latency",
                Duration::from_millis(12),
            ],
        );

        let verbose = logger.v(1);
        if verbose.enabled() {
            verbose.info("verbose detail", &[field::uint32("iteration", i)]);
        }
    }

    let worker = logger
        .with_name("worker")
        .with(&[field::int("pid", std::process::id())]);
    context::scope(worker, async {
        if let Some(log) = context::current() {
            log.warn("running inside a task scope", &[]);
        }
    })
    .await;

    tracing::info!(source = "tracing", "redirected through the std bridge");

    global::get().flush();
    Ok(())
}
