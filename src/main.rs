use clap::Parser;
use miette::Result;
use tracekit::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }

    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    init_tracing(global.quiet, global.verbose);

    match cli.command {
        Commands::List(args) => tracekit::cli::commands::list::run(args, &global),
        Commands::Load(args) => tracekit::cli::commands::load::run(args, &global),
        Commands::Bundle(args) => tracekit::cli::commands::bundle::run(args, &global),
        Commands::Stats(args) => tracekit::cli::commands::stats::run(args, &global),
    }
}

/// Route library log events to stderr, with verbosity from the CLI flags.
/// `RUST_LOG` still wins when set.
fn init_tracing(quiet: bool, verbose: bool) {
    let default_level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
