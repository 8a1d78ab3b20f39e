use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::process::ExitCode;
use termcolor::{BufferWriter, ColorChoice};
use tracing_subscriber::EnvFilter;

use unbound_setup::config::{SetupConfig, DEFAULT_MODELS_URL};
use unbound_setup::platform::expand_tilde_path;
use unbound_setup::setup::{self, SetupOutcome};
use unbound_setup::{error, warn};

// ============================================================================
// ERROR HANDLING STRATEGY
// ============================================================================
//
// CRITICAL I/O - Errors propagated with `?` operator:
//   • User input: io::stdin().read_line(), stdout flush before a prompt
//   • Platform detection and HTTP client construction
//
// NON-FATAL - Reported and carried in the outcome:
//   • Verification failures (offered a retry)
//   • Routing variable writes (remaining writes still run)
//
// DECORATIVE I/O - Errors ignored with `let _ =`:
//   • Terminal coloring and status messages
//
// Anything that reaches main is printed as a single line and exits 1.
// Ctrl+C prints a cancellation notice and exits 0.
// ============================================================================

#[derive(Parser)]
#[command(name = "unbound-setup")]
#[command(version, about = "Configure Unbound API access for Claude Code")]
struct Cli {
    /// Show current configuration
    #[arg(long)]
    show: bool,

    /// Verify the API key but write nothing
    #[arg(long, conflicts_with = "show")]
    dry_run: bool,

    /// Print debug diagnostics to stderr
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Shell profile to write instead of the detected one
    #[arg(long, env = "UNBOUND_SETUP_PROFILE")]
    profile: Option<String>,

    /// Endpoint used to verify the API key
    #[arg(long, env = "UNBOUND_SETUP_MODELS_URL", default_value = DEFAULT_MODELS_URL)]
    models_url: String,
}

impl Cli {
    fn to_config(&self) -> Result<SetupConfig> {
        let profile_override = self
            .profile
            .as_deref()
            .map(expand_tilde_path)
            .transpose()
            .context("Invalid --profile")?;

        Ok(SetupConfig {
            models_url: self.models_url.clone(),
            profile_override,
            dry_run: self.dry_run,
            ..SetupConfig::default()
        })
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "unbound_setup=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Prompts block on stdin. The flow gets a blocking-pool thread with its
    // own runtime so no worker is ever stuck and Ctrl+C is always delivered.
    let flow = tokio::task::spawn_blocking(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Failed to build setup runtime")?;
        rt.block_on(run(cli))
    });

    tokio::select! {
        joined = flow => match joined {
            Ok(Ok(())) => ExitCode::SUCCESS,
            Ok(Err(e)) => {
                eprintln!();
                error!("An error occurred: {e:#}");
                ExitCode::FAILURE
            }
            Err(e) => {
                eprintln!();
                error!("An error occurred: {e}");
                ExitCode::FAILURE
            }
        },
        Ok(()) = tokio::signal::ctrl_c() => {
            eprintln!("\n");
            warn!("Setup cancelled by user.");
            std::process::exit(0);
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.to_config()?;

    if cli.show {
        {
            let bufwtr = BufferWriter::stdout(ColorChoice::Auto);
            let mut buffer = bufwtr.buffer();
            let _ = writeln!(&mut buffer, "📋 Current Setup Configuration\n");
            let _ = bufwtr.print(&buffer);
        }

        return setup::show_config(&config).await.map_err(Into::into);
    }

    {
        let bufwtr = BufferWriter::stdout(ColorChoice::Auto);
        let mut buffer = bufwtr.buffer();
        // Welcome banner - errors ignored (see module-level docs)
        let _ = writeln!(&mut buffer, "{}", "=".repeat(60));
        let _ = writeln!(&mut buffer, "Claude Code - Environment Setup");
        let _ = writeln!(&mut buffer, "Platform: {}", std::env::consts::OS);
        let _ = writeln!(&mut buffer, "{}", "=".repeat(60));
        let _ = bufwtr.print(&buffer);
    }

    match setup::interactive_setup(&config).await? {
        SetupOutcome::Completed { routing, reports } => {
            tracing::debug!(routing = routing.label(), written = reports.len(), "setup completed");
        }
        SetupOutcome::Aborted(reason) => {
            tracing::debug!(?reason, "setup aborted");
        }
    }

    Ok(())
}
