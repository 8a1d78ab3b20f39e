//! Interactive setup workflow

use crate::config::SetupConfig;
use crate::error::Result;
use crate::persist::{EnvWriter, PersistOutcome, PersistReport};
use crate::plan::{EnvAssignment, EnvVar, RoutingChoice};
use crate::platform::{self, PersistTarget};
use crate::prompts::{
    prompt_required, prompt_with_default, prompt_yes_no, section, Console, Terminal,
};
use crate::verify::{ApiKeyVerifier, Verification};
use crate::error as error_msg;
use std::io::Write;
use termcolor::{BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

/// Why a run stopped before completing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    /// User quit or input ended at the key prompt
    Cancelled,
    /// Verification failed and the user chose not to retry
    VerificationDeclined,
    /// `UNBOUND_API_KEY` could not be written
    ApiKeyNotPersisted(String),
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupOutcome {
    Completed {
        routing: RoutingChoice,
        /// One report per variable, API key first
        reports: Vec<PersistReport>,
    },
    Aborted(AbortReason),
}

enum KeyCollection {
    Verified(String),
    Aborted(AbortReason),
}

/// Interactive setup on the real terminal
pub async fn interactive_setup(config: &SetupConfig) -> Result<SetupOutcome> {
    let target = platform::detect(config.profile_override.as_deref())?;
    let verifier = ApiKeyVerifier::new(&config.models_url)?;
    let writer = EnvWriter::new(target).with_dry_run(config.dry_run);

    run_setup(&mut Terminal, &verifier, &writer, config).await
}

/// Drive the full flow: collect and verify the key, persist it, pick a
/// routing mode, persist the routing variables, print instructions.
///
/// Nothing is written unless a key was verified.
pub async fn run_setup<C: Console + ?Sized>(
    console: &mut C,
    verifier: &ApiKeyVerifier,
    writer: &EnvWriter,
    config: &SetupConfig,
) -> Result<SetupOutcome> {
    if config.dry_run {
        let bufwtr = BufferWriter::stdout(ColorChoice::Auto);
        let mut buffer = bufwtr.buffer();
        let _ = buffer.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)));
        let _ = writeln!(&mut buffer, "\n🔍 DRY RUN MODE - No changes will be made");
        let _ = buffer.reset();
        let _ = bufwtr.print(&buffer);
    }

    let api_key = match collect_verified_key(console, verifier).await? {
        KeyCollection::Verified(key) => key,
        KeyCollection::Aborted(reason) => {
            if reason == AbortReason::Cancelled {
                println!("\nSetup cancelled. No changes were made.");
            }
            return Ok(SetupOutcome::Aborted(reason));
        }
    };

    section("Setting Environment Variables");

    let key_assignment = EnvAssignment::new(EnvVar::ApiKey, api_key);
    let key_report = writer.persist(&key_assignment).await;
    if let PersistOutcome::Failed(reason) = &key_report.outcome {
        error_msg!("Failed to configure {}: {reason}", EnvVar::ApiKey);
        return Ok(SetupOutcome::Aborted(AbortReason::ApiKeyNotPersisted(
            reason.clone(),
        )));
    }
    print_report(&key_report, &key_assignment, writer.target());
    success!("{} configured successfully", EnvVar::ApiKey);

    let routing = choose_routing(console, config)?;

    println!("\nSetting {} configuration...", routing.label());
    let mut reports = vec![key_report];
    for assignment in routing.assignments() {
        let report = writer.persist(&assignment).await;
        print_report(&report, &assignment, writer.target());
        reports.push(report);
    }

    print_completion(writer.target());

    Ok(SetupOutcome::Completed { routing, reports })
}

/// Prompt for the key until one verifies or the user gives up
async fn collect_verified_key<C: Console + ?Sized>(
    console: &mut C,
    verifier: &ApiKeyVerifier,
) -> Result<KeyCollection> {
    loop {
        let Some(api_key) = prompt_required(console, "Unbound API Key")? else {
            return Ok(KeyCollection::Aborted(AbortReason::Cancelled));
        };

        println!("\nVerifying API key...");
        let verification = verifier.verify(&api_key).await;

        if verification.is_valid() {
            success!("API key verified successfully");
            return Ok(KeyCollection::Verified(api_key));
        }

        report_verification_failure(&verification);

        if !prompt_yes_no(console, "\nWould you like to try again?", true)? {
            println!("\nSetup stopped. No changes were made.");
            return Ok(KeyCollection::Aborted(AbortReason::VerificationDeclined));
        }
    }
}

fn report_verification_failure(verification: &Verification) {
    match verification {
        Verification::Valid(_) => {}
        Verification::EmptyKey => error_msg!("API key is empty"),
        Verification::Rejected { status, message } => {
            match reqwest::StatusCode::from_u16(*status) {
                Ok(code) => error_msg!("API key verification failed: {code}"),
                Err(_) => error_msg!("API key verification failed: {status}"),
            }
            if let Some(message) = message {
                eprintln!("   Error: {message}");
            }
        }
        Verification::UnexpectedBody(shape) => {
            error_msg!("API key verification failed: unexpected response ({shape:?})");
        }
        Verification::MalformedBody(e) => {
            error_msg!("API key verification failed: invalid response body: {e}");
        }
        Verification::Network(e) => error_msg!("API key verification failed: {e}"),
    }
}

/// Ask for the routing mode and, for Vertex, the model pair
fn choose_routing<C: Console + ?Sized>(console: &mut C, config: &SetupConfig) -> Result<RoutingChoice> {
    let bufwtr = BufferWriter::stdout(ColorChoice::Auto);
    let mut buffer = bufwtr.buffer();
    let _ = writeln!(&mut buffer, "\n{}", "─".repeat(60));
    let _ = writeln!(&mut buffer, "🔄 Vertex AI Configuration");
    let _ = writeln!(&mut buffer, "{}", "─".repeat(60));
    let _ = bufwtr.print(&buffer);

    if !prompt_yes_no(console, "Do you want to use Vertex AI models?", false)? {
        return Ok(RoutingChoice::direct(config));
    }

    let mut buffer = bufwtr.buffer();
    let _ = writeln!(&mut buffer, "\n📝 Vertex AI Model Configuration:");
    let _ = writeln!(&mut buffer, "Default models:");
    let _ = writeln!(&mut buffer, "  • Primary model: {}", config.default_model);
    let _ = writeln!(&mut buffer, "  • Small/fast model: {}", config.default_small_fast_model);
    let _ = writeln!(&mut buffer);
    let _ = bufwtr.print(&buffer);

    if prompt_yes_no(console, "Would you like to proceed with the default models?", true)? {
        return Ok(RoutingChoice::model_ids(config, None, None));
    }

    println!("\n📝 Enter custom Vertex AI model IDs:");
    let model = prompt_with_default(console, "Primary model", &config.default_model)?;
    let small_fast_model =
        prompt_with_default(console, "Small/fast model", &config.default_small_fast_model)?;

    Ok(RoutingChoice::model_ids(
        config,
        Some(&model),
        Some(&small_fast_model),
    ))
}

fn print_report(report: &PersistReport, assignment: &EnvAssignment, target: &PersistTarget) {
    let target = target.describe();
    match &report.outcome {
        PersistOutcome::Added => success!("Added {} to {target}", report.var),
        PersistOutcome::AlreadyConfigured => info!("{} already configured in {target}", report.var),
        PersistOutcome::Set => success!("{} set. {}", report.var, report.follow_up),
        PersistOutcome::DryRun => info!(
            "Dry run: would write export {}=\"{}\"",
            assignment.var,
            assignment.display_value()
        ),
        PersistOutcome::Failed(reason) => warn!("{}: {reason}", report.var),
    }
}

fn print_completion(target: &PersistTarget) {
    section("Setup Complete!");

    match target {
        PersistTarget::ShellProfile(path) => {
            println!("\nTo apply the changes in your current terminal:");
            println!("  source {}", path.display());
            println!("\nOr simply open a new terminal window.");
        }
        PersistTarget::WindowsEnvironment => {
            println!("\nTo apply the changes:");
            println!("  Close and reopen your terminal/command prompt");
        }
    }

    section("Next Steps:");
    println!("\n1. Reload your terminal configuration (see above)");
    println!("2. Start using Claude Code with: claude");
    println!("\n{}", "=".repeat(60));
}
