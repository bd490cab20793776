use anyhow::{bail, Context};
use clap::Parser;
use intake_client::api::IntakeApi;
use intake_client::config::ClientConfig;
use intake_wizard::controller::{TransitionOutcome, WizardConfig, WizardController};
use intake_wizard::session::WizardSession;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod script;

use cli::{Cli, Commands};
use script::IntakeScript;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "intake_cli=info,intake_wizard=info,intake_client=info".into()
            }),
        )
        .with(cli.log_json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!cli.log_json).then(tracing_subscriber::fmt::layer))
        .init();

    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url.trim_end_matches('/').to_string();
    }

    let api = IntakeApi::from_config(&config).context("Failed to build HTTP client")?;
    tracing::info!(base_url = %api.base_url(), "Intake client ready");

    let controller = WizardController::new(
        api,
        WizardConfig {
            strict_validation: config.strict_validation,
            ..Default::default()
        },
    );

    match cli.command {
        Commands::Run { script } => {
            let raw = tokio::fs::read_to_string(&script)
                .await
                .with_context(|| format!("Failed to read {}", script.display()))?;
            run(&controller, IntakeScript::from_json(&raw)?).await
        }
        Commands::Search { query } => {
            let mut session = WizardSession::new();
            controller.search(&mut session, &query).await?;
            println!(
                "{}",
                serde_json::to_string_pretty(session.search_results.candidates())?
            );
            Ok(())
        }
    }
}

/// Drive one session from step one to the finish.
async fn run(controller: &WizardController<IntakeApi>, script: IntakeScript) -> anyhow::Result<()> {
    let mut session = WizardSession::new();
    tracing::info!(session_id = %session.id(), "Intake session started");

    expect_moved(controller.next(&mut session).await)?;

    if let Some(query) = &script.search {
        controller.search(&mut session, query).await?;
    }
    script.apply_donor(&mut session)?;
    expect_moved(controller.next(&mut session).await)?;

    script.apply_garments(&mut session)?;
    let submitted = session.pending.checked().count();
    let location = match controller.next(&mut session).await {
        TransitionOutcome::Finished { location } => location,
        other => bail!("Garment submission did not finish the wizard: {other:?}"),
    };

    let report = serde_json::json!({
        "session_id": session.id(),
        "person_id": session.person_id(),
        "donor_id": session.donor_id(),
        "submitted": submitted,
        "location": location,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn expect_moved(outcome: TransitionOutcome) -> anyhow::Result<()> {
    match outcome {
        TransitionOutcome::Moved { .. } => Ok(()),
        TransitionOutcome::Vetoed(veto) => Err(veto.into()),
        TransitionOutcome::Finished { .. } => bail!("The wizard finished early"),
    }
}
