//! Command execution: wires configuration, stores, and services together.

use anyhow::{Context, Result};
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use std::sync::Arc;
use tracing::info;

use crate::domain::models::Config;
use crate::infrastructure::analyzer::HttpScenarioAnalyzer;
use crate::infrastructure::database::{
    DatabaseConnection, SqliteAlertLedger, SqliteScenarioStore, SqliteSignalStore,
};
use crate::infrastructure::notify::{SilentNotifier, TelegramNotifier};
use crate::domain::ports::{Notifier, ScenarioStore};
use crate::services::scenario_dispatcher::build_status_report;
use crate::services::{
    Dispatcher, PipelineOutcome, RunSummary, ScenarioCollector, ScenarioDispatcher,
    ScenarioPipeline, ThreatScorer, TriggerEvaluator,
};

/// Shared wiring for every command that touches the database.
struct App {
    connection: DatabaseConnection,
}

impl App {
    async fn open(config: &Config) -> Result<Self> {
        let connection =
            DatabaseConnection::new(&config.database.url, config.database.max_connections)
                .await
                .context("failed to open the signal store")?;
        connection
            .migrate()
            .await
            .context("failed to apply migrations")?;
        Ok(Self { connection })
    }

    fn signal_store(&self) -> Arc<SqliteSignalStore> {
        Arc::new(SqliteSignalStore::new(self.connection.pool().clone()))
    }

    fn alert_ledger(&self) -> Arc<SqliteAlertLedger> {
        Arc::new(SqliteAlertLedger::new(self.connection.pool().clone()))
    }

    fn scenario_store(&self) -> Arc<SqliteScenarioStore> {
        Arc::new(SqliteScenarioStore::new(self.connection.pool().clone()))
    }
}

/// `init`: create the database file and bring the schema up to date.
pub async fn init(config: &Config) -> Result<()> {
    let app = App::open(config).await?;
    app.connection.close().await;
    println!("Database ready: {}", config.database.url);
    Ok(())
}

/// `triggers`: evaluate all eight triggers once and dispatch fired alerts.
pub async fn triggers(config: &Config) -> Result<()> {
    if config.notify.chat_ids.is_empty() {
        // zero-work short circuit: nothing to deliver to
        info!("no notification destinations configured, skipping evaluation");
        print_run_summary(&RunSummary::zero_work());
        return Ok(());
    }

    let app = App::open(config).await?;
    let evaluator = TriggerEvaluator::new(app.signal_store(), app.alert_ledger(), config.zone.as_str());
    let notifier =
        Arc::new(TelegramNotifier::new(&config.notify).context("notifier configuration")?);
    let dispatcher = Dispatcher::new(notifier, app.alert_ledger(), config.notify.chat_ids.clone());

    let outcomes = evaluator.evaluate().await;
    let summary = dispatcher.dispatch(&outcomes).await;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Trigger", "Level", "Result"]);
    for outcome in &outcomes {
        let result = if outcome.fired {
            "fired"
        } else if outcome.cooldown_suppressed {
            "cooldown"
        } else {
            "quiet"
        };
        table.add_row(vec![
            outcome.kind.as_str(),
            outcome.level.as_str(),
            result,
        ]);
    }
    println!("{table}");
    print_run_summary(&summary);

    app.connection.close().await;
    Ok(())
}

fn print_run_summary(summary: &RunSummary) {
    println!(
        "checked {} | fired {} | cooldown {} | sent {} | failed {}",
        summary.checked, summary.fired, summary.cooldown_suppressed, summary.sent, summary.failed
    );
}

/// `threat`: print the composite threat level with its category breakdown.
pub async fn threat(config: &Config) -> Result<()> {
    let app = App::open(config).await?;
    let scorer = ThreatScorer::new(app.signal_store(), config.zone.as_str());
    let score = scorer.assess().await.context("threat assessment failed")?;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Category", "Points"]);
    table.add_row(vec!["traffic".to_string(), score.traffic.to_string()]);
    table.add_row(vec!["price".to_string(), score.price.to_string()]);
    table.add_row(vec!["security".to_string(), score.security.to_string()]);
    table.add_row(vec!["news".to_string(), score.news.to_string()]);
    println!("{table}");
    println!("Total: {} → {}", score.total(), score.level());

    app.connection.close().await;
    Ok(())
}

/// `scenario run`: one full pipeline cycle.
pub async fn scenario_run(config: &Config) -> Result<()> {
    let app = App::open(config).await?;
    let collector = ScenarioCollector::new(app.signal_store(), app.scenario_store(), config.zone.as_str());
    let analyzer = Arc::new(
        HttpScenarioAnalyzer::new(config.analyzer.clone()).context("analyzer configuration")?,
    );
    let dispatcher = scenario_dispatcher(config)?;
    let pipeline = ScenarioPipeline::new(collector, analyzer, app.scenario_store(), dispatcher);

    match pipeline.run().await.context("scenario pipeline failed")? {
        PipelineOutcome::SkippedInsignificant => {
            println!("No significant updates; analysis skipped.");
        }
        PipelineOutcome::SkippedAnalyzerFailure(reason) => {
            println!("Analysis unavailable this cycle: {reason}");
        }
        PipelineOutcome::Completed {
            state_id,
            transition,
            alerts_sent,
            alerts_failed,
        } => {
            println!("Scenario state #{state_id} recorded.");
            if let Some(transition) = transition {
                println!("Transition: {transition}");
            }
            println!("Alerts: {alerts_sent} sent, {alerts_failed} failed.");
        }
    }

    app.connection.close().await;
    Ok(())
}

/// `scenario report`: broadcast (and print) the full status report.
pub async fn scenario_report(config: &Config) -> Result<()> {
    let app = App::open(config).await?;
    let Some(state) = app
        .scenario_store()
        .latest_state()
        .await
        .context("failed to read scenario state")?
    else {
        println!("No scenario analysis recorded yet.");
        app.connection.close().await;
        return Ok(());
    };

    println!("{}", build_status_report(&state));

    if config.notify.chat_ids.is_empty() {
        info!("no notification destinations configured, report printed only");
    } else {
        let dispatcher = scenario_dispatcher(config)?;
        let summary = dispatcher.dispatch_status(&state).await;
        println!("Report: {} sent, {} failed.", summary.sent, summary.failed);
    }

    app.connection.close().await;
    Ok(())
}

/// With no destinations configured the pipeline still runs and persists;
/// only delivery degrades to a silent no-op.
fn scenario_dispatcher(config: &Config) -> Result<ScenarioDispatcher> {
    let notifier: Arc<dyn Notifier> = if config.notify.chat_ids.is_empty() {
        Arc::new(SilentNotifier)
    } else {
        Arc::new(TelegramNotifier::new(&config.notify).context("notifier configuration")?)
    };
    Ok(ScenarioDispatcher::new(
        notifier,
        config.notify.chat_ids.clone(),
    ))
}
