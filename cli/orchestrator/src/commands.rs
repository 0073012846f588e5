//! One function per subcommand. Each writes its report(s) and returns what
//! it found; exit-status policy is applied by the caller.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use analysis::{
    write_report, ArityPolicy, AuditContext, AuditPhase, ChainClient, OnchainVerifier,
    OverlapReporter, ParamArityAuditor, ProtocolMatrixValidator, Report, ReportBody, SclFetcher,
    StaticConsistencyValidator,
};
use documents::{ParamMatrix, SeedList};
use http::HttpTransport;
use registry::{index_interactions, load_interaction_lists, load_scl};

use crate::settings::{PolicyChoice, Settings};
use crate::{CliError, Outcome, Result};

/// Load the SCL and interaction lists every offline check needs.
fn load_context(settings: &Settings) -> Result<AuditContext> {
    let paths = &settings.config.paths;
    let scl = load_scl(&paths.scl, paths.scl_fallback.as_deref())?;
    let lists = load_interaction_lists(&paths.interaction_lists, settings.load_mode)?;
    tracing::info!(
        "loaded {} modules, {} functions, {} interaction lists",
        registry::SclReader::module_count(&scl),
        registry::SclReader::function_count(&scl),
        lists.documents.len()
    );
    Ok(AuditContext::new(scl, lists))
}

fn load_matrix(settings: &Settings) -> Result<documents::ProtocolMatrix> {
    Ok(analysis::load_protocol_matrix(&settings.config.paths.protocol_matrix)?)
}

/// The policy for this run: the flag if given, else `matrix` when a param
/// matrix is configured, else `self-declared`.
fn arity_policy(settings: &Settings, choice: Option<PolicyChoice>) -> Result<ArityPolicy> {
    let param_matrix = settings.config.paths.param_matrix.as_deref();
    let choice = choice.unwrap_or(match param_matrix {
        Some(_) => PolicyChoice::Matrix,
        None => PolicyChoice::SelfDeclared,
    });

    match (choice, param_matrix) {
        (PolicyChoice::SelfDeclared, _) => Ok(ArityPolicy::SelfDeclared),
        (PolicyChoice::Matrix, Some(path)) => {
            Ok(ArityPolicy::Matrix(analysis::load_param_matrix(path)?))
        }
        (PolicyChoice::Matrix, None) => {
            tracing::warn!("matrix policy without a param matrix; only explicit counts apply");
            Ok(ArityPolicy::Matrix(ParamMatrix::default()))
        }
    }
}

/// Run `phases` in order and write one report per phase.
fn run_phases(
    settings: &Settings,
    mut ctx: AuditContext,
    phases: Vec<Box<dyn AuditPhase>>,
) -> Result<Outcome> {
    let mut outcome = Outcome::default();

    for phase in &phases {
        tracing::debug!("running {}: {}", phase.name(), phase.description());
        phase.run(&mut ctx)?;

        let Some(report) = ctx.diagnostics.reports.get(phase.name()) else { continue };
        let path = write_report(settings.report_dir(), phase.name(), report)?;
        let issues =
            ctx.diagnostics.stats.get(&format!("{}_issues", phase.name())).copied().unwrap_or(0);
        println!("{}: {} issue(s) -> {}", phase.name(), issues, path.display());
        outcome.reports.push(path);
    }

    outcome.issues = ctx.diagnostics.issue_count;
    Ok(outcome)
}

/// `sclkit validate`
pub fn run_validate(settings: &Settings) -> Result<Outcome> {
    let ctx = load_context(settings)?;
    run_phases(settings, ctx, vec![Box::new(StaticConsistencyValidator::new())])
}

/// `sclkit matrix`
pub fn run_matrix(settings: &Settings) -> Result<Outcome> {
    let ctx = load_context(settings)?.with_matrix(load_matrix(settings)?);
    run_phases(settings, ctx, vec![Box::new(ProtocolMatrixValidator::new())])
}

/// `sclkit arity`
pub fn run_arity(settings: &Settings, policy: Option<PolicyChoice>) -> Result<Outcome> {
    let policy = arity_policy(settings, policy)?;
    let ctx = load_context(settings)?;
    run_phases(settings, ctx, vec![Box::new(ParamArityAuditor::new(policy))])
}

/// `sclkit overlap`
pub fn run_overlap(settings: &Settings) -> Result<Outcome> {
    let ctx = load_context(settings)?;
    run_phases(settings, ctx, vec![Box::new(OverlapReporter::new())])
}

/// `sclkit all`: every offline check. The matrix check is skipped when no
/// matrix file exists.
pub fn run_all(settings: &Settings) -> Result<Outcome> {
    let mut ctx = load_context(settings)?;
    let mut phases: Vec<Box<dyn AuditPhase>> = vec![Box::new(StaticConsistencyValidator::new())];

    if settings.config.paths.protocol_matrix.exists() {
        ctx = ctx.with_matrix(load_matrix(settings)?);
        phases.push(Box::new(ProtocolMatrixValidator::new()));
    } else {
        tracing::warn!(
            "protocol matrix {} not found; skipping matrix check",
            settings.config.paths.protocol_matrix.display()
        );
    }

    phases.push(Box::new(ParamArityAuditor::new(arity_policy(settings, None)?)));
    phases.push(Box::new(OverlapReporter::new()));
    run_phases(settings, ctx, phases)
}

fn chain_client(settings: &Settings, network: &str) -> Result<(ChainClient, u64)> {
    let net = settings.config.network(network)?;
    let timeout = Duration::from_secs(settings.config.verifier.timeout_secs);
    let transport = HttpTransport::with_timeout(net.rpc_url.clone(), timeout)?;
    tracing::info!("using {} at {}", net.name, net.rpc_url);
    Ok((ChainClient::new(Arc::new(transport)), net.chain_id))
}

/// `sclkit verify`
pub async fn run_verify(
    settings: &Settings,
    network: Option<String>,
    wallets: Vec<String>,
    limit: Option<usize>,
) -> Result<Outcome> {
    let network = network.unwrap_or_else(|| settings.config.verifier.network.clone());
    let wallets =
        if wallets.is_empty() { settings.config.verifier.wallets.clone() } else { wallets };
    let limit = limit.unwrap_or(settings.config.verifier.tx_limit);

    let lists =
        load_interaction_lists(&settings.config.paths.interaction_lists, settings.load_mode)?;
    let index = index_interactions(&lists.documents);
    let (client, _) = chain_client(settings, &network)?;

    let body = OnchainVerifier::new(client, limit).verify(&index, &wallets).await;
    let issues = body.issue_count();
    let report = Report::new(network, body);
    let path = write_report(settings.report_dir(), "verify", &report)?;
    println!("verify: {} issue(s) -> {}", issues, path.display());

    Ok(Outcome { issues, reports: vec![path] })
}

/// `sclkit fetch-scl`
pub async fn run_fetch_scl(
    settings: &Settings,
    network: Option<String>,
    output: Option<PathBuf>,
) -> Result<Outcome> {
    let paths = &settings.config.paths;
    let network = network.unwrap_or_else(|| settings.config.verifier.network.clone());
    let output = output
        .or_else(|| paths.scl_fallback.clone())
        .unwrap_or_else(|| paths.scl.clone());

    let seed: SeedList = documents::from_file(&paths.seed)
        .map_err(|e| CliError::Document { path: paths.seed.clone(), message: e.to_string() })?;
    let (client, chain_id) = chain_client(settings, &network)?;

    let (list, mut body) = SclFetcher::new(client, chain_id)?.fetch(&seed).await;
    documents::to_file(&list, &output)
        .map_err(|e| CliError::Document { path: output.clone(), message: e.to_string() })?;
    body.output = Some(output.display().to_string());

    let issues = body.issue_count();
    let report = Report::new(network, body);
    let path = write_report(settings.report_dir(), "fetch-scl", &report)?;
    println!("fetch-scl: {} module(s) -> {}", list.smart_contracts.len(), output.display());

    Ok(Outcome { issues, reports: vec![path] })
}
