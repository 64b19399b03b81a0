//! Eval command handler

use crate::commands::EvalArgs;
use crate::error::{CliError, CliResult};
use jugar_probar_media::{
    CssMediaEvaluator, DeviceCatalog, QueryEvaluator, ViewportDescription,
};
use serde::Serialize;

/// Match result for one query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryResult {
    /// Query string as given
    pub query: String,
    /// Whether it matches the viewport
    pub matches: bool,
    /// Whether the query parsed
    pub valid: bool,
}

/// Result of the eval command
#[derive(Debug, Clone, Serialize)]
pub struct EvalReport {
    /// Viewport the queries were evaluated against
    pub viewport: ViewportDescription,
    /// One entry per query, in argument order
    pub results: Vec<QueryResult>,
}

impl EvalReport {
    /// Number of matching queries
    #[must_use]
    pub fn matched(&self) -> usize {
        self.results.iter().filter(|r| r.matches).count()
    }
}

/// Build the viewport for `args` and evaluate every query against it
pub fn execute_eval(args: &EvalArgs) -> CliResult<EvalReport> {
    let viewport = eval_viewport(args)?;
    Ok(evaluate_all(&args.queries, viewport))
}

fn eval_viewport(args: &EvalArgs) -> CliResult<ViewportDescription> {
    let mut viewport = match (&args.viewport, &args.device) {
        (Some(path), _) => ViewportDescription::load(path)?,
        (None, Some(device)) => device_viewport(device, args.landscape, &DeviceCatalog::new())?,
        (None, None) => ViewportDescription::new(),
    };

    for assignment in &args.features {
        viewport.parse_assignment(assignment)?;
    }
    tracing::debug!(features = viewport.len(), "viewport resolved");
    Ok(viewport)
}

/// Viewport of the catalog preset `name`, rotated to landscape on request
fn device_viewport(
    name: &str,
    landscape: bool,
    catalog: &DeviceCatalog,
) -> CliResult<ViewportDescription> {
    let preset = catalog.get(name).ok_or_else(|| {
        CliError::invalid_argument(format!(
            "unknown device '{name}' (see `probador-media devices`)"
        ))
    })?;
    Ok(if landscape {
        preset.clone().landscape().viewport()
    } else {
        preset.viewport()
    })
}

/// Evaluate `queries` against `viewport` with the default evaluator
#[must_use]
pub fn evaluate_all(queries: &[String], viewport: ViewportDescription) -> EvalReport {
    let evaluator = CssMediaEvaluator::new();
    let results = queries
        .iter()
        .map(|query| QueryResult {
            query: query.clone(),
            matches: evaluator.matches(query, &viewport),
            valid: evaluator.is_valid(query),
        })
        .collect();

    EvalReport { viewport, results }
}
