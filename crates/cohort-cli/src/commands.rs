use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use cohort_core::Session;
use cohort_model::{ColorPolicy, Selection, SelectionUpdate};
use cohort_output::{VegaLiteWriter, write_cohort_csv};

use crate::cli::{ColumnsArgs, GenerateArgs, MethodArg};
use crate::summary::print_columns;
use crate::types::{GenerateResult, OutputPaths};
use cohort_cli::config::{CohortConfig, SynthesisMethod};

fn load_config(path: Option<&Path>) -> Result<CohortConfig> {
    match path {
        Some(path) => CohortConfig::load(path),
        None => Ok(CohortConfig::default()),
    }
}

pub fn run_columns(args: &ColumnsArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let registry = config.registry()?;
    print_columns(registry.schema(), registry.filters());
    Ok(())
}

pub fn run_generate(args: &GenerateArgs) -> Result<GenerateResult> {
    let config = load_config(args.config.as_deref())?;

    let mut options = config.session.clone();
    if let Some(seed) = args.seed {
        options.seed = Some(seed);
    }
    if args.strict_color {
        options.color_policy = ColorPolicy::Reject;
    }
    let method = match args.method {
        Some(MethodArg::Bootstrap) => SynthesisMethod::Bootstrap,
        Some(MethodArg::Identity) => SynthesisMethod::Identity,
        None => config.synthesis.method,
    };

    let registry = config.registry()?;
    let mut session = Session::with_registry(method.capability(), options, registry);
    let span = info_span!("generate", method = session.capability_name());
    let _guard = span.enter();

    match args.rows {
        Some(rows) => session.on_row_count_change(rows).map(|_| ()),
        None => session.refresh(),
    }
    .context("synthesize cohort")?;

    let update = selection_update(config.plot.as_ref(), args);
    session
        .on_selection_change(&update)
        .context("apply plot selection")?;
    let plot = session.current_plot_spec().context("resolve plot")?;

    let cohort = session.current_cohort()?.clone();
    let summaries = cohort.summarize(session.schema())?;
    info!(
        rows = session.row_count(),
        kept = cohort.row_count(),
        plot = %plot.kind,
        "generated cohort"
    );

    let mut outputs = OutputPaths::default();
    if let Some(path) = &args.csv {
        write_cohort_csv(path, &cohort)?;
        outputs.csv = Some(path.clone());
    }
    if let Some(path) = &args.vega_lite {
        let mut writer = VegaLiteWriter::new();
        if let Some(title) = &args.title {
            writer = writer.with_title(title.clone());
        }
        writer.write_to_path(&plot, path)?;
        outputs.vega_lite = Some(path.clone());
    }

    Ok(GenerateResult {
        method: session.capability_name().to_string(),
        synthesized_rows: session.row_count(),
        cohort,
        summaries,
        plot,
        outputs,
    })
}

/// Configured selection with command-line overrides on top.
fn selection_update(configured: Option<&Selection>, args: &GenerateArgs) -> SelectionUpdate {
    let mut update = configured.map_or_else(SelectionUpdate::default, |selection| SelectionUpdate {
        plot_type: Some(selection.plot_type),
        x_var: Some(selection.x_var.clone()),
        y_var: Some(selection.y_var.clone()),
        color_var: Some(selection.color_var.clone()),
    });
    if let Some(plot) = args.plot {
        update = update.plot_type(plot);
    }
    if let Some(x) = &args.x {
        update = update.x(x.clone());
    }
    if let Some(y) = &args.y {
        update = update.y(Some(y.clone()));
    }
    if let Some(color) = &args.color_by {
        update = update.color(Some(color.clone()));
    }
    update
}
