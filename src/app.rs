//! Top-level application orchestration.
//!
//! `src/main.rs` stays tiny; this module is the real main that:
//! - parses CLI arguments
//! - loads the dataset, fits formulas or reads precomputed models
//! - turns the flags into `SummaryOptions`
//! - prints the table or writes it to `--output`

use clap::Parser;
use log::info;

use crate::cli::{Cli, Command, FitArgs, SummaryArgs, TidyArgs};
use crate::domain::{GofMap, OutputFormat, StarsSpec};
use crate::error::AppError;
use crate::io::{Dataset, read_coef_map, read_gof_map};
use crate::models::{Formula, LinearModel, PrecomputedModel, TidyModel, VcovKind};
use crate::summary::{ModelEntry, ModelSet, StatisticOverride, SummaryOptions, model_summary};

/// Entry point for the `msum` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Tidy(args) => handle_tidy(args),
    }
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let data = Dataset::read_csv(&args.data)?;
    info!("loaded {} rows from {}", data.n_rows(), args.data.display());

    let fitted = args
        .models
        .iter()
        .map(|f| {
            let formula: Formula = f.parse()?;
            LinearModel::fit(&data, &formula)
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    let mut options = options_from_args(&args.summary)?;
    if let Some(kind) = args.vcov {
        options.statistic_override = Some(vec![vcov_override(kind); fitted.len()]);
    }
    emit(ModelSet::from_slice(&fitted), &options, args.summary.format)
}

fn handle_tidy(args: TidyArgs) -> Result<(), AppError> {
    let models = args
        .models
        .iter()
        .map(|path| PrecomputedModel::read_json(path))
        .collect::<Result<Vec<_>, AppError>>()?;
    info!("read {} precomputed models", models.len());

    let entries = models
        .iter()
        .enumerate()
        .map(|(i, m)| ModelEntry {
            name: m.name.clone().unwrap_or_else(|| format!("Model {}", i + 1)),
            model: m,
        })
        .collect();
    let options = options_from_args(&args.summary)?;
    emit(ModelSet::new(entries), &options, args.summary.format)
}

fn emit(models: ModelSet<'_>, options: &SummaryOptions, format: OutputFormat) -> Result<(), AppError> {
    if let Some(table) = model_summary(models, options)? {
        print!("{}", table.render(format));
    }
    Ok(())
}

/// Standard errors from the adapter's own covariance estimator of the given kind.
fn vcov_override(kind: VcovKind) -> StatisticOverride {
    StatisticOverride::function(move |model: &dyn TidyModel| {
        model
            .covariance(kind)
            .ok_or_else(|| AppError::validation(format!("{kind:?} covariance is not available")))
    })
}

pub fn options_from_args(args: &SummaryArgs) -> Result<SummaryOptions, AppError> {
    Ok(SummaryOptions {
        statistic: args.statistic.parse()?,
        statistic_override: None,
        conf_level: args.conf_level,
        coef_map: args.coef_map.as_deref().map(read_coef_map).transpose()?,
        coef_omit: args.coef_omit.clone(),
        gof_map: match &args.gof_map {
            Some(path) => read_gof_map(path)?,
            None => GofMap::default(),
        },
        gof_omit: args.gof_omit.clone(),
        fmt: args.fmt.clone(),
        stars: if args.stars {
            StarsSpec::conventional()
        } else {
            StarsSpec::none()
        },
        stars_note: !args.no_stars_note,
        title: args.title.clone(),
        subtitle: args.subtitle.clone(),
        notes: args.notes.clone(),
        add_rows: args
            .add_rows
            .iter()
            .map(|row| row.split(',').map(|cell| cell.trim().to_string()).collect())
            .collect(),
        filename: args.output.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Statistic;

    fn summary_args(extra: &[&str]) -> SummaryArgs {
        let mut argv = vec!["msum", "tidy", "--model", "m.json"];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Tidy(args) => args.summary,
            Command::Fit(_) => unreachable!(),
        }
    }

    #[test]
    fn flags_map_onto_options() {
        let args = summary_args(&[
            "--statistic", "conf.int", "--stars", "--no-stars-note", "--add-row", "FE, Yes", "--note", "n1",
            "--output", "t.rtf",
        ]);
        let opts = options_from_args(&args).unwrap();
        assert_eq!(opts.statistic, Statistic::ConfInt);
        assert_eq!(opts.stars, StarsSpec::conventional());
        assert!(!opts.stars_note);
        assert_eq!(opts.add_rows, vec![vec!["FE".to_string(), "Yes".to_string()]]);
        assert_eq!(opts.notes, vec!["n1"]);
        assert_eq!(opts.filename.as_deref(), Some(std::path::Path::new("t.rtf")));
        assert!(opts.coef_map.is_none());
    }

    #[test]
    fn unknown_statistic_is_a_validation_error() {
        let args = summary_args(&["--statistic", "stderr"]);
        assert!(options_from_args(&args).unwrap_err().is_validation());
    }

    #[test]
    fn vcov_override_uses_the_adapter_covariance() {
        let data = Dataset::from_columns(vec![
            ("y".to_string(), vec![1.0, 3.0, 2.0, 5.0, 4.0, 6.0]),
            ("x".to_string(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
        ])
        .unwrap();
        let model = LinearModel::fit(&data, &"y ~ x".parse::<Formula>().unwrap()).unwrap();
        let StatisticOverride::Function(f) = vcov_override(VcovKind::Hc1) else {
            panic!("expected a function override");
        };
        let cov = f(&model as &dyn TidyModel).unwrap();
        assert_eq!(cov.terms, vec!["(Intercept)", "x"]);

        let precomputed = PrecomputedModel::from_json_str(r#"{"terms":[]}"#).unwrap();
        assert!(f(&precomputed as &dyn TidyModel).unwrap_err().is_validation());
    }
}
