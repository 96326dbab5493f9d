//! Command-line definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "febrilogic", version, about = "Ranked probabilities for acute febrile illness")]
pub struct Cli {
    /// Config file (default: $FEBRILOGIC_CONFIG, then ./febrilogic.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Diagnose one patient and print the result as JSON
    Diagnose(DiagnoseArgs),
    /// Evaluate top-k accuracy over a labelled cohort
    Evaluate(EvaluateArgs),
}

#[derive(Debug, Args)]
pub struct DiagnoseArgs {
    /// Positive symptom id; repeat for several
    #[arg(long = "symptom", value_name = "ID")]
    pub symptoms: Vec<String>,

    /// Disease the patient tested negative for; repeat for several
    #[arg(long = "negative", value_name = "DISEASE")]
    pub negative: Vec<String>,

    /// Observed biomarker value
    #[arg(long = "biomarker", value_name = "ID=VALUE", value_parser = parse_biomarker)]
    pub biomarkers: Vec<(String, f64)>,

    /// Candidates to report (default: ranking.top_k from config)
    #[arg(long, value_name = "K")]
    pub top_k: Option<usize>,
}

#[derive(Debug, Args)]
pub struct EvaluateArgs {
    /// Patient CSV with symptom flag columns and optional patient_id / label
    #[arg(long, value_name = "CSV")]
    pub patients: PathBuf,

    /// Biomarker CSV keyed by patient_id
    #[arg(long, value_name = "CSV")]
    pub biomarkers: PathBuf,

    /// Include every patient's outcome in the output
    #[arg(long)]
    pub details: bool,
}

fn parse_biomarker(s: &str) -> Result<(String, f64), String> {
    let (id, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ID=VALUE, got '{s}'"))?;
    let id = id.trim();
    if id.is_empty() {
        return Err(format!("missing biomarker id in '{s}'"));
    }
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", value.trim()))?;
    if !value.is_finite() {
        return Err(format!("'{}' is not a finite number", value));
    }
    Ok((id.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_biomarker() {
        assert_eq!(parse_biomarker("platelets=45").unwrap(), ("platelets".to_string(), 45.0));
        assert_eq!(parse_biomarker(" wbc = 3.2 ").unwrap(), ("wbc".to_string(), 3.2));
        assert!(parse_biomarker("platelets").is_err());
        assert!(parse_biomarker("=4").is_err());
        assert!(parse_biomarker("crp=high").is_err());
        assert!(parse_biomarker("crp=inf").is_err());
    }

    #[test]
    fn test_diagnose_arguments() {
        let cli = Cli::try_parse_from([
            "febrilogic",
            "--config",
            "custom.toml",
            "diagnose",
            "--symptom",
            "fever",
            "--symptom",
            "rash",
            "--negative",
            "Malaria",
            "--biomarker",
            "platelets=40",
            "--top-k",
            "2",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        let Command::Diagnose(args) = cli.command else {
            panic!("expected diagnose");
        };
        assert_eq!(args.symptoms, vec!["fever", "rash"]);
        assert_eq!(args.negative, vec!["Malaria"]);
        assert_eq!(args.biomarkers, vec![("platelets".to_string(), 40.0)]);
        assert_eq!(args.top_k, Some(2));
    }

    #[test]
    fn test_evaluate_requires_both_files() {
        assert!(Cli::try_parse_from(["febrilogic", "evaluate", "--patients", "p.csv"]).is_err());
        let cli = Cli::try_parse_from(["febrilogic", "evaluate", "--patients", "p.csv", "--biomarkers", "b.csv"]).unwrap();
        assert!(matches!(cli.command, Command::Evaluate(EvaluateArgs { details: false, .. })));
    }
}
