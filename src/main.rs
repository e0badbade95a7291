use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::{Result, bail};
use handsign::{
    Labels, OrtClassifier, PipelineConfig, Session, Tier,
    classifier::TOP_K,
    features::{CoordinateTransform, SlotConflict},
    recording,
};
use rayon::prelude::*;

const USAGE: &str = "usage: handsign [--training-aligned] [--slot-conflict first|score|overwrite] \
[--top-k N] <model.onnx> <labels.txt> <recording.jsonl>...";

struct Args {
    model_path: PathBuf,
    labels_path: PathBuf,
    recordings: Vec<PathBuf>,
    config: PipelineConfig,
    top_k: usize,
}

struct Report {
    path: PathBuf,
    lines: Vec<String>,
    tiers: HashMap<Tier, usize>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = parse_args(std::env::args().skip(1))?;

    let labels = match Labels::from_file(&args.labels_path) {
        Ok(labels) => labels,
        Err(err) => {
            log::warn!("{err:#}, falling back to A-Z labels");
            Labels::alphabet()
        }
    };

    let reports: Vec<Report> = args
        .recordings
        .par_iter()
        .map(|path| replay(path, &args, &labels))
        .collect::<Result<_>>()?;

    for report in reports {
        println!("== {}", report.path.display());
        for line in &report.lines {
            println!("{line}");
        }
        let count = |tier: Tier| report.tiers.get(&tier).copied().unwrap_or(0);
        println!(
            "   {} frames: {} accurate, {} medium, {} low, {} no input",
            report.lines.len(),
            count(Tier::Accurate),
            count(Tier::Medium),
            count(Tier::Low),
            count(Tier::NoInput)
        );
    }

    Ok(())
}

/// Each recording is its own session with its own model instance and state.
fn replay(path: &Path, args: &Args, labels: &Labels) -> Result<Report> {
    let frames = recording::load(path)?;
    let classifier = OrtClassifier::new(&args.model_path)?.with_top_k(args.top_k);
    let mut session = Session::new(classifier, labels.clone(), args.config.clone());

    let mut lines = Vec::with_capacity(frames.len());
    let mut tiers = HashMap::new();
    for (idx, frame) in frames.iter().enumerate() {
        let result = session.process_frame(frame);
        *tiers.entry(result.tier).or_insert(0) += 1;
        lines.push(format!("{idx:>5}  {}", result.display_text()));
    }

    Ok(Report {
        path: path.to_path_buf(),
        lines,
        tiers,
    })
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args> {
    let mut config = PipelineConfig::default();
    let mut top_k = TOP_K;
    let mut positional = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--training-aligned" => config.transform = CoordinateTransform::training_aligned(),
            "--slot-conflict" => {
                config.slot_conflict = match args.next().as_deref() {
                    Some("first") => SlotConflict::KeepFirst,
                    Some("score") => SlotConflict::KeepHigherScore,
                    Some("overwrite") => SlotConflict::Overwrite,
                    other => bail!("invalid --slot-conflict value {other:?}\n{USAGE}"),
                }
            }
            "--top-k" => {
                top_k = match args.next().map(|value| value.parse::<usize>()) {
                    Some(Ok(value)) if value > 0 => value,
                    _ => bail!("--top-k needs a positive integer\n{USAGE}"),
                }
            }
            "-h" | "--help" => bail!("{USAGE}"),
            flag if flag.starts_with("--") => bail!("unknown option {flag}\n{USAGE}"),
            _ => positional.push(PathBuf::from(&arg)),
        }
    }

    if positional.len() < 3 {
        bail!("{USAGE}");
    }
    let recordings = positional.split_off(2);
    let labels_path = positional.pop().unwrap_or_default();
    let model_path = positional.pop().unwrap_or_default();

    Ok(Args {
        model_path,
        labels_path,
        recordings,
        config,
        top_k,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn parses_options_and_positionals() {
        let parsed = args(&[
            "--top-k",
            "3",
            "--slot-conflict",
            "score",
            "model.onnx",
            "labels.txt",
            "a.jsonl",
            "b.jsonl",
        ])
        .unwrap();
        assert_eq!(parsed.top_k, 3);
        assert_eq!(parsed.config.slot_conflict, SlotConflict::KeepHigherScore);
        assert_eq!(parsed.model_path, PathBuf::from("model.onnx"));
        assert_eq!(parsed.labels_path, PathBuf::from("labels.txt"));
        assert_eq!(parsed.recordings.len(), 2);

        let defaults = args(&["m", "l", "r"]).unwrap();
        assert_eq!(defaults.top_k, TOP_K);
    }

    #[test]
    fn rejects_bad_top_k_and_missing_paths() {
        assert!(args(&["--top-k", "0", "m", "l", "r"]).is_err());
        assert!(args(&["--top-k", "many", "m", "l", "r"]).is_err());
        assert!(args(&["m", "l"]).is_err());
    }
}
