use std::io;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use rusty_asag::data::export::{write_answers_csv, write_json};
use rusty_asag::data::filter::{filtered_answers, ClassSelection};
use rusty_asag::{load_dataset, Dataset, LoaderConfig};

const USAGE: &str = "\
usage: rusty-asag [--config FILE] [--sorted] [--class LABEL]... [--json | --csv] <DATASET_DIR>

  --config FILE   loader options as JSON ({\"pattern\": \"*.xml\", \"sorted\": false})
  --sorted        read files in file-name order
  --class LABEL   list the student answers labeled LABEL (repeatable)
  --json          print all records as JSON
  --csv           print one CSV row per student answer";

#[derive(Debug, PartialEq)]
enum Output {
    Summary,
    Json,
    Csv,
}

#[derive(Debug)]
struct Args {
    dataset_dir: PathBuf,
    config: Option<PathBuf>,
    sorted: bool,
    classes: ClassSelection,
    output: Output,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args> {
    let mut dataset_dir = None;
    let mut config = None;
    let mut sorted = false;
    let mut classes = ClassSelection::new();
    let mut output = Output::Summary;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => config = Some(PathBuf::from(args.next().context("--config needs a file")?)),
            "--sorted" => sorted = true,
            "--class" => {
                classes.insert(args.next().context("--class needs a label")?);
            }
            "--json" => output = Output::Json,
            "--csv" => output = Output::Csv,
            "-h" | "--help" => bail!("{USAGE}"),
            flag if flag.starts_with("--") => bail!("unknown option {flag}\n\n{USAGE}"),
            _ if dataset_dir.is_some() => bail!("more than one dataset directory given\n\n{USAGE}"),
            _ => dataset_dir = Some(PathBuf::from(&arg)),
        }
    }

    Ok(Args {
        dataset_dir: dataset_dir.with_context(|| format!("missing dataset directory\n\n{USAGE}"))?,
        config,
        sorted,
        classes,
        output,
    })
}

fn print_summary(dataset: &Dataset, classes: &ClassSelection) {
    println!("records: {}", dataset.len());
    println!("student answers: {}", dataset.answer_count());
    for (class, count) in &dataset.class_counts {
        println!("  {class:<24} {count}");
    }

    if classes.is_empty() {
        return;
    }
    let selected = filtered_answers(dataset, classes);
    println!("selected answers: {}", selected.len());
    for pos in selected {
        let rec = &dataset.records[pos.record];
        if let Some(answers) = &rec.answers {
            println!(
                "  {}\t{}\t{}",
                rec.question.id,
                answers.classes()[pos.answer],
                answers.sentences()[pos.answer]
            );
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = parse_args(std::env::args().skip(1))?;
    let mut config = match &args.config {
        Some(path) => LoaderConfig::from_json_file(path)?,
        None => LoaderConfig::default(),
    };
    config.sorted |= args.sorted;
    log::debug!("Loader config: {config:?}");

    let dataset = load_dataset(&args.dataset_dir, &config)
        .with_context(|| format!("reading dataset {}", args.dataset_dir.display()))?;

    match args.output {
        Output::Summary => print_summary(&dataset, &args.classes),
        Output::Json => write_json(&dataset.records, io::stdout().lock())?,
        Output::Csv => write_answers_csv(&dataset.records, io::stdout().lock())?,
    }
    Ok(())
}
