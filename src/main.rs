#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # assessor
//!
//! Command-line front end for the grading engine: grade a single extracted
//! submission, a directory of them, or measure grading consistency across
//! repeated runs.

use std::sync::Arc;

use anyhow::{Context, Result};
use assessor::{
    assess::{AnswerKeyFile, GradedAssessment, Grader, StudentSubmission, consistency},
    config,
    oracle::OpenAiOracle,
};
use bpaf::*;
use colored::Colorize;
use dotenvy::dotenv;
use tabled::{Table, Tabled, settings::Style};
use tracing::{Level, metadata::LevelFilter};
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

/// Top-level CLI commands.
#[derive(Debug, Clone)]
enum Cmd {
    /// Grade one submission and print its report.
    Grade {
        /// Path to the answer key file.
        key:        String,
        /// Assessment name to grade against.
        assessment: String,
        /// Path to the extracted submission JSON.
        submission: String,
    },
    /// Grade every submission in a directory.
    Batch {
        /// Path to the answer key file.
        key:        String,
        /// Assessment name to grade against.
        assessment: String,
        /// Directory of extracted submission JSON files.
        dir:        String,
    },
    /// Grade one submission repeatedly and analyze consistency.
    Consistency {
        /// Path to the answer key file.
        key:        String,
        /// Assessment name to grade against.
        assessment: String,
        /// Number of grading runs.
        runs:       usize,
        /// Path to the extracted submission JSON.
        submission: String,
    },
}

/// Parse the command line arguments and return a `Cmd` enum
fn options() -> Cmd {
    /// parses the answer key path
    fn key() -> impl Parser<String> {
        long("key")
            .help("Path to the answer key JSON file")
            .argument("PATH")
    }

    /// parses the assessment name
    fn assessment() -> impl Parser<String> {
        long("assessment")
            .help("Assessment name, as it appears in the answer key")
            .argument("NAME")
    }

    /// parses the submission path
    fn submission() -> impl Parser<String> {
        positional("SUBMISSION").help("Path to an extracted submission JSON file")
    }

    let grade = {
        let key = key();
        let assessment = assessment();
        let submission = submission();
        construct!(Cmd::Grade {
            key,
            assessment,
            submission
        })
        .to_options()
        .command("grade")
        .help("Grade one submission and print its report")
    };

    let batch = {
        let key = key();
        let assessment = assessment();
        let dir = positional("DIR").help("Directory of extracted submission JSON files");
        construct!(Cmd::Batch {
            key,
            assessment,
            dir
        })
        .to_options()
        .command("batch")
        .help("Grade every submission in a directory")
    };

    let consistency = {
        let key = key();
        let assessment = assessment();
        let runs = long("runs")
            .help("Number of grading runs")
            .argument::<usize>("N")
            .fallback(5);
        let submission = submission();
        construct!(Cmd::Consistency {
            key,
            assessment,
            runs,
            submission
        })
        .to_options()
        .command("consistency")
        .help("Grade one submission repeatedly and analyze consistency")
    };

    let cmd = construct!([grade, batch, consistency]);

    cmd.to_options()
        .descr("Grades photographed handwritten assessments")
        .run()
}

/// One row of the batch results table.
#[derive(Tabled)]
struct BatchRow {
    /// The student's name, or the file the failure came from.
    #[tabled(rename = "Student")]
    student: String,
    /// Earned/possible points, or a dash for failures.
    #[tabled(rename = "Points")]
    points:  String,
    /// Grade percentage, or the failure message.
    #[tabled(rename = "Grade")]
    grade:   String,
}

impl From<&GradedAssessment> for BatchRow {
    fn from(graded: &GradedAssessment) -> Self {
        Self {
            student: graded.summary.header.student_name.clone(),
            points:  format!(
                "{}/{}",
                graded.summary.total_points_earned, graded.summary.total_points_possible
            ),
            grade:   format!("{:.2}%", graded.summary.grade_percentage),
        }
    }
}

/// Builds the grader from the process-wide configuration.
fn build_grader() -> Result<Grader> {
    let oracle = OpenAiOracle::from_config()?;
    Ok(Grader::builder()
        .oracle(Arc::new(oracle))
        .concurrency(config::oracle_concurrency())
        .build())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false);
    let filter_layer = LevelFilter::from_level(Level::INFO);
    tracing_subscriber::registry()
        .with(fmt)
        .with(filter_layer)
        .init();

    let cmd = options();

    match cmd {
        Cmd::Grade {
            key,
            assessment,
            submission,
        } => {
            let keys = AnswerKeyFile::load(&key)?;
            let submission = StudentSubmission::load(&submission)?;
            let grader = build_grader()?;

            let graded = grader.grade(&keys, &assessment, &submission).await?;
            println!("{}", graded.report());
        }
        Cmd::Batch {
            key,
            assessment,
            dir,
        } => {
            let keys = AnswerKeyFile::load(&key)?;
            let grader = build_grader()?;

            let pattern = format!("{}/*.json", dir.trim_end_matches('/'));
            let mut submissions = Vec::new();
            let mut rows = Vec::new();
            for entry in glob::glob(&pattern)
                .with_context(|| format!("Invalid submissions pattern: {pattern}"))?
            {
                let path = entry.context("Could not read submissions directory")?;
                match StudentSubmission::load(&path) {
                    Ok(submission) => submissions.push(submission),
                    Err(e) => {
                        eprintln!("{}", format!("{}: {e:#}", path.display()).red());
                        rows.push(BatchRow {
                            student: path.display().to_string(),
                            points:  "-".to_string(),
                            grade:   "could not be read".to_string(),
                        });
                    }
                }
            }

            for (submission, result) in submissions
                .iter()
                .zip(grader.grade_batch(&keys, &assessment, &submissions).await)
            {
                match result {
                    Ok(graded) => {
                        println!("{}", graded.report());
                        rows.push(BatchRow::from(&graded));
                    }
                    Err(e) => {
                        eprintln!(
                            "{}",
                            format!("{}: {e}", submission.student_name).red()
                        );
                        rows.push(BatchRow {
                            student: submission.student_name.clone(),
                            points:  "-".to_string(),
                            grade:   e.to_string(),
                        });
                    }
                }
            }

            println!("{}", Table::new(rows).with(Style::modern()));
        }
        Cmd::Consistency {
            key,
            assessment,
            runs,
            submission,
        } => {
            let keys = AnswerKeyFile::load(&key)?;
            let submission = StudentSubmission::load(&submission)?;
            let grader = build_grader()?;

            let mut results = Vec::with_capacity(runs);
            for run in 1..=runs {
                println!("Running grading pipeline {run} of {runs}...");
                results.push(grader.grade(&keys, &assessment, &submission).await?);
            }

            let analysis = consistency::analyze(&results)?;
            println!("\n{analysis}");
        }
    };

    Ok(())
}
