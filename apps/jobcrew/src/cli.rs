use std::io::{self, BufRead, Write};

use clap::{Parser, Subcommand};

use crate::tasks::JobCriteria;

#[derive(Debug, Parser)]
#[command(
    name = "jobcrew",
    version,
    about = "Job application assistant: research, resume tailoring, cover letter and interview prep"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(about = "Start the HTTP service (default)")]
    Serve {
        /// Overrides PORT from the environment.
        #[arg(long)]
        port: Option<u16>,
    },
    #[command(about = "Prompt for job criteria and run the pipeline once")]
    Run {
        /// Resume summary used for tailoring and the cover letter.
        #[arg(long)]
        resume: Option<String>,
        /// Append the application-tracking stage.
        #[arg(long)]
        track: bool,
    },
}

const QUESTIONS: [&str; 4] = [
    "What role are you looking for? (e.g., Software Developer): ",
    "Preferred location? (e.g., Remote, New York): ",
    "Experience level? (e.g., Entry, Mid, Senior): ",
    "Key skills/keywords? (e.g., Python, AI, React): ",
];

/// Asks the four criteria questions. Blank answers and EOF take the defaults.
pub fn prompt_criteria<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> io::Result<JobCriteria> {
    let mut answers: Vec<String> = Vec::with_capacity(QUESTIONS.len());
    for question in QUESTIONS {
        output.write_all(question.as_bytes())?;
        output.flush()?;
        let mut line = String::new();
        input.read_line(&mut line)?;
        answers.push(line.trim().to_string());
    }

    Ok(JobCriteria::new(
        Some(&answers[0]),
        Some(&answers[1]),
        Some(&answers[2]),
        Some(&answers[3]),
    ))
}
