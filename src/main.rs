//! Quiz Pane - Entry Point

use clap::Parser;
use quizpane::driver::{self, RunOptions};
use quizpane::model::Quiz;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Quiz Pane - lay out a quiz screen headlessly and report row heights
#[derive(Parser, Debug)]
#[command(name = "quizpane")]
#[command(version)]
#[command(about = "Measure and lay out the rows of a quiz screen")]
pub struct Args {
    /// Path to the quiz JSON file
    pub quiz: PathBuf,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Viewport width of the rendering surface in points
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: Option<u32>,

    /// Eliminate an option before layout (repeatable)
    #[arg(short, long, value_name = "ID")]
    pub eliminate: Vec<String>,

    /// Select an option as the answer
    #[arg(short, long, value_name = "ID", conflicts_with = "mark")]
    pub select: Option<String>,

    /// Mark an option for review
    #[arg(short, long, value_name = "ID")]
    pub mark: Option<String>,

    /// Number of bind passes; passes after the first reuse rows
    #[arg(short, long, default_value = "2", value_parser = clap::value_parser!(u32).range(1..))]
    pub passes: u32,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = quizpane::config::load_config_with_precedence(args.config.clone())?;
        let merged = quizpane::config::merge_config(config_file);
        let with_env = quizpane::config::apply_env_overrides(merged)?;
        quizpane::config::apply_cli_overrides(with_env, args.width)
    };

    quizpane::logging::init(&config.log_file_path)?;

    info!(
        config = ?config,
        "Configuration loaded and resolved"
    );

    let quiz = Quiz::load(&args.quiz).map_err(quizpane::model::AppError::from)?;
    info!(path = %args.quiz.display(), options = quiz.options().len(), "quiz loaded");

    let options = RunOptions {
        eliminate: args.eliminate,
        select: args.select,
        mark: args.mark,
        passes: args.passes as usize,
    };
    let report = driver::run(quiz, &config, &options)?;

    let mut stdout = std::io::stdout().lock();
    if args.json {
        serde_json::to_writer_pretty(&mut stdout, &report)?;
        writeln!(stdout)?;
    } else {
        writeln!(stdout, "{report}")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_help_does_not_error() {
        let result = Args::try_parse_from(["quizpane", "--help"]);
        // Help returns Err with DisplayHelp, which is success
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_does_not_error() {
        let result = Args::try_parse_from(["quizpane", "--version"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_quiz_path_is_required() {
        let err = Args::try_parse_from(["quizpane"]).unwrap_err();
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["quizpane", "quiz.json"]);
        assert_eq!(args.quiz, PathBuf::from("quiz.json"));
        assert_eq!(args.config, None);
        assert_eq!(args.width, None);
        assert!(args.eliminate.is_empty());
        assert_eq!(args.select, None);
        assert_eq!(args.mark, None);
        assert_eq!(args.passes, 2);
        assert!(!args.json);
    }

    #[test]
    fn test_eliminate_is_repeatable() {
        let args = Args::parse_from(["quizpane", "q.json", "-e", "a", "--eliminate", "c"]);
        assert_eq!(args.eliminate, vec!["a".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_select_conflicts_with_mark() {
        let err = Args::try_parse_from(["quizpane", "q.json", "--select", "a", "--mark", "b"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_zero_passes_rejected() {
        let result = Args::try_parse_from(["quizpane", "q.json", "--passes", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_width_and_json() {
        let args = Args::parse_from(["quizpane", "q.json", "--width", "414", "--json"]);
        assert_eq!(args.width, Some(414));
        assert!(args.json);
    }
}
