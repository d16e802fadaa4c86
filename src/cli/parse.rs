use std::path::PathBuf;

use clap::Parser;

/// Top-level CLI structure. With no flags the program just starts the menu.
#[derive(Parser, Debug)]
#[command(
    name = "mood",
    version,
    about = "Log a daily mood score, keep a short diary, and chart the trend"
)]
pub struct Cli {
    /// Directory holding mood_log.csv and exports
    #[arg(long, value_name = "DIR", env = "MOOD_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// JSON file with encouragement lines (`low`, `mid`, `high` arrays)
    #[arg(long, value_name = "FILE")]
    pub messages: Option<PathBuf>,

    /// Chart colour (name or `#RRGGBB`)
    #[arg(long, default_value = "amber")]
    pub color: String,

    /// Plain text only: no colour, no box-drawing table
    #[arg(long)]
    pub plain: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags() {
        let cli = Cli::try_parse_from(["mood"]).unwrap();
        assert_eq!(cli.color, "amber");
        assert!(!cli.plain);
        assert!(cli.messages.is_none());
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "mood",
            "--data-dir",
            "/tmp/m",
            "--messages",
            "m.json",
            "--color",
            "#00ff00",
            "--plain",
        ])
        .unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/m")));
        assert_eq!(cli.messages, Some(PathBuf::from("m.json")));
        assert_eq!(cli.color, "#00ff00");
        assert!(cli.plain);
    }
}
