mod handlers;
pub mod menu;
pub mod parse;

use std::io;

use clap::Parser;
pub use handlers::View;
pub use menu::{Action, MenuController, MenuState};
pub use parse::Cli;

use crate::{
    core::{config::AppConfig, error::MoodError, messages::Messages},
    render::{Capabilities, RenderContext},
    store::{LogStore, SchemaStatus},
};

pub fn run() -> Result<(), MoodError> {
    let cli = Cli::parse();
    let cfg = AppConfig::builder()
        .data_dir_opt(cli.data_dir.as_deref())
        .messages_path(cli.messages)
        .color(cli.color)
        .plain(cli.plain)
        .build()?;
    tracing::debug!(config = ?cfg, "configuration resolved");

    match LogStore::from_config(&cfg).ensure_schema()? {
        SchemaStatus::Created => tracing::info!(path = %cfg.log_path.display(), "created log"),
        SchemaStatus::Current => {}
        SchemaStatus::Upgraded { rows, unparsed, backup } => {
            println!(
                "Upgraded {} to the current layout ({rows} rows, backup at {}).",
                cfg.log_path.display(),
                backup.display()
            );
            if unparsed > 0 {
                println!("{unparsed} rows could not be read and were kept as written.");
            }
        }
        SchemaStatus::Kept { reason } => println!(
            "Left {} in its old layout ({reason}); it is still readable.",
            cfg.log_path.display()
        ),
    }

    let ctx = RenderContext::detect(&cfg);
    let caps = Capabilities::detect();
    let messages = Messages::load(&cfg.message_candidates());

    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();
    MenuController::new(cfg, ctx, caps, messages, stdin, stdout).run()
}
