mod backup;
mod cli;
mod error;
mod logger;
mod settings;
mod tasks;
mod utils;

use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use tasks::{add, delete, exec, info, list};
use utils::paths::{get_log_path_for, get_settings_path};

fn main() {
    let cli = Cli::parse();

    let settings_path = cli.settings.unwrap_or_else(get_settings_path);
    logger::init(get_log_path_for(&settings_path));

    match cli.command {
        Some(Commands::Add(args)) => add::run(args, &settings_path),
        Some(Commands::Delete { action }) => delete::run(action, &settings_path),
        Some(Commands::List) => list::run(&settings_path),
        Some(Commands::Exec(args)) => exec::run(args, &settings_path),
        Some(Commands::Info { action }) => info::run(action, &settings_path),
        Some(Commands::Version) => println!("{}", env!("CARGO_PKG_VERSION")),
        None => {
            if Cli::command().print_help().is_err() {
                std::process::exit(1);
            }
        }
    }
}
