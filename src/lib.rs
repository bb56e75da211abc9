//! qbank - local question bank with folder organization

pub mod cli;
pub mod domain;
pub mod store;

use anyhow::Result;
use clap::Parser;

use cli::{
    Cli, Command,
    config::Config,
    handlers::{
        handle_add, handle_completions, handle_cp, handle_folders, handle_list, handle_mkdir,
        handle_mv, handle_mv_folder, handle_path, handle_rename, handle_rm, handle_rmdir,
        handle_search, handle_stats, handle_update,
    },
};

/// Main entry point for the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    let db_path = config.db_path(cli.db.as_ref());

    if cli.verbose > 0 {
        eprintln!("using database: {}", db_path.display());
    }

    match &cli.command {
        Command::Folders(args) => handle_folders(args, &db_path),
        Command::Mkdir(args) => handle_mkdir(args, &db_path),
        Command::Rename(args) => handle_rename(args, &db_path),
        Command::MvFolder(args) => handle_mv_folder(args, &db_path),
        Command::Rmdir(args) => handle_rmdir(args, &db_path),
        Command::Add(args) => handle_add(args, &db_path),
        Command::List(args) => handle_list(args, &db_path),
        Command::Update(args) => handle_update(args, &db_path),
        Command::Rm(args) => handle_rm(args, &db_path),
        Command::Mv(args) => handle_mv(args, &db_path),
        Command::Cp(args) => handle_cp(args, &db_path),
        Command::Search(args) => handle_search(args, &db_path),
        Command::Path(args) => handle_path(args, &db_path),
        Command::Stats(args) => handle_stats(args, &db_path),
        Command::Completions(args) => handle_completions(args),
    }
}
