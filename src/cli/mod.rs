//! CLI command definitions and handlers

pub mod config;
pub mod handlers;
pub mod output;

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::store::MovePosition;
use output::OutputFormat;

/// qbank - local question bank with folder organization
#[derive(Parser, Debug)]
#[command(name = "qbank", version, about, long_about = None)]
pub struct Cli {
    /// Database file (overrides config file)
    #[arg(short = 'd', long, global = true)]
    pub db: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the folder tree
    Folders(FoldersArgs),

    /// Create a folder
    Mkdir(MkdirArgs),

    /// Rename a folder
    Rename(RenameArgs),

    /// Move a folder within the tree
    #[command(name = "mv-folder")]
    MvFolder(MvFolderArgs),

    /// Delete a folder
    Rmdir(RmdirArgs),

    /// Add a question
    Add(AddArgs),

    /// List questions, optionally scoped to a folder
    #[command(name = "ls")]
    List(ListArgs),

    /// Update a question's text, answer, or type
    Update(UpdateArgs),

    /// Delete questions by id
    Rm(RmArgs),

    /// Move a question into a folder
    Mv(MvArgs),

    /// Copy a question into a folder
    Cp(CpArgs),

    /// Search question titles
    Search(SearchArgs),

    /// Show the path from the root to a folder
    Path(PathArgs),

    /// Show per-folder question counts
    Stats(StatsArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Placement of a moved folder relative to the target.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum PositionArg {
    /// Before the target, as a sibling
    Before,
    /// After the target, as a sibling
    After,
    /// As a child of the target
    #[default]
    Inside,
}

impl From<PositionArg> for MovePosition {
    fn from(position: PositionArg) -> Self {
        match position {
            PositionArg::Before => MovePosition::Before,
            PositionArg::After => MovePosition::After,
            PositionArg::Inside => MovePosition::Inside,
        }
    }
}

/// Arguments for the `folders` command
#[derive(Parser, Debug)]
pub struct FoldersArgs {
    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `mkdir` command
#[derive(Parser, Debug)]
pub struct MkdirArgs {
    /// Folder name
    pub name: String,

    /// Parent folder id (root if omitted)
    #[arg(short, long, default_value_t = 0)]
    pub parent: i64,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `rename` command
#[derive(Parser, Debug)]
pub struct RenameArgs {
    /// Folder id
    pub id: i64,

    /// New folder name
    pub name: String,
}

/// Arguments for the `mv-folder` command
#[derive(Parser, Debug)]
pub struct MvFolderArgs {
    /// Folder id to move
    pub id: i64,

    /// Target folder id
    pub target: i64,

    /// Where to place the folder relative to the target
    #[arg(short, long, value_enum, default_value_t = PositionArg::Inside)]
    pub position: PositionArg,
}

/// Arguments for the `rmdir` command
#[derive(Parser, Debug)]
pub struct RmdirArgs {
    /// Folder id
    pub id: i64,

    /// Delete the whole subtree including its questions
    #[arg(long)]
    pub cascade: bool,
}

/// Arguments for the `add` command
#[derive(Parser, Debug)]
pub struct AddArgs {
    /// Question text
    pub question: String,

    /// Answer text
    pub answer: String,

    /// Question type label (e.g. "multiple-choice")
    #[arg(short = 'T', long = "type")]
    pub question_type: Option<String>,

    /// Folder to file the question under (root if omitted)
    #[arg(short = 'F', long, default_value_t = 0)]
    pub folder: i64,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `ls` (list) command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Folder id to list (all questions if omitted)
    #[arg(short = 'F', long)]
    pub folder: Option<i64>,

    /// Include questions from descendant folders
    #[arg(short, long, requires = "folder")]
    pub subtree: bool,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `update` command
#[derive(Parser, Debug)]
pub struct UpdateArgs {
    /// Question id
    pub id: i64,

    /// New question text
    #[arg(short, long)]
    pub question: Option<String>,

    /// New answer text
    #[arg(short, long)]
    pub answer: Option<String>,

    /// New question type label
    #[arg(short = 'T', long = "type")]
    pub question_type: Option<String>,
}

/// Arguments for the `rm` command
#[derive(Parser, Debug)]
pub struct RmArgs {
    /// Question ids to delete
    #[arg(required = true)]
    pub ids: Vec<i64>,
}

/// Arguments for the `mv` command (move question)
#[derive(Parser, Debug)]
pub struct MvArgs {
    /// Question id
    pub id: i64,

    /// Destination folder id
    pub folder: i64,
}

/// Arguments for the `cp` command (copy question)
#[derive(Parser, Debug)]
pub struct CpArgs {
    /// Question id
    pub id: i64,

    /// Destination folder id
    pub folder: i64,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `search` command
#[derive(Parser, Debug)]
pub struct SearchArgs {
    /// Term to match against question text
    pub term: String,

    /// Restrict the search to a folder and its descendants
    #[arg(short = 'F', long)]
    pub folder: Option<i64>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `path` command
#[derive(Parser, Debug)]
pub struct PathArgs {
    /// Folder id
    pub folder: i64,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `stats` command
#[derive(Parser, Debug)]
pub struct StatsArgs {
    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `completions` command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for (bash, zsh, fish)
    #[arg(value_enum)]
    pub shell: Shell,
}
