use std::path::PathBuf;

use cairn_sdk::{ObjectKind, StoreConfig};
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "cairn",
    about = "Cairn: a git-compatible content-addressable object store",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Repository directory holding `objects/`
    #[arg(long, global = true, default_value = ".git")]
    pub git_dir: PathBuf,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// zlib level (0-9) for newly written objects
    #[arg(long, global = true)]
    pub compression_level: Option<u32>,

    /// Skip digest verification when reading objects
    #[arg(long, global = true)]
    pub no_verify: bool,
}

impl Cli {
    pub fn store_config(&self) -> StoreConfig {
        let mut config = StoreConfig::default();
        if let Some(level) = self.compression_level {
            config.compression_level = level;
        }
        config.verify_on_read = !self.no_verify;
        config
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum KindArg {
    Blob,
    Tree,
    Commit,
}

impl From<KindArg> for ObjectKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Blob => ObjectKind::Blob,
            KindArg::Tree => ObjectKind::Tree,
            KindArg::Commit => ObjectKind::Commit,
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Create an empty object store
    Init,
    /// Compute an object digest for a file, optionally storing it
    HashObject(HashObjectArgs),
    /// Print the contents of an object
    CatFile(CatFileArgs),
    /// Create a commit object for a tree
    CommitTree(CommitTreeArgs),
    /// List every file reachable from a tree or commit
    LsFiles(LsFilesArgs),
    /// Expand a digest prefix to the full digest
    RevParse(RevParseArgs),
}

#[derive(Args)]
pub struct HashObjectArgs {
    pub file: PathBuf,
    /// Write the object into the store
    #[arg(short)]
    pub write: bool,
    #[arg(short = 't', long = "type", default_value = "blob")]
    pub kind: KindArg,
}

#[derive(Args)]
pub struct CatFileArgs {
    pub object: String,
    /// Print the payload without the kind prefix
    #[arg(short)]
    pub pretty: bool,
}

#[derive(Args)]
pub struct CommitTreeArgs {
    pub tree: String,
    #[arg(short, long)]
    pub message: String,
    #[arg(short, long)]
    pub parent: Option<String>,
    #[arg(long, default_value = "cairn <cairn@localhost>")]
    pub author: String,
}

#[derive(Args)]
pub struct LsFilesArgs {
    pub tree: String,
}

#[derive(Args)]
pub struct RevParseArgs {
    pub prefix: String,
}
