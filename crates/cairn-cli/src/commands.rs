use std::fs;

use anyhow::Context;
use cairn_sdk::{CommitRequest, ObjectKind, Repository, StoreConfig};
use colored::Colorize;
use serde_json::json;
use tracing::debug;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = cli.store_config();
    match &cli.command {
        Command::Init => cmd_init(&cli, config),
        Command::HashObject(args) => cmd_hash_object(&open(&cli, config)?, args),
        Command::CatFile(args) => cmd_cat_file(&open(&cli, config)?, args),
        Command::CommitTree(args) => cmd_commit_tree(&open(&cli, config)?, args),
        Command::LsFiles(args) => cmd_ls_files(&open(&cli, config)?, args, cli.format),
        Command::RevParse(args) => cmd_rev_parse(&open(&cli, config)?, args, cli.format),
    }
}

fn open(cli: &Cli, config: StoreConfig) -> anyhow::Result<Repository> {
    debug!(git_dir = %cli.git_dir.display(), ?config, "opening repository");
    Repository::open(&cli.git_dir, config)
        .with_context(|| format!("cannot open repository at {}", cli.git_dir.display()))
}

fn cmd_init(cli: &Cli, config: StoreConfig) -> anyhow::Result<()> {
    let repo = Repository::init(&cli.git_dir, config)?;
    println!(
        "{} Initialized empty object store in {}",
        "✓".green().bold(),
        repo.store().root().display().to_string().bold()
    );
    Ok(())
}

fn cmd_hash_object(repo: &Repository, args: &HashObjectArgs) -> anyhow::Result<()> {
    let data = fs::read(&args.file)
        .with_context(|| format!("cannot read {}", args.file.display()))?;
    let id = repo.hash_object(&data, ObjectKind::from(args.kind), args.write)?;
    println!("{id}");
    Ok(())
}

fn cmd_cat_file(repo: &Repository, args: &CatFileArgs) -> anyhow::Result<()> {
    let text = repo.cat_file(&args.object, args.pretty)?;
    if text.ends_with('\n') {
        print!("{text}");
    } else {
        println!("{text}");
    }
    Ok(())
}

fn cmd_commit_tree(repo: &Repository, args: &CommitTreeArgs) -> anyhow::Result<()> {
    let tree = repo.resolve(&args.tree)?;
    let mut request = CommitRequest::new(tree, args.message.as_str(), args.author.as_str());
    if let Some(parent) = &args.parent {
        request = request.with_parent(repo.resolve(parent)?);
    }
    let id = repo.commit_tree(&request)?;
    println!("{id}");
    Ok(())
}

fn cmd_ls_files(repo: &Repository, args: &LsFilesArgs, format: OutputFormat) -> anyhow::Result<()> {
    let files = repo.list_files(&args.tree)?;
    match format {
        OutputFormat::Json => {
            let rows: Vec<_> = files
                .iter()
                .map(|(id, path)| json!({ "id": id.to_hex(), "path": path }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        OutputFormat::Text => {
            for (id, path) in &files {
                println!("{} {}", id.short_hex().yellow(), path);
            }
        }
    }
    Ok(())
}

fn cmd_rev_parse(repo: &Repository, args: &RevParseArgs, format: OutputFormat) -> anyhow::Result<()> {
    let id = repo.resolve(&args.prefix)?;
    match format {
        OutputFormat::Json => {
            println!("{}", json!({ "prefix": args.prefix, "id": id.to_hex() }));
        }
        OutputFormat::Text => println!("{id}"),
    }
    Ok(())
}
