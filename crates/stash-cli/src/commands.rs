use std::fs::File;
use std::io::{self, Cursor, Read, Write};

use anyhow::Context;
use colored::Colorize;
use stash_store::{FileStore, FileSystem, FsName, RootResolver, StoreConfig};

use crate::cli::*;

/// Run `cli` against the store it describes, writing command output to `out`.
pub fn run_command(cli: Cli, out: &mut dyn Write) -> anyhow::Result<()> {
    let store = open_store(&cli)?;
    match cli.command {
        Command::Get(args) => cmd_get(&store, args, out),
        Command::Set(args) => cmd_set(&store, args, out),
        Command::Cat(args) => cmd_cat(&store, args, out),
        Command::Put(args) => cmd_put(&store, args, out),
        Command::Rm(args) => cmd_rm(&store, args, out),
    }
}

fn open_store(cli: &Cli) -> anyhow::Result<FileStore<RootResolver>> {
    let mut config = match (&cli.config, &cli.root) {
        (Some(path), _) => StoreConfig::load(path)?,
        (None, Some(root)) => StoreConfig::new(root),
        (None, None) => StoreConfig::new("."),
    };
    if let Some(ext) = &cli.ext {
        config.extension = Some(ext.clone());
    }
    tracing::debug!(root = %config.root.display(), "opening store");
    Ok(config.open()?)
}

fn cmd_get(store: &impl FileSystem, args: NameArgs, out: &mut dyn Write) -> anyhow::Result<()> {
    let value = store.get_string(&FsName::from(args.name))?;
    writeln!(out, "{value}")?;
    Ok(())
}

fn cmd_set(store: &impl FileSystem, args: SetArgs, out: &mut dyn Write) -> anyhow::Result<()> {
    store.set_string(&FsName::from(args.name.as_str()), &args.value)?;
    writeln!(out, "{} Stored {}", "✓".green().bold(), args.name.yellow())?;
    Ok(())
}

fn cmd_cat(store: &impl FileSystem, args: NameArgs, out: &mut dyn Write) -> anyhow::Result<()> {
    let mut file = store.get_file(&FsName::from(args.name))?;
    io::copy(&mut file, out).context("copy blob to output")?;
    out.flush()?;
    Ok(())
}

fn cmd_put(store: &impl FileSystem, args: PutArgs, out: &mut dyn Write) -> anyhow::Result<()> {
    let name = FsName::from(args.name.as_str());
    match &args.file {
        Some(path) => {
            let mut file = File::open(path)
                .with_context(|| format!("open {}", path.display()))?;
            store.set_file(&name, &mut file)?;
        }
        None => {
            // Stdin cannot seek; buffer it first.
            let mut data = Vec::new();
            io::stdin().read_to_end(&mut data).context("read stdin")?;
            store.set_file(&name, &mut Cursor::new(data))?;
        }
    }
    writeln!(out, "{} Stored {}", "✓".green().bold(), args.name.yellow())?;
    Ok(())
}

fn cmd_rm(store: &impl FileSystem, args: NameArgs, out: &mut dyn Write) -> anyhow::Result<()> {
    store.remove_file(&FsName::from(args.name.as_str()))?;
    writeln!(out, "{} Removed {}", "✓".green().bold(), args.name.yellow())?;
    Ok(())
}
