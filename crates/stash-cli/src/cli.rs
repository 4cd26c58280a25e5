use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "stash",
    about = "Stash: atomic, name-addressed blob storage",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory names are stored under
    #[arg(long, global = true, conflicts_with = "config")]
    pub root: Option<PathBuf>,

    /// TOML store configuration
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Extension appended to stored file names
    #[arg(long, global = true)]
    pub ext: Option<String>,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print a stored string
    Get(NameArgs),
    /// Store a string (surrounding whitespace is trimmed)
    Set(SetArgs),
    /// Copy a stored blob to stdout
    Cat(NameArgs),
    /// Store a blob from a file, or stdin when no file is given
    Put(PutArgs),
    /// Remove a stored blob
    Rm(NameArgs),
}

#[derive(Args)]
pub struct NameArgs {
    pub name: String,
}

#[derive(Args)]
pub struct SetArgs {
    pub name: String,
    pub value: String,
}

#[derive(Args)]
pub struct PutArgs {
    pub name: String,
    pub file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_get() {
        let cli = Cli::try_parse_from(["stash", "get", "token"]).unwrap();
        if let Command::Get(args) = cli.command {
            assert_eq!(args.name, "token");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_set() {
        let cli = Cli::try_parse_from(["stash", "set", "token", " abc "]).unwrap();
        if let Command::Set(args) = cli.command {
            assert_eq!(args.name, "token");
            assert_eq!(args.value, " abc ");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_put_from_stdin() {
        let cli = Cli::try_parse_from(["stash", "put", "blob"]).unwrap();
        if let Command::Put(args) = cli.command {
            assert_eq!(args.file, None);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_put_from_file() {
        let cli = Cli::try_parse_from(["stash", "put", "blob", "/tmp/in.bin"]).unwrap();
        if let Command::Put(args) = cli.command {
            assert_eq!(args.file, Some(PathBuf::from("/tmp/in.bin")));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_global_root_after_subcommand() {
        let cli = Cli::try_parse_from(["stash", "rm", "old", "--root", "/srv"]).unwrap();
        assert_eq!(cli.root, Some(PathBuf::from("/srv")));
        assert!(matches!(cli.command, Command::Rm(_)));
    }

    #[test]
    fn root_conflicts_with_config() {
        assert!(Cli::try_parse_from(["stash", "--root", "a", "--config", "b", "get", "x"]).is_err());
    }

    #[test]
    fn parse_verbose_and_ext() {
        let cli = Cli::try_parse_from(["stash", "-v", "--ext", "txt", "cat", "x"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.ext.as_deref(), Some("txt"));
    }
}
