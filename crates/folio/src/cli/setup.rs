use clap::{Parser, Subcommand};
use folioapp::model::Kind;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "folio", bin_name = "folio", version, disable_help_subcommand = true)]
#[command(about = "Typed document store with ordered folders", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding the data directory (defaults to the current directory)
    #[arg(long, global = true, env = "FOLIO_ROOT", help_heading = "Options")]
    pub root: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

/// Kinds are given as directory name, display name or id prefix
/// (`RequestGroup`, `folder`, `fld`).
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List documents of a kind in display order
    #[command(alias = "ls")]
    List {
        kind: Kind,

        /// Only documents under this parent (id, id prefix or name)
        #[arg(long)]
        parent: Option<String>,
    },

    /// Show one document
    Show {
        kind: Kind,

        /// Id, id prefix or name; prompts when omitted
        id: Option<String>,
    },

    /// Create a document at the top of its parent
    #[command(alias = "new")]
    Create {
        kind: Kind,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Owning document (required for everything but workspaces)
        #[arg(long)]
        parent: Option<String>,
    },

    /// Copy a document right after the original
    #[command(alias = "dup")]
    Duplicate {
        kind: Kind,

        id: Option<String>,

        /// Name for the copy (defaults to "<name> (Copy)")
        #[arg(long)]
        name: Option<String>,

        /// Put the copy under another parent, at the top
        #[arg(long)]
        parent: Option<String>,
    },

    /// Move a document to another parent or position
    #[command(alias = "mv")]
    Move {
        kind: Kind,

        id: Option<String>,

        /// New parent (defaults to the current one)
        #[arg(long)]
        parent: Option<String>,

        /// Place directly after this sibling instead of at the top
        #[arg(long)]
        after: Option<String>,
    },

    /// Delete a document and everything below it
    #[command(alias = "rm")]
    Remove { kind: Kind, id: Option<String> },

    /// Re-space the sort keys of one sibling set
    Rebalance {
        /// Parent whose children are re-spaced (roots when omitted)
        #[arg(long)]
        parent: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind_aliases() {
        let cli = Cli::try_parse_from(["folio", "list", "folder", "--parent", "Main"]).unwrap();
        match cli.command {
            Some(Commands::List { kind, parent }) => {
                assert_eq!(kind, Kind::RequestGroup);
                assert_eq!(parent.as_deref(), Some("Main"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["folio", "rm", "req", "req_1", "--root", "/tmp/x", "-v"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.root, Some(PathBuf::from("/tmp/x")));
        assert!(matches!(
            cli.command,
            Some(Commands::Remove { kind: Kind::Request, .. })
        ));
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        assert!(Cli::try_parse_from(["folio", "list", "widget"]).is_err());
    }

    #[test]
    fn test_move_flags() {
        let cli = Cli::try_parse_from(["folio", "mv", "fld", "Auth", "--after", "Users"]).unwrap();
        match cli.command {
            Some(Commands::Move { id, parent, after, .. }) => {
                assert_eq!(id.as_deref(), Some("Auth"));
                assert_eq!(parent, None);
                assert_eq!(after.as_deref(), Some("Users"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
