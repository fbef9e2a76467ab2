use clap::{ArgAction, Parser, Subcommand, ValueHint};

#[derive(Parser)]
#[command(
    author,
    version,
    about,
    help_template = "{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}",
    arg_required_else_help = true
)]
pub struct Args {
    /// Set output verbosity
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress outputs
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output as json
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Provide custom config file
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<String>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the statements of a query file as SQL
    #[command(arg_required_else_help = true)]
    #[clap(name = "render", visible_alias = "r")]
    Render {
        /// Query file to read, or `-` for stdin
        #[arg(required = true, value_hint = ValueHint::FilePath)]
        file: String,

        /// Only render the statement with this name
        #[arg(required = false, short, long)]
        name: Option<String>,
    },

    /// Check the statements of a query file for problems
    #[command(arg_required_else_help = true)]
    #[clap(name = "lint", visible_alias = "l")]
    Lint {
        /// Query file to read, or `-` for stdin
        #[arg(required = true, value_hint = ValueHint::FilePath)]
        file: String,
    },

    /// Print the active configuration
    Config,

    /// Generate default config
    #[clap(name = "defconfig")]
    DefConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_render() {
        let args = Args::parse_from(["weave", "-vv", "render", "queries.toml", "--json", "-n", "users"]);

        assert_eq!(args.verbose, 2);
        assert!(args.json);
        match args.command {
            Commands::Render { file, name } => {
                assert_eq!(file, "queries.toml");
                assert_eq!(name.as_deref(), Some("users"));
            }
            _ => panic!("expected render command"),
        }
    }
}
