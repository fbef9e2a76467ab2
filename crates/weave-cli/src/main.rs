use clap::Parser;
use cli::{Args, Commands};
use error::CliResult;
use logging::setup_logging;
use render::{lint_file, print_config, render_file};
use weave_config::{
    config::{generate_default_config, set_config_path, Config},
    path::resolve_path,
};

mod cli;
mod document;
mod error;
mod logging;
mod render;
mod utils;

fn handle_cli() -> CliResult<()> {
    let args = Args::parse();

    setup_logging(&args);

    if args.no_color {
        utils::set_color(false);
    }

    if let Some(ref c) = args.config {
        set_config_path(resolve_path(c)?);
    }

    match args.command {
        Commands::DefConfig => generate_default_config()?,
        Commands::Config => print_config(&Config::new()?)?,
        Commands::Render {
            file,
            name,
        } => render_file(&file, name.as_deref(), &Config::new()?, args.json)?,
        Commands::Lint {
            file,
        } => lint_file(&file, &Config::new()?, args.json)?,
    }

    Ok(())
}

fn main() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    if let Err(err) = handle_cli() {
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(1);
    }
}
