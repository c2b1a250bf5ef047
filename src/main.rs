use std::{io, process::ExitCode};

use anyhow::Result;
use clap::Parser;

use swekit::{config, dispatch, list_templates, Cli, SwekitCommand, TemplateScaffolder};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    config::init_logging(cli.verbose);

    let scaffolder = TemplateScaffolder::new(cli.template_root());
    let outcome = match cli.command {
        SwekitCommand::Scaffold(opts) => dispatch(&opts.into(), &scaffolder)?,
        SwekitCommand::Templates => list_templates(&scaffolder)?,
    };

    Ok(outcome.report(&mut io::stdout().lock(), &mut io::stderr().lock())?)
}
