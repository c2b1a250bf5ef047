use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::{
    config::{default_template_root, TEMPLATES_ENV},
    scaffold::ScaffoldRequest,
    selector::{AgentType, AgenticFramework},
};

/// SWE Kit CLI for scaffolding coding agents.
#[derive(Parser, Debug)]
#[command(name = "swekit", author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding `<framework>/<agent type>` template trees
    #[arg(long, global = true, env = TEMPLATES_ENV, value_name = "DIR")]
    pub templates: Option<PathBuf>,

    /// Log more to stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: SwekitCommand,
}

#[derive(Subcommand, Debug)]
pub enum SwekitCommand {
    /// 🤖 Scaffold an agent from a template directory
    Scaffold(Opts),
    /// List the framework and agent type pairs that have a template
    Templates,
}

#[derive(Args, Debug, Clone)]
pub struct Opts {
    /// Agentic framework to scaffold for
    #[arg(value_enum, ignore_case = true)]
    pub framework: AgenticFramework,

    /// Name of agent
    #[arg(short, long)]
    pub name: Option<String>,

    /// Output directory for the agent
    #[arg(short, long, value_name = "PATH")]
    pub outdir: Option<PathBuf>,

    /// Type of agent to scaffold, defaults to SWE
    #[arg(
        short = 't',
        long = "type",
        value_enum,
        ignore_case = true,
        default_value_t = AgentType::Swe,
        value_name = "AGENT_TYPE"
    )]
    pub agent_type: AgentType,
}

impl Cli {
    pub fn template_root(&self) -> PathBuf {
        self.templates.clone().unwrap_or_else(default_template_root)
    }
}

impl From<Opts> for ScaffoldRequest {
    fn from(opts: Opts) -> Self {
        Self {
            framework: opts.framework,
            name: opts.name,
            outdir: opts.outdir,
            agent_type: opts.agent_type,
        }
    }
}
