//! Scaffold agent projects for an agentic framework.
//!
//! The `swekit` binary validates its inputs into a [`ScaffoldRequest`], hands it
//! to a [`Scaffolder`] and reports the resulting [`Outcome`]. [`TemplateScaffolder`]
//! is the default collaborator; it renders handlebars template trees.

pub mod cli;
pub mod config;
mod dispatch;
mod error;
mod scaffold;
mod selector;

pub use crate::cli::{Cli, Opts, SwekitCommand};
pub use crate::dispatch::{dispatch, list_templates, Outcome};
pub use crate::error::{ScaffoldError, ScaffoldResult};
pub use crate::scaffold::{
    ScaffoldDescription, ScaffoldRequest, Scaffolder, TemplateScaffolder, DEFAULT_AGENT_NAME,
    DESCRIPTOR_FILE,
};
pub use crate::selector::{AgentType, AgenticFramework};
