use std::path::PathBuf;

use anyhow::Result;
use swekit::{AgentType, AgenticFramework, ScaffoldRequest, Scaffolder, TemplateScaffolder};

fn main() -> Result<()> {
    let request = ScaffoldRequest::new(AgenticFramework::Langgraph)
        .name("reviewer")
        .outdir(PathBuf::from("agents"))
        .agent_type(AgentType::PrReview);
    let path = TemplateScaffolder::new("templates").scaffold(&request)?;
    println!("{}", path.display());
    Ok(())
}
