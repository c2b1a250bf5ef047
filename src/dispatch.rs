use std::{
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};

use console::Style;
use tracing::debug;

use crate::{
    error::ScaffoldError,
    scaffold::{ScaffoldRequest, Scaffolder, TemplateScaffolder},
    selector::{AgentType, AgenticFramework},
};

/// What a command run produced, ready to be reported.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Scaffolded(PathBuf),
    Listed(Vec<(AgenticFramework, AgentType)>),
    /// A known scaffolding error, with its message kept verbatim.
    Failed(String),
}

/// Run one scaffold request. Known scaffolding errors become
/// [`Outcome::Failed`]; anything else is returned as an error.
pub fn dispatch(request: &ScaffoldRequest, scaffolder: &dyn Scaffolder) -> anyhow::Result<Outcome> {
    debug!(?request, "dispatching scaffold");
    match scaffolder.scaffold(request) {
        Ok(path) => Ok(Outcome::Scaffolded(path)),
        Err(e) => translate(e),
    }
}

/// List the template pairs the scaffolder can serve.
pub fn list_templates(scaffolder: &TemplateScaffolder) -> anyhow::Result<Outcome> {
    match scaffolder.available() {
        Ok(pairs) => Ok(Outcome::Listed(pairs)),
        Err(e) => translate(e),
    }
}

fn translate(e: ScaffoldError) -> anyhow::Result<Outcome> {
    match e {
        ScaffoldError::Fatal(e) => {
            debug!(error = %e, "scaffolding crashed");
            Err(e)
        }
        known => Ok(Outcome::Failed(known.to_string())),
    }
}

impl Outcome {
    /// Print the outcome and pick the process exit code.
    pub fn report(&self, out: &mut impl Write, err: &mut impl Write) -> io::Result<ExitCode> {
        match self {
            Outcome::Scaffolded(path) => {
                writeln!(out, "🤖 Scaffolded agent @ {}", path.display())?;
                Ok(ExitCode::SUCCESS)
            }
            Outcome::Listed(pairs) => {
                for (framework, agent_type) in pairs {
                    writeln!(out, "{framework}/{agent_type}")?;
                }
                Ok(ExitCode::SUCCESS)
            }
            Outcome::Failed(message) => {
                let red = Style::new().red().bold().for_stderr();
                writeln!(err, "{} {}", red.apply_to("Error:"), message)?;
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use anyhow::anyhow;

    /// Records every request and answers with a canned result.
    struct FakeScaffolder {
        calls: RefCell<Vec<ScaffoldRequest>>,
        answer: fn() -> Result<PathBuf, ScaffoldError>,
    }

    impl FakeScaffolder {
        fn new(answer: fn() -> Result<PathBuf, ScaffoldError>) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                answer,
            }
        }
    }

    impl Scaffolder for FakeScaffolder {
        fn scaffold(&self, request: &ScaffoldRequest) -> Result<PathBuf, ScaffoldError> {
            self.calls.borrow_mut().push(request.clone());
            (self.answer)()
        }
    }

    fn render(outcome: &Outcome) -> (String, String, ExitCode) {
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let code = outcome.report(&mut out, &mut err).unwrap();
        (
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
            code,
        )
    }

    #[test]
    fn success_prints_the_returned_path() {
        let scaffolder = FakeScaffolder::new(|| Ok(PathBuf::from("./out/botA")));
        let request = ScaffoldRequest::new(AgenticFramework::Crewai)
            .name("botA")
            .outdir("./out");

        let outcome = dispatch(&request, &scaffolder).unwrap();
        let (out, err, code) = render(&outcome);

        assert_eq!(out, "🤖 Scaffolded agent @ ./out/botA\n");
        assert!(err.is_empty());
        assert_eq!(code, ExitCode::SUCCESS);
        assert_eq!(scaffolder.calls.borrow().as_slice(), &[request]);
    }

    #[test]
    fn known_error_keeps_message_verbatim() {
        let scaffolder =
            FakeScaffolder::new(|| Err(ScaffoldError::DestinationExists(PathBuf::from("out/a"))));
        let request = ScaffoldRequest::new(AgenticFramework::Autogen);

        let outcome = dispatch(&request, &scaffolder).unwrap();
        let (out, err, code) = render(&outcome);

        assert_eq!(
            outcome,
            Outcome::Failed("cannot scaffold into out/a because it already exists".to_string())
        );
        assert!(out.is_empty());
        assert!(err.contains("cannot scaffold into out/a because it already exists"));
        assert_eq!(err.lines().count(), 1);
        assert_eq!(code, ExitCode::FAILURE);
    }

    #[test]
    fn unknown_error_is_propagated_not_swallowed() {
        let scaffolder = FakeScaffolder::new(|| Err(ScaffoldError::Fatal(anyhow!("disk on fire"))));
        let request = ScaffoldRequest::new(AgenticFramework::Camelai);

        let err = dispatch(&request, &scaffolder).unwrap_err();

        assert_eq!(err.to_string(), "disk on fire");
        assert_eq!(scaffolder.calls.borrow().len(), 1);
    }

    #[test]
    fn listing_prints_one_pair_per_line() {
        let outcome = Outcome::Listed(vec![
            (AgenticFramework::Crewai, AgentType::Swe),
            (AgenticFramework::Langgraph, AgentType::PrReview),
        ]);
        let (out, _, code) = render(&outcome);
        assert_eq!(out, "crewai/swe\nlanggraph/pr-review\n");
        assert_eq!(code, ExitCode::SUCCESS);
    }

    #[test]
    fn listing_without_templates_is_known() {
        let root = tempfile::tempdir().unwrap();
        let scaffolder = TemplateScaffolder::new(root.path().join("missing"));
        let outcome = list_templates(&scaffolder).unwrap();
        assert!(matches!(outcome, Outcome::Failed(m) if m.contains("does not exist")));
    }
}
