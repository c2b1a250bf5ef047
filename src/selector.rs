use std::{fmt, str::FromStr};

use anyhow::anyhow;
use clap::ValueEnum;

/// Agentic framework an agent project is scaffolded for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum)]
pub enum AgenticFramework {
    Crewai,
    Langgraph,
    Llamaindex,
    Autogen,
    Camelai,
}

/// Kind of agent to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, ValueEnum)]
pub enum AgentType {
    #[default]
    Swe,
    #[value(alias = "pr_review")]
    PrReview,
}

fn lookup<T: ValueEnum + Copy>(kind: &str, input: &str) -> anyhow::Result<T> {
    T::from_str(input.trim(), true).map_err(|_| {
        let valid = T::value_variants()
            .iter()
            .filter_map(|v| v.to_possible_value())
            .map(|v| v.get_name().to_owned())
            .collect::<Vec<_>>()
            .join(", ");
        anyhow!("invalid {kind} '{input}', valid values: {valid}")
    })
}

impl AgenticFramework {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Crewai => "crewai",
            Self::Langgraph => "langgraph",
            Self::Llamaindex => "llamaindex",
            Self::Autogen => "autogen",
            Self::Camelai => "camelai",
        }
    }
}

impl AgentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Swe => "swe",
            Self::PrReview => "pr-review",
        }
    }
}

impl fmt::Display for AgenticFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgenticFramework {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        lookup("framework", s)
    }
}

impl FromStr for AgentType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        lookup("agent type", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token<T: ValueEnum>(value: &T) -> String {
        value.to_possible_value().unwrap().get_name().to_owned()
    }

    #[test]
    fn framework_tokens_are_case_insensitive() {
        assert_eq!(
            "CrewAI".parse::<AgenticFramework>().unwrap(),
            AgenticFramework::Crewai
        );
        assert_eq!(
            "langgraph".parse::<AgenticFramework>().unwrap(),
            AgenticFramework::Langgraph
        );
    }

    #[test]
    fn agent_type_accepts_both_spellings() {
        assert_eq!("SWE".parse::<AgentType>().unwrap(), AgentType::Swe);
        assert_eq!("pr-review".parse::<AgentType>().unwrap(), AgentType::PrReview);
        assert_eq!("pr_review".parse::<AgentType>().unwrap(), AgentType::PrReview);
    }

    #[test]
    fn unknown_token_lists_valid_values() {
        let err = "unknownframework"
            .parse::<AgenticFramework>()
            .unwrap_err()
            .to_string();
        assert!(err.contains("unknownframework"));
        for name in ["crewai", "langgraph", "llamaindex", "autogen", "camelai"] {
            assert!(err.contains(name), "{err} should list {name}");
        }
    }

    #[test]
    fn empty_token_is_rejected() {
        assert!("".parse::<AgentType>().is_err());
        assert!("  ".parse::<AgenticFramework>().is_err());
    }

    #[test]
    fn display_matches_clap_token() {
        for framework in AgenticFramework::value_variants() {
            assert_eq!(framework.to_string(), token(framework));
        }
        for agent_type in AgentType::value_variants() {
            assert_eq!(agent_type.to_string(), token(agent_type));
        }
    }

    #[test]
    fn default_agent_type_is_swe() {
        assert_eq!(AgentType::default(), AgentType::Swe);
    }
}
