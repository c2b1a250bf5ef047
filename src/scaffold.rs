use std::{
    collections::BTreeMap,
    env,
    fs::{self, File},
    io::Read,
    path::{Component, Path, PathBuf},
};

use anyhow::{anyhow, Context};
use globset::{Glob, GlobSet, GlobSetBuilder};
use handlebars::Handlebars;
use indexmap::IndexMap;
use serde::Deserialize;
use toml::Value;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::{
    error::{ScaffoldError, ScaffoldResult},
    selector::{AgentType, AgenticFramework},
};

/// Name of the optional descriptor living at the top of a template directory.
pub const DESCRIPTOR_FILE: &str = ".scaffold.toml";
/// Agent name used when neither the request nor the descriptor provides one.
pub const DEFAULT_AGENT_NAME: &str = "agent";

/// Validated inputs for one scaffold call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldRequest {
    pub framework: AgenticFramework,
    pub name: Option<String>,
    pub outdir: Option<PathBuf>,
    pub agent_type: AgentType,
}

impl ScaffoldRequest {
    pub fn new(framework: AgenticFramework) -> Self {
        Self {
            framework,
            name: None,
            outdir: None,
            agent_type: AgentType::default(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn outdir(mut self, outdir: impl Into<PathBuf>) -> Self {
        self.outdir = Some(outdir.into());
        self
    }

    pub fn agent_type(mut self, agent_type: AgentType) -> Self {
        self.agent_type = agent_type;
        self
    }
}

/// Produces an agent project on disk and returns where it was written.
pub trait Scaffolder {
    fn scaffold(&self, request: &ScaffoldRequest) -> ScaffoldResult<PathBuf>;
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ScaffoldDescription {
    #[serde(default)]
    template: TemplateDescription,
    #[serde(default)]
    parameters: IndexMap<String, Value>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TemplateDescription {
    exclude: Option<Vec<String>>,
    default_name: Option<String>,
}

impl ScaffoldDescription {
    /// Read `.scaffold.toml` from `template_dir`, or an empty description when absent.
    pub fn load(template_dir: &Path) -> ScaffoldResult<Self> {
        let path = template_dir.join(DESCRIPTOR_FILE);
        if !path.is_file() {
            return Ok(Self::default());
        }
        let mut content = String::new();
        File::open(&path)
            .and_then(|mut file| file.read_to_string(&mut content))
            .with_context(|| format!("cannot read {}", path.display()))?;
        toml::from_str(&content).map_err(|e| ScaffoldError::InvalidDescriptor {
            path,
            message: e.message().to_string(),
        })
    }

    fn excludes(&self, template_dir: &Path) -> ScaffoldResult<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in self.template.exclude.iter().flatten() {
            let glob = Glob::new(pattern).map_err(|e| ScaffoldError::InvalidDescriptor {
                path: template_dir.join(DESCRIPTOR_FILE),
                message: e.to_string(),
            })?;
            builder.add(glob);
        }
        builder
            .build()
            .map_err(|e| ScaffoldError::InvalidDescriptor {
                path: template_dir.join(DESCRIPTOR_FILE),
                message: e.to_string(),
            })
    }
}

/// Scaffolds from handlebars template trees laid out as
/// `<root>/<framework>/<agent type>/`.
#[derive(Debug, Clone)]
pub struct TemplateScaffolder {
    template_root: PathBuf,
}

impl TemplateScaffolder {
    pub fn new(template_root: impl Into<PathBuf>) -> Self {
        Self {
            template_root: template_root.into(),
        }
    }

    pub fn template_root(&self) -> &Path {
        &self.template_root
    }

    fn ensure_root(&self) -> ScaffoldResult<()> {
        if self.template_root.is_dir() {
            Ok(())
        } else {
            Err(ScaffoldError::TemplatesMissing(self.template_root.clone()))
        }
    }

    fn template_dir(&self, request: &ScaffoldRequest) -> ScaffoldResult<PathBuf> {
        self.ensure_root()?;
        let dir = match selector_dir(&self.template_root, &request.framework)? {
            Some(framework_dir) => selector_dir(&framework_dir, &request.agent_type)?,
            None => None,
        };
        dir.ok_or(ScaffoldError::UnsupportedCombination {
            framework: request.framework,
            agent_type: request.agent_type,
        })
    }

    /// Every framework and agent type pair that has a template directory.
    pub fn available(&self) -> ScaffoldResult<Vec<(AgenticFramework, AgentType)>> {
        self.ensure_root()?;
        let mut pairs = Vec::new();
        for framework_dir in subdirectories(&self.template_root)? {
            let Some(framework) = parse_dir_name::<AgenticFramework>(&framework_dir) else {
                continue;
            };
            for type_dir in subdirectories(&framework_dir)? {
                if let Some(agent_type) = parse_dir_name::<AgentType>(&type_dir) {
                    pairs.push((framework, agent_type));
                }
            }
        }
        pairs.sort();
        pairs.dedup();
        Ok(pairs)
    }

    /// Create `outdir/name` and return it along with the topmost directory this
    /// call created, which is what a failed run must remove.
    fn create_dir(&self, outdir: &Path, name: &str) -> ScaffoldResult<(PathBuf, PathBuf)> {
        let dir_path = outdir.join(name);
        if fs::symlink_metadata(&dir_path).is_ok() {
            return Err(ScaffoldError::DestinationExists(dir_path));
        }
        let created_root = dir_path
            .ancestors()
            .take_while(|p| !p.as_os_str().is_empty() && fs::symlink_metadata(p).is_err())
            .last()
            .map_or_else(|| dir_path.clone(), Path::to_path_buf);
        fs::create_dir_all(&dir_path)
            .with_context(|| format!("cannot create {}", dir_path.display()))?;
        Ok((dir_path, created_root))
    }

    fn render_into(
        &self,
        template_dir: &Path,
        description: &ScaffoldDescription,
        parameters: &BTreeMap<String, Value>,
        dir_path: &Path,
    ) -> ScaffoldResult<()> {
        let excludes = description.excludes(template_dir)?;
        let entries = WalkDir::new(template_dir)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                let Ok(relative) = entry.path().strip_prefix(template_dir) else {
                    return false;
                };
                if relative
                    .components()
                    .any(|c| c == Component::Normal(".git".as_ref()))
                {
                    return false;
                }
                if relative == Path::new(DESCRIPTOR_FILE) {
                    return false;
                }
                !excludes.is_match(relative)
            });

        let template_engine = template_engine();
        for entry in entries {
            let entry = entry.context("cannot read template entry")?;
            let entry_path = entry.path().strip_prefix(template_dir).with_context(|| {
                format!("{} is outside of the template", entry.path().display())
            })?;
            let entry_str = entry_path
                .to_str()
                .ok_or_else(|| anyhow!("template path {:?} is not valid utf8", entry_path))?;
            let rendered_path = template_engine
                .render_template(entry_str, parameters)
                .map_err(|e| ScaffoldError::Render {
                    path: entry.path().to_path_buf(),
                    message: e.to_string(),
                })?;
            let rendered = Path::new(&rendered_path);
            let contained = rendered.components().next().is_some()
                && rendered
                    .components()
                    .all(|c| matches!(c, Component::Normal(_)));
            if !contained {
                return Err(ScaffoldError::Render {
                    path: entry.path().to_path_buf(),
                    message: format!("rendered path `{rendered_path}` leaves the destination"),
                });
            }
            let destination = dir_path.join(rendered);

            if entry.file_type().is_dir() {
                fs::create_dir_all(&destination)
                    .with_context(|| format!("cannot create dir {}", destination.display()))?;
                continue;
            }

            let raw = fs::read(entry.path())
                .with_context(|| format!("cannot read file {}", entry.path().display()))?;
            let content = match String::from_utf8(raw) {
                Ok(text) => template_engine
                    .render_template(&text, parameters)
                    .map_err(|e| ScaffoldError::Render {
                        path: entry.path().to_path_buf(),
                        message: e.to_string(),
                    })?
                    .into_bytes(),
                // binary assets are copied verbatim
                Err(e) => e.into_bytes(),
            };
            debug!(file = %destination.display(), "writing");
            fs::write(&destination, content)
                .with_context(|| format!("cannot create file {}", destination.display()))?;
        }

        Ok(())
    }
}

impl Scaffolder for TemplateScaffolder {
    fn scaffold(&self, request: &ScaffoldRequest) -> ScaffoldResult<PathBuf> {
        let template_dir = self.template_dir(request)?;
        let description = ScaffoldDescription::load(&template_dir)?;

        let name = request
            .name
            .clone()
            .or_else(|| description.template.default_name.clone())
            .unwrap_or_else(|| DEFAULT_AGENT_NAME.to_string());
        validate_name(&name)?;

        let outdir = match &request.outdir {
            Some(outdir) => outdir.clone(),
            None => env::current_dir().context("cannot resolve the current directory")?,
        };
        let (dir_path, created_root) = self.create_dir(&outdir, &name)?;

        let mut parameters: BTreeMap<String, Value> = description
            .parameters
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        parameters.insert("name".to_string(), Value::String(name));
        parameters.insert(
            "framework".to_string(),
            Value::String(request.framework.to_string()),
        );
        parameters.insert(
            "agent_type".to_string(),
            Value::String(request.agent_type.to_string()),
        );
        parameters.insert(
            "target_dir".to_string(),
            Value::String(dir_path.to_string_lossy().to_string()),
        );

        if let Err(e) = self.render_into(&template_dir, &description, &parameters, &dir_path) {
            if let Err(cleanup) = fs::remove_dir_all(&created_root) {
                warn!(dir = %created_root.display(), error = %cleanup, "cannot remove partial scaffold");
            }
            return Err(e);
        }

        info!(
            framework = %request.framework,
            agent_type = %request.agent_type,
            dir = %dir_path.display(),
            "agent scaffolded"
        );
        Ok(dir_path)
    }
}

fn template_engine() -> Handlebars<'static> {
    let mut template_engine = Handlebars::new();
    template_engine.set_strict_mode(true);
    template_engine.register_escape_fn(handlebars::no_escape);
    #[cfg(feature = "helpers")]
    handlebars_misc_helpers::setup_handlebars(&mut template_engine);
    template_engine
}

fn validate_name(name: &str) -> ScaffoldResult<()> {
    let invalid = name.trim().is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);
    if invalid {
        return Err(ScaffoldError::InvalidName(name.to_string()));
    }
    Ok(())
}

fn subdirectories(dir: &Path) -> ScaffoldResult<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("cannot list {}", dir.display()))? {
        let path = entry
            .with_context(|| format!("cannot list {}", dir.display()))?
            .path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// First subdirectory of `parent` whose name parses to `wanted`, so `pr_review`,
/// `pr-review` and `PR-REVIEW` all select the same template.
fn selector_dir<T: std::str::FromStr + PartialEq>(
    parent: &Path,
    wanted: &T,
) -> ScaffoldResult<Option<PathBuf>> {
    Ok(subdirectories(parent)?
        .into_iter()
        .find(|dir| parse_dir_name::<T>(dir).as_ref() == Some(wanted)))
}

fn parse_dir_name<T: std::str::FromStr>(dir: &Path) -> Option<T> {
    let name = dir.file_name()?.to_str()?;
    match name.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            debug!(dir = %dir.display(), "ignoring unrecognised template directory");
            None
        }
    }
}
