/*!
 * Prompt assembly: file records, source tree, git metadata and templating
 */

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::{Result, TreePromptError};
use crate::git::MetadataProvider;
use crate::loader;
use crate::template::{Template, Value};
use crate::tree::SourceTreeRenderer;
use crate::types::FileRecord;
use crate::utils::relative_path;

/// Built-in template used when no custom template is configured
pub const DEFAULT_TEMPLATE: &str = r#"
{{.SourceTree}}

File Contents:
{{range .Files}}
--- {{.RelativePath}} ---
{{.Content}}

{{end}}

{{if .GitDiff}}
Git Diff (Staged Changes):
{{.GitDiff}}
{{end}}

{{if .GitLog}}
Git Log ({{.GitBranch}} to {{.Config.GitBranch2}}):
{{.GitLog}}
{{end}}
"#;

/// Everything a template can reference for one run
#[derive(Debug, Clone)]
pub struct PromptDocument<'a> {
    /// Text files in scan order
    pub files: Vec<FileRecord>,
    /// Rendered source tree block
    pub source_tree: String,
    /// Staged diff, when requested and available
    pub git_diff: Option<String>,
    /// Log between the two revisions, when requested and available
    pub git_log: Option<String>,
    /// First revision of the log range
    pub git_branch: Option<String>,
    /// Configuration of the run
    pub config: &'a Config,
}

impl PromptDocument<'_> {
    /// Convert into the value tree templates are executed against
    pub fn to_value(&self) -> Value {
        let files = self
            .files
            .iter()
            .map(|file| {
                Value::map([
                    ("RelativePath", Value::from(file.relative_path.as_str())),
                    ("Content", Value::from(file.content.as_str())),
                ])
            })
            .collect::<Vec<_>>();

        Value::map([
            ("Files", Value::from(files)),
            ("SourceTree", Value::from(self.source_tree.as_str())),
            ("GitDiff", Value::from(self.git_diff.clone())),
            ("GitLog", Value::from(self.git_log.clone())),
            ("GitBranch", Value::from(self.git_branch.clone())),
            ("Config", config_value(self.config)),
        ])
    }
}

fn config_value(config: &Config) -> Value {
    let patterns = |list: &[String]| -> Value {
        Value::from(
            list.iter()
                .map(|p| Value::from(p.as_str()))
                .collect::<Vec<_>>(),
        )
    };
    let path_string =
        |path: &Option<PathBuf>| Value::from(path.as_ref().map(|p| p.display().to_string()));

    Value::map([
        ("RootDir", Value::from(config.root_dir.display().to_string())),
        ("IncludePatterns", patterns(config.include_patterns.as_slice())),
        ("ExcludePatterns", patterns(config.exclude_patterns.as_slice())),
        ("OutputFile", path_string(&config.output_file)),
        ("Tokenizer", Value::from(config.tokenizer.as_str())),
        ("Template", path_string(&config.template)),
        ("IncludeGitDiff", Value::from(config.include_git_diff)),
        ("IncludeGitLog", Value::from(config.include_git_log)),
        ("GitBranch1", Value::from(config.git_branch1.clone())),
        ("GitBranch2", Value::from(config.git_branch2.clone())),
        ("ShowHighTokenFolders", Value::from(config.show_high_token_folders)),
        ("HighTokenFolderCount", Value::from(config.high_token_folder_count)),
    ])
}

/// A rendered prompt and what went into it
#[derive(Debug, Clone)]
pub struct Prompt {
    /// Final prompt text
    pub text: String,
    /// Number of files rendered into the content section
    pub files_rendered: usize,
    /// Non-fatal problems encountered while assembling
    pub warnings: Vec<String>,
}

/// Orchestrates loading, tree rendering, git metadata and templating
pub struct PromptAssembler<'a> {
    config: &'a Config,
    vcs: &'a dyn MetadataProvider,
}

impl<'a> PromptAssembler<'a> {
    /// Create an assembler for one run
    pub fn new(config: &'a Config, vcs: &'a dyn MetadataProvider) -> Self {
        Self { config, vcs }
    }

    /// Build the prompt from the paths selected by the scanner
    pub fn assemble(&self, selected_paths: &[PathBuf]) -> Result<Prompt> {
        let mut warnings = Vec::new();

        let files = self.load_records(selected_paths)?;
        log::debug!("Loaded {} text files", files.len());

        let source_tree = SourceTreeRenderer::new(&self.config.root_dir)?.render()?;

        let mut document = PromptDocument {
            files,
            source_tree,
            git_diff: None,
            git_log: None,
            git_branch: None,
            config: self.config,
        };
        self.add_git_metadata(&mut document, &mut warnings)?;

        let template = self.load_template()?;
        let text = template.render(&document.to_value())?;

        Ok(Prompt {
            text,
            files_rendered: document.files.len(),
            warnings,
        })
    }

    fn load_records(&self, selected_paths: &[PathBuf]) -> Result<Vec<FileRecord>> {
        let root = &self.config.root_dir;
        let mut records: Vec<FileRecord> = Vec::new();
        let mut seen = HashSet::new();

        for path in selected_paths {
            if !loader::is_text_file(path) {
                log::trace!("Skipping non-text file {}", path.display());
                continue;
            }

            let relative = relative_path(root, path).display().to_string();
            if !seen.insert(relative.clone()) {
                continue;
            }

            records.push(FileRecord {
                relative_path: relative,
                content: loader::load(path)?,
            });
        }

        Ok(records)
    }

    fn add_git_metadata(
        &self,
        document: &mut PromptDocument<'_>,
        warnings: &mut Vec<String>,
    ) -> Result<()> {
        let config = self.config;
        if !config.wants_git() {
            return Ok(());
        }

        let root = &config.root_dir;
        if !self.vcs.is_repository(root) {
            let warning = format!(
                "{} is not a git repository. Git information will not be included.",
                root.display()
            );
            log::warn!("{}", warning);
            warnings.push(warning);
            return Ok(());
        }

        if config.include_git_diff {
            log::debug!("Collecting staged diff");
            document.git_diff = Some(self.vcs.staged_diff(root)?);
        }

        if config.include_git_log {
            let branch1 = match &config.git_branch1 {
                Some(branch) => branch.clone(),
                None => self.vcs.current_branch(root)?,
            };

            if let Some(branch2) = &config.git_branch2 {
                log::debug!("Collecting log {}..{}", branch1, branch2);
                document.git_log = Some(self.vcs.log(root, &branch1, branch2)?);
            }
            document.git_branch = Some(branch1);
        }

        Ok(())
    }

    fn load_template(&self) -> Result<Template> {
        match &self.config.template {
            Some(path) => {
                let source = fs::read_to_string(path).map_err(|source| TreePromptError::Read {
                    path: path.clone(),
                    source,
                })?;
                Ok(Template::compile(&path.display().to_string(), &source)?)
            }
            None => Ok(Template::compile("default", DEFAULT_TEMPLATE)?),
        }
    }
}
