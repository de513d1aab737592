/*!
 * Prompt output to a file or standard output
 */

use std::fs;
use std::io::{self, Write};

use crate::config::Config;
use crate::error::{Result, TreePromptError};

/// Writes the rendered prompt to its configured destination
pub struct PromptWriter {
    /// Writer configuration
    config: Config,
}

impl PromptWriter {
    /// Create a new prompt writer
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Human-readable name of the destination
    pub fn target(&self) -> String {
        match &self.config.output_file {
            Some(path) => path.display().to_string(),
            None => "stdout".to_string(),
        }
    }

    /// Write the prompt verbatim, overwriting an existing output file
    pub fn write(&self, prompt: &str) -> Result<()> {
        let result = match &self.config.output_file {
            Some(path) => fs::write(path, prompt),
            None => {
                let stdout = io::stdout();
                let mut handle = stdout.lock();
                handle
                    .write_all(prompt.as_bytes())
                    .and_then(|_| handle.flush())
            }
        };

        result.map_err(|source| TreePromptError::Write {
            target: self.target(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_overwrites_file() {
        let temp_dir = tempdir().unwrap();
        let output = temp_dir.path().join("prompt.txt");
        fs::write(&output, "old content that is longer").unwrap();

        let writer = PromptWriter::new(Config {
            output_file: Some(output.clone()),
            ..Config::default()
        });
        writer.write("new").unwrap();

        assert_eq!(fs::read_to_string(&output).unwrap(), "new");
        assert_eq!(writer.target(), output.display().to_string());
    }

    #[test]
    fn test_write_failure_names_target() {
        let temp_dir = tempdir().unwrap();
        let output = temp_dir.path().join("missing").join("prompt.txt");

        let writer = PromptWriter::new(Config {
            output_file: Some(output),
            ..Config::default()
        });

        let err = writer.write("text").unwrap_err();
        assert!(matches!(err, TreePromptError::Write { .. }));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_stdout_target_name() {
        assert_eq!(PromptWriter::new(Config::default()).target(), "stdout");
    }
}
