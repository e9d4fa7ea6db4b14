use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use abayes_analysis::{config::VisConfig, dataset::QueryResponse};
use anyhow::Context;

/// Where a report is written: a file when a path is given, stdout otherwise.
pub struct Output {
    writer: Box<dyn Write>,
    path: Option<PathBuf>,
}

impl Output {
    pub fn create(path: Option<&Path>) -> anyhow::Result<Self> {
        let writer: Box<dyn Write> = match path {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create output file: {}", path.display()))?;
                Box::new(BufWriter::new(file))
            }
            None => Box::new(io::stdout().lock()),
        };
        Ok(Self {
            writer,
            path: path.map(Path::to_path_buf),
        })
    }

    fn destination(&self) -> String {
        self.path
            .as_ref()
            .map_or_else(|| "stdout".to_owned(), |path| path.display().to_string())
    }

    /// Runs `write` against the destination and flushes it.
    pub fn emit<F>(&mut self, what: &str, write: F) -> anyhow::Result<()>
    where
        F: FnOnce(&mut dyn Write) -> anyhow::Result<()>,
    {
        write(&mut *self.writer)
            .and_then(|()| Ok(self.writer.flush()?))
            .with_context(|| format!("Failed to write {what} to {}", self.destination()))?;
        if let Some(path) = &self.path {
            tracing::info!(path = %path.display(), "wrote {what}");
        }
        Ok(())
    }
}

/// Pretty-prints `value` as JSON followed by a newline.
pub fn write_json<T>(w: &mut dyn Write, value: &T) -> anyhow::Result<()>
where
    T: serde::Serialize,
{
    serde_json::to_writer_pretty(&mut *w, value)?;
    writeln!(w)?;
    Ok(())
}

fn read_json<T>(kind: &str, path: &Path) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {kind} file: {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse {kind} JSON file: {}", path.display()))
}

/// Read a query response (field schema plus rows) from a JSON file
pub fn read_query_file(path: &Path) -> anyhow::Result<QueryResponse> {
    read_json("query response", path)
}

/// Read analysis options from a JSON file
pub fn read_config_file(path: &Path) -> anyhow::Result<VisConfig> {
    read_json("config", path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_json_ends_with_newline() {
        let mut buf = Vec::new();
        write_json(&mut buf, &serde_json::json!({"a": 1})).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "{\n  \"a\": 1\n}\n");
    }

    #[test]
    fn test_emit_to_file() {
        let path = std::env::temp_dir().join(format!("abayes-emit-{}.txt", std::process::id()));
        let mut output = Output::create(Some(&path)).unwrap();
        output
            .emit("greeting", |w| Ok(writeln!(w, "hello")?))
            .unwrap();
        drop(output);
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello\n");
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_file_is_reported_by_kind() {
        let err = read_query_file(Path::new("/nonexistent/abayes/query.json")).unwrap_err();
        assert!(
            err.to_string()
                .starts_with("Failed to read query response file: ")
        );
    }
}
