use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use config::FileFormat;
use regex::{Captures, Regex};
use tracing::debug;

use super::ConfigError;

fn env_placeholder() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{(\w+)\}").expect("placeholder pattern is valid"))
}

/// Replace `${VAR_NAME}` placeholders with values from `lookup`.
/// Unknown variables are left untouched so the parse error points at them.
pub fn substitute_env_vars<F>(content: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    env_placeholder()
        .replace_all(content, |caps: &Captures| {
            lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Read a configuration file, tolerating a UTF-8 BOM, and expand environment placeholders.
pub fn read_config_file(path: &Path) -> Result<String, ConfigError> {
    let bytes = fs::read(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;

    // BOM sniffing happens inside decode; malformed sequences become U+FFFD
    let (content, encoding, had_errors) = encoding_rs::UTF_8.decode(&bytes);
    if had_errors {
        debug!(
            "Configuration file {} is not valid {}; replaced malformed bytes",
            path.display(),
            encoding.name()
        );
    }

    Ok(substitute_env_vars(&content, |var| std::env::var(var).ok()))
}

/// Pick the parser from the file extension, defaulting to YAML.
pub fn file_format(path: &Path) -> FileFormat {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("json") | Some("jsonld") => FileFormat::Json,
        Some("toml") => FileFormat::Toml,
        _ => FileFormat::Yaml,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn placeholders_are_substituted() {
        let out = substitute_env_vars("key: ${GROQ_API_KEY}\nmodel: ${MODEL}", |var| match var {
            "GROQ_API_KEY" => Some("gsk-123".to_string()),
            _ => None,
        });
        assert_eq!(out, "key: gsk-123\nmodel: ${MODEL}");
    }

    #[test]
    fn format_follows_extension() {
        assert!(matches!(file_format(Path::new("a.json")), FileFormat::Json));
        assert!(matches!(file_format(Path::new("a.JSONLD")), FileFormat::Json));
        assert!(matches!(file_format(Path::new("a.toml")), FileFormat::Toml));
        assert!(matches!(file_format(Path::new("a.yaml")), FileFormat::Yaml));
        assert!(matches!(file_format(Path::new("translator")), FileFormat::Yaml));
    }

    #[test]
    fn bom_is_stripped() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0xEF, 0xBB, 0xBF]).unwrap();
        file.write_all(b"server:\n  port: 8080\n").unwrap();

        let content = read_config_file(file.path()).unwrap();
        assert!(content.starts_with("server:"));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = read_config_file(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.yaml"));
    }
}
