use std::fs;
use std::path::Path;

/// Parse `.env` content into key/value pairs. Blank lines, `#` comments and lines
/// without `=` are skipped; surrounding quotes are stripped.
pub fn parse_env_lines(content: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
        let Some((key, value)) = trimmed.split_once('=') else {
            continue;
        };

        let value_no_comment = value.split('#').next().unwrap_or("").trim();
        let parsed = if value_no_comment.len() >= 2
            && ((value_no_comment.starts_with('"') && value_no_comment.ends_with('"'))
                || (value_no_comment.starts_with('\'') && value_no_comment.ends_with('\'')))
        {
            &value_no_comment[1..value_no_comment.len() - 1]
        } else {
            value_no_comment
        };
        out.push((key.trim().to_string(), parsed.to_string()));
    }
    out
}

/// Load `path` into the process environment without overriding variables that are
/// already set. A missing file is not an error.
pub fn load_dot_env_from(path: &Path) {
    if !path.exists() {
        return;
    }

    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("[ENV] Failed to read {}: {}", path.display(), e);
            return;
        }
    };

    for (key, value) in parse_env_lines(&content) {
        if std::env::var_os(&key).is_some() {
            continue;
        }
        std::env::set_var(key, value);
    }
}

pub fn load_dot_env() {
    load_dot_env_from(Path::new(".env"));
    if std::env::var("ETH_RPC_URL").is_err() && std::env::var("PROVIDER_URL").is_err() {
        tracing::warn!("[ENV] ETH_RPC_URL is not set");
    }
}
