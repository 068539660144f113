//! Cache directory resolution
//!
//! Each branch and interpreter combination gets its own mypy cache
//! directory, resolved from a template with named placeholders. The wrapper
//! only resolves and creates the directory; everything inside it belongs to
//! mypy.

use anyhow::{Context, Result, bail};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Build the substitution map for the cache template
///
/// Every environment variable is available as a placeholder; the computed
/// values shadow any variable with the same name.
pub fn template_vars(
    branch_name: &str,
    repo_root: &Path,
    python_path_hash: &str,
) -> HashMap<String, String> {
    let mut vars: HashMap<String, String> = std::env::vars().collect();
    vars.insert("branch_name".to_string(), branch_name.to_string());
    vars.insert("repo_root".to_string(), repo_root.display().to_string());
    vars.insert("python_path_hash".to_string(), python_path_hash.to_string());
    vars
}

/// Resolve `{name}` placeholders in the cache template
///
/// `{{` and `}}` are literal braces. Unknown placeholders and unbalanced
/// braces are errors.
pub fn resolve_template(template: &str, vars: &HashMap<String, String>) -> Result<String> {
    let mut resolved = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                resolved.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                resolved.push('}');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(c) => name.push(c),
                        None => bail!("unclosed '{{' in cache_dir template: {template}"),
                    }
                }
                match vars.get(&name) {
                    Some(value) => resolved.push_str(value),
                    None => bail!("unknown placeholder '{{{name}}}' in cache_dir template"),
                }
            }
            '}' => bail!("unmatched '}}' in cache_dir template: {template}"),
            c => resolved.push(c),
        }
    }

    Ok(resolved)
}

/// Resolve the cache template and create the directory
pub fn prepare(template: &str, vars: &HashMap<String, String>) -> Result<PathBuf> {
    let dir = PathBuf::from(resolve_template(template, vars)?);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create cache directory: {}", dir.display()))?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn vars() -> HashMap<String, String> {
        template_vars("feature/login", Path::new("/work/repo"), "deadbeefdeadbeef")
    }

    #[test]
    fn default_style_template_resolves() {
        let resolved = resolve_template(
            "{repo_root}/.mypy_cache/python_{python_path_hash}/branch/{branch_name}",
            &vars(),
        )
        .unwrap();
        assert_eq!(
            resolved,
            "/work/repo/.mypy_cache/python_deadbeefdeadbeef/branch/feature/login"
        );
    }

    #[test]
    fn resolution_is_deterministic() {
        let template = "{repo_root}/cache/{branch_name}";
        let first = resolve_template(template, &vars()).unwrap();
        let second = resolve_template(template, &vars()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn environment_variables_are_available() {
        // PATH is always present in the test environment
        let vars = vars();
        let resolved = resolve_template("{PATH}", &vars).unwrap();
        assert_eq!(&resolved, vars.get("PATH").unwrap());
    }

    #[test]
    fn computed_values_shadow_environment() {
        let mut vars = vars();
        vars.insert("branch_name".to_string(), "shadowed".to_string());
        assert_eq!(resolve_template("{branch_name}", &vars).unwrap(), "shadowed");
    }

    #[test]
    fn escaped_braces_are_literal() {
        let resolved = resolve_template("{{literal}}/{branch_name}", &vars()).unwrap();
        assert_eq!(resolved, "{literal}/feature/login");
    }

    #[test]
    fn unknown_placeholder_is_an_error() {
        let err = resolve_template("/tmp/{no_such_variable_here}", &vars()).unwrap_err();
        assert!(err.to_string().contains("no_such_variable_here"));
    }

    #[test]
    fn unbalanced_braces_are_errors() {
        assert!(resolve_template("{branch_name", &vars()).is_err());
        assert!(resolve_template("branch_name}", &vars()).is_err());
    }

    #[test]
    fn prepare_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let mut vars = vars();
        vars.insert(
            "repo_root".to_string(),
            dir.path().display().to_string(),
        );

        let template = "{repo_root}/cache/{branch_name}";
        let first = prepare(template, &vars).unwrap();
        assert!(first.is_dir());

        let second = prepare(template, &vars).unwrap();
        assert_eq!(first, second);
        assert!(second.is_dir());
    }
}
