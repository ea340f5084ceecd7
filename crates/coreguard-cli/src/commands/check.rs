//! Check command implementation.

use anyhow::{Context, Result};
use coreguard_core::{Analyzer, Severity};
use coreguard_rules::builtin_registry;
use coreguard_ts::TypeScriptParser;
use std::path::Path;

use crate::config_resolver::Resolver;
use crate::OutputFormat;

/// Runs the check command.
///
/// Without `path` the run covers `[analyzer] root` of the resolved config.
/// Returns `true` if any violation meets the configured `fail_on` threshold.
pub fn run(
    path: Option<&Path>,
    format: OutputFormat,
    rules_filter: Option<String>,
    exclude: Vec<String>,
    explicit_config: Option<&Path>,
) -> Result<bool> {
    let resolver = Resolver::from_env()?;
    let (analyzer, threshold) = build(
        &resolver,
        path,
        explicit_config,
        rules_filter.as_deref(),
        exclude,
    )?;

    tracing::info!(
        "Analyzing {} with {} rules",
        analyzer.root().display(),
        analyzer.rule_count()
    );

    let result = analyzer.analyze().context("Analysis failed")?;

    super::output::print(&result, format, analyzer.project_root())?;

    Ok(result.has_violations_at(threshold))
}

/// Builds the analyzer and returns it with the failure threshold.
fn build(
    resolver: &Resolver,
    path: Option<&Path>,
    explicit_config: Option<&Path>,
    rules_filter: Option<&str>,
    exclude: Vec<String>,
) -> Result<(Analyzer, Severity)> {
    let start = path.unwrap_or_else(|| resolver.cwd());
    let resolved = resolver.load(start, explicit_config)?;
    tracing::debug!(
        "Config {:?}, project root {}",
        resolved.source,
        resolved.project_root.display()
    );
    let threshold = resolved.config.fail_threshold();

    let only = rules_filter.map(parse_filter);
    let rules = builtin_registry()
        .instantiate_enabled(&resolved.config, only.as_deref())
        .context("Invalid rule selection")?;

    let mut builder = Analyzer::builder()
        .project_root(resolved.project_root)
        .parser(TypeScriptParser::new())
        .rules(rules)
        .excludes(exclude)
        .config(resolved.config);
    if let Some(path) = path {
        builder = builder.root(resolver.absolute(path));
    }
    let analyzer = builder.build().context("Failed to build analyzer")?;

    Ok((analyzer, threshold))
}

fn parse_filter(filter: &str) -> Vec<String> {
    filter
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn project() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "coreagent/clock.ts", "export const now = () => Date.now();\n");
        write(dir.path(), "coreagent/store.ts", "export const cache = new Map();\n");
        write(dir.path(), "tests/foo.ts", "class Foo { cache = new Map(); }\nDate.now();\n");
        write(dir.path(), "dist/bundle.js", "new Map();\n");
        dir
    }

    /// Builds as if `coreguard check [path]` ran inside `dir`.
    fn build_in(dir: &Path, path: Option<&str>) -> Result<(Analyzer, Severity)> {
        let resolver = Resolver::new(dir, None);
        build(&resolver, path.map(Path::new), None, None, vec![])
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!(
            parse_filter(" CG001, prefer-unified-time ,,"),
            vec!["CG001".to_string(), "prefer-unified-time".to_string()]
        );
    }

    #[test]
    fn test_default_run_reports_all_rules() {
        let dir = project();
        let (analyzer, threshold) = build_in(dir.path(), None).unwrap();
        assert_eq!(analyzer.rule_count(), 3);
        assert_eq!(threshold, Severity::Info);

        let result = analyzer.analyze().unwrap();
        assert_eq!(result.files_checked, 3);
        assert_eq!(result.violations.len(), 2);
        assert!(result.has_violations_at(threshold));
    }

    #[test]
    fn test_rule_filter() {
        let dir = project();
        let resolver = Resolver::new(dir.path(), None);
        let (analyzer, _) = build(&resolver, None, None, Some("CG002"), vec![]).unwrap();
        let result = analyzer.analyze().unwrap();
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].rule, "prefer-unified-time");
    }

    #[test]
    fn test_unknown_rule_filter_fails() {
        let dir = project();
        let resolver = Resolver::new(dir.path(), None);
        assert!(build(&resolver, None, None, Some("no-such-rule"), vec![]).is_err());
    }

    #[test]
    fn test_cli_excludes() {
        let dir = project();
        let resolver = Resolver::new(dir.path(), None);
        let (analyzer, _) =
            build(&resolver, None, None, None, vec!["**/store.ts".to_string()]).unwrap();
        let result = analyzer.analyze().unwrap();
        assert_eq!(result.files_checked, 2);
    }

    #[test]
    fn test_exempt_path_argument_stays_exempt() {
        let dir = project();
        for arg in ["tests", "tests/foo.ts", "./tests/../tests"] {
            let (analyzer, _) = build_in(dir.path(), Some(arg)).unwrap();
            let result = analyzer.analyze().unwrap();
            assert_eq!(result.files_checked, 1, "{arg}");
            assert!(result.violations.is_empty(), "{arg}: {:?}", result.violations);
        }
    }

    #[test]
    fn test_single_file_argument_reports_project_path() {
        let dir = project();
        let (analyzer, _) = build_in(dir.path(), Some("coreagent/store.ts")).unwrap();
        let result = analyzer.analyze().unwrap();
        assert_eq!(result.violations.len(), 1);
        assert_eq!(
            result.violations[0].location.file,
            PathBuf::from("coreagent/store.ts")
        );
    }

    #[test]
    fn test_config_above_path_sets_project_root() {
        let dir = project();
        write(dir.path(), "coreguard.toml", "");
        let elsewhere = tempfile::tempdir().unwrap();

        let (analyzer, _) = build(
            &Resolver::new(elsewhere.path(), None),
            Some(&dir.path().join("tests")),
            None,
            None,
            vec![],
        )
        .unwrap();
        assert_eq!(analyzer.project_root(), dir.path());
        assert!(analyzer.analyze().unwrap().violations.is_empty());
    }

    #[test]
    fn test_configured_root_is_used_without_path() {
        let dir = project();
        write(dir.path(), "lib/extra.ts", "const t = Date.now();\n");
        write(dir.path(), "coreguard.toml", "[analyzer]\nroot = \"coreagent\"\n");

        let (analyzer, _) = build_in(&dir.path().join("lib"), None).unwrap();
        assert_eq!(analyzer.root(), dir.path().join("coreagent"));
        let result = analyzer.analyze().unwrap();
        assert_eq!(result.files_checked, 2);

        let (explicit, _) = build_in(dir.path(), Some("lib")).unwrap();
        assert_eq!(explicit.analyze().unwrap().files_checked, 1);
    }

    #[test]
    fn test_fail_on_threshold_from_config() {
        let dir = project();
        write(
            dir.path(),
            "coreguard.toml",
            "fail_on = \"error\"\n\n[rules.no-parallel-cache]\nenabled = false\n",
        );

        let (analyzer, threshold) = build_in(dir.path(), None).unwrap();
        let result = analyzer.analyze().unwrap();
        assert_eq!(result.violations.len(), 1);
        assert!(!result.has_violations_at(threshold));
    }

    #[test]
    fn test_bad_option_fails_before_analysis() {
        let dir = project();
        write(
            dir.path(),
            "coreguard.toml",
            "[rules.prefer-unified-time]\nallowFilesPattern = \"[\"\n",
        );

        let err = build_in(dir.path(), None).err().unwrap();
        assert!(format!("{err:#}").contains("allowFilesPattern"));
    }
}
