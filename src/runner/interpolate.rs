//! Variable interpolation for strings
//!
//! This module replaces `${VAR}` references in command lines before they are run.

use crate::error::{InterpolationError, InterpolationResult};
use regex::Regex;
use std::collections::HashMap;
use std::env;
use std::sync::OnceLock;

fn variable_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("variable pattern is a valid regex")
    })
}

/// Interpolate variables in a string
///
/// Supports:
/// - `${VAR}` - variable from context (expanded recursively)
/// - Environment variables (when not found in context, used verbatim)
///
/// Unknown variables and shell forms such as `${VAR:-default}` are left
/// untouched so the interpreter can still handle them.
pub fn interpolate(s: &str, vars: &HashMap<String, String>) -> InterpolationResult<String> {
    expand(s, vars, &mut Vec::new())
}

fn expand(
    s: &str,
    vars: &HashMap<String, String>,
    stack: &mut Vec<String>,
) -> InterpolationResult<String> {
    let mut result = String::with_capacity(s.len());
    let mut last = 0;

    for caps in variable_pattern().captures_iter(s) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        result.push_str(&s[last..whole.start()]);
        last = whole.end();

        let name = name.as_str();
        if let Some(value) = vars.get(name) {
            if stack.iter().any(|seen| seen == name) {
                return Err(InterpolationError::RecursiveInterpolation(name.to_string()));
            }
            stack.push(name.to_string());
            result.push_str(&expand(value, vars, stack)?);
            stack.pop();
        } else if let Ok(value) = env::var(name) {
            result.push_str(&value);
        } else {
            result.push_str(whole.as_str());
        }
    }

    result.push_str(&s[last..]);
    Ok(result)
}

/// Interpolate a list of strings
pub fn interpolate_list(
    list: &[String],
    vars: &HashMap<String, String>,
) -> InterpolationResult<Vec<String>> {
    list.iter()
        .map(|s| interpolate(s, vars))
        .collect::<InterpolationResult<Vec<String>>>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_interpolation() {
        let mut vars = HashMap::new();
        vars.insert("MODEL".to_string(), "sdxl".to_string());

        let result = interpolate("cog push r8.im/acme/${MODEL}", &vars).unwrap();
        assert_eq!(result, "cog push r8.im/acme/sdxl");
    }

    #[test]
    fn test_multiple_variables() {
        let mut vars = HashMap::new();
        vars.insert("OWNER".to_string(), "acme".to_string());
        vars.insert("MODEL".to_string(), "sdxl".to_string());

        let result = interpolate("${OWNER}/${MODEL}", &vars).unwrap();
        assert_eq!(result, "acme/sdxl");
    }

    #[test]
    fn test_environment_variable() {
        env::set_var("SHIPRUN_TEST_INTERPOLATE_VAR", "from_env");

        let vars = HashMap::new();
        let result = interpolate("Value: ${SHIPRUN_TEST_INTERPOLATE_VAR}", &vars).unwrap();
        assert_eq!(result, "Value: from_env");

        env::remove_var("SHIPRUN_TEST_INTERPOLATE_VAR");
    }

    #[test]
    fn test_context_shadows_environment() {
        env::set_var("SHIPRUN_TEST_SHADOWED_VAR", "from_env");

        let mut vars = HashMap::new();
        vars.insert("SHIPRUN_TEST_SHADOWED_VAR".to_string(), "override".to_string());
        let result = interpolate("${SHIPRUN_TEST_SHADOWED_VAR}", &vars).unwrap();
        assert_eq!(result, "override");

        env::remove_var("SHIPRUN_TEST_SHADOWED_VAR");
    }

    #[test]
    fn test_undefined_variable_left_for_shell() {
        let vars = HashMap::new();
        let result = interpolate("echo ${SHIPRUN_SURELY_UNDEFINED}!", &vars).unwrap();
        assert_eq!(result, "echo ${SHIPRUN_SURELY_UNDEFINED}!");
    }

    #[test]
    fn test_shell_default_syntax_untouched() {
        let mut vars = HashMap::new();
        vars.insert("TAG".to_string(), "v1".to_string());
        let result = interpolate("echo ${TAG:-latest} ${TAG}", &vars).unwrap();
        assert_eq!(result, "echo ${TAG:-latest} v1");
    }

    #[test]
    fn test_nested_interpolation() {
        let mut vars = HashMap::new();
        vars.insert("inner".to_string(), "value".to_string());
        vars.insert("outer".to_string(), "${inner}".to_string());

        let result = interpolate("Result: ${outer}", &vars).unwrap();
        assert_eq!(result, "Result: value");
    }

    #[test]
    fn test_repeated_variable_is_not_recursion() {
        let mut vars = HashMap::new();
        vars.insert("A".to_string(), "x".to_string());

        let result = interpolate("${A}${A}", &vars).unwrap();
        assert_eq!(result, "xx");
    }

    #[test]
    fn test_recursive_interpolation() {
        let mut vars = HashMap::new();
        vars.insert("a".to_string(), "${b}".to_string());
        vars.insert("b".to_string(), "${a}".to_string());

        let result = interpolate("${a}", &vars);
        assert!(matches!(
            result,
            Err(InterpolationError::RecursiveInterpolation(_))
        ));
    }

    #[test]
    fn test_empty_variable_name() {
        let vars = HashMap::new();
        let result = interpolate("Value: ${}", &vars).unwrap();
        assert_eq!(result, "Value: ${}");
    }

    #[test]
    fn test_interpolate_list() {
        let mut vars = HashMap::new();
        vars.insert("name".to_string(), "test".to_string());

        let list = vec!["file-${name}.txt".to_string(), "static.txt".to_string()];

        let result = interpolate_list(&list, &vars).unwrap();
        assert_eq!(result, vec!["file-test.txt", "static.txt"]);
    }
}
