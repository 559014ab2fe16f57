// Dashboard template variable substitution
use std::collections::HashMap;

/// Replace `${name}` and `$name` tokens in a query expression or legend template.
///
/// Longer names are applied first so that `$ab` is not clobbered by a shorter `$a`.
/// Names of equal length are applied in lexical order, which keeps the result
/// independent of map iteration order.
pub fn substitute(template: &str, vars: &HashMap<String, String>) -> String {
    let mut names: Vec<&String> = vars.keys().filter(|name| !name.is_empty()).collect();
    names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    let mut result = template.to_string();
    for name in names {
        let value = &vars[name];
        result = result.replace(&format!("${{{}}}", name), value);
        result = result.replace(&format!("${}", name), value);
    }
    result
}
