//! Structural validation of a loaded configuration.

use crate::schema::{MessagesConfig, MethodConfig, ModuleConfig, ReturnsConfig, TranslationConfig};
use msgbind_common::{bail, Result};
use msgbind_core::AnnotationKind;
use std::collections::{HashMap, HashSet};

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a configuration, reporting every problem at once.
    pub fn validate(config: &MessagesConfig) -> Result<()> {
        let problems = Self::problems(config);
        if problems.is_empty() {
            return Ok(());
        }
        bail!("Invalid message configuration: {}", problems.join("; "))
    }

    /// Lists every problem found in `config`.
    #[must_use]
    pub fn problems(config: &MessagesConfig) -> Vec<String> {
        let mut problems = Vec::new();
        let mut interfaces = HashMap::new();
        collect_interfaces(&config.root, &mut interfaces, &mut problems);
        check_module(&config.root, "root", &interfaces, &mut problems);
        check_extends_cycles(&interfaces, &mut problems);
        problems
    }
}

/// Whether `scope` is empty or a dotted name without empty segments
#[must_use]
pub fn is_valid_scope(scope: &str) -> bool {
    scope.is_empty() || scope.split('.').all(is_valid_segment)
}

/// Whether `name` is a dotted name with at least one segment
#[must_use]
pub fn is_valid_qualified_name(name: &str) -> bool {
    !name.is_empty() && name.split('.').all(is_valid_segment)
}

fn is_valid_segment(segment: &str) -> bool {
    let mut chars = segment.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

fn collect_interfaces<'a>(
    module: &'a ModuleConfig,
    interfaces: &mut HashMap<&'a str, &'a [String]>,
    problems: &mut Vec<String>,
) {
    for interface in &module.interfaces {
        if interfaces
            .insert(interface.name.as_str(), interface.extends.as_slice())
            .is_some()
        {
            problems.push(format!("interface '{}' is declared more than once", interface.name));
        }
    }
    for child in &module.modules {
        collect_interfaces(child, interfaces, problems);
    }
}

fn check_module(
    module: &ModuleConfig,
    path: &str,
    interfaces: &HashMap<&str, &[String]>,
    problems: &mut Vec<String>,
) {
    if !is_valid_scope(&module.scope) {
        problems.push(format!("module '{path}' has invalid scope '{}'", module.scope));
    }

    for kind in module.annotations.keys() {
        if !AnnotationKind::new(kind.as_str()).is_valid() {
            problems.push(format!("module '{path}' binds invalid annotation kind '{kind}'"));
        }
    }

    for bundle in &module.bundles {
        if !is_valid_qualified_name(&bundle.name) {
            problems.push(format!("module '{path}' binds invalid bundle name '{}'", bundle.name));
        }
        for target in &bundle.interfaces {
            if !interfaces.contains_key(target.as_str()) {
                problems.push(format!("bundle '{}' targets unknown interface '{target}'", bundle.name));
            }
        }
    }

    for interface in &module.interfaces {
        if !is_valid_qualified_name(&interface.name) {
            problems.push(format!("module '{path}' declares invalid interface name '{}'", interface.name));
        }
        for parent in &interface.extends {
            if !interfaces.contains_key(parent.as_str()) {
                problems.push(format!("interface '{}' extends unknown interface '{parent}'", interface.name));
            }
        }

        let mut signatures = HashSet::new();
        for method in &interface.methods {
            let context = format!("{}.{}", interface.name, method.name);
            check_method(method, &context, interfaces, problems);

            let params: Vec<&str> = method.params.iter().map(|p| p.type_name()).collect();
            if !signatures.insert((method.name.as_str(), params)) {
                problems.push(format!("method '{context}' is declared more than once with the same parameters"));
            }
        }
    }

    for (index, child) in module.modules.iter().enumerate() {
        let child_path = if child.name.is_empty() {
            format!("{path}.modules[{index}]")
        } else {
            format!("{path}.{}", child.name)
        };
        check_module(child, &child_path, interfaces, problems);
    }
}

fn check_method(
    method: &MethodConfig,
    context: &str,
    interfaces: &HashMap<&str, &[String]>,
    problems: &mut Vec<String>,
) {
    if !is_valid_segment(&method.name) {
        problems.push(format!("method '{context}' has an invalid name"));
    }
    if method.identity && !method.params.is_empty() {
        problems.push(format!("identity method '{context}' must not take parameters"));
    }
    if let ReturnsConfig::Nested(target) = &method.returns {
        if !interfaces.contains_key(target.as_str()) {
            problems.push(format!("method '{context}' returns unknown interface '{target}'"));
        }
    }

    for param in &method.params {
        if param.type_name().trim().is_empty() {
            problems.push(format!("method '{context}' has a parameter without a type"));
        }
        for kind in param.annotations() {
            if !AnnotationKind::new(kind.as_str()).is_valid() {
                problems.push(format!("method '{context}' uses invalid parameter marker '{kind}'"));
            }
        }
    }

    for (kind, translation) in &method.translations {
        if !AnnotationKind::new(kind.as_str()).is_valid() {
            problems.push(format!("method '{context}' uses invalid annotation kind '{kind}'"));
        }
        if let TranslationConfig::Source(source) = translation {
            let sources = [&source.text, &source.url, &source.internal]
                .into_iter()
                .filter(|s| s.is_some())
                .count();
            if sources != 1 {
                problems.push(format!(
                    "translation '{kind}' of '{context}' must set exactly one of text, url or internal"
                ));
            }
        }
    }
}

fn check_extends_cycles(interfaces: &HashMap<&str, &[String]>, problems: &mut Vec<String>) {
    let mut names: Vec<&str> = interfaces.keys().copied().collect();
    names.sort_unstable();

    let mut done = HashSet::new();
    for name in names {
        let mut visiting = Vec::new();
        if let Some(cycle) = find_cycle(name, interfaces, &mut visiting, &mut done) {
            problems.push(format!("interface inheritance cycle: {}", cycle.join(" -> ")));
            done.extend(visiting);
        }
    }
}

fn find_cycle<'a>(
    name: &'a str,
    interfaces: &HashMap<&'a str, &'a [String]>,
    visiting: &mut Vec<&'a str>,
    done: &mut HashSet<&'a str>,
) -> Option<Vec<&'a str>> {
    if done.contains(name) {
        return None;
    }
    if let Some(start) = visiting.iter().position(|&n| n == name) {
        let mut cycle = visiting[start..].to_vec();
        cycle.push(name);
        return Some(cycle);
    }

    visiting.push(name);
    for parent in interfaces.get(name).copied().unwrap_or_default() {
        if let Some(cycle) = find_cycle(parent.as_str(), interfaces, visiting, done) {
            return Some(cycle);
        }
    }
    visiting.pop();
    done.insert(name);
    None
}
