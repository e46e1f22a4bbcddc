//! Lint pass over every table in a catalog.
//!
//! Reports are data, not errors: `hstr check` prints them and decides the
//! exit status from [`CheckReport::is_clean`].
use crate::catalog::{Catalog, Scope};
use crate::keypath::KeyPath;
use crate::placeholders;
use crate::table::{Entry, Node, StringTable};
use serde::Serialize;

/// Top-level keys the host knows how to consume.
pub const KNOWN_NAMESPACES: &[&str] = &[
    "title",
    "config",
    "options",
    "entity",
    "exceptions",
    "issues",
    "services",
    "selector",
    "device_automation",
    "system_health",
    "device",
    "common",
    "config_flow",
    "state",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub scope: String,
    pub key: String,
    pub severity: Severity,
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Default, Serialize)]
pub struct CheckReport {
    pub tables: usize,
    pub entries: usize,
    pub error_count: usize,
    pub warning_count: usize,
    pub issues: Vec<Issue>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.error_count == 0
    }

    fn push(&mut self, issue: Issue) {
        match issue.severity {
            Severity::Error => self.error_count += 1,
            Severity::Warning => self.warning_count += 1,
        }
        self.issues.push(issue);
    }
}

pub fn check_catalog(catalog: &Catalog) -> CheckReport {
    let mut report = CheckReport::default();
    for (scope, table) in catalog.scopes() {
        report.tables += 1;
        report.entries += table.len();
        check_table(catalog, &scope, table, &mut report);
    }
    tracing::info!(
        tables = report.tables,
        entries = report.entries,
        errors = report.error_count,
        warnings = report.warning_count,
        "checked catalog"
    );
    report
}

fn check_table(catalog: &Catalog, scope: &Scope, table: &StringTable, report: &mut CheckReport) {
    let issue = |key: String, severity, code, message: String| Issue {
        scope: scope.to_string(),
        key,
        severity,
        code,
        message,
    };

    for namespace in table.namespaces() {
        if !KNOWN_NAMESPACES.contains(&namespace) {
            report.push(issue(
                namespace.to_string(),
                Severity::Warning,
                "unknown_namespace",
                format!("top-level key {namespace:?} is not a known namespace"),
            ));
        }
    }

    let resolver = catalog.resolver();
    for (path, entry) in table.leaves() {
        let key = path.dotted();
        let resolved = match resolver.resolve(table, &path) {
            Ok(resolved) => resolved,
            Err(err) => {
                report.push(issue(key.clone(), Severity::Error, err.code(), err.to_string()));
                continue;
            }
        };
        if matches!(entry, Entry::Literal(text) if text.is_empty()) {
            report.push(issue(
                key.clone(),
                Severity::Warning,
                "empty_string",
                "value is an empty string".to_string(),
            ));
        }
        // A plain alias shares its target's text, which is checked where it is defined.
        if matches!(entry, Entry::Reference(_)) {
            continue;
        }
        if let Err(err) = placeholders::validate(&resolved) {
            report.push(issue(
                key,
                Severity::Error,
                "unbalanced_placeholder",
                err.to_string(),
            ));
        }
    }

    check_exceptions(table, report, &issue);
    check_data_descriptions(table, report, &issue);
}

fn check_exceptions<F>(table: &StringTable, report: &mut CheckReport, issue: &F)
where
    F: Fn(String, Severity, &'static str, String) -> Issue,
{
    let Some(Node::Branch(exceptions)) = table.get(&KeyPath::from_segments(["exceptions"])) else {
        return;
    };
    for (id, node) in exceptions.iter() {
        let has_message = matches!(node, Node::Branch(branch) if matches!(branch.get("message"), Some(Node::Leaf(_))));
        if !has_message {
            report.push(issue(
                format!("exceptions.{id}"),
                Severity::Error,
                "exception_missing_message",
                format!("exception {id:?} has no message"),
            ));
        }
    }
}

fn check_data_descriptions<F>(table: &StringTable, report: &mut CheckReport, issue: &F)
where
    F: Fn(String, Severity, &'static str, String) -> Issue,
{
    let Some(Node::Branch(steps)) = table.get(&KeyPath::from_segments(["config", "step"])) else {
        return;
    };
    for (step, node) in steps.iter() {
        let Node::Branch(step_branch) = node else {
            continue;
        };
        let Some(Node::Branch(descriptions)) = step_branch.get("data_description") else {
            continue;
        };
        let data = match step_branch.get("data") {
            Some(Node::Branch(data)) => Some(data),
            _ => None,
        };
        for (field, _) in descriptions.iter() {
            if data.and_then(|data| data.get(field)).is_none() {
                report.push(issue(
                    format!("config.step.{step}.data_description.{field}"),
                    Severity::Warning,
                    "orphan_data_description",
                    format!("step {step:?} describes field {field:?} that is not in data"),
                ));
            }
        }
    }
}
