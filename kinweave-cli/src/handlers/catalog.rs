//! Catalog command handlers

use crate::output::*;
use colored::Colorize;
use kinweave::KinweaveError;
use kinweave::relationships::{CatalogIssue, RelationshipCatalog};
use serde::Serialize;
use std::sync::Arc;

/// Where a kind's worker comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum WorkerSource {
    Default,
    Custom { worker_type: String },
}

/// Everything the catalog knows about one kind
#[derive(Debug, Clone, Serialize)]
pub struct KindReport {
    pub name: String,
    pub family_by_blood: bool,
    pub animal_only: bool,
    pub requires_compatibility: bool,
    pub assignable: bool,
    pub worker: Option<WorkerSource>,
    pub can_create_relation: bool,
    pub inverse: Option<String>,
    pub conflicts: Vec<String>,
    pub issues: Vec<CatalogIssue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictReport {
    pub a: String,
    pub b: String,
    pub conflicts: bool,
}

/// Build the report for `name`, or `None` if the kind is unknown
pub fn kind_report(catalog: &RelationshipCatalog, name: &str) -> Option<KindReport> {
    let kind = catalog.kinds().get(name)?;
    let resolver = catalog.resolver();
    let resolved = resolver.resolve(kind);

    let worker = resolved.as_ref().map(|worker| {
        let is_default = kind
            .default_worker()
            .is_some_and(|default| Arc::ptr_eq(default, worker));
        let worker_type = catalog
            .extensions()
            .get(name)
            .and_then(|e| e.worker_type());

        match worker_type {
            Some(worker_type) if !is_default => WorkerSource::Custom {
                worker_type: worker_type.to_string(),
            },
            _ => WorkerSource::Default,
        }
    });

    Some(KindReport {
        name: kind.name().to_string(),
        family_by_blood: kind.is_family_by_blood(),
        animal_only: catalog.is_animal_only(name),
        requires_compatibility: catalog.is_compatibility_required(name),
        assignable: catalog.is_assignable(name),
        worker,
        can_create_relation: resolved.is_some_and(|w| w.relation_creator().is_some()),
        inverse: catalog.inverse_of(name).map(str::to_string),
        conflicts: catalog
            .conflicts_of(name)
            .into_iter()
            .map(str::to_string)
            .collect(),
        issues: catalog
            .issues()
            .iter()
            .filter(|issue| issue.kind() == name)
            .cloned()
            .collect(),
    })
}

pub fn conflict_report(catalog: &RelationshipCatalog, a: &str, b: &str) -> ConflictReport {
    ConflictReport {
        a: a.to_string(),
        b: b.to_string(),
        conflicts: catalog.conflicts_with(a, b),
    }
}

pub fn handle_allowed(catalog: &RelationshipCatalog, output_format: &str) {
    let allowed = catalog.allowed();

    if output_format == "json" {
        print_json(allowed);
    } else if allowed.is_empty() {
        println!("{}", format_info("No relationship kinds can be assigned by hand."));
    } else {
        println!(
            "{}",
            format_info(&format!("{} assignable relationship kinds:", allowed.len()))
        );
        println!();
        for kind in allowed.iter() {
            println!(
                "  {} {}",
                kind.color(CliColors::accent()),
                catalog
                    .inverse_of(kind)
                    .map(|inverse| format!("(inverse: {inverse})"))
                    .unwrap_or_default()
                    .color(CliColors::muted())
            );
        }
    }
}

pub fn handle_inverses(catalog: &RelationshipCatalog, output_format: &str) {
    let inverses = catalog.inverses();

    if output_format == "json" {
        print_json(&**inverses);
    } else if inverses.is_empty() {
        println!("{}", format_info("No inverses are known."));
    } else {
        println!(
            "{:<30} {}",
            "Kind".color(CliColors::muted()).bold(),
            "Inverse".color(CliColors::muted()).bold()
        );
        println!("{}", "─".repeat(60).color(CliColors::muted()));

        for (kind, inverse) in inverses.iter() {
            let inverse = if kind == inverse {
                format!("{inverse} (self)")
            } else {
                inverse.to_string()
            };
            println!(
                "{:<30} {}",
                kind.color(CliColors::accent()),
                inverse.color(CliColors::primary())
            );
        }
    }
}

pub fn handle_conflicts(catalog: &RelationshipCatalog, a: &str, b: &str, output_format: &str) {
    let report = conflict_report(catalog, a, b);

    if output_format == "json" {
        print_json(&report);
    } else if report.conflicts {
        println!(
            "{}",
            format_warning(&format!("'{}' and '{}' conflict.", report.a, report.b))
        );
    } else {
        println!(
            "{}",
            format_success(&format!("'{}' and '{}' can coexist.", report.a, report.b))
        );
    }
}

pub fn handle_report(catalog: &RelationshipCatalog, output_format: &str) {
    let issues = catalog.issues();

    if output_format == "json" {
        print_json(&issues);
    } else if issues.is_empty() {
        println!(
            "{}",
            format_success(&format!(
                "Catalog built cleanly: {} kinds, {} assignable, {} inverses.",
                catalog.kinds().len(),
                catalog.allowed().len(),
                catalog.inverses().len()
            ))
        );
    } else {
        println!(
            "{}",
            format_warning(&format!("{} issues found while building the catalog:", issues.len()))
        );
        println!();
        for issue in issues {
            println!("  {}", issue.to_string().color(CliColors::warning()));
        }
    }
}

pub fn handle_check(
    catalog: &RelationshipCatalog,
    name: &str,
    output_format: &str,
) -> Result<(), KinweaveError> {
    let report =
        kind_report(catalog, name).ok_or_else(|| KinweaveError::UnknownKind(name.to_string()))?;

    if output_format == "json" {
        print_json(&report);
        return Ok(());
    }

    println!(
        "{}",
        "━━━ Relationship Kind Details ━━━"
            .color(CliColors::accent())
            .bold()
    );
    println!(
        "{}: {}",
        "Name".color(CliColors::muted()),
        report.name.color(CliColors::accent()).bold()
    );
    println!(
        "{}: {}",
        "Family by blood".color(CliColors::muted()),
        format_flag(report.family_by_blood)
    );
    println!(
        "{}: {}",
        "Animal only".color(CliColors::muted()),
        format_flag(report.animal_only)
    );
    println!(
        "{}: {}",
        "Requires compatibility".color(CliColors::muted()),
        format_flag(report.requires_compatibility)
    );
    println!(
        "{}: {}",
        "Assignable".color(CliColors::muted()),
        format_flag(report.assignable)
    );

    let worker = match &report.worker {
        Some(WorkerSource::Default) => "default".to_string(),
        Some(WorkerSource::Custom { worker_type }) => format!("custom ({worker_type})"),
        None => "none".to_string(),
    };
    println!(
        "{}: {} {}",
        "Worker".color(CliColors::muted()),
        worker.color(CliColors::primary()),
        if report.can_create_relation {
            "".normal()
        } else {
            "(cannot create relations)".color(CliColors::warning())
        }
    );
    println!(
        "{}: {}",
        "Inverse".color(CliColors::muted()),
        report
            .inverse
            .as_deref()
            .unwrap_or("-")
            .color(CliColors::accent())
    );
    let conflicts = if report.conflicts.is_empty() {
        "-".to_string()
    } else {
        report.conflicts.join(", ")
    };
    println!(
        "{}: {}",
        "Conflicts".color(CliColors::muted()),
        conflicts.color(CliColors::primary())
    );

    for issue in &report.issues {
        println!("{}", format_warning(&issue.to_string()));
    }

    Ok(())
}
