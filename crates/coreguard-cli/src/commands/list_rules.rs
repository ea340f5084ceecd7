//! List rules command implementation.

use coreguard_rules::builtin_registry;
use std::fmt::Write;

/// Runs the list-rules command.
pub fn run() {
    print!("{}", render());
}

fn render() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Available rules:\n");
    let _ = writeln!(
        out,
        "{:<8} {:<22} {:<11} Description",
        "Code", "Name", "Category"
    );
    let _ = writeln!(out, "{}", "-".repeat(80));

    let registry = builtin_registry();
    for entry in registry.entries() {
        let d = entry.descriptor;
        let _ = writeln!(
            out,
            "{:<8} {:<22} {:<11} {}",
            d.code, d.id, d.category, d.docs.description
        );
        for option in d.schema {
            let _ = writeln!(
                out,
                "{:<8}   {} ({}, default {}): {}",
                "", option.name, option.kind, option.default, option.description
            );
        }
    }

    let _ = writeln!(out, "\nUse --rules to filter specific rules, e.g.:");
    let _ = writeln!(out, "  coreguard check --rules no-parallel-cache,prefer-unified-time");
    let _ = writeln!(out, "  coreguard check --rules CG001,CG003");
    out
}
