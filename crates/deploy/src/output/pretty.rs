//! Pretty output formatting.

use newsletter_core::topology::FunctionPermissions;

use crate::prelude::*;

/// Colors a plan line by its leading marker: `+` for declared resources,
/// `=` for the stack header.
pub fn colorize_plan_line(line: &str) -> String {
    let trimmed = line.trim_start();
    if trimmed.starts_with('+') {
        p_g(line)
    } else if trimmed.starts_with('=') {
        p_c(line)
    } else {
        line.to_string()
    }
}

/// Format a permission audit for display.
pub fn format_permissions(report: &[FunctionPermissions]) -> String {
    if report.is_empty() {
        return "No functions declared.".to_string();
    }
    let mut output = format!("PERMISSIONS ({})\n", report.len());
    output.push_str(&"-".repeat(40));
    for function in report {
        output.push_str(&format!("\n{}", function.function));
        if function.permissions.is_empty() {
            output.push_str("\n  (none)");
        }
        for permission in &function.permissions {
            output.push_str(&format!(
                "\n  {} on {}",
                permission.action, permission.resource
            ));
        }
        output.push('\n');
    }
    output
}
