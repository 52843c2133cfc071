use quickchart_mcp::schema::{ParamKind, ParamSpec};
use quickchart_mcp::tool_registry::tools_by_category;
use quickchart_mcp::{ToolCategory, ToolInfo};
use std::fmt::Write as _;

fn category_title(cat: ToolCategory) -> &'static str {
    match cat {
        ToolCategory::Charts => "Charts",
        ToolCategory::Diagrams => "Diagrams",
        ToolCategory::Codes => "Codes",
    }
}

fn kind_label(spec: &ParamSpec) -> String {
    match spec.kind {
        ParamKind::Text => "text".to_string(),
        ParamKind::Json(_) => "JSON".to_string(),
        ParamKind::PositiveInt => "positive integer".to_string(),
        ParamKind::Choice(options) => format!("one of `{}`", options.join("`, `")),
    }
}

fn write_tool(out: &mut String, tool: &ToolInfo) {
    let kind = tool.kind;
    let _ = writeln!(out, "### `{}`\n", tool.name);
    let _ = writeln!(out, "{}\n", tool.full_desc);
    let _ = writeln!(out, "Remote call: `{}`\n", kind.remote_path());
    let _ = writeln!(out, "| Parameter | Required | Type |");
    let _ = writeln!(out, "|-----------|----------|------|");
    for spec in kind.params() {
        let required = if spec.required { "yes" } else { "no" };
        let _ = writeln!(out, "| `{}` | {} | {} |", spec.name, required, kind_label(spec));
    }
    let _ = writeln!(out, "\nExample:\n\n```json\n{}\n```\n", tool.example);
}

fn main() {
    let mut out = String::new();
    let _ = writeln!(out, "# Tools\n");
    let _ = writeln!(
        out,
        "> Auto-generated from `src/tool_registry.rs`. Do not edit by hand."
    );
    let _ = writeln!(
        out,
        "> Regenerate with: `cargo run --bin gen_tools_doc -- docs/TOOLS.md`.\n"
    );
    let _ = writeln!(
        out,
        "Every tool returns the rendered image inline: an MCP image block plus a text block"
    );
    let _ = writeln!(
        out,
        "with the mime type, size and a `data:` URI. Failures are tool errors starting with `❌`.\n"
    );

    for &cat in ToolCategory::all() {
        let tools: Vec<&ToolInfo> = tools_by_category(cat).collect();
        if tools.is_empty() {
            continue;
        }
        let _ = writeln!(out, "## {} (`{}`)\n", category_title(cat), cat.as_str());
        let _ = writeln!(out, "{}\n", cat.description());
        for tool in tools {
            write_tool(&mut out, tool);
        }
    }

    let _ = writeln!(out, "## Notes\n");
    let _ = writeln!(
        out,
        "- Numeric parameters accept numbers or numeric strings (`300` or `\"300\"`)"
    );
    let _ = writeln!(
        out,
        "- JSON parameters accept a JSON string or an inline JSON value"
    );
    let _ = writeln!(out, "- `format` defaults to `png`");

    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 {
        if let Err(err) = std::fs::write(&args[1], out) {
            eprintln!("failed to write {}: {}", args[1], err);
            std::process::exit(1);
        }
    } else {
        print!("{out}");
    }
}
