//! Static metadata for every exposed tool.
//!
//! Used to order `tools/list`, to build the server instructions and to
//! generate `docs/TOOLS.md` (`cargo run --bin gen_tools_doc -- docs/TOOLS.md`).

use crate::tools::ToolKind;

/// Tool category for grouping related tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolCategory {
    /// Data charts (Chart.js, word clouds)
    Charts,
    /// Text-defined diagrams (Graphviz, Mermaid)
    Diagrams,
    /// Encoded images (QR codes)
    Codes,
}

impl ToolCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Charts => "charts",
            Self::Diagrams => "diagrams",
            Self::Codes => "codes",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Charts => "Render data visualisations",
            Self::Diagrams => "Render diagrams from text definitions",
            Self::Codes => "Generate machine-readable codes",
        }
    }

    pub fn all() -> &'static [ToolCategory] {
        &[Self::Charts, Self::Diagrams, Self::Codes]
    }
}

/// Metadata for a single tool
#[derive(Debug, Clone)]
pub struct ToolInfo {
    pub kind: ToolKind,
    pub name: &'static str,
    pub category: ToolCategory,
    /// Short description (1 line, <100 chars)
    pub short_desc: &'static str,
    /// Full description with usage details
    pub full_desc: &'static str,
    /// Example invocation (JSON)
    pub example: &'static str,
    /// Keywords for search
    pub keywords: &'static [&'static str],
}

/// Static registry of all tools, in listing order
pub static TOOL_REGISTRY: &[ToolInfo] = &[
    ToolInfo {
        kind: ToolKind::Chart,
        name: "render_chart",
        category: ToolCategory::Charts,
        short_desc: "Render a Chart.js config to an image",
        full_desc: "Render a chart from a Chart.js configuration (JSON object or JSON string). \
                    Optional width/height in pixels, output format (png, webp, jpg, jpeg, svg, pdf; \
                    default png) and background color. Returns the image as base64 plus a data URI.",
        example: r#"{"config": "{\"type\":\"bar\",\"data\":{\"labels\":[\"a\",\"b\"],\"datasets\":[{\"data\":[1,2]}]}}", "width": "500"}"#,
        keywords: &["chart", "chartjs", "graph", "plot", "bar", "line", "pie"],
    },
    ToolInfo {
        kind: ToolKind::Graphviz,
        name: "render_graphviz",
        category: ToolCategory::Diagrams,
        short_desc: "Render a Graphviz DOT graph to an image",
        full_desc: "Render a Graphviz diagram from DOT source. Optional layout engine \
                    (dot, neato, fdp, sfdp, circo, twopi, osage, patchwork) and output format \
                    (png, svg, jpg, jpeg; default png).",
        example: r#"{"graph": "digraph { a -> b }", "layout": "dot"}"#,
        keywords: &["graphviz", "dot", "graph", "diagram", "nodes", "edges"],
    },
    ToolInfo {
        kind: ToolKind::Mermaid,
        name: "render_mermaid",
        category: ToolCategory::Diagrams,
        short_desc: "Render a Mermaid diagram to an image",
        full_desc: "Render a Mermaid diagram (flowchart, sequence, gantt, ...). Optional theme \
                    (default, neutral, dark, forest, base) and output format (png or svg; default png).",
        example: r#"{"mermaid": "graph TD; A-->B", "theme": "forest"}"#,
        keywords: &["mermaid", "flowchart", "sequence", "diagram", "gantt"],
    },
    ToolInfo {
        kind: ToolKind::QrCode,
        name: "render_qrcode",
        category: ToolCategory::Codes,
        short_desc: "Generate a QR code image",
        full_desc: "Generate a QR code for the given text or URL. Optional size in pixels, \
                    error correction level (L, M, Q, H) and output format (png or svg; default png).",
        example: r#"{"text": "https://quickchart.io", "size": "200", "correction": "M"}"#,
        keywords: &["qr", "qrcode", "barcode", "url", "code"],
    },
    ToolInfo {
        kind: ToolKind::WordCloud,
        name: "render_wordcloud",
        category: ToolCategory::Charts,
        short_desc: "Generate a word cloud from weighted words",
        full_desc: "Generate a word cloud from weighted words given as JSON (object of word to weight, \
                    or a list). Optional width/height in pixels and output format \
                    (png, svg, jpg, jpeg; default png).",
        example: r#"{"words": "{\"rust\": 10, \"mcp\": 6, \"charts\": 3}"}"#,
        keywords: &["wordcloud", "word", "cloud", "tags", "text", "frequency"],
    },
];

/// Get all tools
pub fn all_tools() -> impl Iterator<Item = &'static ToolInfo> {
    TOOL_REGISTRY.iter()
}

/// Get tool by name
pub fn get_tool(name: &str) -> Option<&'static ToolInfo> {
    TOOL_REGISTRY.iter().find(|t| t.name == name)
}

/// Get tools by category
pub fn tools_by_category(category: ToolCategory) -> impl Iterator<Item = &'static ToolInfo> {
    TOOL_REGISTRY.iter().filter(move |t| t.category == category)
}

/// Search tools by query (simple keyword matching)
pub fn search_tools(query: &str, limit: usize) -> Vec<&'static ToolInfo> {
    let query_lower = query.to_lowercase();
    let query_words: Vec<&str> = query_lower.split_whitespace().collect();

    let mut results: Vec<(&'static ToolInfo, usize)> = Vec::new();
    for tool in TOOL_REGISTRY.iter() {
        let mut score = 0usize;
        for word in &query_words {
            if tool.name.contains(word) {
                score += 10;
            }
            if tool.short_desc.to_lowercase().contains(word) {
                score += 5;
            }
            if tool.keywords.iter().any(|kw| kw.contains(word) || word.contains(kw)) {
                score += 3;
            }
            if tool.category.as_str().contains(word) {
                score += 2;
            }
        }
        if score > 0 {
            results.push((tool, score));
        }
    }

    results.sort_by(|a, b| b.1.cmp(&a.1));
    results.into_iter().take(limit).map(|(tool, _)| tool).collect()
}
