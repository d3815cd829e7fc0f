//! Self-contained HTML documents
//!
//! Charts arrive as PNG bytes and are embedded as base64 data URLs, so a
//! generated report is a single file with no external assets.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::Local;
use findash_core::plan::TableSpec;
use std::fmt::Write as _;

const STYLE: &str = r#"
    body { font-family: 'Hiragino Sans', 'Noto Sans JP', sans-serif;
           margin: 0; padding: 2rem; background: #f5f6fa; color: #222; }
    h1 { color: #2e86ab; border-bottom: 3px solid #2e86ab; padding-bottom: 0.4rem; }
    .generated { color: #777; font-size: 0.85rem; margin-bottom: 1.5rem; }
    .chart { background: #fff; border-radius: 6px; padding: 1rem;
             margin-bottom: 1.5rem; box-shadow: 0 1px 3px rgba(0,0,0,0.12); }
    .chart img { max-width: 100%; height: auto; }
    table { border-collapse: collapse; width: 100%; background: #fff;
            box-shadow: 0 1px 3px rgba(0,0,0,0.12); }
    th { background: #2e86ab; color: #fff; padding: 0.5rem 0.75rem; text-align: left; }
    td { padding: 0.5rem 0.75rem; border-bottom: 1px solid #e0e0e0; text-align: right; }
    td:first-child { text-align: left; font-weight: 600; }
    tr:nth-child(even) td { background: #f0f4f8; }
"#;

/// Build one report document from a title, rendered chart images and the
/// summary table.
pub fn render_document(title: &str, charts: &[Vec<u8>], table: &TableSpec) -> String {
    let mut body = String::new();
    writeln!(body, "<h1>{}</h1>", escape(title)).unwrap();
    writeln!(
        body,
        "<p class=\"generated\">Generated: {}</p>",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    )
    .unwrap();
    for png in charts {
        writeln!(
            body,
            "<div class=\"chart\"><img src=\"data:image/png;base64,{}\" alt=\"chart\"></div>",
            STANDARD.encode(png)
        )
        .unwrap();
    }
    body.push_str(&render_table(table));

    format!(
        "<!DOCTYPE html>\n<html lang=\"ja\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape(title),
        STYLE,
        body
    )
}

fn render_table(table: &TableSpec) -> String {
    let mut out = String::from("<table>\n<thead><tr>");
    for header in &table.headers {
        write!(out, "<th>{}</th>", escape(header)).unwrap();
    }
    out.push_str("</tr></thead>\n<tbody>\n");
    for row in &table.rows {
        out.push_str("<tr>");
        for cell in row {
            write!(out, "<td>{}</td>", escape(cell)).unwrap();
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n");
    out
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
