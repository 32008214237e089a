//! HTML serialization of a screen view.

use super::screen::{Alignment, BlockStyle, FontWeight, NodeContent, ScreenNode, StyledRun};
use super::ScreenView;

/// Serialize a screen view as a standalone HTML fragment.
///
/// Styles are written inline so the fragment renders the same wherever it
/// is embedded.
pub fn to_html(view: &ScreenView) -> String {
    let mut output = String::new();
    output.push_str("<div class=\"sheet\" style=\"font-family:serif;line-height:1.625;background:#fff;padding:1rem\">\n");

    if let Some(ref title) = view.title {
        output.push_str(
            "<div class=\"sheet-title\" style=\"text-align:center;font-weight:700;font-size:1.25em;text-decoration:underline;margin-bottom:1.5em\">",
        );
        output.push_str(&escape_html(title));
        output.push_str("</div>\n");
    }

    for node in &view.nodes {
        render_node(&mut output, node);
    }

    if let Some(ref sig) = view.signature {
        output.push_str("<div class=\"sheet-signature\" style=\"margin-top:3em;padding-top:2em;border-top:1px dashed #9ca3af;display:flex;justify-content:space-between;align-items:flex-end\">\n");
        output.push_str(&format!(
            "<div style=\"font-size:0.875em\">{}<br />{}</div>\n",
            escape_html(&sig.date_line()),
            escape_html(&sig.place_line())
        ));
        output.push_str(&format!(
            "<div style=\"text-align:right\"><div style=\"font-weight:700\">{}</div><div style=\"font-size:0.875em;color:#6b7280\">{}</div></div>\n",
            escape_html(&sig.signatory),
            escape_html(&sig.designation)
        ));
        output.push_str("</div>\n");
    }

    output.push_str("</div>\n");
    output
}

fn render_node(output: &mut String, node: &ScreenNode) {
    if let NodeContent::Gap { height_em } = node.content {
        output.push_str(&format!(
            "<div class=\"block {}\" style=\"height:{}em\"></div>\n",
            node.kind.as_str(),
            height_em
        ));
        return;
    }

    output.push_str(&format!(
        "<div class=\"block {}\" style=\"{}\">",
        node.kind.as_str(),
        block_css(&node.style)
    ));

    match &node.content {
        NodeContent::Gap { .. } => {}
        NodeContent::Runs { marker, runs } => {
            if let Some(m) = marker {
                output.push_str(&format!(
                    "<span style=\"position:absolute;margin-left:-1em\">{}</span>",
                    escape_html(&m.to_string())
                ));
            }
            render_runs(output, runs);
        }
        NodeContent::Pair { key, value } => {
            output.push_str("<span class=\"key\" style=\"margin-right:0.5em\">");
            render_runs(output, key);
            output.push_str("</span><span class=\"value\">");
            render_runs(output, value);
            output.push_str("</span>");
        }
    }

    output.push_str("</div>\n");
}

fn render_runs(output: &mut String, runs: &[StyledRun]) {
    for run in runs {
        output.push_str(&format!(
            "<span style=\"font-weight:{}\">{}</span>",
            weight_css(run.weight),
            escape_html(&run.text)
        ));
    }
}

fn block_css(style: &BlockStyle) -> String {
    let mut css = vec![
        format!("font-weight:{}", weight_css(style.weight)),
        format!("font-size:{}em", style.font_scale),
        format!("text-align:{}", align_css(style.align)),
        format!(
            "margin:{}em 0 {}em {}em",
            style.margin_top_em, style.margin_bottom_em, style.indent_em
        ),
    ];
    if style.underline {
        css.push("text-decoration:underline".to_string());
    }
    if style.uppercase {
        css.push("text-transform:uppercase".to_string());
    }
    if style.indent_em > 0.0 {
        css.push("position:relative".to_string());
    }
    css.join(";")
}

fn weight_css(weight: FontWeight) -> u16 {
    match weight {
        FontWeight::Regular => 400,
        FontWeight::SemiBold => 600,
        FontWeight::Bold => 700,
    }
}

fn align_css(align: Alignment) -> &'static str {
    match align {
        Alignment::Left => "left",
        Alignment::Center => "center",
        Alignment::Right => "right",
        Alignment::Justify => "justify",
    }
}

/// Escape text for HTML element content and attribute values.
fn escape_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}
