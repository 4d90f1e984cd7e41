//! GraphML document utilities.

use std::fmt::Write;

const GRAPHML_NS: &str = "http://graphml.graphdrawing.org/xmlns";
const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
const SCHEMA_LOCATION: &str =
    "http://graphml.graphdrawing.org/xmlns http://graphml.graphdrawing.org/xmlns/1.0/graphml.xsd";

/// Escape text content for element bodies.
pub fn escape_text(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Escape text for a double-quoted attribute value.
pub fn escape_attr(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Write indentation to output.
pub fn write_indent(output: &mut String, level: usize) {
    for _ in 0..level {
        output.push_str("  ");
    }
}

/// A GraphML document builder producing the fixed envelope: XML declaration,
/// namespaced `<graphml>` root, and a single directed `<graph>` container.
pub struct GraphMlWriter {
    output: String,
    indent: usize,
}

impl GraphMlWriter {
    /// Open the envelope with the given graph id.
    pub fn new(graph_id: &str) -> Self {
        let mut output = String::with_capacity(4096);
        output.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        let _ = writeln!(
            output,
            "<graphml xmlns=\"{GRAPHML_NS}\" xmlns:xsi=\"{XSI_NS}\" xsi:schemaLocation=\"{SCHEMA_LOCATION}\">"
        );
        let _ = writeln!(
            output,
            "  <graph id=\"{}\" edgedefault=\"directed\">",
            escape_attr(graph_id)
        );
        Self { output, indent: 2 }
    }

    /// Emit a node element: id and labels attributes, a nested `labels` data
    /// field, and one data field per attribute entry.
    pub fn node(&mut self, id: &str, labels: &str, data: &[(String, String)]) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        let _ = writeln!(
            self.output,
            "<node id=\"{}\" labels=\"{}\">",
            escape_attr(id),
            escape_attr(labels)
        );
        self.data_fields(labels, data);
        write_indent(&mut self.output, self.indent);
        self.output.push_str("</node>\n");
        self
    }

    /// Emit an edge element: id, endpoint and label attributes, a nested
    /// `labels` data field, and one data field per attribute entry.
    pub fn edge(
        &mut self,
        id: &str,
        source: &str,
        target: &str,
        label: &str,
        data: &[(String, String)],
    ) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        let _ = writeln!(
            self.output,
            "<edge id=\"{}\" source=\"{}\" target=\"{}\" label=\"{}\">",
            escape_attr(id),
            escape_attr(source),
            escape_attr(target),
            escape_attr(label)
        );
        self.data_fields(label, data);
        write_indent(&mut self.output, self.indent);
        self.output.push_str("</edge>\n");
        self
    }

    fn data_fields(&mut self, labels: &str, data: &[(String, String)]) {
        write_indent(&mut self.output, self.indent + 1);
        let _ = writeln!(
            self.output,
            "<data key=\"labels\">{}</data>",
            escape_text(labels)
        );
        for (key, value) in data {
            write_indent(&mut self.output, self.indent + 1);
            let _ = writeln!(
                self.output,
                "<data key=\"{}\">{}</data>",
                escape_attr(key),
                escape_text(value)
            );
        }
    }

    /// Close the envelope and return the document.
    pub fn build(mut self) -> String {
        self.output.push_str("  </graph>\n");
        self.output.push_str("</graphml>\n");
        self.output
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("a & b"), "a &amp; b");
        assert_eq!(escape_text("<data>"), "&lt;data&gt;");
        assert_eq!(escape_text("plain"), "plain");
    }

    #[test]
    fn test_escape_attr_quotes() {
        assert_eq!(escape_attr(r#"He said "hi""#), "He said &quot;hi&quot;");
        assert_eq!(escape_attr("it's"), "it&apos;s");
    }

    #[test]
    fn test_envelope() {
        let writer = GraphMlWriter::new("G");
        let document = writer.build();

        assert!(document.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(document.contains("xmlns=\"http://graphml.graphdrawing.org/xmlns\""));
        assert!(document.contains("<graph id=\"G\" edgedefault=\"directed\">"));
        assert!(document.ends_with("</graphml>\n"));
    }

    #[test]
    fn test_node_element() {
        let mut writer = GraphMlWriter::new("G");
        writer.node(
            "n1",
            "Forest",
            &[("Name".to_string(), "Contoso".to_string())],
        );
        let document = writer.build();

        assert!(document.contains("<node id=\"n1\" labels=\"Forest\">"));
        assert!(document.contains("<data key=\"labels\">Forest</data>"));
        assert!(document.contains("<data key=\"Name\">Contoso</data>"));
    }

    #[test]
    fn test_hostile_values_are_escaped() {
        let mut writer = GraphMlWriter::new("G");
        writer.node(
            "n1",
            "Server",
            &[("Name".to_string(), "dc01 <&> \"quoted\"".to_string())],
        );
        let document = writer.build();

        assert!(document.contains("<data key=\"Name\">dc01 &lt;&amp;&gt; \"quoted\"</data>"));
        assert!(!document.contains("dc01 <&>"));
    }
}
