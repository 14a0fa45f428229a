//! Artifact text layout: provenance header, generated body, trailing newline

/// Wrap generated statements with a comment naming their source documents.
pub fn render_artifact(sources: &[String], body: &str) -> String {
    let mut output = String::from("/*\n");
    output.push_str(&format!(
        " * This file is compiled from the following {} source document(s):\n",
        sources.len()
    ));
    for source in sources {
        output.push_str(&format!(" *   - {}\n", source.replace("*/", "*\\/")));
    }
    output.push_str(" */\n");
    if !body.is_empty() {
        output.push_str(body);
        output.push('\n');
    }
    output
}
