//! Markdown rendering for entry bodies

use pulldown_cmark::{html, Options, Parser};

/// GitHub-flavoured markdown renderer.
///
/// Entry files are MDX: top-level `import`/`export` statements are module
/// code, not content, and are skipped before rendering.
pub struct MarkdownRenderer {
    options: Options,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        // Front-matter is split off before rendering, so YAML metadata
        // blocks stay disabled.
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_GFM;
        Self { options }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> String {
        let content = strip_mdx_statements(markdown);
        let parser = Parser::new_ext(&content, self.options);

        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);
        html_output
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Drop MDX `import`/`export` lines that sit outside fenced code blocks
fn strip_mdx_statements(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len());
    let mut in_fence = false;

    for line in markdown.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
        }
        let is_statement = line.starts_with("import ") || line.starts_with("export ");
        if in_fence || !is_statement {
            out.push_str(line);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_basic_markdown() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("# Hello World\n\nThis is a test.");
        assert!(html.contains("<h1>Hello World</h1>"));
        assert!(html.contains("<p>This is a test.</p>"));
    }

    #[test]
    fn test_render_gfm_table_and_strikethrough() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("| a | b |\n|---|---|\n| 1 | 2 |\n\n~~gone~~");
        assert!(html.contains("<table>"));
        assert!(html.contains("<del>gone</del>"));
    }

    #[test]
    fn test_mdx_imports_are_skipped() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render(
            "import Card from '../components/Card.astro';\n\nSome text.\n\n```js\nimport x from 'y';\n```\n",
        );
        assert!(!html.contains("components/Card"));
        assert!(html.contains("Some text."));
        assert!(html.contains("import x from"));
    }
}
