//! HTML rendering for the block of the day page.
//!
//! The page is small enough to be a single `format!` template.
//! All block data is escaped before it reaches the markup.

use crate::models::Block;

/// Render the index page for `block`.
///
/// `base_path` is the normalised mount prefix (empty or `/segment`), used to
/// build links to static assets.
pub fn render_index(block: &Block, base_path: &str) -> String {
    let name = escape_html(&block.name);
    let base_path = escape_html(base_path);
    let image = if block.has_image() {
        format!(
            "\n    <img class=\"block-image\" src=\"{}\" alt=\"{name}\">",
            escape_html(&block.image)
        )
    } else {
        String::new()
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Block of the Day: {name}</title>
  <link rel="stylesheet" href="{base_path}/style.css">
</head>
<body>
  <main class="block">
    <p class="caption">Today's block is</p>
    <h1 class="block-name">{name}</h1>{image}
  </main>
</body>
</html>
"#
    )
}

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
