// Shared by several bench targets; each only uses some of these.
#[allow(dead_code)]
pub fn generate_markdown_content(size: usize) -> String {
    let base = "# Title\n\n## Section\n\nParagraph with **bold**, *italic* and `code` in it.\n\n- Bullet point\n    - Nested item\n- Another item\n\n> A quote\n\n---\n\n```rust\nfn example() {\n    println!(\"Hello\");\n}\n```\n\nSee [the docs](https://example.com/docs).\n\n";
    base.repeat(size)
}
