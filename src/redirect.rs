//! The HTML redirect page published next to each PDF.
//!
//! Several webmail clients refuse to open links that end in `.pdf` or show
//! them as attachments. A tiny HTML page at the sibling `.html` path bounces
//! the reader to the PDF with three mechanisms, in case one is blocked:
//! a meta refresh, a plain link, and a `location.replace` script.
//! `noindex` keeps search engines from listing the page itself.

/// Render the redirect document pointing at `target`, a path relative to the
/// page (normally the PDF's bare file name).
///
/// `target` comes from [`crate::path::StoragePath::file_name`], which only
/// contains `[a-z0-9._-]`, so it needs no HTML or JS escaping.
pub fn render_redirect_page(target: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta http-equiv="refresh" content="0; url={target}">
    <meta name="robots" content="noindex">
    <title>PDF Document</title>
</head>
<body>
    <p>Loading PDF... <a href="{target}">Click here if not redirected</a></p>
    <script>window.location.replace("{target}");</script>
</body>
</html>
"#
    )
}
