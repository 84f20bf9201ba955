use anyhow::{Context as _, Result};
use tera::{Context, Tera};

use crate::models::page::PageRecord;

const VIEW_TEMPLATE_NAME: &str = "view.html";
const VIEW_TEMPLATE: &str = include_str!("../../templates/view.html");

/// Client bundle that reads `window.PAGE_DATA` and draws the page.
pub const BUNDLE_SRC: &str = "/static/bundle.js";

/// Server-side renderer for `/view/:id`.
///
/// Text fields go through Tera's HTML autoescaping. The inline page data is
/// JSON made safe for a `<script>` body by [`script_safe_json`].
#[derive(Clone)]
pub struct PageRenderer {
    tera: Tera,
}

impl PageRenderer {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template(VIEW_TEMPLATE_NAME, VIEW_TEMPLATE)
            .context("view template failed to parse")?;
        Ok(Self { tera })
    }

    pub fn render_view(&self, record: &PageRecord) -> Result<String> {
        let page_data = serde_json::to_string(record).context("page record failed to encode")?;

        let mut context = Context::new();
        context.insert("recruiter_name", &record.recruiter.name);
        context.insert("page_data", &script_safe_json(&page_data));
        context.insert("bundle_src", BUNDLE_SRC);

        self.tera
            .render(VIEW_TEMPLATE_NAME, &context)
            .with_context(|| format!("failed to render page {}", record.id))
    }
}

/// Escapes characters that could end the surrounding `<script>` element or
/// break a JS string literal. They only occur inside JSON strings, where the
/// `\uXXXX` form decodes to the same value.
pub fn script_safe_json(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    out
}
