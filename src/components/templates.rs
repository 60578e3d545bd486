use std::fs;
use std::path::{Path, PathBuf};
use crate::errors::WikiError;
use crate::types::{Metadata, Page};
use crate::utils::{encode_page_url, escape_attr, escape_html};

/// Builds the HTML pages served by the handlers
pub struct TemplateComponent {
    template_dir: PathBuf,
    version: &'static str,
}

impl TemplateComponent {
    pub fn new(template_dir: &Path, version: &'static str) -> Self {
        Self { template_dir: template_dir.to_path_buf(), version }
    }

    /// Wrap a body in `layout.html`, or in the inline shell when that file is absent
    pub fn render_layout(&self, title: &str, page_name: &str, body: &str) -> Result<String, WikiError> {
        let layout_path = self.template_dir.join("layout.html");
        match fs::read_to_string(&layout_path) {
            Ok(layout) => Ok(layout
                .replace("{{TITLE}}", &escape_html(title))
                .replace("{{PAGE_NAME}}", &escape_html(page_name))
                .replace("{{PAGE_URL}}", &escape_attr(&encode_page_url(page_name)))
                .replace("{{ACTIONS}}", &page_actions(page_name))
                .replace("{{VERSION}}", self.version)
                .replace("{{BODY}}", body)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No layout at {:?}, using inline shell", layout_path);
                Ok(self.inline_shell(title, page_name, body))
            }
            Err(e) => Err(WikiError::TemplateError(format!("{}: {}", layout_path.display(), e))),
        }
    }

    fn inline_shell(&self, title: &str, page_name: &str, body: &str) -> String {
        format!(
            "<!doctype html><html><head><meta charset=\"utf-8\"><meta name=\"viewport\" content=\"width=device-width, initial-scale=1\"><title>{title}</title><link rel=\"stylesheet\" href=\"/static/css/dftr.css\"></head><body><nav><a href=\"/view/Main\">Main</a> <a href=\"/all_pages\">All pages</a> {actions}</nav><main>{body}</main><footer>AlDftr v{version}</footer></body></html>",
            title = escape_html(title),
            actions = page_actions(page_name),
            body = body,
            version = self.version,
        )
    }

    /// Body of the view page; `html` is already rendered markup
    pub fn view_body(&self, page: &Page, html: &str, last_modified: &str) -> String {
        let mut body = format!("<h1 class=\"page-name\">{}</h1>", escape_html(page.name.as_str()));
        body.push_str(last_modified);
        body.push_str(&format!("<div class=\"page-content\">{}</div>", html));
        body.push_str(&metadata_list(&page.metadata));
        body
    }

    pub fn edit_body(&self, page: &Page) -> String {
        let metadata_json = serde_json::to_string_pretty(&page.metadata).unwrap_or_else(|_| "{}".to_string());
        format!(
            "<form method=\"post\" action=\"/save\" class=\"edit-form\">\
             <input type=\"text\" name=\"page_name\" value=\"{}\">\
             <textarea name=\"page_content\" rows=\"20\">\n{}</textarea>\
             <label>Metadata (JSON)</label>\
             <textarea name=\"page_metadata\" rows=\"5\">\n{}</textarea>\
             <button type=\"submit\">Save</button>\
             </form>",
            escape_attr(page.name.as_str()),
            escape_html(&page.content),
            escape_html(&metadata_json),
        )
    }

    pub fn all_pages_body(&self, pages: &[String]) -> String {
        if pages.is_empty() {
            return "<h1>All pages</h1><p>No pages yet.</p>".to_string();
        }
        let mut body = String::from("<h1>All pages</h1><ul class=\"all-pages\">");
        for name in pages {
            body.push_str(&format!(
                "<li><a href=\"/view/{}\">{}</a></li>",
                escape_attr(&encode_page_url(name)),
                escape_html(name)
            ));
        }
        body.push_str("</ul>");
        body
    }
}

/// Edit and delete links for a page; pages without a name (listings) get none
fn page_actions(page_name: &str) -> String {
    if page_name.is_empty() {
        return String::new();
    }
    let url = escape_attr(&encode_page_url(page_name));
    format!(
        "<a href=\"/edit/{url}\">Edit</a> <a href=\"/delete/{url}\" onclick=\"return confirm('Delete this page?')\">Delete</a>"
    )
}

fn metadata_list(metadata: &Metadata) -> String {
    if metadata.is_empty() {
        return String::new();
    }
    let mut html = String::from("<dl class=\"page-metadata\">");
    for (key, value) in metadata {
        html.push_str(&format!("<dt>{}</dt><dd>{}</dd>", escape_html(key), escape_html(value)));
    }
    html.push_str("</dl>");
    html
}
