//! The dftr markup: a small line-oriented format meant to be equally easy
//! to type in left-to-right and right-to-left scripts.
//!
//! ```text
//! [[page-name]]   link to another page (the target is trimmed, the text is kept)
//! **text**        bold
//! -----           horizontal rule (five or more hyphens alone on a line)
//! #text           h1, up to ######text for h6
//! ```
//!
//! Rendering is an ordered list of whole-text passes. Order matters: each
//! pass sees the output of the previous one, and headings are matched from
//! the longest marker down so `#` never claims a `######` line.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// One substitution stage of the renderer
#[derive(Clone, Copy)]
pub struct MarkupPass {
    pub name: &'static str,
    pub apply: fn(&str) -> String,
}

static LOCAL_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\[([^\]]*)\]\]").expect("valid link pattern"));
static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid bold pattern"));
static HORIZONTAL_RULE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^-----+$").expect("valid hr pattern"));

// Index 0 is h6, index 5 is h1.
static HEADINGS: Lazy<Vec<(usize, Regex)>> = Lazy::new(|| {
    (1..=6)
        .rev()
        .map(|level| {
            let pattern = format!(r"(?m)^#{{{}}}(.*)$", level);
            (level, Regex::new(&pattern).expect("valid heading pattern"))
        })
        .collect()
});

/// Path prefix used for links between pages
pub const VIEW_PREFIX: &str = "/view/";

/// The passes in the order they run
pub const PASSES: [MarkupPass; 6] = [
    MarkupPass { name: "strip-carriage-returns", apply: strip_carriage_returns },
    MarkupPass { name: "local-links", apply: local_links },
    MarkupPass { name: "bold", apply: bold },
    MarkupPass { name: "horizontal-rules", apply: horizontal_rules },
    MarkupPass { name: "headings", apply: headings },
    MarkupPass { name: "line-breaks", apply: line_breaks },
];

pub fn strip_carriage_returns(text: &str) -> String {
    text.replace('\r', "")
}

pub fn local_links(text: &str) -> String {
    LOCAL_LINK
        .replace_all(text, |caps: &Captures| {
            format!("<a href=\"{}{}\">{}</a>", VIEW_PREFIX, caps[1].trim(), &caps[1])
        })
        .into_owned()
}

pub fn bold(text: &str) -> String {
    BOLD.replace_all(text, "<b>${1}</b>").into_owned()
}

pub fn horizontal_rules(text: &str) -> String {
    HORIZONTAL_RULE.replace_all(text, "<hr>").into_owned()
}

pub fn headings(text: &str) -> String {
    let mut out = text.to_string();
    for (level, re) in HEADINGS.iter() {
        let replacement = format!("<h{level}>${{1}}</h{level}>");
        out = re.replace_all(&out, replacement.as_str()).into_owned();
    }
    out
}

pub fn line_breaks(text: &str) -> String {
    text.replace('\n', "<br>")
}

/// Renders page bodies to HTML fragments
#[derive(Clone, Default)]
pub struct MarkupService;

impl MarkupService {
    pub fn new() -> Self {
        Self
    }

    /// Run every pass in order. Pure: the same input always gives the same output.
    pub fn render(&self, content: &str) -> String {
        PASSES.iter().fold(content.to_string(), |text, pass| (pass.apply)(&text))
    }
}
