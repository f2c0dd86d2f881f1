//! HTML inliner: patches the shell page to load the fake-server scripts,
//! then folds every referenced script and stylesheet into the document.

use crate::errors::{FuseError, FuseResult};
use regex::Regex;
use std::fs;
use std::path::Path;

/// File name of the generated mock-server script inside the report directory.
pub const SERVER_SCRIPT_NAME: &str = "server.js";

const APP_SCRIPT_TAG: &str = r#"<script src="app.js"></script>"#;

#[derive(Clone, Copy)]
enum TagKind {
    Script,
    Link,
}

pub struct HtmlInliner {
    script_tag: Regex,
    link_tag: Regex,
    src_attr: Regex,
    href_attr: Regex,
    rel_attr: Regex,
}

fn compile(pattern: &str) -> FuseResult<Regex> {
    Regex::new(pattern).map_err(|e| FuseError::regex(e, pattern))
}

/// Write via a sibling temp file and rename into place.
fn write_atomic(path: &Path, contents: &str) -> FuseResult<()> {
    let tmp = path.with_extension("html.tmp");
    fs::write(&tmp, contents).map_err(|e| FuseError::io(e, tmp.clone()))?;
    fs::rename(&tmp, path).map_err(|e| FuseError::io(e, path.to_path_buf()))?;
    Ok(())
}

impl HtmlInliner {
    pub fn new() -> FuseResult<Self> {
        Ok(Self {
            script_tag: compile(r#"(?is)<script\b[^>]*>\s*</script>"#)?,
            link_tag: compile(r#"(?i)<link\b[^>]*>"#)?,
            src_attr: compile(r#"(?i)\bsrc\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>"']+))"#)?,
            href_attr: compile(r#"(?i)\bhref\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>"']+))"#)?,
            rel_attr: compile(r#"(?i)\brel\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>"']+))"#)?,
        })
    }

    /// Inject the helper and mock-server script tags ahead of the app script,
    /// rewriting `index.html` on disk. Detects a previous patch by the helper
    /// file name and leaves the markup alone in that case.
    pub fn patch_shell(&self, root: &Path, helper_name: &str) -> FuseResult<String> {
        let index_path = root.join("index.html");
        let html =
            fs::read_to_string(&index_path).map_err(|e| FuseError::io(e, index_path.clone()))?;

        if html.contains(helper_name) {
            log::info!("index.html is already patched, skipping");
            return Ok(html);
        }

        log::info!(
            "Patching index.html to load {} and {}",
            helper_name,
            SERVER_SCRIPT_NAME
        );
        let injected = format!(
            r#"<script src="{}"></script><script src="{}"></script>{}"#,
            helper_name, SERVER_SCRIPT_NAME, APP_SCRIPT_TAG
        );
        let patched = html.replace(APP_SCRIPT_TAG, &injected);

        write_atomic(&index_path, &patched)?;
        log::debug!("Saved patched index.html");
        Ok(patched)
    }

    /// Replace `<script src>` tags with inline scripts and stylesheet links
    /// with inline styles, reading each referenced file from the report root.
    /// Tags without a usable reference stay untouched.
    ///
    /// Both tag kinds are matched against the original document in a single
    /// positional pass, so tag-shaped strings inside just-inlined script
    /// bodies are never picked up as real tags.
    pub fn inline(&self, root: &Path, html: &str) -> FuseResult<String> {
        let mut tags: Vec<(usize, usize, TagKind)> = self
            .script_tag
            .find_iter(html)
            .map(|m| (m.start(), m.end(), TagKind::Script))
            .chain(
                self.link_tag
                    .find_iter(html)
                    .map(|m| (m.start(), m.end(), TagKind::Link)),
            )
            .collect();
        tags.sort_by_key(|&(start, _, _)| start);

        let mut out = String::with_capacity(html.len());
        let mut last = 0;
        for (start, end, kind) in tags {
            // A link-shaped match inside a script tag's span is script text
            if start < last {
                continue;
            }
            out.push_str(&html[last..start]);
            let tag = &html[start..end];
            match kind {
                TagKind::Script => self.replace_script(root, tag, &mut out)?,
                TagKind::Link => self.replace_link(root, tag, &mut out)?,
            }
            last = end;
        }

        out.push_str(&html[last..]);
        Ok(out)
    }

    /// Write the combined document to its final location.
    pub fn write_output(&self, output: &Path, html: &str) -> FuseResult<u64> {
        fs::write(output, html).map_err(|e| FuseError::io(e, output.to_path_buf()))?;
        Ok(html.len() as u64)
    }

    fn replace_script(&self, root: &Path, tag: &str, out: &mut String) -> FuseResult<()> {
        match self.attr_value(&self.src_attr, tag) {
            Some(src) => {
                let path = root.join(&src);
                log::debug!("Inlining script {:?}", path);
                let contents =
                    fs::read_to_string(&path).map_err(|e| FuseError::io(e, path.clone()))?;
                out.push_str("<script>");
                out.push_str(&contents);
                out.push_str("</script>");
            }
            None => out.push_str(tag),
        }
        Ok(())
    }

    fn replace_link(&self, root: &Path, tag: &str, out: &mut String) -> FuseResult<()> {
        let rel = self.attr_value(&self.rel_attr, tag);
        let href = self.attr_value(&self.href_attr, tag);
        match (rel, href) {
            (Some(rel), Some(href)) if rel.eq_ignore_ascii_case("stylesheet") => {
                let path = root.join(&href);
                log::debug!("Inlining stylesheet {:?}", path);
                let contents =
                    fs::read_to_string(&path).map_err(|e| FuseError::io(e, path.clone()))?;
                out.push_str("<style>");
                out.push_str(&contents);
                out.push_str("</style>");
            }
            _ => out.push_str(tag),
        }
        Ok(())
    }

    fn attr_value(&self, attr: &Regex, tag: &str) -> Option<String> {
        attr.captures(tag).and_then(|c| {
            (1..=3)
                .filter_map(|i| c.get(i))
                .next()
                .map(|m| m.as_str().to_string())
        })
    }
}
