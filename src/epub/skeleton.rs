//! New ebook source directories
//!
//! The skeleton is a minimal, valid ebook: package document, navigation,
//! titlepage, imprint, colophon, a core stylesheet, and placeholder source
//! artwork. Text fields are filled in from the draft details.

use crate::error::SeError;
use crate::formatting::make_url_safe;
use quick_xml::escape::escape;
use regex::{Captures, Regex};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::debug;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([A-Z_]+)\}\}").expect("valid regex"));

const TEMPLATES: &[(&str, &str)] = &[
    ("src/mimetype", include_str!("../../templates/draft/src/mimetype")),
    (
        "src/META-INF/container.xml",
        include_str!("../../templates/draft/src/META-INF/container.xml"),
    ),
    (
        "src/epub/content.opf",
        include_str!("../../templates/draft/src/epub/content.opf"),
    ),
    (
        "src/epub/toc.xhtml",
        include_str!("../../templates/draft/src/epub/toc.xhtml"),
    ),
    (
        "src/epub/css/core.css",
        include_str!("../../templates/draft/src/epub/css/core.css"),
    ),
    (
        "src/epub/text/titlepage.xhtml",
        include_str!("../../templates/draft/src/epub/text/titlepage.xhtml"),
    ),
    (
        "src/epub/text/imprint.xhtml",
        include_str!("../../templates/draft/src/epub/text/imprint.xhtml"),
    ),
    (
        "src/epub/text/colophon.xhtml",
        include_str!("../../templates/draft/src/epub/text/colophon.xhtml"),
    ),
    (
        "images/cover.svg",
        include_str!("../../templates/draft/images/cover.svg"),
    ),
    (
        "images/titlepage.svg",
        include_str!("../../templates/draft/images/titlepage.svg"),
    ),
    (".gitignore", include_str!("../../templates/draft/gitignore")),
];

/// Details of a new draft
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftInfo {
    pub author: String,
    pub title: String,
    pub translator: Option<String>,
    pub illustrator: Option<String>,
    /// Transcription the draft is based on
    pub source_url: Option<String>,
}

impl DraftInfo {
    /// URL-safe directory name components: author, title, then optional
    /// translator and illustrator
    fn name_parts(&self) -> Vec<String> {
        let mut parts = vec![make_url_safe(&self.author), make_url_safe(&self.title)];
        parts.extend(self.translator.as_deref().map(make_url_safe));
        parts.extend(self.illustrator.as_deref().map(make_url_safe));
        parts
    }

    /// Directory name: `author_title[_translator][_illustrator]`, URL-safe
    pub fn directory_name(&self) -> String {
        self.name_parts().join("_")
    }

    fn contributors(&self) -> String {
        let mut lines = String::new();
        for (id, role, name) in [
            ("translator", "trl", &self.translator),
            ("illustrator", "ill", &self.illustrator),
        ] {
            if let Some(name) = name {
                lines.push_str(&format!(
                    "\t\t<dc:contributor id=\"{id}\">{}</dc:contributor>\n\
                     \t\t<meta property=\"role\" refines=\"#{id}\" scheme=\"marc:relators\">{role}</meta>\n",
                    escape(name.as_str())
                ));
            }
        }
        lines
    }

    /// Fill every `{{NAME}}` placeholder in one pass
    ///
    /// Substituted text is never rescanned, so user input that happens to
    /// contain a placeholder is written literally.
    fn render(&self, template: &str) -> String {
        let (source, source_link) = match &self.source_url {
            Some(url) => {
                let url = escape(url.as_str());
                (
                    format!("\t\t<dc:source>{}</dc:source>\n", url),
                    format!("<a href=\"{0}\">{0}</a>", url),
                )
            }
            None => (String::new(), "a public domain source".to_string()),
        };

        PLACEHOLDER
            .replace_all(template, |caps: &Captures| match &caps[1] {
                "TITLE" => escape(self.title.as_str()).into_owned(),
                "AUTHOR" => escape(self.author.as_str()).into_owned(),
                "URL_TITLE" => make_url_safe(&self.title),
                "URL_AUTHOR" => make_url_safe(&self.author),
                "CONTRIBUTORS" => self.contributors(),
                "SOURCE" => source.clone(),
                "SOURCE_LINK" => source_link.clone(),
                _ => caps[0].to_string(),
            })
            .into_owned()
    }
}

/// Create the skeleton for `draft` inside `parent`
///
/// Fails with [`SeError::FileExists`] without touching anything when the
/// directory is already there.
pub fn create_skeleton(parent: &Path, draft: &DraftInfo) -> Result<PathBuf, SeError> {
    if draft.name_parts().iter().any(String::is_empty) {
        return Err(SeError::InvalidInput(
            "Author, title, translator, and illustrator must contain letters or digits"
                .to_string(),
        ));
    }
    let name = draft.directory_name();

    let root = parent.join(&name);
    if root.exists() {
        return Err(SeError::FileExists(root));
    }

    for (relative, template) in TEMPLATES {
        let path = root.join(relative);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        debug!(path = %path.display(), "writing skeleton file");
        fs::write(&path, draft.render(template))?;
    }

    Ok(root)
}
