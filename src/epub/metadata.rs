//! Package document (`content.opf`) parsing

use crate::error::SeError;
use quick_xml::events::Event;
use quick_xml::reader::Reader;

/// Bibliographic metadata from the package document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpubMetadata {
    pub title: String,
    pub author: String,
    pub identifier: String,
    pub language: String,
}

/// One `<item>` of the manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestItem {
    pub id: String,
    /// Path relative to the package document
    pub href: String,
    pub media_type: String,
}

/// The parts of `content.opf` the toolset reads
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageDocument {
    pub metadata: EpubMetadata,
    pub manifest: Vec<ManifestItem>,
    /// `idref`s of the spine, in reading order
    pub spine: Vec<String>,
}

fn invalid(message: impl std::fmt::Display) -> SeError {
    SeError::InvalidSeEbook(format!("content.opf: {}", message))
}

fn local_name(name: &[u8]) -> &[u8] {
    name.rsplit(|&b| b == b':').next().unwrap_or(name)
}

impl PackageDocument {
    /// Parse a package document
    pub fn parse(opf: &str) -> Result<Self, SeError> {
        let mut reader = Reader::from_str(opf);
        let mut document = PackageDocument::default();
        let mut capture: Option<Vec<u8>> = None;
        let mut text = String::new();

        loop {
            match reader.read_event().map_err(invalid)? {
                Event::Start(start) => {
                    let name = start.name();
                    let local = local_name(name.as_ref());
                    if matches!(local, b"title" | b"creator" | b"identifier" | b"language") {
                        capture = Some(local.to_vec());
                        text.clear();
                    }
                }
                Event::Empty(element) => {
                    let name = element.name();
                    match local_name(name.as_ref()) {
                        b"item" => {
                            let mut id = String::new();
                            let mut href = String::new();
                            let mut media_type = String::new();
                            for attribute in element.attributes() {
                                let attribute = attribute.map_err(invalid)?;
                                let value = attribute.unescape_value().map_err(invalid)?;
                                match attribute.key.as_ref() {
                                    b"id" => id = value.into_owned(),
                                    b"href" => href = value.into_owned(),
                                    b"media-type" => media_type = value.into_owned(),
                                    _ => {}
                                }
                            }
                            document.manifest.push(ManifestItem {
                                id,
                                href,
                                media_type,
                            });
                        }
                        b"itemref" => {
                            for attribute in element.attributes() {
                                let attribute = attribute.map_err(invalid)?;
                                if attribute.key.as_ref() == b"idref" {
                                    let value = attribute.unescape_value().map_err(invalid)?;
                                    document.spine.push(value.into_owned());
                                }
                            }
                        }
                        _ => {}
                    }
                }
                Event::Text(content) if capture.is_some() => {
                    text.push_str(&content.unescape().map_err(invalid)?);
                }
                Event::End(end) => {
                    let name = end.name();
                    if capture.as_deref() == Some(local_name(name.as_ref())) {
                        let value = text.trim().to_string();
                        let metadata = &mut document.metadata;
                        // The first of each wins: secondary creators are contributors
                        let slot = match capture.as_deref() {
                            Some(b"title") => &mut metadata.title,
                            Some(b"creator") => &mut metadata.author,
                            Some(b"identifier") => &mut metadata.identifier,
                            _ => &mut metadata.language,
                        };
                        if slot.is_empty() {
                            *slot = value;
                        }
                        capture = None;
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPF: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0" unique-identifier="uid">
	<metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
		<dc:identifier id="uid">url:https://standardebooks.org/ebooks/jane-austen/persuasion</dc:identifier>
		<dc:title id="title">Persuasion</dc:title>
		<dc:language>en-GB</dc:language>
		<dc:creator id="author">Jane Austen</dc:creator>
		<dc:creator id="illustrator">Hugh Thomson</dc:creator>
	</metadata>
	<manifest>
		<item href="css/core.css" id="core.css" media-type="text/css"/>
		<item href="text/chapter-1.xhtml" id="chapter-1.xhtml" media-type="application/xhtml+xml"/>
	</manifest>
	<spine>
		<itemref idref="chapter-1.xhtml"/>
	</spine>
</package>"#;

    #[test]
    fn test_parse_metadata() {
        let document = PackageDocument::parse(OPF).unwrap();
        assert_eq!(document.metadata.title, "Persuasion");
        assert_eq!(document.metadata.author, "Jane Austen");
        assert_eq!(document.metadata.language, "en-GB");
        assert!(document.metadata.identifier.ends_with("/persuasion"));
    }

    #[test]
    fn test_parse_manifest_and_spine() {
        let document = PackageDocument::parse(OPF).unwrap();
        assert_eq!(document.manifest.len(), 2);
        assert_eq!(document.manifest[1].href, "text/chapter-1.xhtml");
        assert_eq!(document.manifest[0].media_type, "text/css");
        assert_eq!(document.spine, vec!["chapter-1.xhtml".to_string()]);
    }

    #[test]
    fn test_unescapes_text() {
        let document = PackageDocument::parse(
            "<package><metadata><dc:title>Pride &amp; Prejudice</dc:title></metadata></package>",
        )
        .unwrap();
        assert_eq!(document.metadata.title, "Pride & Prejudice");
    }

    #[test]
    fn test_malformed_is_invalid_ebook() {
        let err = PackageDocument::parse("<package><metadata></package>").unwrap_err();
        assert_eq!(err.code(), 11);
    }
}
