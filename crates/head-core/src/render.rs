//! Resolution of the registry queues into the effective document head.

use std::fmt;

use crate::collections::map::HashSet;
use crate::collections::ordered::IndexSet;
use crate::link::Link;
use crate::meta::MetaRecord;
use crate::registry::{Declaration, Kind, Queues};

/// The head as it should currently look.
///
/// The latest title, template and lang win. Metas are resolved per tag
/// instance with the latest declaration winning, links are kept in declaration
/// order with exact duplicates dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeadSnapshot {
    lang: Option<String>,
    title: Option<String>,
    metas: Vec<MetaRecord>,
    links: Vec<Link>,
}

impl HeadSnapshot {
    pub(crate) fn resolve(queues: &Queues, placeholder: &str) -> Self {
        let last_text = |kind: Kind| {
            queues
                .list(kind)
                .iter()
                .rev()
                .find_map(|entry| match entry.declaration() {
                    Declaration::Title(text)
                    | Declaration::TitleTemplate(text)
                    | Declaration::Lang(text) => Some(text.clone()),
                    _ => None,
                })
        };

        let title = match (last_text(Kind::Title), last_text(Kind::TitleTemplate)) {
            (Some(title), Some(template)) => Some(template.replace(placeholder, &title)),
            (title, _) => title,
        };

        let mut seen = HashSet::new();
        let mut metas: Vec<MetaRecord> = queues
            .list(Kind::Meta)
            .iter()
            .rev()
            .filter_map(|entry| match entry.declaration() {
                Declaration::Meta(record) if seen.insert(record.instance()) => Some(record.clone()),
                _ => None,
            })
            .collect();
        metas.reverse();

        let links: IndexSet<&Link> = queues
            .list(Kind::Link)
            .iter()
            .filter_map(|entry| match entry.declaration() {
                Declaration::Link(link) => Some(link),
                _ => None,
            })
            .collect();

        Self {
            lang: last_text(Kind::Lang),
            title,
            metas,
            links: links.into_iter().cloned().collect(),
        }
    }

    pub fn lang(&self) -> Option<&str> {
        self.lang.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn metas(&self) -> &[MetaRecord] {
        &self.metas
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn is_empty(&self) -> bool {
        self.lang.is_none()
            && self.title.is_none()
            && self.metas.is_empty()
            && self.links.is_empty()
    }

    /// Renders the head contents: title, then metas, then links.
    pub fn to_html(&self) -> String {
        self.to_string()
    }

    /// Attributes for the root `<html>` element, e.g. `lang="en"`.
    pub fn html_attributes(&self) -> String {
        match &self.lang {
            Some(lang) => format!("lang=\"{}\"", escape_attribute(lang)),
            None => String::new(),
        }
    }

    fn write_html(&self, out: &mut impl fmt::Write) -> fmt::Result {
        if let Some(title) = &self.title {
            write!(out, "<title>{}</title>", escape_text(title))?;
        }
        for meta in &self.metas {
            write_tag(out, "meta", meta.attributes())?;
        }
        for link in &self.links {
            write_tag(out, "link", link.attributes())?;
        }
        Ok(())
    }
}

impl fmt::Display for HeadSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_html(f)
    }
}

fn write_tag<'a>(
    out: &mut impl fmt::Write,
    tag: &str,
    attributes: impl Iterator<Item = (&'static str, &'a str)>,
) -> fmt::Result {
    write!(out, "<{tag}")?;
    for (attr, value) in attributes {
        write!(out, " {attr}=\"{}\"", escape_attribute(value))?;
    }
    out.write_char('>')
}

fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_attribute(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
