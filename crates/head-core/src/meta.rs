//! Meta declarations and their canonical form.
//!
//! Components describe a `<meta>` tag with [`MetaOptions`], where any subset of
//! the identifying attributes may be set. [`MetaRecord::normalize`] picks the one
//! attribute that identifies the tag (its [`MetaKeyword`]) and carries every
//! field along unchanged, so records can be compared and rendered uniformly.

use std::fmt;

use crate::hash::StructuralKey;

/// A meta tag as declared by a component.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct MetaOptions {
    pub name: Option<String>,
    pub charset: Option<String>,
    pub http_equiv: Option<String>,
    pub property: Option<String>,
    pub content: Option<String>,
}

impl MetaOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// `<meta name=".." content="..">`
    pub fn named(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new().with_name(name).with_content(content)
    }

    /// `<meta property=".." content="..">`, as used by Open Graph.
    pub fn property(property: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new().with_property(property).with_content(content)
    }

    /// `<meta http-equiv=".." content="..">`
    pub fn http_equiv(http_equiv: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new().with_http_equiv(http_equiv).with_content(content)
    }

    /// `<meta charset="..">`
    pub fn charset(charset: impl Into<String>) -> Self {
        Self::new().with_charset(charset)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = Some(charset.into());
        self
    }

    pub fn with_http_equiv(mut self, http_equiv: impl Into<String>) -> Self {
        self.http_equiv = Some(http_equiv.into());
        self
    }

    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.property = Some(property.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}

/// The attribute that identifies a meta tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetaKeyword {
    Charset,
    Name,
    Property,
    HttpEquiv,
}

impl MetaKeyword {
    /// Selects the keyword by presence: charset, then name, then property.
    ///
    /// Anything else falls back to `http-equiv`, including entries that set no
    /// identifying attribute at all. Empty strings count as absent.
    pub fn for_options(options: &MetaOptions) -> Self {
        if is_present(&options.charset) {
            MetaKeyword::Charset
        } else if is_present(&options.name) {
            MetaKeyword::Name
        } else if is_present(&options.property) {
            MetaKeyword::Property
        } else {
            MetaKeyword::HttpEquiv
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MetaKeyword::Charset => "charset",
            MetaKeyword::Name => "name",
            MetaKeyword::Property => "property",
            MetaKeyword::HttpEquiv => "http-equiv",
        }
    }
}

impl fmt::Display for MetaKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

/// Which concrete tag a record targets in the document.
///
/// Two records with the same instance compete for the same element: the later
/// one wins when the head is resolved, and the reconciler turns a replacement
/// into a change instead of a remove followed by an add. A document carries a
/// single charset, so charset records share one instance regardless of value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MetaInstance {
    keyword: MetaKeyword,
    value: Option<String>,
}

impl MetaInstance {
    pub fn keyword(&self) -> MetaKeyword {
        self.keyword
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

/// Canonical, comparable form of a meta declaration.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MetaRecord {
    keyword: MetaKeyword,
    name: Option<String>,
    charset: Option<String>,
    http_equiv: Option<String>,
    property: Option<String>,
    content: Option<String>,
}

impl MetaRecord {
    pub fn normalize(options: &MetaOptions) -> Self {
        Self {
            keyword: MetaKeyword::for_options(options),
            name: options.name.clone(),
            charset: options.charset.clone(),
            http_equiv: options.http_equiv.clone(),
            property: options.property.clone(),
            content: options.content.clone(),
        }
    }

    pub fn keyword(&self) -> MetaKeyword {
        self.keyword
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn charset(&self) -> Option<&str> {
        self.charset.as_deref()
    }

    pub fn http_equiv(&self) -> Option<&str> {
        self.http_equiv.as_deref()
    }

    pub fn property(&self) -> Option<&str> {
        self.property.as_deref()
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Value of the attribute named by the keyword.
    pub fn identifying_value(&self) -> Option<&str> {
        match self.keyword {
            MetaKeyword::Charset => self.charset(),
            MetaKeyword::Name => self.name(),
            MetaKeyword::Property => self.property(),
            MetaKeyword::HttpEquiv => self.http_equiv(),
        }
    }

    pub fn instance(&self) -> MetaInstance {
        let value = match self.keyword {
            MetaKeyword::Charset => None,
            _ => self.identifying_value().map(str::to_owned),
        };
        MetaInstance {
            keyword: self.keyword,
            value,
        }
    }

    pub fn structural_key(&self) -> StructuralKey {
        StructuralKey::of(self)
    }

    /// Attributes in rendering order, skipping unset ones.
    pub fn attributes(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        [
            ("charset", self.charset()),
            ("name", self.name()),
            ("property", self.property()),
            ("http-equiv", self.http_equiv()),
            ("content", self.content()),
        ]
        .into_iter()
        .filter_map(|(attr, value)| value.map(|value| (attr, value)))
    }
}

impl From<&MetaOptions> for MetaRecord {
    fn from(options: &MetaOptions) -> Self {
        MetaRecord::normalize(options)
    }
}

impl From<MetaOptions> for MetaRecord {
    fn from(options: MetaOptions) -> Self {
        MetaRecord::normalize(&options)
    }
}

/// Normalizes a component's meta list, preserving order.
pub fn normalize(metas: &[MetaOptions]) -> Vec<MetaRecord> {
    metas.iter().map(MetaRecord::normalize).collect()
}

#[cfg(test)]
#[path = "tests/meta_tests.rs"]
mod tests;
