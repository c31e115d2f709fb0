//! `<link>` declarations.

/// A link tag. `rel` and `href` are required; everything else is optional.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Link {
    pub rel: String,
    pub href: String,
    pub hreflang: Option<String>,
    pub media: Option<String>,
    pub sizes: Option<String>,
    pub mime_type: Option<String>,
    pub crossorigin: Option<String>,
    pub as_: Option<String>,
}

impl Link {
    pub fn new(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            href: href.into(),
            hreflang: None,
            media: None,
            sizes: None,
            mime_type: None,
            crossorigin: None,
            as_: None,
        }
    }

    pub fn with_hreflang(mut self, hreflang: impl Into<String>) -> Self {
        self.hreflang = Some(hreflang.into());
        self
    }

    pub fn with_media(mut self, media: impl Into<String>) -> Self {
        self.media = Some(media.into());
        self
    }

    pub fn with_sizes(mut self, sizes: impl Into<String>) -> Self {
        self.sizes = Some(sizes.into());
        self
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn with_crossorigin(mut self, crossorigin: impl Into<String>) -> Self {
        self.crossorigin = Some(crossorigin.into());
        self
    }

    pub fn with_as(mut self, as_: impl Into<String>) -> Self {
        self.as_ = Some(as_.into());
        self
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        [
            ("rel", Some(self.rel.as_str())),
            ("href", Some(self.href.as_str())),
            ("hreflang", self.hreflang.as_deref()),
            ("media", self.media.as_deref()),
            ("sizes", self.sizes.as_deref()),
            ("type", self.mime_type.as_deref()),
            ("crossorigin", self.crossorigin.as_deref()),
            ("as", self.as_.as_deref()),
        ]
        .into_iter()
        .filter_map(|(attr, value)| value.map(|value| (attr, value)))
    }
}
