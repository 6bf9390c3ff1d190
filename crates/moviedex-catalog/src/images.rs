/// Image families served by the catalog CDN, each with the size the client uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Poster,
    Backdrop,
    Profile,
}

impl ImageKind {
    pub fn size(&self) -> &'static str {
        match self {
            ImageKind::Poster => "w500",
            ImageKind::Backdrop => "w1280",
            ImageKind::Profile => "w185",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImageUrls {
    base_url: String,
}

impl ImageUrls {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Full URL for a relative image path such as "/abc.jpg"
    pub fn url(&self, kind: ImageKind, path: Option<&str>) -> Option<String> {
        let path = path.filter(|p| !p.is_empty())?;
        let path = path.strip_prefix('/').unwrap_or(path);
        Some(format!("{}/{}/{}", self.base_url, kind.size(), path))
    }

    pub fn poster(&self, path: Option<&str>) -> Option<String> {
        self.url(ImageKind::Poster, path)
    }

    pub fn backdrop(&self, path: Option<&str>) -> Option<String> {
        self.url(ImageKind::Backdrop, path)
    }

    pub fn profile(&self, path: Option<&str>) -> Option<String> {
        self.url(ImageKind::Profile, path)
    }
}

impl Default for ImageUrls {
    fn default() -> Self {
        Self::new("https://image.tmdb.org/t/p")
    }
}
