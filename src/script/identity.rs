/// A gfwrt device identified by the token in its setup URL
///
/// The token is opaque: it is neither validated nor stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GfWrt {
    uuid: String,
}

impl GfWrt {
    pub fn new(uuid: impl Into<String>) -> Self {
        Self { uuid: uuid.into() }
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }
}
