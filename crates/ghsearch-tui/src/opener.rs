// Handing URLs to the user's browser
use anyhow::Context;

pub trait UrlOpener {
    fn open(&self, url: &str) -> anyhow::Result<()>;
}

/// Opens URLs with the platform's default handler
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBrowser;

impl UrlOpener for SystemBrowser {
    fn open(&self, url: &str) -> anyhow::Result<()> {
        open::that_detached(url).with_context(|| format!("Failed to open browser for {}", url))
    }
}
