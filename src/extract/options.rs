//! Extraction options and configuration.

/// Largest segment extracted by default.
pub const DEFAULT_MAX_PAGES: u32 = 100;

/// Oversampling factor pages are rendered at, independent of any viewer zoom.
pub const DEFAULT_RENDER_SCALE: f32 = 2.0;

/// Options for extracting page images.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    /// Maximum number of pages a segment may span
    pub max_pages: u32,

    /// Scale factor passed to the rasterizer (1.0 = 72 dpi)
    pub render_scale: f32,

    /// Whether to extract the whole chapter or just the current page
    pub mode: ExtractMode,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the segment size limit.
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Set the render scale.
    pub fn with_render_scale(mut self, scale: f32) -> Self {
        self.render_scale = scale;
        self
    }

    /// Set extract mode.
    pub fn with_mode(mut self, mode: ExtractMode) -> Self {
        self.mode = mode;
        self
    }

    /// Extract only the current page.
    pub fn single_page(mut self) -> Self {
        self.mode = ExtractMode::SinglePage;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            render_scale: DEFAULT_RENDER_SCALE,
            mode: ExtractMode::Chapter,
        }
    }
}

/// What an extraction request covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractMode {
    /// Every page of the chapter containing the current page
    #[default]
    Chapter,
    /// The current page only, ignoring chapters
    SinglePage,
}

impl ExtractMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            ExtractMode::Chapter => ExtractMode::SinglePage,
            ExtractMode::SinglePage => ExtractMode::Chapter,
        }
    }

    /// Label for the extraction action in this mode.
    pub fn action_label(self) -> &'static str {
        match self {
            ExtractMode::Chapter => "Extract Chapter",
            ExtractMode::SinglePage => "Extract Page",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_options_builder() {
        let options = ExtractOptions::new()
            .with_max_pages(20)
            .with_render_scale(1.5)
            .single_page();

        assert_eq!(options.max_pages, 20);
        assert_eq!(options.render_scale, 1.5);
        assert_eq!(options.mode, ExtractMode::SinglePage);
    }

    #[test]
    fn test_default_options() {
        let options = ExtractOptions::default();
        assert_eq!(options.max_pages, 100);
        assert_eq!(options.render_scale, 2.0);
        assert_eq!(options.mode, ExtractMode::Chapter);
    }

    #[test]
    fn test_mode_toggle() {
        assert_eq!(ExtractMode::Chapter.toggled(), ExtractMode::SinglePage);
        assert_eq!(ExtractMode::SinglePage.toggled(), ExtractMode::Chapter);
        assert_eq!(ExtractMode::SinglePage.action_label(), "Extract Page");
    }
}
