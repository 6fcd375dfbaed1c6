use crate::foundation::core::TimeSlot;

/// Convenience result type used across the crate.
pub type QuoteResult<T> = Result<T, QuoteError>;

/// Reasons the font-size search can reject a quote.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FitError {
    /// No probed size produced a block inside both caps.
    #[error("no feasible font size (smallest probed {smallest_probed:.2}px)")]
    NoFeasibleSize {
        /// Smallest size that was actually measured.
        smallest_probed: f32,
    },

    /// The best fitting size lies outside the configured bounds.
    #[error("font size out of bounds: {size:.2}px not in [{min:.2}, {max}]")]
    OutOfBounds {
        /// Best fitting size found by the search.
        size: f32,
        /// Configured minimum.
        min: f32,
        /// Configured maximum, rendered as text (`inf` when unbounded).
        max: String,
    },
}

/// Crate-wide error type.
#[derive(thiserror::Error, Debug)]
pub enum QuoteError {
    /// Invalid configuration value.
    #[error("validation error: {0}")]
    Validation(String),

    /// A quote record breaks the ingestion contract.
    #[error("data contract error: {0}")]
    DataContract(String),

    /// Malformed span markup handed to the text engine.
    #[error("markup error: {0}")]
    Markup(String),

    /// Text shaping could not be performed (unknown font, bad size, ...).
    #[error("layout error: {0}")]
    Layout(String),

    /// The font-size search failed.
    #[error("fit error: {0}")]
    Fit(#[from] FitError),

    /// Filesystem failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// PNG encode/decode failure.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Failure scoped to a single quote, annotated for the operator.
    #[error("{slot} \"{preview}\": {source}")]
    InQuote {
        /// Time slot of the offending record.
        slot: TimeSlot,
        /// Short preview of the quote text.
        preview: String,
        /// Underlying failure.
        #[source]
        source: Box<QuoteError>,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl QuoteError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn data_contract(msg: impl Into<String>) -> Self {
        Self::DataContract(msg.into())
    }

    pub fn markup(msg: impl Into<String>) -> Self {
        Self::Markup(msg.into())
    }

    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }

    /// Attach the time slot and a preview of `quote` to this error.
    pub fn in_quote(self, slot: TimeSlot, quote: &str) -> Self {
        Self::InQuote {
            slot,
            preview: crate::foundation::core::text_preview(quote, 40),
            source: Box::new(self),
        }
    }

    /// `true` for failures that only concern the quote being rendered.
    ///
    /// Filesystem and encoding failures are never quote-local.
    pub fn is_quote_local(&self) -> bool {
        match self {
            Self::DataContract(_) | Self::Markup(_) | Self::Layout(_) | Self::Fit(_) => true,
            Self::InQuote { source, .. } => source.is_quote_local(),
            Self::Validation(_) | Self::Io(_) | Self::Image(_) | Self::Other(_) => false,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
