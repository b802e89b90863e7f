use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Could only reduce the image to {families} families of nearby colors")]
    QuantizationFailure { families: usize },

    #[error("Image has only {families} usable color families; at least 3 are required")]
    DegenerateImage { families: usize },

    #[error("Bad digit source: {0}")]
    SourceFormat(String),

    /// `position` is 1-based, matching reported digit offsets.
    #[error("Invalid hex digit {byte:#04x} at digit position {position}")]
    InvalidDigit { byte: u8, position: u64 },

    #[error("Digit API error: {0}")]
    Api(String),

    #[error("Not a palette-indexed image: {0}")]
    NotIndexed(String),

    #[error("Image bytes not found in the first {searched} hex digits")]
    NeedleNotFound { searched: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("PNG encoding error: {0}")]
    PngEncode(#[from] png::EncodingError),

    #[error("PNG decoding error: {0}")]
    PngDecode(#[from] png::DecodingError),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("HTTP error: {0}")]
    Http(#[from] ureq::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
