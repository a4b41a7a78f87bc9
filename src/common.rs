/// Introducer bytes of the blocks that can follow the logical screen descriptor.
///
/// Anything else ends the walk over the file, since there is no way to tell how the bytes after
/// an unknown label are framed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum Block {
    Image = 0x2C,
    Extension = 0x21,
    Trailer = 0x3B,
}

impl TryFrom<u8> for Block {
    type Error = ParseError;

    fn try_from(label: u8) -> Result<Self, ParseError> {
        match label {
            0x2C => Ok(Block::Image),
            0x21 => Ok(Block::Extension),
            0x3B => Ok(Block::Trailer),
            _ => Err(ParseError::IncorrectBlockLabel),
        }
    }
}

/// Extension labels. Only the graphics control extension is read, the others are skipped over
/// as sub-block chains.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum ExtensionLabel {
    Graphics = 0xF9,
    App = 0xFF,
    Text = 0x01,
    Comment = 0xFE,
}

impl TryFrom<u8> for ExtensionLabel {
    type Error = ParseError;

    fn try_from(label: u8) -> Result<Self, ParseError> {
        match label {
            0xF9 => Ok(ExtensionLabel::Graphics),
            0xFF => Ok(ExtensionLabel::App),
            0x01 => Ok(ExtensionLabel::Text),
            0xFE => Ok(ExtensionLabel::Comment),
            _ => Err(ParseError::IncorrectExtension),
        }
    }
}

/// Errors that emerge when looking at a gif file
///
/// Decoding itself never fails; these only come out of the checked entry points.
#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    ///Malformed GIF file, the signature is not `GIF89a`
    BadGifFile,
    ///Invalid block label
    IncorrectBlockLabel,
    ///Invalid extension label
    IncorrectExtension,
}

/// Errors for resize arguments that would read or write outside the caller's buffers
#[derive(Debug, PartialEq, Eq)]
pub enum ResizeError {
    ///Source slice holds fewer than `width * height` samples
    SourceTooSmall,
    ///Source has a zero dimension but the destination does not
    EmptySource,
    ///In-place reduce asked for a destination larger than the source
    DestinationTooLarge,
}
