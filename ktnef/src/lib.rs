//! Decoding of TNEF (`winmail.dat`) containers and the MAPI properties they
//! carry, plus decompression of compressed RTF.
//!
//! ```no_run
//! let message = ktnef::parse_file("winmail.dat", ktnef::ParseOptions::default())?;
//! for attachment in &message.attachments {
//!     println!("{} ({}, {} bytes)", attachment.name, attachment.mime_tag, attachment.size);
//! }
//! # Ok::<(), ktnef::TnefError>(())
//! ```

pub mod attach;
pub mod attribute;
pub mod binread;
pub mod defs;
pub mod error;
pub mod extract;
pub mod lzfu;
pub mod mapi;
pub mod message;
pub mod mime;
pub mod parser;
pub mod property_set;
pub mod writer;


pub use crate::attach::{Attachment, ParseState};
pub use crate::attribute::{AttrValue, Attribute};
pub use crate::defs::{MapiType, TnefAttributeId, TnefAttributeLevel, TnefAttributeType};
pub use crate::error::{ExtractError, LzfuError, TnefError};
pub use crate::extract::{extract_all, extract_attachment_bytes, extract_attachment_to, extract_named};
pub use crate::mapi::{PropId, PropName, PropValue, Property};
pub use crate::message::TnefMessage;
pub use crate::parser::{parse, parse_file, parse_with_options, ParseOptions};
pub use crate::property_set::PropertySet;
pub use crate::writer::TnefWriter;
