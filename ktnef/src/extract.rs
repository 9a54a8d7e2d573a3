//! Copying attachment data out of the stream it was parsed from.


use std::io::{Read, Seek, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use tempfile::NamedTempFile;

use crate::attach::Attachment;
use crate::binread::{BinaryReader, StreamCursor};
use crate::error::ExtractError;
use crate::message::TnefMessage;


/// Reads the data of `attachment` from the stream it was parsed from.
pub fn extract_attachment_bytes<R: Read + Seek>(attachment: &Attachment, reader: &mut R) -> Result<Vec<u8>, ExtractError> {
    let offset = attachment.offset.ok_or(ExtractError::NoData)?;
    reader.seek_to(offset)?;
    let size: usize = attachment.size.try_into().unwrap_or(usize::MAX);
    Ok(reader.read_bytes(size)?)
}

/// The file name an attachment is written under: its output name without any
/// directory components.
pub fn safe_file_name(attachment: &Attachment) -> Option<String> {
    let name = attachment.output_name();
    let last = name
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or("");
    match last {
        "" | "." | ".." => None,
        other => Some(other.to_owned()),
    }
}

/// Writes the data of `attachment` into `dir`, returning the path of the new
/// file. The file only appears once it is complete.
pub fn extract_attachment_to<R: Read + Seek, P: AsRef<Path>>(
    attachment: &Attachment,
    reader: &mut R,
    dir: P,
) -> Result<PathBuf, ExtractError> {
    let dir = dir.as_ref();
    let file_name = safe_file_name(attachment).ok_or(ExtractError::NoFileName)?;
    let data = extract_attachment_bytes(attachment, reader)?;

    let mut temp_file = NamedTempFile::new_in(dir)?;
    temp_file.write_all(&data)?;
    temp_file.flush()?;

    let path = dir.join(&file_name);
    temp_file.persist(&path)
        .map_err(|e| ExtractError::Persist { path: path.clone(), error: e.error })?;
    info!("extracted {:?} ({} bytes)", path, data.len());
    Ok(path)
}

/// Writes the attachment called `name` into `dir`.
pub fn extract_named<R: Read + Seek, P: AsRef<Path>>(
    message: &TnefMessage,
    name: &str,
    reader: &mut R,
    dir: P,
) -> Result<PathBuf, ExtractError> {
    let attachment = message.attachment(name)
        .ok_or_else(|| ExtractError::NotFound(name.to_owned()))?;
    extract_attachment_to(attachment, reader, dir)
}

/// Writes every attachment of `message` into `dir`, stopping at the first
/// failure.
pub fn extract_all<R: Read + Seek, P: AsRef<Path>>(
    message: &TnefMessage,
    reader: &mut R,
    dir: P,
) -> Result<Vec<PathBuf>, ExtractError> {
    let dir = dir.as_ref();
    debug!("extracting {} attachments to {:?}", message.attachments.len(), dir);
    message.attachments
        .iter()
        .map(|attachment| extract_attachment_to(attachment, reader, dir))
        .collect()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_file_name() {
        let mut attachment = Attachment::new();
        assert_eq!(safe_file_name(&attachment), None);

        attachment.name = "Report".to_owned();
        assert_eq!(safe_file_name(&attachment).as_deref(), Some("Report"));

        attachment.file_name = "..\\..\\evil.exe".to_owned();
        assert_eq!(safe_file_name(&attachment).as_deref(), Some("evil.exe"));

        attachment.file_name = "/etc/".to_owned();
        assert_eq!(safe_file_name(&attachment), None);
    }

    #[test]
    fn test_bytes_without_data() {
        let attachment = Attachment::new();
        let mut reader = std::io::Cursor::new(vec![0u8; 4]);
        assert!(matches!(extract_attachment_bytes(&attachment, &mut reader), Err(ExtractError::NoData)));
    }
}
