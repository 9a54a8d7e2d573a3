//! MIME type guessing for attachments that do not declare one.


pub const OCTET_STREAM: &str = "application/octet-stream";
pub const MS_TNEF: &str = "application/vnd.ms-tnef";

/// How many leading bytes of an attachment are used for content sniffing.
pub const SNIFF_LENGTH: usize = 32;


/// Looks up the MIME type for the extension of `file_name`.
pub fn mime_from_extension(file_name: &str) -> Option<&'static str> {
    let (_stem, ext) = file_name.rsplit_once('.')?;
    let mime = match ext.to_ascii_lowercase().as_str() {
        "txt" | "text" | "log" => "text/plain",
        "htm" | "html" => "text/html",
        "csv" => "text/csv",
        "rtf" => "text/rtf",
        "xml" => "application/xml",
        "ics" | "vcs" => "text/calendar",
        "vcf" => "text/vcard",
        "eml" => "message/rfc822",
        "dat" | "tnef" => MS_TNEF,
        "msg" => "application/vnd.ms-outlook",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "svg" => "image/svg+xml",
        "wmf" => "image/x-wmf",
        "emf" => "image/x-emf",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "dot" => "application/msword",
        "xls" => "application/vnd.ms-excel",
        "ppt" => "application/vnd.ms-powerpoint",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "odt" => "application/vnd.oasis.opendocument.text",
        "ods" => "application/vnd.oasis.opendocument.spreadsheet",
        "zip" => "application/zip",
        "gz" => "application/gzip",
        "tar" => "application/x-tar",
        "7z" => "application/x-7z-compressed",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "mp4" => "video/mp4",
        "avi" => "video/x-msvideo",
        "exe" | "dll" => "application/x-msdownload",
        "bin" => OCTET_STREAM,
        _ => return None,
    };
    Some(mime)
}

/// Guesses the MIME type from the first bytes of the content.
pub fn mime_from_content(data: &[u8]) -> Option<&'static str> {
    let prefix = &data[..data.len().min(SNIFF_LENGTH)];
    infer::get(prefix).map(|kind| kind.mime_type())
}

/// Whether a content sniff would improve on the extension-based guess.
pub fn needs_sniffing(extension_guess: Option<&str>) -> bool {
    match extension_guess {
        None => true,
        Some(mime) => mime == OCTET_STREAM,
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_lookup() {
        assert_eq!(mime_from_extension("file.txt"), Some("text/plain"));
        assert_eq!(mime_from_extension("REPORT.PDF"), Some("application/pdf"));
        assert_eq!(mime_from_extension("archive.tar.gz"), Some("application/gzip"));
        assert_eq!(mime_from_extension("noextension"), None);
        assert_eq!(mime_from_extension("weird.qqq"), None);
    }

    #[test]
    fn test_content_sniffing() {
        let png = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0\0\x01\0\0\0\x01\x08\x06\0\0\0";
        assert_eq!(mime_from_content(png), Some("image/png"));
        assert_eq!(mime_from_content(b"%PDF-1.4\n"), Some("application/pdf"));
        assert_eq!(mime_from_content(b""), None);
    }

    #[test]
    fn test_needs_sniffing() {
        assert!(needs_sniffing(None));
        assert!(needs_sniffing(Some(OCTET_STREAM)));
        assert!(!needs_sniffing(Some("text/plain")));
    }
}
