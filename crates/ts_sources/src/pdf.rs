use ts_core::{Error, Result};

/// Reject anything whose name does not end in `.pdf` (case-insensitive).
pub fn ensure_pdf_file_name(file_name: &str) -> Result<()> {
    if file_name.to_ascii_lowercase().ends_with(".pdf") {
        Ok(())
    } else {
        Err(Error::InvalidFileType("File must be a PDF".to_string()))
    }
}

/// Extract the text layer of an in-memory PDF. Returns an empty string for scanned
/// documents that have no text layer.
pub async fn extract_pdf_text(bytes: Vec<u8>) -> Result<String> {
    let size = bytes.len();
    // the extractor is CPU bound and may panic on broken files
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| Error::Pdf(format!("extractor crashed: {}", e)))?
        .map_err(|e| Error::Pdf(format!("Error processing PDF: {}", e)))?;

    let text = normalize_pages(&text);
    tracing::debug!("📄 Extracted {} chars from {} byte PDF", text.len(), size);
    Ok(text)
}

/// Drop blank lines and form feeds between pages, keeping one line per text line.
fn normalize_pages(raw: &str) -> String {
    raw.split(|c| c == '\n' || c == '\u{c}')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_check() {
        assert!(ensure_pdf_file_name("report.pdf").is_ok());
        assert!(ensure_pdf_file_name("REPORT.PDF").is_ok());
        assert!(matches!(ensure_pdf_file_name("notes.txt"), Err(Error::InvalidFileType(_))));
        assert!(matches!(ensure_pdf_file_name("pdf"), Err(Error::InvalidFileType(_))));
    }

    #[test]
    fn test_normalize_pages() {
        let raw = "  First page line \n\n\u{c}Second page\n   \nlast  ";
        assert_eq!(normalize_pages(raw), "First page line\nSecond page\nlast");
    }

    #[tokio::test]
    async fn test_garbage_bytes_are_a_pdf_error() {
        let result = extract_pdf_text(b"definitely not a pdf".to_vec()).await;
        assert!(matches!(result, Err(Error::Pdf(_))));
    }
}
