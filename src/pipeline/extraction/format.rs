/// Upload kinds accepted for analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    PlainText,
    Pdf,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PlainText => "plain_text",
            Self::Pdf => "pdf",
        }
    }

    /// Resolve the kind from an upload's file name. Only `.txt` and `.pdf`
    /// (any case) are accepted.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let mime = mime_guess::from_path(filename.trim()).first()?;
        match mime.essence_str() {
            "text/plain" if has_extension(filename, "txt") => Some(Self::PlainText),
            "application/pdf" => Some(Self::Pdf),
            _ => None,
        }
    }
}

fn has_extension(filename: &str, ext: &str) -> bool {
    filename
        .trim()
        .rsplit_once('.')
        .is_some_and(|(_, e)| e.eq_ignore_ascii_case(ext))
}
