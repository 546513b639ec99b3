#[cfg(test)]
#[path = "language_test.rs"]
mod tests;

/// Languages the question-answering service accepts, as (code, display name)
/// pairs. Order is meaningful: it drives the selector and `pdfchat languages`
/// output, with the default first.
pub static LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("hi", "Hindi"),
    ("bn", "Bengali"),
    ("te", "Telugu"),
    ("mr", "Marathi"),
    ("ta", "Tamil"),
    ("ur", "Urdu"),
    ("gu", "Gujarati"),
    ("kn", "Kannada"),
    ("ml", "Malayalam"),
    ("or", "Odia"),
    ("pa", "Punjabi"),
    ("as", "Assamese"),
    ("mai", "Maithili"),
    ("sat", "Santali"),
    ("ks", "Kashmiri"),
    ("ne", "Nepali"),
    ("sd", "Sindhi"),
    ("kok", "Konkani"),
    ("doi", "Dogri"),
    ("mni", "Manipuri"),
    ("brx", "Bodo"),
    ("sa", "Sanskrit"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("de", "German"),
    ("zh", "Chinese (Simplified)"),
    ("ar", "Arabic"),
    ("ru", "Russian"),
    ("pt", "Portuguese"),
    ("id", "Indonesian"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("tr", "Turkish"),
    ("it", "Italian"),
    ("nl", "Dutch"),
    ("pl", "Polish"),
    ("sv", "Swedish"),
    ("fi", "Finnish"),
    ("da", "Danish"),
    ("no", "Norwegian"),
    ("el", "Greek"),
    ("he", "Hebrew"),
    ("th", "Thai"),
    ("vi", "Vietnamese"),
    ("uk", "Ukrainian"),
    ("cs", "Czech"),
    ("ro", "Romanian"),
    ("hu", "Hungarian"),
    ("fa", "Persian"),
    ("ms", "Malay"),
];

pub struct Languages {}

impl Languages {
    pub fn is_supported(code: &str) -> bool {
        return LANGUAGES.iter().any(|(c, _)| return *c == code);
    }

    pub fn display_name(code: &str) -> Option<&'static str> {
        return LANGUAGES
            .iter()
            .find(|(c, _)| return *c == code)
            .map(|(_, name)| return *name);
    }

    pub fn codes() -> Vec<&'static str> {
        return LANGUAGES.iter().map(|(code, _)| return *code).collect();
    }
}
