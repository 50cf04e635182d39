use std::path::Path;

/// Content types by lowercase file extension
pub const MIME_TYPES: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "css" => "text/css",
    "js" => "application/javascript",
    "json" => "application/json",
    "md" => "text/markdown",
    "markdown" => "text/markdown",
    "html" => "text/html",
    "htm" => "text/html",
    "svg" => "image/svg+xml",
    "xml" => "text/xml",
    "yml" => "text/yaml",
    "pdf" => "application/pdf",
    "wasm" => "application/wasm",
    "woff" => "application/font-woff",
    "woff2" => "application/font-woff2",
    "eot" => "application/vnd.ms-fontobject",
    "otf" => "font/otf",
    "ics" => "text/calendar",
    "coffee" => "text/coffeescript",
    "swf" => "application/x-shockwave-flash",
};

/// Guess the content type of `path` from its extension
pub fn guess(path: &str) -> Option<&'static str> {
    let extension = Path::new(path).extension()?.to_str()?;
    MIME_TYPES.get(extension.to_ascii_lowercase().as_str()).copied()
}
