//! Recording format detection

use std::path::Path;

/// Extensions of raw broadcast transport-stream recordings
pub const TS_EXTENSIONS: [&str; 4] = ["ts", "m2ts", "m2t", "mts"];

/// Check if a path looks like a transport-stream recording
pub fn is_transport_stream(path: &Path) -> bool {
    has_extension(path, &TS_EXTENSIONS)
}

/// Case-insensitive extension match; a leading dot in `extensions` is ignored
pub fn has_extension<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    extensions
        .iter()
        .any(|candidate| candidate.as_ref().trim_start_matches('.').eq_ignore_ascii_case(ext))
}
