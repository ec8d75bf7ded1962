//! Naming conventions for media leaving the gallery.

const VIDEO_EXTENSIONS: [&str; 4] = ["mp4", "webm", "ogg", "mov"];

pub const VIDEO_DOWNLOAD_EXTENSION: &str = "mp4";
pub const IMAGE_DOWNLOAD_EXTENSION: &str = "jpg";

/// True when the address ends in a known video extension, case-insensitively.
pub fn is_video_url(url: &str) -> bool {
    match url.rsplit_once('.') {
        Some((_, ext)) => VIDEO_EXTENSIONS.iter().any(|v| ext.eq_ignore_ascii_case(v)),
        None => false,
    }
}

/// `wedding-memory-<id>.<ext>`
pub fn download_file_name(id: i64, file_url: &str) -> String {
    let ext = if is_video_url(file_url) {
        VIDEO_DOWNLOAD_EXTENSION
    } else {
        IMAGE_DOWNLOAD_EXTENSION
    };
    format!("wedding-memory-{}.{}", id, ext)
}
