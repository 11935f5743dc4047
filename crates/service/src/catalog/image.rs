use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::product::ImageUpload;

fn mime_from_extension(file_name: &str) -> &'static str {
    let ext = file_name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

/// Encode an upload as a `data:<mime>;base64,...` URL.
///
/// The declared content type wins when it looks like an image; otherwise the
/// type is guessed from the file extension.
pub fn encode_data_url(upload: &ImageUpload) -> String {
    let mime = upload
        .content_type
        .as_deref()
        .filter(|ct| ct.starts_with("image/"))
        .unwrap_or_else(|| mime_from_extension(&upload.file_name));
    format!("data:{mime};base64,{}", STANDARD.encode(&upload.bytes))
}
