//! Check a photo against the upload rules.

use std::path::PathBuf;

use ticketshare_banner_model::source::ValidationPolicy;

use super::read_upload;

pub fn run(file: PathBuf) -> anyhow::Result<()> {
    println!("Validating upload: {}", file.display());

    let upload = read_upload(&file)?;
    let policy = ValidationPolicy::default();
    println!("  Type: {}", upload.mime_type);
    println!("  Size: {} bytes (limit {})", upload.effective_size(), policy.max_bytes);

    match policy.validate(&upload) {
        Ok(()) => {
            println!("\nPhoto can be used on a banner.");
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!("{} ({e})", e.user_message())),
    }
}
