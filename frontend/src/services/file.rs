//! Lecture d'un fichier choisi par l'utilisateur

use js_sys::Uint8Array;
use wasm_bindgen_futures::JsFuture;
use web_sys::File;

use crate::config::MAX_IMPORT_SIZE;
use crate::types::{AppError, AppResult};

/// Contenu brut du fichier (l'encodage est détecté au parsing)
pub async fn read_file_bytes(file: &File) -> AppResult<Vec<u8>> {
    let size = file.size() as usize;
    if size > MAX_IMPORT_SIZE {
        return Err(AppError::File(format!(
            "{} is {} bytes, the limit is {}",
            file.name(),
            size,
            MAX_IMPORT_SIZE
        )));
    }

    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| AppError::File(format!("{:?}", e)))?;

    Ok(Uint8Array::new(&buffer).to_vec())
}
