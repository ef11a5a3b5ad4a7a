//! Object-key naming for persona photos.

use crate::types::DbId;

/// Fallback extension when the uploaded file has no name at all.
const EXTENSION_POR_DEFECTO: &str = "bin";

/// Build the storage key for an uploaded photo.
///
/// Convention: `{owner}-{epoch_millis}.{ext}`, where `ext` is the last
/// `.`-separated segment of the original filename. The owner id plus a
/// millisecond timestamp keeps keys from colliding across uploads.
///
/// # Examples
///
/// ```
/// use padron_core::foto::clave_de_foto;
///
/// assert_eq!(clave_de_foto(7, 1700000000000, "retrato.jpg"), "7-1700000000000.jpg");
/// assert_eq!(clave_de_foto(7, 1700000000000, "a.b.PNG"), "7-1700000000000.PNG");
/// ```
pub fn clave_de_foto(owner: DbId, epoch_millis: i64, nombre_original: &str) -> String {
    let extension = nombre_original
        .rsplit('.')
        .next()
        .filter(|ext| !ext.is_empty())
        .unwrap_or(EXTENSION_POR_DEFECTO);
    format!("{owner}-{epoch_millis}.{extension}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_tomada_del_nombre() {
        assert_eq!(clave_de_foto(1, 42, "foto.jpg"), "1-42.jpg");
        assert_eq!(clave_de_foto(1, 42, "archivo.tar.gz"), "1-42.gz");
    }

    #[test]
    fn test_nombre_sin_punto_usa_el_nombre_completo() {
        // Mirrors taking the last dot-separated segment: with no dot, the
        // whole name is the segment.
        assert_eq!(clave_de_foto(1, 42, "retrato"), "1-42.retrato");
    }

    #[test]
    fn test_nombre_vacio_usa_extension_por_defecto() {
        assert_eq!(clave_de_foto(1, 42, ""), "1-42.bin");
        assert_eq!(clave_de_foto(1, 42, "foto."), "1-42.bin");
    }

    #[test]
    fn test_claves_distintas_por_marca_de_tiempo() {
        assert_ne!(clave_de_foto(1, 1, "a.png"), clave_de_foto(1, 2, "a.png"));
    }
}
