//! Utilidades de validación
//!
//! Este módulo contiene funciones helper usadas por los DTOs
//! (`#[validate(custom = ...)]`) y por el motor de rutas.

use std::collections::HashSet;
use std::hash::Hash;
use validator::ValidationError;

/// Validar que un string no esté vacío
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_blank");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que la metadata libre del pathway sea un objeto JSON
pub fn validate_meta_object(value: &serde_json::Value) -> Result<(), ValidationError> {
    if !value.is_object() {
        let mut error = ValidationError::new("meta_object");
        error.add_param("expected".into(), &"JSON object".to_string());
        return Err(error);
    }
    Ok(())
}

/// Verificar que todos los elementos de la lista sean distintos,
/// sin importar si las repeticiones son adyacentes o no
pub fn all_distinct<T: Eq + Hash>(values: &[T]) -> bool {
    let unique: HashSet<&T> = values.iter().collect();
    unique.len() == values.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("Ruta Norte").is_ok());
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank("").is_err());
    }

    #[test]
    fn test_validate_meta_object() {
        assert!(validate_meta_object(&json!({ "lanes": 2 })).is_ok());
        assert!(validate_meta_object(&json!({})).is_ok());
        assert!(validate_meta_object(&json!([1, 2])).is_err());
        assert!(validate_meta_object(&json!("texto")).is_err());
    }

    #[test]
    fn test_all_distinct() {
        assert!(all_distinct::<u8>(&[]));
        assert!(all_distinct(&[1, 2, 3]));
        assert!(!all_distinct(&[1, 2, 1]));
        assert!(!all_distinct(&[4, 4]));
    }
}
