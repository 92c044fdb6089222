use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::utils::validation::{validate_meta_object, validate_not_blank};

fn default_meta() -> serde_json::Value {
    serde_json::json!({})
}

// Request para crear una ruta simple junto con su pathway
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSimpleRouteRequest {
    #[validate(length(min = 1, max = 150), custom = "validate_not_blank")]
    pub name: String,

    #[validate(length(max = 500))]
    pub description: Option<String>,

    pub origin_city_id: Uuid,
    pub destination_city_id: Uuid,
    pub origin_terminal_id: Uuid,
    pub destination_terminal_id: Uuid,

    #[validate(range(min = 0, max = 1_000_000))]
    pub base_time: i32,

    // Campos del pathway
    #[validate(length(min = 1, max = 150), custom = "validate_not_blank")]
    pub pathway_name: Option<String>,

    #[validate(range(min = 0.0, max = 1_000_000.0))]
    pub distance: f64,

    #[validate(range(min = 0, max = 1_000_000))]
    pub typical_time: i32,

    #[serde(default)]
    pub toll_road: bool,

    #[serde(default = "default_meta")]
    #[validate(custom = "validate_meta_object")]
    pub meta: serde_json::Value,
}

impl CreateSimpleRouteRequest {
    /// Nombre del pathway: el enviado o uno derivado del nombre de la ruta
    pub fn pathway_name(&self) -> String {
        self.pathway_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("{} pathway", self.name.trim()))
    }
}

// Request para crear una ruta compuesta.
// `route_ids` no se valida aquí: la longitud mínima la decide el motor.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCompoundRouteRequest {
    #[validate(length(min = 1, max = 150), custom = "validate_not_blank")]
    pub name: String,

    #[validate(length(max = 500))]
    pub description: Option<String>,

    pub route_ids: Vec<Uuid>,
}

// Request para reemplazar la cadena de segmentos
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCompoundSegmentsRequest {
    pub route_ids: Vec<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn simple_request() -> CreateSimpleRouteRequest {
        serde_json::from_value(json!({
            "name": "Centro - Norte",
            "origin_city_id": Uuid::new_v4(),
            "destination_city_id": Uuid::new_v4(),
            "origin_terminal_id": Uuid::new_v4(),
            "destination_terminal_id": Uuid::new_v4(),
            "base_time": 110,
            "distance": 100.0,
            "typical_time": 120
        }))
        .unwrap()
    }

    #[test]
    fn test_simple_request_defaults() {
        let request = simple_request();
        assert!(!request.toll_road);
        assert_eq!(request.meta, json!({}));
        assert!(request.validate().is_ok());
        assert_eq!(request.pathway_name(), "Centro - Norte pathway");
    }

    #[test]
    fn test_custom_pathway_name() {
        let mut request = simple_request();
        request.pathway_name = Some("Autopista 57".to_string());
        assert_eq!(request.pathway_name(), "Autopista 57");
    }

    #[test]
    fn test_negative_distance_rejected() {
        let mut request = simple_request();
        request.distance = -1.0;
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("distance"));
    }

    #[test]
    fn test_times_have_upper_bound() {
        let mut request = simple_request();
        request.typical_time = i32::MAX;
        request.base_time = i32::MAX;
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("typical_time"));
        assert!(errors.field_errors().contains_key("base_time"));
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut request = simple_request();
        request.name = "   ".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_meta_must_be_object() {
        let mut request = simple_request();
        request.meta = json!(["peaje"]);
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("meta"));
    }

    #[test]
    fn test_compound_request_accepts_single_id() {
        let request: CreateCompoundRouteRequest = serde_json::from_value(json!({
            "name": "Solo uno",
            "route_ids": [Uuid::new_v4()]
        }))
        .unwrap();
        assert!(request.validate().is_ok());
    }
}
